use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::registration::register;

pub fn build_registration_routers() -> Router<AppRegistry> {
    let routers = Router::new().route("/register", post(register));

    Router::new().nest("/registration", routers)
}
