use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::auth::login;

pub fn build_auth_routers() -> Router<AppRegistry> {
    let routers = Router::new().route("/login", post(login));

    Router::new().nest("/auth", routers)
}
