use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{get_current_user, update_profile, upload_picture};

pub fn build_user_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/me", get(get_current_user))
        .route("/me", put(update_profile))
        .route("/me/upload-picture", post(upload_picture));

    Router::new().nest("/users", routers)
}
