use axum::Router;
use registry::AppRegistry;

pub mod admin;
pub mod auth;
pub mod event;
pub mod file;
pub mod health;
pub mod registration;
pub mod space;
pub mod template;
pub mod user;

/// Everything is served under /api, matching the paths the front ends call.
pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(health::build_health_check_routers())
        .merge(auth::build_auth_routers())
        .merge(registration::build_registration_routers())
        .merge(user::build_user_routers())
        .merge(event::build_event_routers())
        .merge(space::build_space_routers())
        .merge(template::build_template_routers())
        .merge(admin::build_admin_routers())
        .merge(file::build_file_routers());
    Router::new().nest("/api", router)
}
