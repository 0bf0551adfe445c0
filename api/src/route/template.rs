use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::template::show_space_templates;

pub fn build_template_routers() -> Router<AppRegistry> {
    Router::new().route("/space-templates", get(show_space_templates))
}
