use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::file::serve_file;

pub fn build_file_routers() -> Router<AppRegistry> {
    Router::new().route("/files", get(serve_file))
}
