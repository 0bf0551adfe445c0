use axum::{
    routing::{delete, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::space::{book_space, cancel_booking};

pub fn build_space_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/events/:event_id/book", post(book_space))
        .route("/:space_id/cancel", delete(cancel_booking));

    Router::new().nest("/spaces", routers)
}
