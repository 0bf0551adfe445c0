use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::event::{cancel_event, register_event, show_all_events, show_upcoming_event};

pub fn build_event_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/upcoming", get(show_upcoming_event))
        .route("/all", get(show_all_events))
        .route("/", post(register_event))
        .route("/:event_id/cancel", put(cancel_event));

    Router::new().nest("/events", routers)
}
