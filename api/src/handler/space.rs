use axum::{
    extract::{Path, State},
    Json,
};
use kernel::model::{
    id::{EventId, SpaceId},
    space::event::{BookSpace, CancelBooking},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::space::{BookSpaceRequest, BookSpaceResponse, MessageResponse},
};

pub async fn book_space(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<BookSpaceRequest>,
) -> AppResult<Json<BookSpaceResponse>> {
    let booked = registry
        .space_repository()
        .book(BookSpace::new(event_id, req.space_id, user.id()))
        .await?;

    tracing::info!(
        user.email = %user.user.email,
        space.name = %booked.space_name,
        "space booked"
    );
    Ok(Json(BookSpaceResponse::booked(booked)))
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    registry
        .space_repository()
        .cancel(CancelBooking::new(space_id, user.id()))
        .await?;

    Ok(Json(MessageResponse {
        message: "Booking cancelled successfully".into(),
    }))
}
