use derive_new::new;

use crate::model::id::{EventId, SpaceId, UserId};

#[derive(Debug, new)]
pub struct BookSpace {
    pub event_id: EventId,
    pub space_id: SpaceId,
    pub user_id: UserId,
}

/// Admin booking on a user's behalf. The approval gate does not apply;
/// the one-space limit and availability checks still do.
#[derive(Debug, new)]
pub struct BookSpaceForUser {
    pub event_id: EventId,
    pub space_id: SpaceId,
    pub user_id: UserId,
}

#[derive(Debug, new)]
pub struct CancelBooking {
    pub space_id: SpaceId,
    pub user_id: UserId,
}
