use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::space::{
    event::{BookSpace, BookSpaceForUser, CancelBooking},
    BookedSpace,
};

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Books a space for the requesting user, enforcing the approval gate,
    /// the one-space-per-event limit and availability.
    async fn book(&self, event: BookSpace) -> AppResult<BookedSpace>;
    /// Admin variant: same checks minus the approval gate.
    async fn book_for_user(&self, event: BookSpaceForUser) -> AppResult<BookedSpace>;
    /// Releases a booking, but only when it is held by the requesting user.
    async fn cancel(&self, event: CancelBooking) -> AppResult<()>;
}
