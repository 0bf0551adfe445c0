use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    event::{event::CreateEvent, Event},
    id::EventId,
    space::SpaceTemplate,
};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// The next event to show on the booking page, if any. A cancelled
    /// event is still surfaced; a non-cancelled event at the same instant
    /// wins the tie.
    async fn find_upcoming(&self) -> AppResult<Option<Event>>;
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn create(&self, event: CreateEvent) -> AppResult<Event>;
    async fn cancel(&self, event_id: EventId) -> AppResult<Event>;
    async fn find_templates(&self) -> AppResult<Vec<SpaceTemplate>>;
}
