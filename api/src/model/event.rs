use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    event::{event::CreateEvent, Event},
    id::{EventId, TemplateId},
    space::SpaceTemplate,
};
use serde::{Deserialize, Serialize};

use super::space::SpaceResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub city: String,
    pub date_time: DateTime<Utc>,
    pub spaces: Vec<SpaceResponse>,
    pub available_spaces_count: usize,
    pub total_spaces_count: usize,
    pub cancelled: bool,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let available_spaces_count = value.available_spaces_count();
        let total_spaces_count = value.total_spaces_count();
        let Event {
            event_id,
            city,
            event_at,
            cancelled,
            spaces,
        } = value;
        Self {
            id: event_id,
            city,
            date_time: event_at,
            spaces: spaces.into_iter().map(SpaceResponse::from).collect(),
            available_spaces_count,
            total_spaces_count,
            cancelled,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(skip)]
    pub date_time: DateTime<Utc>,
    #[garde(length(min = 1, max = 6))]
    pub space_template_ids: Vec<TemplateId>,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
            city,
            date_time,
            space_template_ids,
        } = value;
        CreateEvent {
            city,
            event_at: date_time,
            template_ids: space_template_ids,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceTemplateResponse {
    pub id: TemplateId,
    pub name: String,
    pub color: kernel::model::space::SpaceColor,
    pub description: Option<String>,
}

impl From<SpaceTemplate> for SpaceTemplateResponse {
    fn from(value: SpaceTemplate) -> Self {
        let SpaceTemplate {
            template_id,
            name,
            color,
            description,
        } = value;
        Self {
            id: template_id,
            name,
            color,
            description,
        }
    }
}
