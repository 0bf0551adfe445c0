use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{EventId, TemplateId};

#[derive(Debug, new)]
pub struct CreateEvent {
    pub city: String,
    pub event_at: DateTime<Utc>,
    pub template_ids: Vec<TemplateId>,
}

#[derive(Debug, new)]
pub struct CancelEvent {
    pub event_id: EventId,
}
