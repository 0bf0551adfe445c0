use chrono::{DateTime, Utc};

use crate::model::{id::EventId, space::Space};

pub mod event;

/// An event snapshot with its full set of spaces. Always reloaded from
/// storage as a whole, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: EventId,
    pub city: String,
    pub event_at: DateTime<Utc>,
    pub cancelled: bool,
    pub spaces: Vec<Space>,
}

impl Event {
    pub fn available_spaces_count(&self) -> usize {
        self.spaces.iter().filter(|s| s.is_available()).count()
    }

    pub fn total_spaces_count(&self) -> usize {
        self.spaces.len()
    }
}
