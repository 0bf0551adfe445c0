use chrono::{DateTime, Utc};
use kernel::model::{
    event::Event,
    id::{EventId, TemplateId},
    space::{Space, SpaceColor, SpaceTemplate},
};
use shared::error::AppError;

use super::space::SpaceWithBookerRow;

#[derive(Clone, sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub city: String,
    pub event_at: DateTime<Utc>,
    pub cancelled: bool,
}

impl EventRow {
    /// Assembles the full event from its row plus the already-converted
    /// space list for this event.
    pub fn into_event(self, spaces: Vec<Space>) -> Event {
        let EventRow {
            event_id,
            city,
            event_at,
            cancelled,
        } = self;
        Event {
            event_id,
            city,
            event_at,
            cancelled,
            spaces,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SpaceTemplateRow {
    pub template_id: TemplateId,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

impl TryFrom<SpaceTemplateRow> for SpaceTemplate {
    type Error = AppError;

    fn try_from(value: SpaceTemplateRow) -> Result<Self, Self::Error> {
        let SpaceTemplateRow {
            template_id,
            name,
            color,
            description,
        } = value;
        let color: SpaceColor = color
            .parse()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown color: {color}")))?;
        Ok(SpaceTemplate {
            template_id,
            name,
            color,
            description,
        })
    }
}

/// Groups a joined space list by event, preserving the space order the
/// query produced.
pub fn spaces_by_event(
    rows: Vec<SpaceWithBookerRow>,
) -> Result<std::collections::HashMap<EventId, Vec<Space>>, AppError> {
    let mut grouped: std::collections::HashMap<EventId, Vec<Space>> =
        std::collections::HashMap::new();
    for row in rows {
        let event_id = row.event_id;
        grouped.entry(event_id).or_default().push(row.try_into()?);
    }
    Ok(grouped)
}
