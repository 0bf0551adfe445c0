use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{event::CreateEvent, Event},
    id::{EventId, SpaceId},
    space::{Space, SpaceTemplate},
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        event::{spaces_by_event, EventRow, SpaceTemplateRow},
        space::SpaceWithBookerRow,
    },
    ConnectionPool,
};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

const SPACES_FOR_EVENTS_SQL: &str = r#"
    SELECT
        s.space_id,
        s.event_id,
        t.name,
        t.color,
        s.booked_by,
        u.email AS booked_by_email
    FROM spaces AS s
    INNER JOIN space_templates AS t ON s.template_id = t.template_id
    LEFT JOIN users AS u ON s.booked_by = u.user_id
    WHERE s.event_id = ANY($1)
    ORDER BY s.created_at ASC
"#;

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn find_upcoming(&self) -> AppResult<Option<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, city, event_at, cancelled
                FROM events
                WHERE event_at > now()
                ORDER BY event_at ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = pick_upcoming(rows) else {
            return Ok(None);
        };
        let event_id = row.event_id;
        let mut spaces = self.load_spaces(&[event_id]).await?;
        Ok(Some(
            row.into_event(spaces.remove(&event_id).unwrap_or_default()),
        ))
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, city, event_at, cancelled
                FROM events
                ORDER BY event_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let ids: Vec<EventId> = rows.iter().map(|r| r.event_id).collect();
        let mut spaces = self.load_spaces(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let event_id = row.event_id;
                row.into_event(spaces.remove(&event_id).unwrap_or_default())
            })
            .collect())
    }

    async fn create(&self, event: CreateEvent) -> AppResult<Event> {
        if event.template_ids.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "At least one space template must be selected".into(),
            ));
        }
        if event.template_ids.len() > 6 {
            return Err(AppError::UnprocessableEntity(
                "Maximum 6 spaces allowed per event".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let (found,): (i64,) = sqlx::query_as(
            r#"
                SELECT COUNT(*)
                FROM space_templates
                WHERE template_id = ANY($1)
            "#,
        )
        .bind(
            event
                .template_ids
                .iter()
                .map(|id| id.raw())
                .collect::<Vec<_>>(),
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if found != event.template_ids.len() as i64 {
            return Err(AppError::UnprocessableEntity(
                "One or more space templates not found".into(),
            ));
        }

        let event_id = EventId::new();
        sqlx::query(
            r#"
                INSERT INTO events (event_id, city, event_at, cancelled)
                VALUES ($1, $2, $3, FALSE)
            "#,
        )
        .bind(event_id)
        .bind(&event.city)
        .bind(event.event_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        for template_id in &event.template_ids {
            sqlx::query(
                r#"
                    INSERT INTO spaces (space_id, event_id, template_id)
                    VALUES ($1, $2, $3)
                "#,
            )
            .bind(SpaceId::new())
            .bind(event_id)
            .bind(*template_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_event(event_id).await
    }

    async fn cancel(&self, event_id: EventId) -> AppResult<Event> {
        let res = sqlx::query(
            r#"
                UPDATE events
                SET cancelled = TRUE
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Event not found: {event_id}"
            )));
        }
        self.fetch_event(event_id).await
    }

    async fn find_templates(&self) -> AppResult<Vec<SpaceTemplate>> {
        let rows: Vec<SpaceTemplateRow> = sqlx::query_as(
            r#"
                SELECT template_id, name, color, description
                FROM space_templates
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(SpaceTemplate::try_from).collect()
    }
}

impl EventRepositoryImpl {
    async fn fetch_event(&self, event_id: EventId) -> AppResult<Event> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, city, event_at, cancelled
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let row = row.ok_or_else(|| {
            AppError::EntityNotFound(format!("Event not found: {event_id}"))
        })?;
        let mut spaces = self.load_spaces(&[event_id]).await?;
        Ok(row.into_event(spaces.remove(&event_id).unwrap_or_default()))
    }

    async fn load_spaces(
        &self,
        event_ids: &[EventId],
    ) -> AppResult<std::collections::HashMap<EventId, Vec<Space>>> {
        if event_ids.is_empty() {
            return Ok(Default::default());
        }
        let rows: Vec<SpaceWithBookerRow> = sqlx::query_as(SPACES_FOR_EVENTS_SQL)
            .bind(event_ids.iter().map(|id| id.raw()).collect::<Vec<_>>())
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        spaces_by_event(rows)
    }
}

/// The booking page shows the earliest future event. A cancelled event is
/// still surfaced so attendees see the cancellation, but when a cancelled
/// and a live event share the same instant the live one wins.
fn pick_upcoming(rows: Vec<EventRow>) -> Option<EventRow> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;
    if !first.cancelled {
        return Some(first);
    }
    let tied_live = rows
        .take_while(|r| r.event_at == first.event_at)
        .find(|r| !r.cancelled);
    Some(tied_live.unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn row(offset_hours: i64, cancelled: bool) -> EventRow {
        EventRow {
            event_id: EventId::new(),
            city: "San Francisco".into(),
            event_at: Utc::now() + Duration::hours(offset_hours),
            cancelled,
        }
    }

    #[test]
    fn earliest_live_event_wins() {
        let early = row(24, false);
        let later = row(48, false);
        let picked = pick_upcoming(vec![early.clone(), later]).unwrap();
        assert_eq!(picked.event_id, early.event_id);
    }

    #[test]
    fn cancelled_event_is_still_shown_when_it_is_next() {
        let cancelled = row(24, true);
        let later = row(48, false);
        let picked = pick_upcoming(vec![cancelled.clone(), later]).unwrap();
        assert!(picked.cancelled);
        assert_eq!(picked.event_id, cancelled.event_id);
    }

    #[test]
    fn live_event_beats_cancelled_event_at_the_same_instant() {
        let mut cancelled = row(24, true);
        let mut live = row(24, false);
        live.event_at = cancelled.event_at;
        let live_id = live.event_id;
        let picked = pick_upcoming(vec![cancelled, live]).unwrap();
        assert_eq!(picked.event_id, live_id);
    }

    #[test]
    fn no_events_means_no_pick() {
        assert!(pick_upcoming(vec![]).is_none());
    }
}
