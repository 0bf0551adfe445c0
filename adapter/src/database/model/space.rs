use kernel::model::{
    id::{EventId, SpaceId, UserId},
    space::{Space, SpaceBooker, SpaceColor},
};
use shared::error::AppError;

/// A space joined with its template and, when booked, the booking user.
#[derive(sqlx::FromRow)]
pub struct SpaceWithBookerRow {
    pub space_id: SpaceId,
    pub event_id: EventId,
    pub name: String,
    pub color: String,
    pub booked_by: Option<UserId>,
    pub booked_by_email: Option<String>,
}

impl TryFrom<SpaceWithBookerRow> for Space {
    type Error = AppError;

    fn try_from(value: SpaceWithBookerRow) -> Result<Self, Self::Error> {
        let SpaceWithBookerRow {
            space_id,
            event_id: _,
            name,
            color,
            booked_by,
            booked_by_email,
        } = value;
        let color: SpaceColor = color
            .parse()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown color: {color}")))?;
        let booked_by = match (booked_by, booked_by_email) {
            (Some(user_id), Some(email)) => Some(SpaceBooker { user_id, email }),
            _ => None,
        };
        Ok(Space {
            space_id,
            name,
            color,
            booked_by,
        })
    }
}

/// Availability snapshot used inside the booking transaction.
#[derive(sqlx::FromRow)]
pub struct SpaceStateRow {
    pub space_id: SpaceId,
    pub space_name: String,
    pub booked_by: Option<UserId>,
}
