use async_trait::async_trait;
use derive_new::new;
use kernel::admission::BookingDenied;
use kernel::model::{
    id::{EventId, SpaceId, UserId},
    space::{
        event::{BookSpace, BookSpaceForUser, CancelBooking},
        BookedSpace,
    },
    user::UserStatus,
};
use kernel::repository::space::SpaceRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::space::SpaceStateRow, ConnectionPool};

#[derive(new)]
pub struct SpaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn book(&self, event: BookSpace) -> AppResult<BookedSpace> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Pre-checks, in the order the clients learned to classify:
        // approval first, then the one-space limit, then existence and
        // availability. The messages are the canonical BookingDenied texts.
        {
            let status = self.fetch_user_status(&mut tx, event.user_id).await?;
            if !status.is_approved() {
                return Err(AppError::UnprocessableEntity(
                    BookingDenied::NotApproved.to_string(),
                ));
            }

            if self
                .user_holds_space_in_event(&mut tx, event.event_id, event.user_id)
                .await?
            {
                return Err(AppError::UnprocessableEntity(
                    BookingDenied::OneSpacePerEvent.to_string(),
                ));
            }
        }

        let booked = self
            .claim_space(&mut tx, event.event_id, event.space_id, event.user_id)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(booked)
    }

    async fn book_for_user(&self, event: BookSpaceForUser) -> AppResult<BookedSpace> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Admins may book for anyone regardless of approval, but the
        // one-space limit still holds.
        if self
            .user_holds_space_in_event(&mut tx, event.event_id, event.user_id)
            .await?
        {
            return Err(AppError::UnprocessableEntity(
                BookingDenied::UserAlreadyBooked.to_string(),
            ));
        }

        let booked = self
            .claim_space(&mut tx, event.event_id, event.space_id, event.user_id)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(booked)
    }

    async fn cancel(&self, event: CancelBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Release only when the booking is still held by this user, in one
        // statement, so a concurrent cancel/book cannot slip in between
        // check and write.
        let res = sqlx::query(
            r#"
                UPDATE spaces
                SET booked_by = NULL
                WHERE space_id = $1
                  AND booked_by = $2
            "#,
        )
        .bind(event.space_id)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            // Fetch the current state to answer with the precise reason.
            let row: Option<SpaceStateRow> = sqlx::query_as(
                r#"
                    SELECT s.space_id, t.name AS space_name, s.booked_by
                    FROM spaces AS s
                    INNER JOIN space_templates AS t ON s.template_id = t.template_id
                    WHERE s.space_id = $1
                "#,
            )
            .bind(event.space_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            return match row {
                None => Err(AppError::EntityNotFound(
                    BookingDenied::SpaceNotFound.to_string(),
                )),
                Some(row) if row.booked_by.is_none() => Err(AppError::UnprocessableEntity(
                    BookingDenied::NotBooked.to_string(),
                )),
                Some(_) => Err(AppError::UnprocessableEntity(
                    BookingDenied::NotOwnBooking.to_string(),
                )),
            };
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }
}

impl SpaceRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn fetch_user_status(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: UserId,
    ) -> AppResult<UserStatus> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
                SELECT status
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let (status,) = row.ok_or_else(|| AppError::EntityNotFound("User not found".into()))?;
        status
            .parse()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown status: {status}")))
    }

    async fn user_holds_space_in_event(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: EventId,
        user_id: UserId,
    ) -> AppResult<bool> {
        let row: Option<(SpaceId,)> = sqlx::query_as(
            r#"
                SELECT space_id
                FROM spaces
                WHERE event_id = $1
                  AND booked_by = $2
                LIMIT 1
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.is_some())
    }

    /// Existence and availability checks plus the atomic claim. The final
    /// UPDATE re-checks `booked_by IS NULL` so two racing requests cannot
    /// both take the space.
    async fn claim_space(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: EventId,
        space_id: SpaceId,
        user_id: UserId,
    ) -> AppResult<BookedSpace> {
        let exists: Option<(EventId,)> = sqlx::query_as(
            r#"
                SELECT event_id
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(
                BookingDenied::EventNotFound.to_string(),
            ));
        }

        let space: Option<SpaceStateRow> = sqlx::query_as(
            r#"
                SELECT s.space_id, t.name AS space_name, s.booked_by
                FROM spaces AS s
                INNER JOIN space_templates AS t ON s.template_id = t.template_id
                WHERE s.space_id = $1
                  AND s.event_id = $2
            "#,
        )
        .bind(space_id)
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let space = space.ok_or_else(|| {
            AppError::EntityNotFound(BookingDenied::SpaceNotFound.to_string())
        })?;
        if space.booked_by.is_some() {
            return Err(AppError::UnprocessableEntity(
                BookingDenied::SpaceTaken.to_string(),
            ));
        }

        let res = sqlx::query(
            r#"
                UPDATE spaces
                SET booked_by = $3
                WHERE space_id = $1
                  AND event_id = $2
                  AND booked_by IS NULL
            "#,
        )
        .bind(space_id)
        .bind(event_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            // Lost the race between the check above and the claim.
            return Err(AppError::UnprocessableEntity(
                BookingDenied::SpaceTaken.to_string(),
            ));
        }

        Ok(BookedSpace {
            space_id: space.space_id,
            space_name: space.space_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kernel::model::{
        event::event::CreateEvent,
        user::{event::CreateUser, event::UpdateUserStatus},
    };
    use kernel::repository::{event::EventRepository, user::UserRepository};

    use crate::repository::{event::EventRepositoryImpl, user::UserRepositoryImpl};

    async fn seed(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<(
        SpaceRepositoryImpl,
        UserRepositoryImpl,
        kernel::model::event::Event,
        kernel::model::user::User,
    )> {
        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let events = EventRepositoryImpl::new(db.clone());
        let spaces = SpaceRepositoryImpl::new(db.clone());

        let user = users
            .create(CreateUser::new(
                "booker@example.com".into(),
                "secret".into(),
                "Book".into(),
                "Er".into(),
                None,
            ))
            .await?;
        let user = users
            .update_status(UpdateUserStatus::new(user.user_id, UserStatus::Approved))
            .await?;

        let templates = events.find_templates().await?;
        let event = events
            .create(CreateEvent::new(
                "San Francisco".into(),
                Utc::now() + Duration::days(30),
                templates.iter().take(2).map(|t| t.template_id).collect(),
            ))
            .await?;

        Ok((spaces, users, event, user))
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn book_then_cancel_round_trip(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let (spaces, users, event, user) = seed(pool).await?;
        let target = event.spaces[0].space_id;

        let booked = spaces
            .book(BookSpace::new(event.event_id, target, user.user_id))
            .await?;
        assert_eq!(booked.space_id, target);
        assert_eq!(users.booked_spaces_count(user.user_id).await?, 1);

        spaces
            .cancel(CancelBooking::new(target, user.user_id))
            .await?;
        assert_eq!(users.booked_spaces_count(user.user_id).await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn second_booking_in_same_event_is_denied(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let (spaces, _, event, user) = seed(pool).await?;

        spaces
            .book(BookSpace::new(
                event.event_id,
                event.spaces[0].space_id,
                user.user_id,
            ))
            .await?;
        let denied = spaces
            .book(BookSpace::new(
                event.event_id,
                event.spaces[1].space_id,
                user.user_id,
            ))
            .await;

        match denied {
            Err(AppError::UnprocessableEntity(message)) => {
                assert_eq!(message, BookingDenied::OneSpacePerEvent.to_string());
            }
            other => panic!("expected one-space denial, got {other:?}"),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn unapproved_user_cannot_book(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let (spaces, users, event, user) = seed(pool).await?;
        users
            .update_status(UpdateUserStatus::new(user.user_id, UserStatus::InReview))
            .await?;

        let denied = spaces
            .book(BookSpace::new(
                event.event_id,
                event.spaces[0].space_id,
                user.user_id,
            ))
            .await;

        match denied {
            Err(AppError::UnprocessableEntity(message)) => {
                assert_eq!(message, BookingDenied::NotApproved.to_string());
            }
            other => panic!("expected approval denial, got {other:?}"),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn taken_space_cannot_be_booked_again(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let (spaces, users, event, user) = seed(pool).await?;
        let other = users
            .create(CreateUser::new(
                "other@example.com".into(),
                "secret".into(),
                "Other".into(),
                "User".into(),
                None,
            ))
            .await?;
        let other = users
            .update_status(UpdateUserStatus::new(other.user_id, UserStatus::Approved))
            .await?;

        let target = event.spaces[0].space_id;
        spaces
            .book(BookSpace::new(event.event_id, target, user.user_id))
            .await?;
        let denied = spaces
            .book(BookSpace::new(event.event_id, target, other.user_id))
            .await;

        match denied {
            Err(AppError::UnprocessableEntity(message)) => {
                assert_eq!(message, BookingDenied::SpaceTaken.to_string());
            }
            other => panic!("expected already-booked denial, got {other:?}"),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancelling_someone_elses_booking_is_refused(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let (spaces, users, event, user) = seed(pool).await?;
        let stranger = users
            .create(CreateUser::new(
                "stranger@example.com".into(),
                "secret".into(),
                "Stran".into(),
                "Ger".into(),
                None,
            ))
            .await?;

        let target = event.spaces[0].space_id;
        spaces
            .book(BookSpace::new(event.event_id, target, user.user_id))
            .await?;

        let refused = spaces
            .cancel(CancelBooking::new(target, stranger.user_id))
            .await;
        match refused {
            Err(AppError::UnprocessableEntity(message)) => {
                assert_eq!(message, BookingDenied::NotOwnBooking.to_string());
            }
            other => panic!("expected not-own-booking refusal, got {other:?}"),
        }

        // The booking survives the failed attempt.
        assert_eq!(users.booked_spaces_count(user.user_id).await?, 1);
        Ok(())
    }
}
