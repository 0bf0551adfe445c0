use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{
        event::{
            CreateUser, CreateUserByAdmin, UpdateProfile, UpdateUserByAdmin, UpdateUserStatus,
            UpdateVerificationImage,
        },
        User, UserStatus,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    first_name,
    last_name,
    role,
    status,
    verification_image_path,
    age,
    location,
    height,
    size,
    admin_comments,
    created_at
"#;

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        if self.find_by_email(&event.email).await?.is_some() {
            return Err(AppError::UnprocessableEntity(
                "This email is already registered. Please use a different email or try logging in."
                    .into(),
            ));
        }

        let user_id = UserId::new();
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        sqlx::query(
            r#"
                INSERT INTO users
                (user_id, email, password_hash, first_name, last_name, role, status, verification_image_path)
                VALUES ($1, $2, $3, $4, $5, 'USER', 'IN_REVIEW', $6)
            "#,
        )
        .bind(user_id)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(&event.verification_image_path)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        self.fetch_user(user_id).await
    }

    async fn create_by_admin(&self, event: CreateUserByAdmin) -> AppResult<User> {
        if self.find_by_email(&event.email).await?.is_some() {
            return Err(AppError::UnprocessableEntity(
                "This email is already registered.".into(),
            ));
        }

        let user_id = UserId::new();
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        sqlx::query(
            r#"
                INSERT INTO users
                (user_id, email, password_hash, first_name, last_name, role, status,
                 verification_image_path, age, location, height, size, admin_comments)
                VALUES ($1, $2, $3, $4, $5, 'USER', $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user_id)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(event.status.to_string())
        .bind(&event.verification_image_path)
        .bind(event.age)
        .bind(&event.location)
        .bind(&event.height)
        .bind(&event.size)
        .bind(&event.admin_comments)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        self.fetch_user(user_id).await
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self, status: Option<UserStatus>) -> AppResult<Vec<User>> {
        let rows: Vec<UserRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE status = $1 ORDER BY created_at DESC"
                ))
                .bind(status.to_string())
                .fetch_all(self.db.inner_ref())
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
                ))
                .fetch_all(self.db.inner_ref())
                .await
            }
        }
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(&self, event: UpdateProfile) -> AppResult<User> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET age = $2, location = $3, height = $4, size = $5, updated_at = now()
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.age)
        .bind(&event.location)
        .bind(&event.height)
        .bind(&event.size)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("User not found".into()));
        }
        self.fetch_user(event.user_id).await
    }

    async fn update_by_admin(&self, event: UpdateUserByAdmin) -> AppResult<User> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET age = $2, location = $3, height = $4, size = $5,
                    admin_comments = $6, updated_at = now()
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.age)
        .bind(&event.location)
        .bind(&event.height)
        .bind(&event.size)
        .bind(&event.admin_comments)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("User not found".into()));
        }
        self.fetch_user(event.user_id).await
    }

    async fn update_status(&self, event: UpdateUserStatus) -> AppResult<User> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET status = $2, updated_at = now()
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.status.to_string())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("User not found".into()));
        }
        self.fetch_user(event.user_id).await
    }

    async fn update_verification_image(
        &self,
        event: UpdateVerificationImage,
    ) -> AppResult<User> {
        // A fresh picture always puts the account back in review.
        let res = sqlx::query(
            r#"
                UPDATE users
                SET verification_image_path = $2, status = 'IN_REVIEW', updated_at = now()
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(&event.image_path)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("User not found".into()));
        }
        self.fetch_user(event.user_id).await
    }

    async fn booked_spaces_count(&self, user_id: UserId) -> AppResult<i64> {
        // Only bookings in events that are still ahead count against the
        // one-space limit; past events keep their history.
        let (count,): (i64,) = sqlx::query_as(
            r#"
                SELECT COUNT(*)
                FROM spaces AS s
                INNER JOIN events AS e ON s.event_id = e.event_id
                WHERE s.booked_by = $1
                  AND e.event_at > now()
                  AND NOT e.cancelled
            "#,
        )
        .bind(user_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(count)
    }
}

impl UserRepositoryImpl {
    async fn fetch_user(&self, user_id: UserId) -> AppResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        User::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_look_up_user(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let created = repo
            .create(CreateUser::new(
                "new@example.com".into(),
                "secret".into(),
                "Test".into(),
                "User".into(),
                Some("uploads/pic.jpg".into()),
            ))
            .await?;
        assert_eq!(created.status, UserStatus::InReview);
        assert!(!created.is_approved());

        let found = repo.find_by_email("new@example.com").await?;
        assert_eq!(found, Some(created.clone()));

        // Duplicate registration gets the friendly message.
        let dup = repo
            .create(CreateUser::new(
                "new@example.com".into(),
                "other".into(),
                "Other".into(),
                "User".into(),
                None,
            ))
            .await;
        assert!(matches!(dup, Err(AppError::UnprocessableEntity(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn status_changes_round_trip(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));
        let user = repo
            .create(CreateUser::new(
                "review@example.com".into(),
                "secret".into(),
                "In".into(),
                "Review".into(),
                None,
            ))
            .await?;

        let approved = repo
            .update_status(UpdateUserStatus::new(user.user_id, UserStatus::Approved))
            .await?;
        assert!(approved.is_approved());

        let requested = repo
            .update_status(UpdateUserStatus::new(
                user.user_id,
                UserStatus::PictureRequested,
            ))
            .await?;
        assert_eq!(requested.status, UserStatus::PictureRequested);

        // Uploading a new picture drops the account back into review.
        let reviewed = repo
            .update_verification_image(UpdateVerificationImage::new(
                user.user_id,
                "uploads/new.jpg".into(),
            ))
            .await?;
        assert_eq!(reviewed.status, UserStatus::InReview);
        assert_eq!(
            reviewed.verification_image_path.as_deref(),
            Some("uploads/new.jpg")
        );
        Ok(())
    }
}
