use async_trait::async_trait;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use sqlx::FromRow;

use crate::{auth::JwtCodec, database::ConnectionPool};

pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    jwt: JwtCodec,
}

impl AuthRepositoryImpl {
    pub fn new(db: ConnectionPool, jwt: JwtCodec) -> Self {
        Self { db, jwt }
    }
}

#[derive(FromRow)]
struct UserCredentialRow {
    user_id: UserId,
    password_hash: String,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row: Option<UserCredentialRow> = sqlx::query_as(
            r#"
                SELECT user_id, password_hash
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // Unknown email and wrong password are indistinguishable on purpose.
        let row = row.ok_or(AppError::UnauthorizedError)?;
        let valid = bcrypt::verify(password, &row.password_hash)?;
        if !valid {
            return Err(AppError::UnauthorizedError);
        }
        Ok(row.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        self.jwt.issue(event)
    }

    async fn fetch_user_id_from_token(&self, access_token: &AccessToken) -> AppResult<UserId> {
        let claims = self.jwt.verify(access_token)?;

        // The token may outlive the account; make sure the user still exists.
        let exists: Option<(UserId,)> = sqlx::query_as(
            r#"
                SELECT user_id
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(claims.uid)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        exists
            .map(|(user_id,)| user_id)
            .ok_or(AppError::UnauthenticatedError)
    }
}
