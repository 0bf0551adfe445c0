use chrono::{DateTime, Utc};
use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserStatus},
};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub verification_image_path: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
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
            created_at,
        } = value;
        let role: Role = role
            .parse()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?;
        let status: UserStatus = status
            .parse()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown status: {status}")))?;
        Ok(User {
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
            created_at,
        })
    }
}
