use derive_new::new;

use crate::model::{id::UserId, user::UserStatus};

#[derive(new)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub verification_image_path: Option<String>,
}

/// Admin-created accounts may start in any status and carry the extra
/// profile fields straight away.
pub struct CreateUserByAdmin {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub verification_image_path: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
}

#[derive(new)]
pub struct UpdateProfile {
    pub user_id: UserId,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
}

#[derive(new)]
pub struct UpdateUserByAdmin {
    pub user_id: UserId,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
}

#[derive(new)]
pub struct UpdateUserStatus {
    pub user_id: UserId,
    pub status: UserStatus,
}

/// Uploading a fresh verification picture puts the account back in review.
#[derive(new)]
pub struct UpdateVerificationImage {
    pub user_id: UserId,
    pub image_path: String,
}
