use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    user::{
        event::{
            CreateUser, CreateUserByAdmin, UpdateProfile, UpdateUserByAdmin, UpdateUserStatus,
            UpdateVerificationImage,
        },
        User, UserStatus,
    },
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn create_by_admin(&self, event: CreateUserByAdmin) -> AppResult<User>;
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// All users, optionally narrowed to one status, newest first.
    async fn find_all(&self, status: Option<UserStatus>) -> AppResult<Vec<User>>;
    async fn update_profile(&self, event: UpdateProfile) -> AppResult<User>;
    async fn update_by_admin(&self, event: UpdateUserByAdmin) -> AppResult<User>;
    async fn update_status(&self, event: UpdateUserStatus) -> AppResult<User>;
    async fn update_verification_image(&self, event: UpdateVerificationImage) -> AppResult<User>;
    /// Number of spaces the user currently holds in events that have not
    /// yet taken place.
    async fn booked_spaces_count(&self, user_id: UserId) -> AppResult<i64>;
}
