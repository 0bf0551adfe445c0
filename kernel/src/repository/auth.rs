use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Checks the credentials against the stored hash and returns the
    /// matching user id.
    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId>;
    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken>;
    /// Validates the token (signature and expiry) and returns the id it
    /// was issued for.
    async fn fetch_user_id_from_token(&self, access_token: &AccessToken) -> AppResult<UserId>;
}
