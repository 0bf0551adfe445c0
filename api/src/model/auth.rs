use garde::Validate;
use kernel::model::{auth::AccessToken, user::User};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub approved: bool,
}

impl From<(AccessToken, User)> for LoginResponse {
    fn from((token, user): (AccessToken, User)) -> Self {
        Self {
            token: token.0,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            approved: user.status.is_approved(),
        }
    }
}
