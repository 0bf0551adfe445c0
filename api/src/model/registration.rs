use kernel::model::{
    id::UserId,
    user::{User, UserStatus},
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub message: String,
    pub user_id: UserId,
    pub email: String,
    pub status: UserStatus,
}

impl From<User> for RegistrationResponse {
    fn from(value: User) -> Self {
        Self {
            message: "Registration successful. Your account is in review.".into(),
            user_id: value.user_id,
            email: value.email,
            status: value.status,
        }
    }
}
