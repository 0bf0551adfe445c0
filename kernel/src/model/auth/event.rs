use derive_new::new;

use crate::model::{id::UserId, role::Role, user::User};

#[derive(new)]
pub struct CreateToken {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<&User> for CreateToken {
    fn from(value: &User) -> Self {
        Self {
            user_id: value.user_id,
            email: value.email.clone(),
            role: value.role,
        }
    }
}
