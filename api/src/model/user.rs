use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    user::{event::UpdateProfile, User, UserStatus},
};
use serde::{Deserialize, Serialize};

/// The user details shape shared by /users/me and the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub verification_image_path: Option<String>,
    pub booked_spaces_count: i64,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
}

impl From<(User, i64)> for UserResponse {
    fn from((user, booked_spaces_count): (User, i64)) -> Self {
        let User {
            user_id,
            email,
            first_name,
            last_name,
            role: _,
            status,
            verification_image_path,
            age,
            location,
            height,
            size,
            admin_comments,
            created_at,
        } = user;
        Self {
            id: user_id,
            email,
            first_name,
            last_name,
            status,
            // Derived, so it can never disagree with the status.
            approved: status.is_approved(),
            created_at,
            verification_image_path,
            booked_spaces_count,
            age,
            location,
            height,
            size,
            admin_comments,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[garde(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub height: Option<String>,
    #[garde(skip)]
    pub size: Option<String>,
}

#[derive(new)]
pub struct UpdateProfileRequestWithUserId(UserId, UpdateProfileRequest);

impl From<UpdateProfileRequestWithUserId> for UpdateProfile {
    fn from(value: UpdateProfileRequestWithUserId) -> Self {
        let UpdateProfileRequestWithUserId(
            user_id,
            UpdateProfileRequest {
                age,
                location,
                height,
                size,
            },
        ) = value;
        UpdateProfile {
            user_id,
            age,
            location,
            height,
            size,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPictureResponse {
    pub message: String,
    pub status: UserStatus,
    pub verification_image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    #[test]
    fn approved_flag_is_derived_from_status() {
        let user = User {
            user_id: UserId::new(),
            email: "me@example.com".into(),
            first_name: "Me".into(),
            last_name: "User".into(),
            role: Role::User,
            status: UserStatus::Rejected,
            verification_image_path: None,
            age: None,
            location: None,
            height: None,
            size: None,
            admin_comments: None,
            created_at: Utc::now(),
        };
        let response = UserResponse::from((user, 0));
        assert!(!response.approved);
        assert_eq!(response.status, UserStatus::Rejected);
    }
}
