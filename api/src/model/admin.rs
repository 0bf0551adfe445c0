use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    user::{event::UpdateUserByAdmin, User, UserStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub status: Option<String>,
}

impl ListUsersQuery {
    /// An unknown status filter falls back to listing everyone, matching
    /// the dashboard's lenient behavior.
    pub fn status_filter(&self) -> Option<UserStatus> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub message: String,
    pub user_id: UserId,
    pub email: String,
    pub status: UserStatus,
}

impl StatusChangeResponse {
    pub fn new(message: &str, user: &User) -> Self {
        Self {
            message: message.into(),
            user_id: user.user_id,
            email: user.email.clone(),
            status: user.status,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[garde(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub height: Option<String>,
    #[garde(skip)]
    pub size: Option<String>,
    #[garde(skip)]
    pub admin_comments: Option<String>,
}

#[derive(new)]
pub struct UpdateUserRequestWithUserId(UserId, UpdateUserRequest);

impl From<UpdateUserRequestWithUserId> for UpdateUserByAdmin {
    fn from(value: UpdateUserRequestWithUserId) -> Self {
        let UpdateUserRequestWithUserId(
            user_id,
            UpdateUserRequest {
                age,
                location,
                height,
                size,
                admin_comments,
            },
        ) = value;
        UpdateUserByAdmin {
            user_id,
            age,
            location,
            height,
            size,
            admin_comments,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForUserRequest {
    pub user_email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForUserResponse {
    pub message: String,
    pub space_id: String,
    pub space_name: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_is_lenient() {
        let query = |status: Option<&str>| ListUsersQuery {
            status: status.map(String::from),
        };

        assert_eq!(query(None).status_filter(), None);
        assert_eq!(query(Some("")).status_filter(), None);
        assert_eq!(query(Some("nonsense")).status_filter(), None);
        assert_eq!(
            query(Some("approved")).status_filter(),
            Some(UserStatus::Approved)
        );
        // The legacy spelling is folded into the canonical status.
        assert_eq!(
            query(Some("DECLINED")).status_filter(),
            Some(UserStatus::Rejected)
        );
    }
}
