use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{id::UserId, role::Role};

pub mod event;

/// Verification status of a registered account.
///
/// Status strings coming in from the outside world are parsed here and
/// nowhere else; the legacy "DECLINED" spelling is accepted as a synonym
/// for "REJECTED" at this single entry point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum UserStatus {
    #[strum(to_string = "IN_REVIEW")]
    InReview,
    #[strum(to_string = "APPROVED")]
    Approved,
    #[strum(to_string = "PICTURE_REQUESTED")]
    PictureRequested,
    #[serde(alias = "DECLINED")]
    #[strum(to_string = "REJECTED", serialize = "DECLINED")]
    Rejected,
}

impl UserStatus {
    pub fn is_approved(self) -> bool {
        matches!(self, UserStatus::Approved)
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, UserStatus::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub verification_image_path: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_canonical_names_case_insensitively() {
        assert_eq!(UserStatus::from_str("IN_REVIEW").unwrap(), UserStatus::InReview);
        assert_eq!(UserStatus::from_str("approved").unwrap(), UserStatus::Approved);
        assert_eq!(
            UserStatus::from_str("Picture_Requested").unwrap(),
            UserStatus::PictureRequested
        );
        assert_eq!(UserStatus::from_str("REJECTED").unwrap(), UserStatus::Rejected);
    }

    #[test]
    fn declined_is_normalized_to_rejected() {
        assert_eq!(UserStatus::from_str("DECLINED").unwrap(), UserStatus::Rejected);
        assert_eq!(UserStatus::from_str("declined").unwrap(), UserStatus::Rejected);
        // Display never leaks the legacy spelling back out.
        assert_eq!(UserStatus::Rejected.to_string(), "REJECTED");
    }
}
