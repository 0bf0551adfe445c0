use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::id::{SpaceId, TemplateId, UserId};

pub mod event;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum SpaceColor {
    #[strum(to_string = "GREEN")]
    Green,
    #[strum(to_string = "YELLOW")]
    Yellow,
    #[strum(to_string = "ORANGE")]
    Orange,
    #[strum(to_string = "BLUE")]
    Blue,
    #[strum(to_string = "PURPLE")]
    Purple,
    #[strum(to_string = "WHITE")]
    White,
}

/// One bookable slot at an event. `booked_by` is None while the space is
/// still available.
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub space_id: SpaceId,
    pub name: String,
    pub color: SpaceColor,
    pub booked_by: Option<SpaceBooker>,
}

impl Space {
    pub fn is_available(&self) -> bool {
        self.booked_by.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpaceBooker {
    pub user_id: UserId,
    pub email: String,
}

/// Reusable space definition events are assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceTemplate {
    pub template_id: TemplateId,
    pub name: String,
    pub color: SpaceColor,
    pub description: Option<String>,
}

/// Result of a successful booking, echoed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedSpace {
    pub space_id: SpaceId,
    pub space_name: String,
}
