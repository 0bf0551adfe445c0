use kernel::model::{
    id::SpaceId,
    space::{BookedSpace, Space, SpaceColor},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub id: SpaceId,
    pub name: String,
    pub color: SpaceColor,
    pub available: bool,
    pub booked_by: Option<String>,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let available = value.is_available();
        let Space {
            space_id,
            name,
            color,
            booked_by,
        } = value;
        Self {
            id: space_id,
            name,
            color,
            available,
            booked_by: booked_by.map(|booker| booker.email),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSpaceRequest {
    pub space_id: SpaceId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSpaceResponse {
    pub message: String,
    pub space_id: String,
    pub space_name: String,
}

impl BookSpaceResponse {
    pub fn booked(value: BookedSpace) -> Self {
        let BookedSpace {
            space_id,
            space_name,
        } = value;
        Self {
            message: "Space booked successfully".into(),
            space_id: space_id.to_string(),
            space_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}
