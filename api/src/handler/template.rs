use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::event::SpaceTemplateResponse;

pub async fn show_space_templates(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<SpaceTemplateResponse>>> {
    registry
        .event_repository()
        .find_templates()
        .await
        .map(|templates| {
            Json(
                templates
                    .into_iter()
                    .map(SpaceTemplateResponse::from)
                    .collect(),
            )
        })
}
