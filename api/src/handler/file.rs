use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
};
use registry::AppRegistry;
use serde::Deserialize;
use shared::error::{AppError, AppResult};

#[derive(Deserialize)]
pub struct FileQuery {
    pub path: String,
}

/// Serves stored verification images. The storage layer refuses anything
/// outside the upload directory.
pub async fn serve_file(
    Query(query): Query<FileQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    let (path, content_type) = registry.file_storage().resolve(&query.path).await?;
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file")
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .body(Body::from(bytes))
        .map_err(|e| AppError::ExternalServiceError(e.to_string()))
}
