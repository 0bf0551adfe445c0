use axum::{extract::State, Json};
use garde::Validate;
use kernel::model::auth::event::CreateToken;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::auth::{LoginRequest, LoginResponse};

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate(&())?;

    let user_id = registry
        .auth_repository()
        .verify_user(&req.email, &req.password)
        .await?;
    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthorizedError)?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::from(&user))
        .await?;

    tracing::info!(user.email = %user.email, "successful login");
    Ok(Json((access_token, user).into()))
}
