use axum::{
    extract::{Multipart, State},
    Json,
};
use garde::Validate;
use kernel::model::user::{event::UpdateVerificationImage, UserStatus};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::user::{
        UpdateProfileRequest, UpdateProfileRequestWithUserId, UploadPictureResponse, UserResponse,
    },
};

pub async fn get_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    let booked_spaces_count = registry
        .user_repository()
        .booked_spaces_count(user.id())
        .await?;
    Ok(Json((user.user, booked_spaces_count).into()))
}

pub async fn update_profile(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate(&())?;

    let updated = registry
        .user_repository()
        .update_profile(UpdateProfileRequestWithUserId::new(user.id(), req).into())
        .await?;
    let booked_spaces_count = registry
        .user_repository()
        .booked_spaces_count(user.id())
        .await?;
    Ok(Json((updated, booked_spaces_count).into()))
}

pub async fn upload_picture(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadPictureResponse>> {
    // Re-read the account so a stale token cannot bypass the status gate.
    let current = registry
        .user_repository()
        .find_current_user(user.id())
        .await?
        .ok_or(AppError::UnauthenticatedError)?;
    if current.status != UserStatus::PictureRequested {
        return Err(AppError::UnprocessableEntity(
            "You can only upload a new picture when your status is PICTURE_REQUESTED".into(),
        ));
    }

    let mut image: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?
    {
        if field.name() == Some("verificationImage") {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
            image = Some((file_name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) = image.ok_or_else(|| {
        AppError::UnprocessableEntity("verificationImage is required".into())
    })?;

    let image_path = registry.file_storage().store(&file_name, &bytes).await?;
    let updated = registry
        .user_repository()
        .update_verification_image(UpdateVerificationImage::new(user.id(), image_path))
        .await?;

    let notifier = registry.notifier();
    let notified_user = updated.clone();
    tokio::spawn(async move {
        notifier.notify_registration(&notified_user).await;
    });

    Ok(Json(UploadPictureResponse {
        message: "Picture uploaded successfully. Your account is back in review.".into(),
        status: updated.status,
        verification_image_path: updated.verification_image_path,
    }))
}
