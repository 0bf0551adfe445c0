use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{EventId, SpaceId, UserId},
    space::event::BookSpaceForUser,
    user::{
        event::{CreateUserByAdmin, UpdateUserStatus},
        User, UserStatus,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::{
    extractor::AuthorizedUser,
    model::{
        admin::{
            BookForUserRequest, BookForUserResponse, ListUsersQuery, StatusChangeResponse,
            UpdateUserRequest, UpdateUserRequestWithUserId,
        },
        user::UserResponse,
    },
};

fn require_admin(user: &AuthorizedUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation)
    }
}

pub async fn list_users(
    user: AuthorizedUser,
    Query(query): Query<ListUsersQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&user)?;

    let users = registry
        .user_repository()
        .find_all(query.status_filter())
        .await?;

    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        let count = registry
            .user_repository()
            .booked_spaces_count(user.user_id)
            .await?;
        responses.push(UserResponse::from((user, count)));
    }
    Ok(Json(responses))
}

pub async fn approve_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<StatusChangeResponse>> {
    require_admin(&user)?;
    change_status(
        &registry,
        user_id,
        UserStatus::Approved,
        "User approved successfully",
    )
    .await
}

pub async fn reject_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<StatusChangeResponse>> {
    require_admin(&user)?;
    change_status(
        &registry,
        user_id,
        UserStatus::Rejected,
        "User rejected successfully",
    )
    .await
}

pub async fn request_picture(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<StatusChangeResponse>> {
    require_admin(&user)?;
    change_status(
        &registry,
        user_id,
        UserStatus::PictureRequested,
        "Picture request sent to user successfully",
    )
    .await
}

async fn change_status(
    registry: &AppRegistry,
    user_id: UserId,
    status: UserStatus,
    message: &str,
) -> AppResult<Json<StatusChangeResponse>> {
    let updated = registry
        .user_repository()
        .update_status(UpdateUserStatus::new(user_id, status))
        .await?;
    Ok(Json(StatusChangeResponse::new(message, &updated)))
}

pub async fn update_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;
    req.validate(&())?;

    let updated = registry
        .user_repository()
        .update_by_admin(UpdateUserRequestWithUserId::new(user_id, req).into())
        .await?;
    let count = registry
        .user_repository()
        .booked_spaces_count(user_id)
        .await?;
    Ok(Json((updated, count).into()))
}

#[derive(Default)]
struct CreateUserForm {
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    status: Option<String>,
    image: Option<(String, Vec<u8>)>,
    age: Option<String>,
    location: Option<String>,
    height: Option<String>,
    size: Option<String>,
    admin_comments: Option<String>,
}

/// Admin user creation: everything is optional, missing fields get
/// workable defaults so the dashboard can sketch accounts quickly.
pub async fn create_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    mut multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let mut form = CreateUserForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };
        if name == "verificationImage" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
            form.image = Some((file_name, bytes.to_vec()));
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
        match name.as_str() {
            "email" => form.email = Some(value),
            "password" => form.password = Some(value),
            "firstName" => form.first_name = Some(value),
            "lastName" => form.last_name = Some(value),
            "status" => form.status = Some(value),
            "age" => form.age = Some(value),
            "location" => form.location = Some(value),
            "height" => form.height = Some(value),
            "size" => form.size = Some(value),
            "adminComments" => form.admin_comments = Some(value),
            _ => {}
        }
    }

    let email = match form.email.filter(|e| !e.trim().is_empty()) {
        Some(email) => email,
        None => format!("user{}@temp.local", Uuid::new_v4().simple()),
    };
    let password = form
        .password
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "temp123".into());
    // An unknown status is silently replaced by the default, like the
    // rest of the dashboard's lenient inputs.
    let status = form
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(UserStatus::InReview);

    let image_path = match form.image {
        Some((file_name, bytes)) if !bytes.is_empty() => {
            Some(registry.file_storage().store(&file_name, &bytes).await?)
        }
        _ => None,
    };

    let created = registry
        .user_repository()
        .create_by_admin(CreateUserByAdmin {
            email,
            password,
            first_name: form.first_name.unwrap_or_default(),
            last_name: form.last_name.unwrap_or_default(),
            status,
            verification_image_path: image_path,
            age: form.age.and_then(|a| a.parse().ok()),
            location: form.location.filter(|v| !v.is_empty()),
            height: form.height.filter(|v| !v.is_empty()),
            size: form.size.filter(|v| !v.is_empty()),
            admin_comments: form.admin_comments.filter(|v| !v.is_empty()),
        })
        .await?;

    Ok(Json((created, 0).into()))
}

pub async fn book_space_for_user(
    user: AuthorizedUser,
    Path((event_id, space_id)): Path<(EventId, SpaceId)>,
    State(registry): State<AppRegistry>,
    Json(req): Json<BookForUserRequest>,
) -> AppResult<Json<BookForUserResponse>> {
    require_admin(&user)?;

    let target: User = registry
        .user_repository()
        .find_by_email(&req.user_email)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("User not found with email: {}", req.user_email))
        })?;

    let booked = registry
        .space_repository()
        .book_for_user(BookSpaceForUser::new(event_id, space_id, target.user_id))
        .await?;

    Ok(Json(BookForUserResponse {
        message: "Space booked successfully for user".into(),
        space_id: booked.space_id.to_string(),
        space_name: booked.space_name,
        user_email: req.user_email,
    }))
}
