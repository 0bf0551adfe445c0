use axum::{extract::Multipart, extract::State, Json};
use kernel::model::user::event::CreateUser;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::registration::RegistrationResponse;

#[derive(Default)]
struct RegistrationForm {
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

pub async fn register(
    State(registry): State<AppRegistry>,
    mut multipart: Multipart,
) -> AppResult<Json<RegistrationResponse>> {
    let mut form = RegistrationForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };
        match name.as_str() {
            "email" => form.email = Some(read_text(field).await?),
            "password" => form.password = Some(read_text(field).await?),
            "firstName" => form.first_name = Some(read_text(field).await?),
            "lastName" => form.last_name = Some(read_text(field).await?),
            "verificationImage" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
                form.image = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let email = require(form.email, "email")?;
    let password = require(form.password, "password")?;
    let first_name = require(form.first_name, "firstName")?;
    let last_name = require(form.last_name, "lastName")?;
    let (file_name, bytes) = form.image.ok_or_else(|| {
        AppError::UnprocessableEntity("verificationImage is required".into())
    })?;

    let image_path = registry.file_storage().store(&file_name, &bytes).await?;
    let user = registry
        .user_repository()
        .create(CreateUser::new(
            email,
            password,
            first_name,
            last_name,
            Some(image_path),
        ))
        .await?;

    // Notify out of band; a mail problem must never fail the registration.
    let notifier = registry.notifier();
    let notified_user = user.clone();
    tokio::spawn(async move {
        notifier.notify_registration(&notified_user).await;
    });

    Ok(Json(user.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))
}

fn require(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::UnprocessableEntity(format!("{name} is required"))),
    }
}
