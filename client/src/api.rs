use chrono::{DateTime, Utc};
use kernel::admission::{EventSnapshot, Profile, SpaceSnapshot};
use kernel::model::{
    id::{EventId, SpaceId, UserId},
    space::SpaceColor,
    user::UserStatus,
};
use serde::Deserialize;

/// Failure taxonomy of the page's REST calls. Nothing is retried
/// automatically; every variant routes to a different piece of UI.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response at all: shown as "cannot connect to server".
    #[error("cannot connect to server")]
    Connect(#[source] reqwest::Error),
    /// 401/403: the session is gone, whatever the optimistic expiry
    /// check said before the call went out.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    /// 4xx with a server-provided message, surfaced verbatim.
    #[error("{message}")]
    Rejected { message: String },
    #[error("unexpected server response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    pub token: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDto {
    pub id: SpaceId,
    pub name: String,
    pub color: SpaceColor,
    pub available: bool,
    pub booked_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: EventId,
    pub city: String,
    pub date_time: DateTime<Utc>,
    pub spaces: Vec<SpaceDto>,
    pub available_spaces_count: i64,
    pub total_spaces_count: i64,
    pub cancelled: bool,
}

impl From<EventDto> for EventSnapshot {
    fn from(value: EventDto) -> Self {
        EventSnapshot {
            id: value.id,
            cancelled: value.cancelled,
            spaces: value
                .spaces
                .into_iter()
                .map(|space| SpaceSnapshot {
                    id: space.id,
                    name: space.name,
                    color: space.color,
                    available: space.available,
                    booked_by: space.booked_by,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsDto {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Parsing folds the legacy "DECLINED" spelling into Rejected.
    pub status: UserStatus,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub verification_image_path: Option<String>,
    pub booked_spaces_count: i64,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub admin_comments: Option<String>,
}

impl UserDetailsDto {
    /// The admission-rule view of this account. `approved` is re-derived
    /// from the status so the two can never disagree client-side.
    pub fn profile(&self) -> Profile {
        Profile::new(self.status, self.booked_spaces_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSpaceResponseDto {
    pub message: String,
    pub space_id: String,
    pub space_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponseDto {
    pub message: String,
    pub email: String,
    pub status: UserStatus,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub image_file_name: String,
    pub image_bytes: Vec<u8>,
}

/// Thin typed wrapper over the REST contract. The base URL points at the
/// server root; paths below already include the /api prefix.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponseDto, ApiError> {
        let res = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ApiError::Connect)?;
        // Login failures are ordinary rejections, not an expired session.
        read_response(res, false).await
    }

    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationResponseDto, ApiError> {
        let multipart = reqwest::multipart::Form::new()
            .text("email", form.email)
            .text("password", form.password)
            .text("firstName", form.first_name)
            .text("lastName", form.last_name)
            .part(
                "verificationImage",
                reqwest::multipart::Part::bytes(form.image_bytes)
                    .file_name(form.image_file_name),
            );
        let res = self
            .http
            .post(self.url("/registration/register"))
            .multipart(multipart)
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, false).await
    }

    pub async fn upcoming_event(&self, token: Option<&str>) -> Result<EventDto, ApiError> {
        let mut req = self.http.get(self.url("/events/upcoming"));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await.map_err(ApiError::Connect)?;
        read_response(res, token.is_some()).await
    }

    pub async fn current_user(&self, token: &str) -> Result<UserDetailsDto, ApiError> {
        let res = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, true).await
    }

    pub async fn update_profile(
        &self,
        token: &str,
        age: Option<i32>,
        location: Option<String>,
        height: Option<String>,
        size: Option<String>,
    ) -> Result<UserDetailsDto, ApiError> {
        let res = self
            .http
            .put(self.url("/users/me"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "age": age,
                "location": location,
                "height": height,
                "size": size,
            }))
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, true).await
    }

    pub async fn upload_picture(
        &self,
        token: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<MessageDto, ApiError> {
        let multipart = reqwest::multipart::Form::new().part(
            "verificationImage",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
        );
        let res = self
            .http
            .post(self.url("/users/me/upload-picture"))
            .bearer_auth(token)
            .multipart(multipart)
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, true).await
    }

    pub async fn book_space(
        &self,
        token: &str,
        event_id: EventId,
        space_id: SpaceId,
    ) -> Result<BookSpaceResponseDto, ApiError> {
        let res = self
            .http
            .post(self.url(&format!("/spaces/events/{event_id}/book")))
            .bearer_auth(token)
            .json(&serde_json::json!({ "spaceId": space_id }))
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, true).await
    }

    pub async fn cancel_booking(
        &self,
        token: &str,
        space_id: SpaceId,
    ) -> Result<MessageDto, ApiError> {
        let res = self
            .http
            .delete(self.url(&format!("/spaces/{space_id}/cancel")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Connect)?;
        read_response(res, true).await
    }
}

async fn read_response<T: serde::de::DeserializeOwned>(
    res: reqwest::Response,
    auth_sensitive: bool,
) -> Result<T, ApiError> {
    let status = res.status();
    if status.is_success() {
        return res
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()));
    }
    if auth_sensitive && (status == 401 || status == 403) {
        return Err(ApiError::SessionExpired);
    }

    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body
            .error
            .or(body.message)
            .unwrap_or_else(|| format!("request failed with status {status}")),
        Err(_) => format!("request failed with status {status}"),
    };
    if status.is_client_error() {
        Err(ApiError::Rejected { message })
    } else {
        Err(ApiError::Unexpected(message))
    }
}
