use base64::{engine::general_purpose, Engine as _};
use kernel::model::user::User;
use shared::config::MailerConfig;

const SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Tells the admin about new registrations and re-uploaded pictures.
/// Mail failures are logged and swallowed; they must never fail the
/// request that triggered them.
pub struct RegistrationNotifier {
    client: reqwest::Client,
    admin_email: String,
    api_token: Option<String>,
    frontend_url: String,
}

impl RegistrationNotifier {
    pub fn new(cfg: &MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            admin_email: cfg.admin_email.clone(),
            api_token: cfg.api_token.clone(),
            frontend_url: cfg.frontend_url.clone(),
        }
    }

    pub async fn notify_registration(&self, user: &User) {
        let Some(token) = self.api_token.as_deref() else {
            tracing::debug!("mailer token not configured, skipping registration notification");
            return;
        };
        if self.admin_email.is_empty() {
            tracing::debug!("admin email not configured, skipping registration notification");
            return;
        }

        let subject = format!(
            "New User Registration - {} {}",
            user.first_name, user.last_name
        );
        let review_url = format!(
            "{}/admin.html?userId={}",
            self.frontend_url, user.user_id
        );
        let body_text = format!(
            "A new user has registered and is awaiting review.\n\n\
             User Details:\n\
             Name: {} {}\n\
             Email: {}\n\
             Registration Date: {}\n\n\
             Review the application:\n{}",
            user.first_name,
            user.last_name,
            user.email,
            user.created_at.format("%Y-%m-%d %H:%M:%S"),
            review_url
        );

        let message_str = format!(
            "To: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}",
            self.admin_email, subject, body_text
        );
        let encoded_message = general_purpose::URL_SAFE_NO_PAD.encode(message_str.as_bytes());

        let res = self
            .client
            .post(SEND_URL)
            .bearer_auth(token)
            .json(&serde_json::json!({ "raw": encoded_message }))
            .send()
            .await;

        match res {
            Ok(res) if res.status().is_success() => {
                tracing::info!(user.email = %user.email, "registration notification sent");
            }
            Ok(res) => {
                tracing::warn!(
                    status = %res.status(),
                    user.email = %user.email,
                    "registration notification rejected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error.message = %e,
                    user.email = %user.email,
                    "failed to send registration notification"
                );
            }
        }
    }
}
