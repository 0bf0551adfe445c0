use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use kernel::admission::Session;

/// Optimistic freshness check: decode the JWT payload and compare its
/// `exp` claim against now. No signature validation happens here; the
/// server's 401/403 stays authoritative and anything unreadable counts
/// as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return true;
    };

    let Ok(decoded) = general_purpose::URL_SAFE_NO_PAD.decode(payload) else {
        return true;
    };
    let Ok(claims) = serde_json::from_slice::<serde_json::Value>(&decoded) else {
        return true;
    };

    match claims.get("exp").and_then(|exp| exp.as_i64()) {
        Some(exp) => now.timestamp() >= exp,
        // No expiry claim: treat as expired rather than trusting it forever.
        None => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCredentials {
    token: String,
    email: String,
}

/// The client-side token cache. Credentials are overwritten wholesale on
/// login and dropped wholesale on logout or expiry; there is no partial
/// update.
#[derive(Debug, Default)]
pub struct SessionStore {
    credentials: Option<StoredCredentials>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, token: String, email: String) {
        self.credentials = Some(StoredCredentials { token, email });
    }

    pub fn clear(&mut self) {
        self.credentials = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    /// Drops expired credentials and reports the resulting session state.
    pub fn check(&mut self, now: DateTime<Utc>) -> Session {
        if let Some(credentials) = &self.credentials {
            if is_token_expired(&credentials.token, now) {
                self.credentials = None;
            }
        }
        self.session()
    }

    pub fn session(&self) -> Session {
        match &self.credentials {
            Some(credentials) => Session::LoggedIn {
                email: credentials.email.clone(),
            },
            None => Session::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fake_token(exp: Option<i64>) -> String {
        let payload = match exp {
            Some(exp) => serde_json::json!({ "sub": "me@example.com", "exp": exp }),
            None => serde_json::json!({ "sub": "me@example.com" }),
        };
        let encode = |bytes: &[u8]| general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        format!(
            "{}.{}.{}",
            encode(br#"{"alg":"HS256","typ":"JWT"}"#),
            encode(payload.to_string().as_bytes()),
            encode(b"unchecked-signature")
        )
    }

    #[test]
    fn live_token_is_not_expired() {
        let now = Utc::now();
        let token = fake_token(Some((now + Duration::hours(1)).timestamp()));
        assert!(!is_token_expired(&token, now));
    }

    #[test]
    fn past_exp_means_expired() {
        let now = Utc::now();
        let token = fake_token(Some((now - Duration::hours(1)).timestamp()));
        assert!(is_token_expired(&token, now));
    }

    #[test]
    fn malformed_tokens_count_as_expired() {
        let now = Utc::now();
        assert!(is_token_expired("not-a-jwt", now));
        assert!(is_token_expired("a.b", now));
        assert!(is_token_expired("a.%%%.c", now));
        // A token without an exp claim is not trusted either.
        assert!(is_token_expired(&fake_token(None), now));
    }

    #[test]
    fn store_drops_expired_credentials_on_check() {
        let now = Utc::now();
        let mut store = SessionStore::new();
        store.store(
            fake_token(Some((now - Duration::minutes(1)).timestamp())),
            "me@example.com".into(),
        );

        assert_eq!(store.check(now), Session::Anonymous);
        assert!(store.token().is_none());
    }

    #[test]
    fn store_keeps_live_credentials() {
        let now = Utc::now();
        let mut store = SessionStore::new();
        store.store(
            fake_token(Some((now + Duration::hours(2)).timestamp())),
            "me@example.com".into(),
        );

        assert_eq!(
            store.check(now),
            Session::LoggedIn {
                email: "me@example.com".into()
            }
        );
    }
}
