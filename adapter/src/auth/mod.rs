use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use serde::{Deserialize, Serialize};
use shared::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

const ISSUER: &str = "space-booking";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The account email the token was issued for.
    pub sub: String,
    pub uid: UserId,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates the bearer tokens of the Authorization header.
/// Tokens are stateless; expiry is carried in the `exp` claim.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl JwtCodec {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            ttl_seconds: cfg.ttl as i64,
        }
    }

    pub fn issue(&self, event: CreateToken) -> AppResult<AccessToken> {
        let now = Utc::now();
        let claims = Claims {
            sub: event.email,
            uid: event.user_id,
            role: event.role.to_string(),
            iss: ISSUER.into(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken)
            .map_err(|e| AppError::ExternalServiceError(format!("failed to sign token: {e}")))
    }

    /// Signature and expiry are both checked; anything off means the
    /// caller is simply unauthenticated.
    pub fn verify(&self, token: &AccessToken) -> AppResult<Claims> {
        decode::<Claims>(&token.0, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::UnauthenticatedError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    fn codec(ttl: u64) -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret".into(),
            ttl,
        })
    }

    #[test]
    fn issued_token_verifies_and_carries_the_user() {
        let codec = codec(3600);
        let user_id = UserId::new();
        let token = codec
            .issue(CreateToken::new(user_id, "me@example.com".into(), Role::User))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.uid, user_id);
        assert_eq!(claims.sub, "me@example.com");
        assert_eq!(claims.role, "USER");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let codec = codec(3600);
        let token = codec
            .issue(CreateToken::new(UserId::new(), "me@example.com".into(), Role::User))
            .unwrap();

        let mut forged = token.0.clone();
        forged.pop();
        forged.push('x');
        assert!(codec.verify(&AccessToken(forged)).is_err());
    }
}
