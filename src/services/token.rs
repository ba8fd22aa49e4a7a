//! Signed access tokens shared by every auth guard.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::models::user::User;
use crate::services::auth_service::AuthError;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX)),
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_seconds)
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if signed at `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let claims = Claims {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Checks signature and expiry. Every failure is `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AuthError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: "editor".to_string(),
            language: None,
            send_notification: false,
            failed_attempts: 0,
            lock_until: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let tokens = TokenService::new("secret", 3600);
        let token = tokens.issue(&user()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, "u-1");
        assert_eq!(claims.username, "editor");
        assert_eq!(claims.role, "editor");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("secret", 3600);
        let token = tokens
            .issue_at(&user(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenService::new("other", 3600).issue(&user()).unwrap();
        let tokens = TokenService::new("secret", 3600);

        assert!(tokens.verify(&token).is_err());
        assert!(tokens.verify("not.a.jwt").is_err());
    }
}
