//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::db::Store;
use crate::db::repositories::user::verify_password;
use crate::domain::lockout::{LockoutPolicy, is_locked};
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::token::TokenService;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenService>,
    policy: LockoutPolicy,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenService>, policy: LockoutPolicy) -> Self {
        Self {
            store,
            tokens,
            policy,
        }
    }
}

fn record_attempt(outcome: &'static str) {
    metrics::counter!("auth_login_attempts_total", "outcome" => outcome).increment(1);
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some((user, password_hash)) = self
            .store
            .get_user_by_username_with_password(username)
            .await?
        else {
            record_attempt("unknown_user");
            return Err(AuthError::InvalidCredentials);
        };

        let now = Utc::now();

        // A locked account is refused before the password is checked and
        // without touching the counter.
        if is_locked(user.lock_until.as_deref(), now) {
            record_attempt("locked");
            warn!(user_id = %user.id, "Login refused for locked account");
            return Err(AuthError::AccountLocked);
        }

        if !verify_password(password_hash, password).await? {
            let locked = self
                .store
                .record_failed_login(&user.id, &self.policy, now)
                .await?;
            if locked {
                warn!(user_id = %user.id, "Account locked after repeated failed logins");
            }
            record_attempt("invalid_password");
            return Err(AuthError::InvalidCredentials);
        }

        self.store.reset_login_failures(&user.id).await?;
        let token = self.tokens.issue(&user)?;

        record_attempt("success");
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            token,
            role: user.role,
        })
    }

    async fn current_user(&self, id: &str) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
