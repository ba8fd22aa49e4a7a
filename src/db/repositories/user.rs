use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::domain::lockout::LockoutPolicy;
use crate::domain::{now_timestamp, timestamp};
use crate::entities::{prelude::*, users};
use crate::models::user::{NewUser, User};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates an account. The username is stored lowercased.
    pub async fn create(&self, user: &NewUser, config: &SecurityConfig) -> Result<User> {
        let password = user.password.clone();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = now_timestamp();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(user.username.trim().to_lowercase()),
            email: Set(user.email.trim().to_string()),
            password_hash: Set(password_hash),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(user.role.clone()),
            language: Set(None),
            send_notification: Set(false),
            failed_attempts: Set(0),
            lock_until: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to create user {}", user.username))?;

        Ok(User::from(model))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Exact-match lookup that also returns the stored hash, for login.
    pub async fn get_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = Users::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Counts a failed login and locks the account once the count reaches the
    /// policy threshold. Both steps are single conditional updates, so
    /// concurrent failures are never lost.
    ///
    /// Returns `true` when this call left the account locked.
    pub async fn record_failed_login(
        &self,
        id: &str,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let stamp = timestamp(now);

        Users::update_many()
            .col_expr(
                users::Column::FailedAttempts,
                Expr::col(users::Column::FailedAttempts).add(1),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(stamp.clone()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment failed login counter")?;

        let threshold = i32::try_from(policy.max_failed_attempts).unwrap_or(i32::MAX);
        let locked = Users::update_many()
            .col_expr(
                users::Column::LockUntil,
                Expr::value(Some(timestamp(policy.lock_deadline(now)))),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(stamp))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::FailedAttempts.gte(threshold))
            .exec(&self.conn)
            .await
            .context("Failed to lock user account")?;

        Ok(locked.rows_affected > 0)
    }

    /// Clears the failure counter and any lock after a successful login.
    pub async fn reset_login_failures(&self, id: &str) -> Result<()> {
        Users::update_many()
            .col_expr(users::Column::FailedAttempts, Expr::value(0))
            .col_expr(users::Column::LockUntil, Expr::value(Option::<String>::None))
            .col_expr(users::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to reset login failures")?;

        Ok(())
    }

    /// Administrative unlock by username. Returns `false` if no such user.
    pub async fn unlock(&self, username: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(users::Column::FailedAttempts, Expr::value(0))
            .col_expr(users::Column::LockUntil, Expr::value(Option::<String>::None))
            .col_expr(users::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(users::Column::Username.eq(username))
            .exec(&self.conn)
            .await
            .context("Failed to unlock user")?;

        Ok(result.rows_affected > 0)
    }
}

/// Verifies `password` against an Argon2 PHC string.
/// Runs on the blocking pool because Argon2 is CPU-intensive.
pub async fn verify_password(password_hash: String, password: &str) -> Result<bool> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse", &cheap_config()).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password(hash.clone(), "correct horse").await.unwrap());
        assert!(!verify_password(hash, "battery staple").await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_password("plaintext".to_string(), "x").await.is_err());
    }
}
