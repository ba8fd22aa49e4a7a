use serde::Serialize;

use crate::entities::users;

/// A user without its password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub language: Option<String>,
    pub send_notification: bool,
    pub failed_attempts: i32,
    pub lock_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == crate::constants::roles::ADMIN
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            language: model.language,
            send_notification: model.send_notification,
            failed_attempts: model.failed_attempts,
            lock_until: model.lock_until,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Input for creating an account from the command line.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
