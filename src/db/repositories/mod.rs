pub mod category;
pub mod live_update;
pub mod post;
pub mod tag;
pub mod user;

use sea_orm::{DbErr, SqlErr};

/// Returns the driver message when `err` is a unique-index violation.
///
/// `SQLite` reports the offending columns, e.g.
/// `UNIQUE constraint failed: tags.slug_key`.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
