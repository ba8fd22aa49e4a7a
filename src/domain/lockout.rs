use chrono::{DateTime, Duration, Utc};

use crate::config::LockoutConfig;

use super::parse_timestamp;

/// Failed-login lockout rules.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    pub lockout: Duration,
}

impl LockoutPolicy {
    #[must_use]
    pub fn from_config(config: &LockoutConfig) -> Self {
        Self {
            max_failed_attempts: config.max_failed_attempts,
            lockout: Duration::seconds(i64::try_from(config.lockout_seconds).unwrap_or(i64::MAX)),
        }
    }

    /// Deadline written to `lock_until` once the threshold is reached.
    #[must_use]
    pub fn lock_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.lockout)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::from_config(&LockoutConfig::default())
    }
}

/// An account is locked iff `lock_until` is set and still in the future.
/// Unparseable values never lock anyone out.
#[must_use]
pub fn is_locked(lock_until: Option<&str>, now: DateTime<Utc>) -> bool {
    lock_until
        .and_then(parse_timestamp)
        .is_some_and(|until| until > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp;

    #[test]
    fn default_policy_is_five_attempts_fifteen_minutes() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.max_failed_attempts, 5);
        assert_eq!(policy.lockout, Duration::minutes(15));
    }

    #[test]
    fn locked_only_while_deadline_is_ahead() {
        let now = Utc::now();
        let policy = LockoutPolicy::default();
        let until = timestamp(policy.lock_deadline(now));

        assert!(is_locked(Some(&until), now));
        assert!(is_locked(Some(&until), now + Duration::minutes(14)));
        assert!(!is_locked(Some(&until), now + Duration::minutes(16)));
    }

    #[test]
    fn missing_or_garbage_deadline_is_unlocked() {
        let now = Utc::now();
        assert!(!is_locked(None, now));
        assert!(!is_locked(Some("not-a-date"), now));
    }
}
