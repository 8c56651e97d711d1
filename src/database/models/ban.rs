//! Users barred from claiming ("bonked").

use chrono::{DateTime as ChronoDateTime, Duration, Utc};
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedUser {
    pub user_id: i64,
    pub unban_date: DateTime,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BannedUser {
    /// Ban `user_id` until `until`.
    pub fn until(user_id: i64, until: ChronoDateTime<Utc>, reason: Option<String>) -> Self {
        Self {
            user_id,
            unban_date: DateTime::from_millis(until.timestamp_millis()),
            reason,
        }
    }

    pub fn is_expired(&self, now: ChronoDateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.unban_date.timestamp_millis()
    }

    pub fn remaining(&self, now: ChronoDateTime<Utc>) -> Duration {
        Duration::milliseconds(self.unban_date.timestamp_millis() - now.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_and_remaining() {
        let now = Utc::now();
        let ban = BannedUser::until(1, now + Duration::hours(5), None);

        assert!(!ban.is_expired(now));
        assert_eq!(ban.remaining(now).num_hours(), 5);
        assert!(ban.is_expired(now + Duration::hours(6)));
    }
}
