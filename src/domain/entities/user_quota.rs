//! Per-user request quota record.

use chrono::{DateTime, Duration, Utc};

/// Request counter for one authenticated user.
///
/// `requests_in_window` counts requests inside the trailing window ending at
/// `time_of_last_request`. `version` is bumped on every write and serves as
/// the optimistic-lock marker for conditional updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuota {
    pub user_uuid: String,
    pub requests_in_window: i64,
    pub time_of_last_request: Option<DateTime<Utc>>,
    pub version: i64,
}

impl UserQuota {
    /// A freshly confirmed account: no requests yet.
    pub fn new(user_uuid: impl Into<String>) -> Self {
        Self {
            user_uuid: user_uuid.into(),
            requests_in_window: 0,
            time_of_last_request: None,
            version: 0,
        }
    }

    /// Returns true if `now` falls inside the window opened by the last request.
    ///
    /// Deliberately wider than a strict `0 < now - last <= window` rule: a
    /// last request at exactly `now`, or ahead of `now` (clock skew between
    /// nodes, or a concurrent request that committed first), also counts as
    /// inside the window. Such a request increments the counter instead of
    /// resetting it to 1.
    pub fn is_within_window(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.time_of_last_request
            .is_some_and(|last| now.signed_duration_since(last) <= window)
    }

    /// Computes the record after consuming one request at `now`.
    ///
    /// Inside the window the counter increments; otherwise it resets to 1.
    pub fn consume(&self, now: DateTime<Utc>, window: Duration) -> Self {
        let requests_in_window = if self.is_within_window(now, window) {
            self.requests_in_window + 1
        } else {
            1
        };

        Self {
            user_uuid: self.user_uuid.clone(),
            requests_in_window,
            time_of_last_request: Some(now),
            version: self.version + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let quota = UserQuota::new("user-1");
        assert_eq!(quota.requests_in_window, 0);
        assert!(quota.time_of_last_request.is_none());
        assert_eq!(quota.version, 0);
    }

    #[test]
    fn test_consume_fresh_record_resets_to_one() {
        let now = Utc::now();
        let next = UserQuota::new("user-1").consume(now, Duration::minutes(5));

        assert_eq!(next.requests_in_window, 1);
        assert_eq!(next.time_of_last_request, Some(now));
        assert_eq!(next.version, 1);
    }

    #[test]
    fn test_consume_within_window_increments() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 4,
            time_of_last_request: Some(now - Duration::minutes(2)),
            version: 7,
        };

        let next = quota.consume(now, Duration::minutes(5));
        assert_eq!(next.requests_in_window, 5);
        assert_eq!(next.version, 8);
    }

    #[test]
    fn test_consume_at_window_boundary_increments() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 3,
            time_of_last_request: Some(now - Duration::minutes(5)),
            version: 1,
        };

        assert_eq!(quota.consume(now, Duration::minutes(5)).requests_in_window, 4);
    }

    #[test]
    fn test_consume_after_gap_resets() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 42,
            time_of_last_request: Some(now - Duration::minutes(5) - Duration::seconds(1)),
            version: 3,
        };

        assert_eq!(quota.consume(now, Duration::minutes(5)).requests_in_window, 1);
    }

    #[test]
    fn test_future_timestamp_counts_as_in_window() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 2,
            time_of_last_request: Some(now + Duration::seconds(2)),
            version: 1,
        };

        assert!(quota.is_within_window(now, Duration::minutes(5)));
    }

    #[test]
    fn test_consume_after_future_timestamp_does_not_reset() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 9,
            time_of_last_request: Some(now + Duration::seconds(2)),
            version: 4,
        };

        let next = quota.consume(now, Duration::minutes(5));
        assert_eq!(next.requests_in_window, 10);
        assert_eq!(next.time_of_last_request, Some(now));
    }

    #[test]
    fn test_consume_at_same_instant_increments() {
        let now = Utc::now();
        let quota = UserQuota {
            user_uuid: "user-1".into(),
            requests_in_window: 1,
            time_of_last_request: Some(now),
            version: 1,
        };

        assert_eq!(quota.consume(now, Duration::minutes(5)).requests_in_window, 2);
    }
}
