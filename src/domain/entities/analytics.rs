//! Click analytics entry, one per short-code entry.

use chrono::{DateTime, Utc};

/// Click counter for a short code.
///
/// `total_clicks` equals the number of successful redirects since creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEntry {
    pub short_code: String,
    pub user_uuid: String,
    pub total_clicks: i64,
    pub time_stamp_last_accessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating an analytics entry alongside its short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalyticsEntry {
    pub short_code: String,
    pub user_uuid: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewAnalyticsEntry> for AnalyticsEntry {
    fn from(new: NewAnalyticsEntry) -> Self {
        Self {
            short_code: new.short_code,
            user_uuid: new.user_uuid,
            total_clicks: 0,
            time_stamp_last_accessed: None,
            created_at: new.created_at,
        }
    }
}
