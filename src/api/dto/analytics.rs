//! DTOs for the analytics endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::AnalyticsEntry;

/// Click counter for one short code.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(rename = "shortCode")]
    pub short_code: String,
    #[serde(rename = "userUUID")]
    pub user_uuid: String,
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
    #[serde(rename = "timeStampLastAccessed")]
    pub time_stamp_last_accessed: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<AnalyticsEntry> for AnalyticsResponse {
    fn from(entry: AnalyticsEntry) -> Self {
        Self {
            short_code: entry.short_code,
            user_uuid: entry.user_uuid,
            total_clicks: entry.total_clicks,
            time_stamp_last_accessed: entry.time_stamp_last_accessed,
            created_at: entry.created_at,
        }
    }
}
