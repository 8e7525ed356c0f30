//! Short-code entry mapping a code to its target URL.

use chrono::{DateTime, Utc};

/// A shortened URL owned by one user.
///
/// `user_uuid` is a back-reference to the owner; ownership is re-checked
/// against the caller on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortCodeEntry {
    pub short_code: String,
    pub full_url: String,
    pub user_uuid: String,
    pub created_at: DateTime<Utc>,
    /// Informational expiry, swept by the store or `purge_expired`.
    pub expires_at: DateTime<Utc>,
}

impl ShortCodeEntry {
    /// Returns true if `user_uuid` is the recorded owner.
    pub fn is_owned_by(&self, user_uuid: &str) -> bool {
        self.user_uuid == user_uuid
    }

    /// Returns true if the entry has passed its expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input data for creating a new short-code entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortCodeEntry {
    pub short_code: String,
    pub full_url: String,
    pub user_uuid: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<NewShortCodeEntry> for ShortCodeEntry {
    fn from(new: NewShortCodeEntry) -> Self {
        Self {
            short_code: new.short_code,
            full_url: new.full_url,
            user_uuid: new.user_uuid,
            created_at: new.created_at,
            expires_at: new.expires_at,
        }
    }
}
