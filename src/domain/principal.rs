//! Authenticated caller identity.

/// The verified identity of the caller.
///
/// Produced once by the authentication middleware and passed explicitly into
/// every service call that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    user_uuid: String,
}

impl Principal {
    pub fn new(user_uuid: impl Into<String>) -> Self {
        Self {
            user_uuid: user_uuid.into(),
        }
    }

    pub fn user_uuid(&self) -> &str {
        &self.user_uuid
    }
}
