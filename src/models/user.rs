//! User models for auth and profile responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user record returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (used as the login identifier)
    pub email: String,
    /// Avatar URL, if one has been uploaded
    pub photo: Option<String>,
}

/// The full profile record returned by `users/me`
///
/// `phone` is never authoritative from the server: the backend does not store
/// it, and every loaded profile gets it merged in from the local override
/// store before display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUser {
    /// Server-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Device-local phone override (see [`crate::store::Store`])
    pub phone: Option<String>,
    /// Avatar URL, if one has been uploaded
    pub photo: Option<String>,
    /// When the email was verified
    pub verified_at: Option<DateTime<Utc>>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last server-side update
    pub updated_at: DateTime<Utc>,
}

impl ProfileUser {
    /// Replace the phone field with the locally stored override.
    ///
    /// Called on every profile load; the server value (always absent) is
    /// discarded either way.
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(phone: Option<&str>) -> ProfileUser {
        ProfileUser {
            id: 7,
            name: "Ayu".into(),
            email: "ayu@example.com".into(),
            phone: phone.map(String::from),
            photo: None,
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn with_phone_overrides_server_value() {
        let merged = profile(Some("ignored")).with_phone(Some("+628123456".into()));
        assert_eq!(merged.phone.as_deref(), Some("+628123456"));
    }

    #[test]
    fn with_phone_clears_when_no_override_stored() {
        let merged = profile(Some("ignored")).with_phone(None);
        assert_eq!(merged.phone, None);
    }
}
