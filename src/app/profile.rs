//! Profile reconciliation and save planning
//!
//! The submitted form is validated and compared against the currently
//! displayed profile before anything leaves the device. An unchanged
//! name/email pair becomes a local-only phone write, never a network call.

use regex_lite::Regex;

use crate::error::{Error, Result};
use crate::models::ProfileUser;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

/// Permissive on entry; normalization strips everything but digits and '+'
const PHONE_PATTERN: &str = r"^[0-9+\-\s().]*$";

/// Editable profile fields as submitted from an edit dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone as typed; normalized before storage
    pub phone: String,
}

impl ProfileForm {
    /// Pre-fill from the currently displayed profile
    pub fn from_user(user: &ProfileUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
        }
    }
}

/// Remote half of a save plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUpdate {
    /// Name to submit
    pub name: String,
    /// Email to submit
    pub email: String,
}

/// What a profile save will actually do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    /// Normalized phone override to persist locally; `None` clears it
    pub phone: Option<String>,
    /// Remote update to issue; `None` when name and email are unchanged
    pub remote: Option<RemoteUpdate>,
}

/// Validate the form against the displayed profile and decide what to do.
///
/// Fails without touching anything when a field is invalid. The phone is
/// always persisted locally; the remote update is planned only when name or
/// email differ from `current`.
pub fn plan_save(current: Option<&ProfileUser>, form: &ProfileForm) -> Result<SavePlan> {
    if form.name.trim().is_empty() {
        return Err(Error::precondition("Name cannot be empty"));
    }

    let email_ok = Regex::new(EMAIL_PATTERN)
        .map(|re| re.is_match(&form.email))
        .unwrap_or(false);
    if !email_ok {
        return Err(Error::precondition("Please enter a valid email"));
    }

    if !form.phone.is_empty() {
        let phone_ok = Regex::new(PHONE_PATTERN)
            .map(|re| re.is_match(&form.phone))
            .unwrap_or(false);
        if !phone_ok {
            return Err(Error::precondition(
                "Please enter a valid phone number (e.g., +6281234567890)",
            ));
        }
    }

    let unchanged =
        current.is_some_and(|user| user.name == form.name && user.email == form.email);

    Ok(SavePlan {
        phone: normalize_phone(&form.phone),
        remote: (!unchanged).then(|| RemoteUpdate {
            name: form.name.clone(),
            email: form.email.clone(),
        }),
    })
}

/// Strip everything but digits and '+'; an empty result clears the override
pub fn normalize_phone(raw: &str) -> Option<String> {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn current() -> ProfileUser {
        ProfileUser {
            id: 7,
            name: "Ayu".into(),
            email: "ayu@example.com".into(),
            phone: None,
            photo: None,
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form(name: &str, email: &str, phone: &str) -> ProfileForm {
        ProfileForm {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    #[test]
    fn normalizes_phone_to_digits_and_plus() {
        assert_eq!(
            normalize_phone("+62 812-3456").as_deref(),
            Some("+628123456")
        );
        assert_eq!(normalize_phone("(0812) 345.678").as_deref(), Some("0812345678"));
        assert_eq!(normalize_phone(""), None);
    }

    #[test]
    fn unchanged_name_and_email_plan_no_remote_call() {
        let plan = plan_save(
            Some(&current()),
            &form("Ayu", "ayu@example.com", "+62 812-3456"),
        )
        .unwrap();
        assert!(plan.remote.is_none());
        assert_eq!(plan.phone.as_deref(), Some("+628123456"));
    }

    #[test]
    fn changed_email_plans_a_remote_update() {
        let plan = plan_save(Some(&current()), &form("Ayu", "new@example.com", "")).unwrap();
        let remote = plan.remote.unwrap();
        assert_eq!(remote.email, "new@example.com");
        assert_eq!(plan.phone, None);
    }

    #[test]
    fn no_baseline_profile_always_plans_a_remote_update() {
        let plan = plan_save(None, &form("Ayu", "ayu@example.com", "")).unwrap();
        assert!(plan.remote.is_some());
    }

    #[test]
    fn invalid_email_fails_before_any_plan_exists() {
        let err = plan_save(Some(&current()), &form("Ayu", "not-an-email", "")).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email");
    }

    #[test]
    fn blank_name_fails() {
        let err = plan_save(Some(&current()), &form("  ", "ayu@example.com", "")).unwrap_err();
        assert_eq!(err.to_string(), "Name cannot be empty");
    }

    #[test]
    fn phone_with_letters_fails() {
        let err =
            plan_save(Some(&current()), &form("Ayu", "ayu@example.com", "0812abc")).unwrap_err();
        assert!(err.to_string().contains("valid phone number"));
    }

    #[test]
    fn empty_phone_clears_the_override() {
        let plan = plan_save(Some(&current()), &form("Ayu", "ayu@example.com", "")).unwrap();
        assert_eq!(plan.phone, None);
    }
}
