use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Record};
use crate::error::{BookingError, BookingResult};
use crate::Id;

/// Shortest password the identity provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

const DEFAULT_DISPLAY_NAME: &str = "Unnamed";
const DEFAULT_EMAIL: &str = "No email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Identity returned by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub uid: Id,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// The `users/{uid}` profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: Id,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// First-login profile, filling gaps in the identity with placeholders.
    pub fn from_identity(identity: &AuthIdentity, created_at: DateTime<Utc>) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            uid: identity.uid.clone(),
            display_name: non_blank(&identity.display_name)
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: non_blank(&identity.email).unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            photo_url: identity.photo_url.clone(),
            role: Role::User,
            created_at: Some(created_at),
        }
    }
}

impl Record for UserProfile {
    fn set_id(&mut self, id: Id) {
        self.uid = id;
    }
}

/// Profile fields a user may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn validate(&self) -> BookingResult<()> {
        if self.display_name.is_none() && self.email.is_none() {
            return Err(BookingError::validation("Nothing to update"));
        }
        if let Some(name) = &self.display_name {
            require(name, "Name is required")?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// The registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_accepted: bool,
}

impl SignUpForm {
    pub fn validate(&self) -> BookingResult<()> {
        require(&self.display_name, "Name is required")?;
        check_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BookingError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password != self.confirm_password {
            return Err(BookingError::validation("Passwords do not match"));
        }
        if !self.terms_accepted {
            return Err(BookingError::validation("Please accept the terms"));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.clone())
    }
}

fn check_email(email: &str) -> BookingResult<()> {
    let valid = email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(BookingError::validation(format!("Invalid email '{email}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            display_name: "Ada".into(),
            email: "ada@example.org".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            terms_accepted: true,
        }
    }

    #[test]
    fn valid_sign_up_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn sign_up_rejections() {
        let mut f = form();
        f.confirm_password = "secret2".into();
        assert_eq!(f.validate().unwrap_err().user_message(), "Passwords do not match");

        let mut f = form();
        f.terms_accepted = false;
        assert!(f.validate().is_err());

        let mut f = form();
        f.password = "abc".into();
        f.confirm_password = "abc".into();
        assert!(f.validate().is_err());

        let mut f = form();
        f.email = "not-an-email".into();
        assert!(f.validate().is_err());
    }

    #[test]
    fn profile_defaults_fill_missing_identity_fields() {
        let identity = AuthIdentity {
            uid: "u1".into(),
            display_name: None,
            email: Some("  ".into()),
            photo_url: None,
        };
        let profile = UserProfile::from_identity(&identity, Utc::now());
        assert_eq!(profile.display_name, "Unnamed");
        assert_eq!(profile.email, "No email");
        assert_eq!(profile.role, Role::User);
    }

    #[test]
    fn patch_serialises_only_set_fields() {
        let patch = UserPatch {
            display_name: Some("Grace".into()),
            email: None,
        };
        assert!(patch.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "displayName": "Grace" })
        );
        assert!(UserPatch::default().validate().is_err());
    }

    #[test]
    fn profile_without_role_reads_as_user() {
        let json = serde_json::json!({ "displayName": "Lin", "email": "lin@example.org" });
        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.role, Role::User);
        assert!(profile.uid.is_empty());
    }
}
