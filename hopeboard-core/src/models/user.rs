//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{bounded_text, ValidationError};

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 32;

/// Maximum length for the recovery note left at sign-up
pub const MAX_RECOVERY_NOTE_LEN: usize = 500;

/// Validated username (trimmed, 1..=32 chars, no whitespace inside)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let name = bounded_text(s, "username", MAX_USERNAME_LEN)?;
        if name.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must not contain whitespace",
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stored user record. The password hash never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    /// Private reminder the user left when the account was created
    pub recovery_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: Username, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into_string(),
            password_hash,
            recovery_note: None,
            created_at: now,
        }
    }

    /// Attach a recovery note. A missing or blank note leaves none.
    pub fn with_recovery_note(mut self, note: Option<&str>) -> Result<Self, ValidationError> {
        self.recovery_note = match note {
            Some(n) if !n.trim().is_empty() => {
                Some(bounded_text(n, "recoveryNote", MAX_RECOVERY_NOTE_LEN)?)
            }
            _ => None,
        };
        Ok(self)
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public user shape: `{id, username}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert_eq!(Username::new("ava").unwrap().as_str(), "ava");
        assert_eq!(Username::new("  ava ").unwrap().as_str(), "ava");
        assert!(Username::new("night_owl-42").is_ok());
    }

    #[test]
    fn rejects_inner_whitespace() {
        let err = Username::new("ava marie").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty_and_long() {
        assert!(matches!(
            Username::new(""),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            Username::new(&"a".repeat(33)),
            Err(ValidationError::TooLong { max: 32, .. })
        ));
    }

    #[test]
    fn view_hides_password_hash() {
        let user = User::new(Username::new("ava").unwrap(), "$argon2id$x".into(), Utc::now());
        let json = serde_json::to_value(user.view()).unwrap();
        assert_eq!(json["username"], "ava");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn recovery_note_is_optional_and_bounded() {
        let base = || User::new(Username::new("ava").unwrap(), "h".into(), Utc::now());

        let user = base().with_recovery_note(Some("  first pet  ")).unwrap();
        assert_eq!(user.recovery_note.as_deref(), Some("first pet"));
        assert!(serde_json::to_value(user.view()).unwrap().get("recoveryNote").is_none());

        assert_eq!(base().with_recovery_note(Some("   ")).unwrap().recovery_note, None);
        assert_eq!(base().with_recovery_note(None).unwrap().recovery_note, None);
        assert!(matches!(
            base().with_recovery_note(Some(&"n".repeat(MAX_RECOVERY_NOTE_LEN + 1))),
            Err(ValidationError::TooLong { field: "recoveryNote", .. })
        ));
    }
}
