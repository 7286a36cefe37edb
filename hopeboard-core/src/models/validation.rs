//! Input checks shared by boards, letters, resources and accounts

use std::fmt;

/// Why a piece of user input was refused. `field` is the name reported back
/// to the caller, e.g. `title`, `message` or `color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank after trimming (a board title of spaces, a letter with no message)
    Empty { field: &'static str },

    /// Longer than `max` characters
    TooLong { field: &'static str, max: usize },

    /// Present but malformed, like a color that is not `#rrggbb`
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Not one of the known names, like an unknown letter category or tag
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, max } => {
                write!(f, "{field} exceeds maximum length of {max} characters")
            }
            Self::InvalidFormat { field, reason } => write!(f, "{field}: {reason}"),
            Self::InvalidVariant { field, value } => write!(f, "invalid {field} value: '{value}'"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `value` and check it is non-empty and at most `max` characters.
pub(crate) fn bounded_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 120,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 120 characters"
        );
    }

    #[test]
    fn format_and_variant_messages() {
        let color = ValidationError::InvalidFormat {
            field: "color",
            reason: "must be a #rrggbb hex color",
        };
        assert_eq!(color.to_string(), "color: must be a #rrggbb hex color");

        let tag = ValidationError::InvalidVariant {
            field: "tag",
            value: "gossip".into(),
        };
        assert_eq!(tag.to_string(), "invalid tag value: 'gossip'");
    }

    #[test]
    fn bounded_text_trims_and_limits() {
        assert_eq!(bounded_text("  hi  ", "title", 5).unwrap(), "hi");
        assert_eq!(
            bounded_text("   ", "title", 5).unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
        assert!(matches!(
            bounded_text("toolong", "title", 3),
            Err(ValidationError::TooLong { max: 3, .. })
        ));
    }

    #[test]
    fn bounded_text_counts_chars_not_bytes() {
        // 3 emoji, 12 bytes
        assert!(bounded_text("🌸🌸🌸", "content", 3).is_ok());
    }
}
