//! Boards: a titled canvas of positioned elements

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::element::Element;
use super::validation::{bounded_text, ValidationError};

/// Maximum length for board titles
const MAX_TITLE_LEN: usize = 120;

/// Title used when a board is created without one
pub const DEFAULT_TITLE: &str = "New Board";

/// Canvas color for new boards
pub const DEFAULT_BACKGROUND: &str = "#f9f9f9";

/// Length of a minted share token
const SHARE_TOKEN_LEN: usize = 13;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// CSS colors accepted for backgrounds: hex, rgb()/rgba(), or a bare keyword
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|rgba?\([0-9.,\s%]+\)|[a-zA-Z]+)$").expect("invalid color regex")
});

/// Validated board title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTitle(String);

impl BoardTitle {
    /// Trimmed, 1..=120 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "title", MAX_TITLE_LEN).map(Self)
    }

    /// Missing or blank titles fall back to "New Board".
    pub fn or_default(s: Option<&str>) -> Result<Self, ValidationError> {
        match s.map(str::trim) {
            Some(t) if !t.is_empty() => Self::new(t),
            _ => Ok(Self(DEFAULT_TITLE.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validate a CSS color string.
pub fn validate_color(s: &str, field: &'static str) -> Result<String, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !COLOR_RE.is_match(s) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a hex, rgb() or named CSS color",
        });
    }
    Ok(s.to_owned())
}

/// Board visibility. Only affects listing and the share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            _ => Err(ValidationError::InvalidVariant {
                field: "visibility",
                value: s.to_owned(),
            }),
        }
    }
}

/// Mint a share token: 13 random base-36 characters.
pub fn generate_share_token() -> String {
    let mut rng = rand::thread_rng();
    (0..SHARE_TOKEN_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// A board document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub owner: Uuid,
    #[serde(default)]
    pub visibility: Visibility,
    pub background_color: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    pub share_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// New private, empty board owned by `owner`.
    pub fn new(title: BoardTitle, owner: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into_string(),
            owner,
            visibility: Visibility::Private,
            background_color: DEFAULT_BACKGROUND.to_string(),
            elements: Vec::new(),
            share_token: generate_share_token(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    /// Apply a replace request. Fields left out keep their value; a present
    /// element list replaces the stored one wholesale.
    pub fn apply(&mut self, update: BoardUpdate, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let title = update.title.as_deref().map(BoardTitle::new).transpose()?;
        let background = update
            .background_color
            .as_deref()
            .map(|c| validate_color(c, "backgroundColor"))
            .transpose()?;

        if let Some(title) = title {
            self.title = title.into_string();
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        if let Some(background) = background {
            self.background_color = background;
        }
        if let Some(elements) = update.elements {
            self.elements = elements;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Body of `PUT /api/boards/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(BoardTitle::new("Trip Notes").unwrap(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn new_board_defaults() {
        let b = board();
        assert_eq!(b.title, "Trip Notes");
        assert_eq!(b.visibility, Visibility::Private);
        assert_eq!(b.background_color, DEFAULT_BACKGROUND);
        assert!(b.elements.is_empty());
        assert_eq!(b.share_token.len(), SHARE_TOKEN_LEN);
        assert!(b.share_token.bytes().all(|c| BASE36.contains(&c)));
    }

    #[test]
    fn share_tokens_differ() {
        assert_ne!(generate_share_token(), generate_share_token());
    }

    #[test]
    fn title_defaults() {
        assert_eq!(BoardTitle::or_default(None).unwrap().as_str(), DEFAULT_TITLE);
        assert_eq!(BoardTitle::or_default(Some("  ")).unwrap().as_str(), DEFAULT_TITLE);
        assert_eq!(BoardTitle::or_default(Some(" Mood ")).unwrap().as_str(), "Mood");
        assert!(BoardTitle::new(&"x".repeat(121)).is_err());
    }

    #[test]
    fn apply_keeps_missing_fields() {
        let mut b = board();
        let before = b.updated_at;
        b.apply(
            BoardUpdate {
                visibility: Some(Visibility::Public),
                ..Default::default()
            },
            before + chrono::Duration::seconds(5),
        )
        .unwrap();

        assert_eq!(b.title, "Trip Notes");
        assert!(b.is_public());
        assert!(b.updated_at > before);
    }

    #[test]
    fn apply_rejects_bad_input_without_partial_write() {
        let mut b = board();
        let err = b
            .apply(
                BoardUpdate {
                    title: Some("Renamed".into()),
                    background_color: Some("url(javascript:x)".into()),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        assert_eq!(b.title, "Trip Notes");
    }

    #[test]
    fn colors() {
        assert!(validate_color("#f9f9f9", "c").is_ok());
        assert!(validate_color("rgb(255, 0, 0)", "c").is_ok());
        assert!(validate_color("transparent", "c").is_ok());
        assert!(validate_color("", "c").is_err());
        assert!(validate_color("red; x", "c").is_err());
    }

    #[test]
    fn serializes_id_as_underscore_id() {
        let b = board();
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["_id"], b.id.to_string());
        assert_eq!(value["backgroundColor"], DEFAULT_BACKGROUND);
        assert_eq!(value["visibility"], "private");
        assert!(value["shareToken"].is_string());

        let back: Board = serde_json::from_value(value).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn visibility_from_str() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert!("friends".parse::<Visibility>().is_err());
    }
}
