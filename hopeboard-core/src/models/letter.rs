//! Letters: short public messages of encouragement

use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::validate_color;
use super::validation::{bounded_text, ValidationError};

/// Maximum letter body length
const MAX_MESSAGE_LEN: usize = 2000;

/// Maximum recipient length
const MAX_RECIPIENT_LEN: usize = 120;

/// Paper color for letters created without one
pub const DEFAULT_LETTER_COLOR: &str = "#CBB0FF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterCategory {
    Encouragement,
    Friendship,
    Hope,
    SelfCare,
    School,
}

impl LetterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encouragement => "encouragement",
            Self::Friendship => "friendship",
            Self::Hope => "hope",
            Self::SelfCare => "self-care",
            Self::School => "school",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Encouragement,
            Self::Friendship,
            Self::Hope,
            Self::SelfCare,
            Self::School,
        ]
    }

    /// Empty input means "no category".
    pub fn parse_optional(s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl FromStr for LetterCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(ValidationError::InvalidVariant {
                field: "category",
                value: s,
            })
    }
}

/// Stored letter. Likes are opaque markers; only their count is exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub id: Uuid,
    pub recipient: String,
    pub category: Option<LetterCategory>,
    pub color: String,
    pub message: String,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/letters`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLetter {
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl Letter {
    pub fn create(input: NewLetter, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let message = bounded_text(&input.message, "message", MAX_MESSAGE_LEN)?;
        let recipient = match input.recipient.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(r) => bounded_text(r, "recipient", MAX_RECIPIENT_LEN)?,
        };
        let category = LetterCategory::parse_optional(input.category.as_deref())?;
        let color = match input.color.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LETTER_COLOR.to_string(),
            Some(c) => validate_color(c, "color")?,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            recipient,
            category,
            color,
            message,
            likes: Vec::new(),
            created_at: now,
        })
    }

    /// Record one like and return the new count.
    pub fn like(&mut self) -> usize {
        self.likes.push(Uuid::new_v4().to_string());
        self.likes.len()
    }

    pub fn matches(&self, filter: &LetterFilter) -> bool {
        if let Some(category) = filter.category {
            if self.category != Some(category) {
                return false;
            }
        }
        match filter.search.as_deref() {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                self.recipient.to_lowercase().contains(&needle)
                    || self.message.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    pub fn view(&self) -> LetterView {
        LetterView {
            id: self.id,
            recipient: self.recipient.clone(),
            category: self.category,
            color: self.color.clone(),
            message: self.message.clone(),
            likes: self.likes.len(),
            created_at: self.created_at.year(),
        }
    }
}

/// Filters for `GET /api/letters`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterFilter {
    pub search: Option<String>,
    pub category: Option<LetterCategory>,
}

/// Public letter shape: like count and creation year only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterView {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub recipient: String,
    pub category: Option<LetterCategory>,
    pub color: String,
    pub message: String,
    pub likes: usize,
    pub created_at: i32,
}
