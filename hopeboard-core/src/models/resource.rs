//! Self-care resources

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{bounded_text, ValidationError};

const MAX_TITLE_LEN: usize = 120;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_CONTENT_LEN: usize = 10_000;

/// Icon for resources created without one
pub const DEFAULT_ICON: &str = "📚";

/// Closed set of resource tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceTag {
    Stress,
    SelfCare,
    Friendship,
    School,
    Anxiety,
    Work,
    Family,
    Crisis,
}

impl ResourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stress => "stress",
            Self::SelfCare => "self-care",
            Self::Friendship => "friendship",
            Self::School => "school",
            Self::Anxiety => "anxiety",
            Self::Work => "work",
            Self::Family => "family",
            Self::Crisis => "crisis",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Stress,
            Self::SelfCare,
            Self::Friendship,
            Self::School,
            Self::Anxiety,
            Self::Work,
            Self::Family,
            Self::Crisis,
        ]
    }

    /// Tag filter from a query string; `all` and empty mean no filter.
    pub fn parse_filter(s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match s.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl FromStr for ResourceTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(ValidationError::InvalidVariant { field: "tag", value: s })
    }
}

/// A read-only self-care resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<ResourceTag>,
    pub icon: String,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/resources`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewResource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Resource {
    pub fn create(
        input: NewResource,
        added_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = bounded_text(&input.title, "title", MAX_TITLE_LEN)?;
        let description = bounded_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
        let content = bounded_text(&input.content, "content", MAX_CONTENT_LEN)?;

        let mut tags = Vec::with_capacity(input.tags.len());
        for raw in &input.tags {
            let tag: ResourceTag = raw.parse()?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let icon = match input.icon.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_ICON.to_string(),
            Some(icon) => bounded_text(icon, "icon", 8)?,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            content,
            tags,
            icon,
            added_by,
            created_at: now,
        })
    }

    pub fn has_tag(&self, tag: Option<ResourceTag>) -> bool {
        tag.map_or(true, |t| self.tags.contains(&t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewResource {
        NewResource {
            title: "Mindful Breathing".into(),
            description: "Simple breathing techniques to reduce stress".into(),
            content: "Breathe in for 4 seconds, hold for 2, exhale for 6.".into(),
            tags: vec!["stress".into(), "self-care".into(), "stress".into()],
            icon: Some("🧘".into()),
        }
    }

    #[test]
    fn creates_with_deduped_tags() {
        let r = Resource::create(input(), None, Utc::now()).unwrap();
        assert_eq!(r.tags, vec![ResourceTag::Stress, ResourceTag::SelfCare]);
        assert_eq!(r.icon, "🧘");
        assert!(r.has_tag(Some(ResourceTag::SelfCare)));
        assert!(!r.has_tag(Some(ResourceTag::Work)));
        assert!(r.has_tag(None));
    }

    #[test]
    fn default_icon() {
        let r = Resource::create(
            NewResource {
                icon: None,
                ..input()
            },
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(r.icon, DEFAULT_ICON);
    }

    #[test]
    fn required_fields() {
        let err = Resource::create(
            NewResource {
                description: " ".into(),
                ..input()
            },
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "description" });
    }

    #[test]
    fn closed_tag_set() {
        let err = Resource::create(
            NewResource {
                tags: vec!["cooking".into()],
                ..input()
            },
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "tag", .. }));
    }

    #[test]
    fn tag_filter() {
        assert_eq!(ResourceTag::parse_filter(Some("all")).unwrap(), None);
        assert_eq!(ResourceTag::parse_filter(None).unwrap(), None);
        assert_eq!(
            ResourceTag::parse_filter(Some("crisis")).unwrap(),
            Some(ResourceTag::Crisis)
        );
        assert!(ResourceTag::parse_filter(Some("cooking")).is_err());
    }

    #[test]
    fn wire_shape() {
        let r = Resource::create(input(), None, Utc::now()).unwrap();
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["tags"][1], "self-care");
        assert!(value["addedBy"].is_null());
    }
}
