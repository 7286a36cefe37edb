//! Board elements
//!
//! An element is one positioned item on a board canvas. The `type` field is
//! the single discriminant: it is serialized with the element and never
//! inferred from rendered output.
//!
//! Wire shape (camelCase, flattened):
//!
//! ```json
//! {"id":"…","type":"text","x":50,"y":50,"zIndex":1,"width":"200px","height":"auto",
//!  "content":"Double click to edit","fontFamily":"Merriweather","fontSize":16, …}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Lowest z-index an element can have
pub const MIN_Z_INDEX: u32 = 1;

/// Width or height of an element: a pixel length or `auto` (content-sized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f64),
    Auto,
}

impl Dimension {
    /// Pixel length, or `intrinsic` when the dimension is `auto`.
    pub fn resolve(self, intrinsic: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Auto => intrinsic,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    fn default_box() -> Self {
        Self::Px(200.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{}px", v),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let number = s.strip_suffix("px").unwrap_or(s).trim();
        match number.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Self::Px(v)),
            _ => Err(ValidationError::InvalidVariant {
                field: "dimension",
                value: s.to_owned(),
            }),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) if v.is_finite() && v >= 0.0 => Ok(Self::Px(v)),
            Raw::Number(v) => Err(de::Error::custom(format!("invalid dimension: {}", v))),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Element discriminant without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Gif,
    Sticker,
    Music,
    Shape,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Gif => "gif",
            Self::Sticker => "sticker",
            Self::Music => "music",
            Self::Shape => "shape",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Text,
            Self::Image,
            Self::Gif,
            Self::Sticker,
            Self::Music,
            Self::Shape,
        ]
    }

    /// Image and gif elements are created from an uploaded file.
    pub fn needs_file(&self) -> bool {
        matches!(self, Self::Image | Self::Gif)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "element type",
                value: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

impl TextDecoration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Underline => "underline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Typography of a text element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub color: String,
    pub background_color: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Merriweather".to_string(),
            font_size: 16,
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            text_align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    #[default]
    Rectangle,
}

/// Type-specific payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text {
        #[serde(default)]
        content: String,
        #[serde(flatten)]
        style: TextStyle,
    },
    Image {
        #[serde(default)]
        content: String,
    },
    Gif {
        #[serde(default)]
        content: String,
    },
    Sticker {
        #[serde(default)]
        content: String,
    },
    Music {
        #[serde(default)]
        content: String,
    },
    Shape {
        #[serde(default = "default_shape_color")]
        color: String,
        #[serde(default)]
        shape: ShapeKind,
    },
}

pub(crate) fn default_shape_color() -> String {
    "#CBB0FF".to_string()
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::Image { .. } => ElementType::Image,
            Self::Gif { .. } => ElementType::Gif,
            Self::Sticker { .. } => ElementType::Sticker,
            Self::Music { .. } => ElementType::Music,
            Self::Shape { .. } => ElementType::Shape,
        }
    }

    /// Text-bearing content, if the element type has any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. }
            | Self::Image { content }
            | Self::Gif { content }
            | Self::Sticker { content }
            | Self::Music { content } => Some(content),
            Self::Shape { .. } => None,
        }
    }
}

fn default_z_index() -> u32 {
    MIN_Z_INDEX
}

/// A positioned item on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_z_index")]
    pub z_index: u32,
    #[serde(default = "Dimension::default_box")]
    pub width: Dimension,
    #[serde(default = "Dimension::default_box")]
    pub height: Dimension,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text { style, .. } => Some(style),
            _ => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ElementKind::Text { style, .. } => Some(style),
            _ => None,
        }
    }
}

/// Rewrite an `open.spotify.com/<kind>/<id>` link to its embed URL.
///
/// Links that already point at `/embed/` and free-text labels come back
/// unchanged.
pub fn spotify_embed_url(link: &str) -> String {
    let link = link.trim();
    if !link.contains("open.spotify.com") {
        return link.to_owned();
    }

    let parts: Vec<&str> = link.split('/').collect();
    if parts.len() < 5 || parts[3] == "embed" {
        return link.to_owned();
    }

    let kind = parts[3];
    let id = parts[4].split('?').next().unwrap_or(parts[4]);
    format!("https://open.spotify.com/embed/{}/{}", kind, id)
}

/// Whether music content should render as a Spotify player
pub fn is_spotify_embed(content: &str) -> bool {
    content.contains("spotify")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dimension_parsing() {
        assert_eq!("200px".parse::<Dimension>().unwrap(), Dimension::Px(200.0));
        assert_eq!("80".parse::<Dimension>().unwrap(), Dimension::Px(80.0));
        assert_eq!("auto".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert_eq!("".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert!("-5px".parse::<Dimension>().is_err());
        assert!("wide".parse::<Dimension>().is_err());
    }

    #[test]
    fn dimension_serializes_as_css() {
        assert_eq!(Dimension::Px(200.0).to_string(), "200px");
        assert_eq!(Dimension::Px(62.5).to_string(), "62.5px");
        assert_eq!(serde_json::to_value(Dimension::Auto).unwrap(), json!("auto"));
    }

    #[test]
    fn dimension_accepts_numbers() {
        let d: Dimension = serde_json::from_value(json!(120)).unwrap();
        assert_eq!(d, Dimension::Px(120.0));
    }

    #[test]
    fn text_element_wire_shape() {
        let element = Element {
            id: "e1".into(),
            x: 50.0,
            y: 50.0,
            z_index: 1,
            width: Dimension::Px(200.0),
            height: Dimension::Auto,
            kind: ElementKind::Text {
                content: "Double click to edit".into(),
                style: TextStyle::default(),
            },
        };

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["zIndex"], 1);
        assert_eq!(value["width"], "200px");
        assert_eq!(value["height"], "auto");
        assert_eq!(value["fontFamily"], "Merriweather");
        assert_eq!(value["fontWeight"], "normal");
        assert_eq!(value["textDecoration"], "none");

        let back: Element = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn parses_loose_legacy_payload() {
        let value = json!({
            "_id": "1700000000000",
            "type": "shape",
            "x": 10,
            "y": 20,
            "width": "150px",
            "height": "150px",
            "color": "#ff0000",
            "shape": "circle"
        });
        let element: Element = serde_json::from_value(value).unwrap();
        assert_eq!(element.id, "1700000000000");
        assert_eq!(element.z_index, MIN_Z_INDEX);
        assert_eq!(
            element.kind,
            ElementKind::Shape {
                color: "#ff0000".into(),
                shape: ShapeKind::Circle
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let value = json!({"id": "x", "type": "video", "x": 0, "y": 0});
        assert!(serde_json::from_value::<Element>(value).is_err());
    }

    #[test]
    fn element_type_from_str() {
        assert_eq!("GIF".parse::<ElementType>().unwrap(), ElementType::Gif);
        assert!("video".parse::<ElementType>().is_err());
        assert!(ElementType::Image.needs_file());
        assert!(!ElementType::Sticker.needs_file());
    }

    #[test]
    fn spotify_links_become_embeds() {
        assert_eq!(
            spotify_embed_url("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc"),
            "https://open.spotify.com/embed/track/4uLU6hMCjMI75M1A2tKUQC"
        );
        assert_eq!(
            spotify_embed_url("https://open.spotify.com/embed/playlist/37i9"),
            "https://open.spotify.com/embed/playlist/37i9"
        );
        assert_eq!(spotify_embed_url("Inspiring Track"), "Inspiring Track");
        assert!(is_spotify_embed("https://open.spotify.com/embed/track/x"));
        assert!(!is_spotify_embed("Inspiring Track"));
    }
}
