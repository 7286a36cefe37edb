//! Text styling toolbar
//!
//! Each command sets exactly one property. Toggles read the current value
//! before flipping it, so applying the same toggle twice is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{
    validate_color, FontStyle, FontWeight, TextAlign, TextDecoration, TextStyle, ValidationError,
};

/// Font families offered by the toolbar, in menu order
pub const FONT_FAMILIES: &[&str] = &["Merriweather", "Arial", "Georgia", "Courier New", "Verdana"];

const MAX_FONT_SIZE: u32 = 400;

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\((\d+),\s*(\d+),\s*(\d+)\)$").expect("invalid rgb regex")
});

/// One toolbar action
#[derive(Debug, Clone, PartialEq)]
pub enum StyleCommand {
    FontFamily(String),
    FontSize(u32),
    Color(String),
    BackgroundColor(String),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    Align(TextAlign),
}

/// Apply `command` to `style`. On error the style is untouched.
pub fn apply(style: &mut TextStyle, command: StyleCommand) -> Result<(), ValidationError> {
    match command {
        StyleCommand::FontFamily(family) => {
            let family = family.trim();
            if family.is_empty() {
                return Err(ValidationError::Empty { field: "fontFamily" });
            }
            style.font_family = family.to_owned();
        }
        StyleCommand::FontSize(size) => {
            if size == 0 || size > MAX_FONT_SIZE {
                return Err(ValidationError::InvalidFormat {
                    field: "fontSize",
                    reason: "must be between 1 and 400",
                });
            }
            style.font_size = size;
        }
        StyleCommand::Color(color) => style.color = validate_color(&color, "color")?,
        StyleCommand::BackgroundColor(color) => {
            style.background_color = validate_color(&color, "backgroundColor")?
        }
        StyleCommand::ToggleBold => {
            style.font_weight = match style.font_weight {
                FontWeight::Bold => FontWeight::Normal,
                FontWeight::Normal => FontWeight::Bold,
            }
        }
        StyleCommand::ToggleItalic => {
            style.font_style = match style.font_style {
                FontStyle::Italic => FontStyle::Normal,
                FontStyle::Normal => FontStyle::Italic,
            }
        }
        StyleCommand::ToggleUnderline => {
            style.text_decoration = match style.text_decoration {
                TextDecoration::Underline => TextDecoration::None,
                TextDecoration::None => TextDecoration::Underline,
            }
        }
        StyleCommand::Align(align) => style.text_align = align,
    }
    Ok(())
}

/// Toolbar controls as they should appear for the selected text element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub font_family: &'static str,
    pub font_size: u32,
    pub color: String,
    pub background_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
}

impl ToolbarState {
    pub fn from_style(style: &TextStyle) -> Self {
        Self {
            font_family: menu_font_family(&style.font_family),
            font_size: style.font_size,
            color: to_hex(&style.color, "#000000"),
            background_color: to_hex(&style.background_color, "#ffffff"),
            bold: style.font_weight == FontWeight::Bold,
            italic: style.font_style == FontStyle::Italic,
            underline: style.text_decoration == TextDecoration::Underline,
            align: style.text_align,
        }
    }
}

/// Map a CSS font-family value onto the menu entry it contains.
pub fn menu_font_family(family: &str) -> &'static str {
    FONT_FAMILIES
        .iter()
        .copied()
        .find(|f| {
            let key = f.split_whitespace().next().unwrap_or(f);
            family.contains(key)
        })
        .unwrap_or(FONT_FAMILIES[0])
}

/// Normalize a color for a color picker: hex passes through, `rgb(r, g, b)`
/// is converted, anything else falls back to `fallback`.
pub fn to_hex(color: &str, fallback: &str) -> String {
    let color = color.trim();
    if color.starts_with('#') {
        return color.to_owned();
    }
    let Some(caps) = RGB_RE.captures(color) else {
        return fallback.to_owned();
    };
    let channel = |i: usize| caps[i].parse::<u32>().unwrap_or(0).min(255);
    format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_are_involutions() {
        let original = TextStyle::default();
        for cmd in [
            StyleCommand::ToggleBold,
            StyleCommand::ToggleItalic,
            StyleCommand::ToggleUnderline,
        ] {
            let mut style = original.clone();
            apply(&mut style, cmd.clone()).unwrap();
            assert_ne!(style, original);
            apply(&mut style, cmd).unwrap();
            assert_eq!(style, original);
        }
    }

    #[test]
    fn each_command_sets_one_property() {
        let mut style = TextStyle::default();
        apply(&mut style, StyleCommand::FontFamily("Georgia".into())).unwrap();
        apply(&mut style, StyleCommand::FontSize(24)).unwrap();
        apply(&mut style, StyleCommand::Color("#333333".into())).unwrap();
        apply(&mut style, StyleCommand::Align(TextAlign::Center)).unwrap();

        assert_eq!(style.font_family, "Georgia");
        assert_eq!(style.font_size, 24);
        assert_eq!(style.color, "#333333");
        assert_eq!(style.text_align, TextAlign::Center);
        assert_eq!(style.background_color, TextStyle::default().background_color);
    }

    #[test]
    fn invalid_values_leave_style_untouched() {
        let mut style = TextStyle::default();
        assert!(apply(&mut style, StyleCommand::FontSize(0)).is_err());
        assert!(apply(&mut style, StyleCommand::Color("not a color!".into())).is_err());
        assert!(apply(&mut style, StyleCommand::FontFamily("  ".into())).is_err());
        assert_eq!(style, TextStyle::default());
    }

    #[test]
    fn toolbar_reflects_style() {
        let mut style = TextStyle::default();
        apply(&mut style, StyleCommand::ToggleBold).unwrap();
        apply(&mut style, StyleCommand::Color("rgb(85, 85, 85)".into())).unwrap();
        style.font_family = "\"Courier New\", monospace".into();

        let state = ToolbarState::from_style(&style);
        assert!(state.bold);
        assert!(!state.italic);
        assert_eq!(state.color, "#555555");
        assert_eq!(state.font_family, "Courier New");
    }

    #[test]
    fn hex_conversion() {
        assert_eq!(to_hex("#abc", "#fff"), "#abc");
        assert_eq!(to_hex("rgb(255, 0, 16)", "#fff"), "#ff0010");
        assert_eq!(to_hex("transparent", "#ffffff"), "#ffffff");
    }

    #[test]
    fn unknown_family_falls_back() {
        assert_eq!(menu_font_family("Comic Sans MS"), "Merriweather");
        assert_eq!(menu_font_family("Verdana, sans-serif"), "Verdana");
    }
}
