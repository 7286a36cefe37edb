//! Render tree derivation
//!
//! `render` is a pure function of the element list: calling it twice on the
//! same list yields equal trees, and it never reads anything back from a
//! previous render.

use serde::Serialize;

use crate::models::{is_spotify_embed, Dimension, Element, ElementKind, ElementType, ShapeKind};

/// Shown for image and gif elements that have no content yet
pub const IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/200";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTree {
    pub background_color: String,
    /// One node per element, back to front
    pub nodes: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub element_type: ElementType,
    pub left: f64,
    pub top: f64,
    pub width: Dimension,
    pub height: Dimension,
    pub z_index: u32,
    /// CSS declarations beyond position and size, in a fixed order
    pub style: Vec<(&'static str, String)>,
    pub content: NodeContent,
    /// Forward/backward/delete buttons and resize handle
    pub controls: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeContent {
    Text { text: String, editable: bool },
    Image { src: String },
    Sticker { glyph: String },
    SpotifyEmbed { src: String },
    MusicLabel { label: String },
    Shape { fill: String, border_radius: &'static str },
}

pub fn render(
    elements: &[Element],
    background_color: &str,
    editable: bool,
    selected: Option<&str>,
) -> RenderTree {
    // Stable sort keeps insertion order among equal z-indexes.
    let mut order: Vec<&Element> = elements.iter().collect();
    order.sort_by_key(|e| e.z_index);

    RenderTree {
        background_color: background_color.to_owned(),
        nodes: order
            .into_iter()
            .map(|e| render_node(e, editable, selected == Some(e.id.as_str())))
            .collect(),
    }
}

fn render_node(element: &Element, editable: bool, selected: bool) -> RenderNode {
    let mut style = Vec::new();
    let content = match &element.kind {
        ElementKind::Text { content, style: text } => {
            style.push(("font-family", text.font_family.clone()));
            style.push(("font-size", format!("{}px", text.font_size)));
            style.push(("color", text.color.clone()));
            style.push(("background-color", text.background_color.clone()));
            style.push(("font-weight", text.font_weight.as_str().to_owned()));
            style.push(("font-style", text.font_style.as_str().to_owned()));
            style.push(("text-decoration", text.text_decoration.as_str().to_owned()));
            style.push(("text-align", text.text_align.as_str().to_owned()));
            NodeContent::Text {
                text: content.clone(),
                editable,
            }
        }
        ElementKind::Image { content } | ElementKind::Gif { content } => NodeContent::Image {
            src: if content.is_empty() {
                IMAGE_PLACEHOLDER.to_owned()
            } else {
                content.clone()
            },
        },
        ElementKind::Sticker { content } => NodeContent::Sticker {
            glyph: content.clone(),
        },
        ElementKind::Music { content } if is_spotify_embed(content) => NodeContent::SpotifyEmbed {
            src: content.clone(),
        },
        ElementKind::Music { content } => NodeContent::MusicLabel {
            label: content.clone(),
        },
        ElementKind::Shape { color, shape } => {
            let border_radius = match shape {
                ShapeKind::Circle => "50%",
                ShapeKind::Rectangle => "0",
            };
            style.push(("background-color", color.clone()));
            style.push(("border-radius", border_radius.to_owned()));
            NodeContent::Shape {
                fill: color.clone(),
                border_radius,
            }
        }
    };

    RenderNode {
        id: element.id.clone(),
        element_type: element.element_type(),
        left: element.x,
        top: element.y,
        width: element.width,
        height: element.height,
        z_index: element.z_index,
        style,
        content,
        controls: editable,
        selected,
    }
}
