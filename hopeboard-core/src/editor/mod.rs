//! Headless board editor
//!
//! `BoardEditor` owns the authoritative element list of one open board. A UI
//! shell feeds it pointer and form events and paints the tree returned by
//! [`BoardEditor::render`]; nothing is ever read back from the painted
//! output. Saving serializes the list itself.
//!
//! Pointer interaction state is a single [`Interaction`] value owned by the
//! caller, so at most one drag or resize is in flight.

mod interaction;
pub mod render;
pub mod style;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::seq::SliceRandom;
use tracing::debug;
use uuid::Uuid;

use crate::error::{HopeError, Result};
use crate::models::{
    spotify_embed_url, validate_color, Board, BoardTitle, BoardUpdate, Dimension, Element,
    ElementKind, ElementType, ShapeKind, TextStyle, ValidationError, Visibility, MIN_Z_INDEX,
};

pub use interaction::{
    drag_position, resized, Canvas, Interaction, Point, PointerTarget, Size, MIN_ELEMENT_SIZE,
};
pub use render::{render, NodeContent, RenderNode, RenderTree};
pub use style::{StyleCommand, ToolbarState, FONT_FAMILIES};

pub const WELCOME_TEXT: &str = "Welcome to your board! Start adding elements.";
pub const DEFAULT_TEXT: &str = "Double click to edit";
pub const DEFAULT_MUSIC_LABEL: &str = "Inspiring Track";
pub const STICKERS: &[&str] = &["⭐", "❤️", "🌸", "✨", "😊", "🌈"];

/// Where new elements appear
const SPAWN: Point = Point { x: 50.0, y: 50.0 };

/// Used when a dimension is `auto` and nothing better is known
const FALLBACK_BOX: f64 = 200.0;

const TEXT_LINE_HEIGHT: f64 = 1.5;
const TEXT_PADDING: f64 = 10.0;

/// Result of an add request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Element created with this id
    Added(String),
    /// Image and gif elements wait for [`BoardEditor::attach_file`]
    AwaitingFile(ElementType),
}

#[derive(Debug, Clone)]
pub struct BoardEditor {
    board: Board,
    canvas: Canvas,
    editable: bool,
    selected_text: Option<String>,
}

impl BoardEditor {
    /// Open `board` for viewing, or for editing when `editable` is set.
    pub fn open(board: Board, canvas: Canvas, editable: bool) -> Self {
        let mut editor = Self {
            board,
            canvas,
            editable,
            selected_text: None,
        };
        editor.after_load();
        editor
    }

    /// Replace the element list with the board's. An empty board opened for
    /// editing gets a welcome text element, persisted only if saved.
    pub fn load(&mut self, board: Board) {
        self.board = board;
        self.selected_text = None;
        self.after_load();
    }

    fn after_load(&mut self) {
        if self.board.elements.is_empty() && self.editable {
            self.board.elements.push(welcome_element());
        }
        debug!(
            board_id = %self.board.id,
            elements = self.board.elements.len(),
            editable = self.editable,
            "board loaded"
        );
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn elements(&self) -> &[Element] {
        &self.board.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.board.elements.iter().find(|e| e.id == id)
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Update the canvas size, e.g. after a window resize.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    // ---- adding ----

    /// Add an element of `kind` with its defaults at (50, 50).
    ///
    /// Adding text selects it. Image and gif return
    /// [`AddOutcome::AwaitingFile`] and nothing is added yet.
    pub fn add(&mut self, kind: ElementType) -> Result<AddOutcome> {
        self.ensure_editable()?;

        let (payload, width, height) = match kind {
            ElementType::Image | ElementType::Gif => return Ok(AddOutcome::AwaitingFile(kind)),
            ElementType::Text => (
                ElementKind::Text {
                    content: DEFAULT_TEXT.to_string(),
                    style: TextStyle::default(),
                },
                Dimension::Px(200.0),
                Dimension::Auto,
            ),
            ElementType::Sticker => {
                let glyph = STICKERS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(STICKERS[0]);
                (
                    ElementKind::Sticker {
                        content: glyph.to_string(),
                    },
                    Dimension::Px(200.0),
                    Dimension::Px(200.0),
                )
            }
            ElementType::Music => (
                ElementKind::Music {
                    content: DEFAULT_MUSIC_LABEL.to_string(),
                },
                Dimension::Px(300.0),
                Dimension::Px(80.0),
            ),
            ElementType::Shape => (
                ElementKind::Shape {
                    color: crate::models::element::default_shape_color(),
                    shape: ShapeKind::Rectangle,
                },
                Dimension::Px(200.0),
                Dimension::Px(200.0),
            ),
        };

        let id = self.spawn(payload, width, height);
        if kind == ElementType::Text {
            self.selected_text = Some(id.clone());
        }
        Ok(AddOutcome::Added(id))
    }

    /// Finish an image or gif add with the chosen file, stored inline as a
    /// base64 `data:` URI.
    pub fn attach_file(&mut self, kind: ElementType, mime: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_editable()?;
        if !kind.needs_file() {
            return Err(ValidationError::InvalidVariant {
                field: "file element type",
                value: kind.to_string(),
            }
            .into());
        }
        let mime = mime.trim();
        if !mime.starts_with("image/") {
            return Err(ValidationError::InvalidFormat {
                field: "file",
                reason: "must be an image",
            }
            .into());
        }

        let content = format!("data:{};base64,{}", mime, BASE64.encode(bytes));
        let payload = match kind {
            ElementType::Gif => ElementKind::Gif { content },
            _ => ElementKind::Image { content },
        };
        Ok(self.spawn(payload, Dimension::Px(200.0), Dimension::Px(200.0)))
    }

    /// Add a music element from a Spotify link or a free-text label.
    pub fn add_music(&mut self, link: &str) -> Result<String> {
        self.ensure_editable()?;
        let content = match link.trim() {
            "" => DEFAULT_MUSIC_LABEL.to_string(),
            link => spotify_embed_url(link),
        };
        Ok(self.spawn(
            ElementKind::Music { content },
            Dimension::Px(300.0),
            Dimension::Px(80.0),
        ))
    }

    fn spawn(&mut self, kind: ElementKind, width: Dimension, height: Dimension) -> String {
        let id = Uuid::new_v4().to_string();
        debug!(element_id = %id, kind = %kind.element_type(), "element added");
        self.board.elements.push(Element {
            id: id.clone(),
            x: SPAWN.x,
            y: SPAWN.y,
            z_index: MIN_Z_INDEX,
            width,
            height,
            kind,
        });
        id
    }

    // ---- pointer ----

    /// Start an interaction. Returns `Idle` for read-only boards, controls,
    /// empty canvas and unknown ids.
    pub fn pointer_down(&mut self, target: PointerTarget, pointer: Point) -> Interaction {
        if !self.editable {
            return Interaction::Idle;
        }

        match target {
            PointerTarget::Body(id) => {
                let top = self.max_z_index() + 1;
                let Some(element) = self.board.elements.iter_mut().find(|e| e.id == id) else {
                    return Interaction::Idle;
                };
                element.z_index = top;
                let offset = Point::new(pointer.x - element.x, pointer.y - element.y);
                if element.element_type() == ElementType::Text {
                    self.selected_text = Some(id.clone());
                }
                Interaction::Dragging {
                    element_id: id,
                    offset,
                }
            }
            PointerTarget::ResizeHandle(id) => match self.element(&id) {
                Some(element) => Interaction::Resizing {
                    start_size: box_size(element),
                    element_id: id,
                    start_pointer: pointer,
                },
                None => Interaction::Idle,
            },
            PointerTarget::Controls(_) | PointerTarget::Canvas => Interaction::Idle,
        }
    }

    /// Apply a pointer move to the element under interaction.
    pub fn pointer_move(&mut self, interaction: &Interaction, pointer: Point) {
        let canvas = self.canvas;
        match interaction {
            Interaction::Idle => {}
            Interaction::Dragging { element_id, offset } => {
                if let Some(element) = self.find_mut(element_id) {
                    let at = drag_position(pointer, *offset, box_size(element), canvas);
                    element.x = at.x;
                    element.y = at.y;
                }
            }
            Interaction::Resizing {
                element_id,
                start_pointer,
                start_size,
            } => {
                if let Some(element) = self.find_mut(element_id) {
                    let size = resized(*start_size, *start_pointer, pointer);
                    element.width = Dimension::Px(size.width);
                    element.height = Dimension::Px(size.height);
                }
            }
        }
    }

    /// End the interaction. Moves were already applied to the list.
    pub fn pointer_up(&mut self, interaction: Interaction) -> Interaction {
        if let Some(id) = interaction.element_id() {
            debug!(element_id = %id, "interaction finished");
        }
        Interaction::Idle
    }

    // ---- ordering and removal ----

    pub fn bring_forward(&mut self, id: &str) -> Result<u32> {
        self.ensure_editable()?;
        let element = self.require_mut(id)?;
        element.z_index = element.z_index.saturating_add(1);
        Ok(element.z_index)
    }

    /// Lower the element one level, never below 1.
    pub fn send_backward(&mut self, id: &str) -> Result<u32> {
        self.ensure_editable()?;
        let element = self.require_mut(id)?;
        element.z_index = element.z_index.saturating_sub(1).max(MIN_Z_INDEX);
        Ok(element.z_index)
    }

    pub fn delete(&mut self, id: &str) -> Result<Element> {
        self.ensure_editable()?;
        let index = self
            .board
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| HopeError::element_not_found(id))?;
        if self.selected_text.as_deref() == Some(id) {
            self.selected_text = None;
        }
        debug!(element_id = %id, "element deleted");
        Ok(self.board.elements.remove(index))
    }

    // ---- text ----

    /// Select a text element for styling and return its toolbar state.
    pub fn select_text(&mut self, id: &str) -> Result<ToolbarState> {
        let element = self
            .element(id)
            .ok_or_else(|| HopeError::element_not_found(id))?;
        let style = element.text_style().ok_or(HopeError::NoTextSelected)?;
        let state = ToolbarState::from_style(style);
        self.selected_text = Some(id.to_owned());
        Ok(state)
    }

    pub fn clear_selection(&mut self) {
        self.selected_text = None;
    }

    /// Toolbar state for the current selection
    pub fn toolbar(&self) -> Option<ToolbarState> {
        let id = self.selected_text.as_deref()?;
        self.element(id)
            .and_then(Element::text_style)
            .map(ToolbarState::from_style)
    }

    /// Apply one toolbar command to the selected text element.
    pub fn apply_style(&mut self, command: StyleCommand) -> Result<ToolbarState> {
        self.ensure_editable()?;
        let id = self.selected_text.clone().ok_or(HopeError::NoTextSelected)?;
        let element = self.require_mut(&id)?;
        let text = element.text_style_mut().ok_or(HopeError::NoTextSelected)?;
        style::apply(text, command)?;
        Ok(ToolbarState::from_style(text))
    }

    /// Replace the content of a text element after in-place editing.
    pub fn set_text_content(&mut self, id: &str, text: &str) -> Result<()> {
        self.ensure_editable()?;
        match &mut self.require_mut(id)?.kind {
            ElementKind::Text { content, .. } => {
                *content = text.to_owned();
                Ok(())
            }
            _ => Err(HopeError::NoTextSelected),
        }
    }

    // ---- board settings ----

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.ensure_editable()?;
        self.board.title = BoardTitle::new(title)?.into_string();
        Ok(())
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> Result<()> {
        self.ensure_editable()?;
        self.board.visibility = visibility;
        Ok(())
    }

    pub fn set_background(&mut self, color: &str) -> Result<()> {
        self.ensure_editable()?;
        self.board.background_color = validate_color(color, "backgroundColor")?;
        Ok(())
    }

    /// Share link for a public board: `<origin>?share=<token>`, falling back
    /// to the board id when no token was minted.
    pub fn share_link(&self, origin: &str) -> Option<String> {
        if !self.board.is_public() {
            return None;
        }
        let key = if self.board.share_token.is_empty() {
            self.board.id.to_string()
        } else {
            self.board.share_token.clone()
        };
        Some(format!("{}?share={}", origin.trim_end_matches('?'), key))
    }

    // ---- output ----

    pub fn render(&self) -> RenderTree {
        render(
            &self.board.elements,
            &self.board.background_color,
            self.editable,
            self.selected_text.as_deref(),
        )
    }

    /// Replace request carrying the board settings and the full element list.
    pub fn save_request(&self) -> BoardUpdate {
        BoardUpdate {
            title: Some(self.board.title.clone()),
            visibility: Some(self.board.visibility),
            background_color: Some(self.board.background_color.clone()),
            elements: Some(self.board.elements.clone()),
        }
    }

    // ---- helpers ----

    fn ensure_editable(&self) -> Result<()> {
        if self.editable {
            Ok(())
        } else {
            Err(HopeError::ReadOnly)
        }
    }

    fn max_z_index(&self) -> u32 {
        self.board
            .elements
            .iter()
            .map(|e| e.z_index)
            .max()
            .unwrap_or(0)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.board.elements.iter_mut().find(|e| e.id == id)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.find_mut(id)
            .ok_or_else(|| HopeError::element_not_found(id))
    }
}

fn welcome_element() -> Element {
    Element {
        id: Uuid::new_v4().to_string(),
        x: SPAWN.x,
        y: SPAWN.y,
        z_index: MIN_Z_INDEX,
        width: Dimension::Px(300.0),
        height: Dimension::Auto,
        kind: ElementKind::Text {
            content: WELCOME_TEXT.to_string(),
            style: TextStyle {
                font_size: 20,
                color: "#555".to_string(),
                ..TextStyle::default()
            },
        },
    }
}

/// On-canvas size of an element, estimating `auto` dimensions.
fn box_size(element: &Element) -> Size {
    let intrinsic_height = match &element.kind {
        ElementKind::Text { content, style } => {
            let lines = content.lines().count().max(1) as f64;
            lines * f64::from(style.font_size) * TEXT_LINE_HEIGHT + 2.0 * TEXT_PADDING
        }
        _ => FALLBACK_BOX,
    };
    Size::new(
        element.width.resolve(FALLBACK_BOX),
        element.height.resolve(intrinsic_height),
    )
}
