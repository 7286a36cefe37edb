//! Pointer interaction state and geometry
//!
//! Only one interaction is active at a time: the caller owns a single
//! `Interaction` value and threads it through pointer-down/move/up.

use serde::{Deserialize, Serialize};

/// Smallest width or height a resize can produce
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

/// Canvas-relative pointer position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visible canvas area elements are confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// What the pointer went down on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// The element itself
    Body(String),
    /// The resize handle in the element's corner
    ResizeHandle(String),
    /// The forward/backward/delete buttons; never starts a drag
    Controls(String),
    /// Empty canvas
    Canvas,
}

/// Current pointer interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        element_id: String,
        /// Pointer position within the element at pointer-down
        offset: Point,
    },
    Resizing {
        element_id: String,
        start_pointer: Point,
        start_size: Size,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn element_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { element_id, .. } | Self::Resizing { element_id, .. } => {
                Some(element_id)
            }
        }
    }
}

/// Top-left position for a drag step, keeping the element inside the canvas.
///
/// An element larger than the canvas is pinned to the origin on that axis.
pub fn drag_position(pointer: Point, offset: Point, size: Size, canvas: Canvas) -> Point {
    let max_x = (canvas.width - size.width).max(0.0);
    let max_y = (canvas.height - size.height).max(0.0);
    Point {
        x: (pointer.x - offset.x).clamp(0.0, max_x),
        y: (pointer.y - offset.y).clamp(0.0, max_y),
    }
}

/// Size for a resize step: start size plus pointer delta, floored at 50.
pub fn resized(start_size: Size, start_pointer: Point, pointer: Point) -> Size {
    Size {
        width: (start_size.width + pointer.x - start_pointer.x).max(MIN_ELEMENT_SIZE),
        height: (start_size.height + pointer.y - start_pointer.y).max(MIN_ELEMENT_SIZE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_follows_pointer_minus_offset() {
        let p = drag_position(
            Point::new(300.0, 200.0),
            Point::new(20.0, 10.0),
            Size::new(100.0, 100.0),
            Canvas::new(800.0, 600.0),
        );
        assert_eq!(p, Point::new(280.0, 190.0));
    }

    #[test]
    fn drag_clamps_to_canvas() {
        let canvas = Canvas::new(800.0, 600.0);
        let size = Size::new(200.0, 100.0);

        let p = drag_position(Point::new(-50.0, -50.0), Point::default(), size, canvas);
        assert_eq!(p, Point::new(0.0, 0.0));

        let p = drag_position(Point::new(5000.0, 5000.0), Point::default(), size, canvas);
        assert_eq!(p, Point::new(600.0, 500.0));
    }

    #[test]
    fn drag_oversized_element_pins_to_origin() {
        let p = drag_position(
            Point::new(100.0, 100.0),
            Point::default(),
            Size::new(1000.0, 50.0),
            Canvas::new(800.0, 600.0),
        );
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn resize_adds_delta() {
        let s = resized(
            Size::new(200.0, 200.0),
            Point::new(10.0, 10.0),
            Point::new(60.0, 35.0),
        );
        assert_eq!(s, Size::new(250.0, 225.0));
    }

    #[test]
    fn resize_floors_at_minimum() {
        let s = resized(
            Size::new(200.0, 200.0),
            Point::new(300.0, 300.0),
            Point::new(0.0, 290.0),
        );
        assert_eq!(s, Size::new(MIN_ELEMENT_SIZE, 190.0));
    }

    #[test]
    fn interaction_element_id() {
        assert_eq!(Interaction::Idle.element_id(), None);
        let dragging = Interaction::Dragging {
            element_id: "a".into(),
            offset: Point::default(),
        };
        assert_eq!(dragging.element_id(), Some("a"));
        assert!(!dragging.is_idle());
    }
}
