//! hopeboard-core: domain models and the board editor model
//!
//! Shared by the HTTP server, the API client and the CLI:
//! - `models`: users, boards and their elements, letters, resources
//! - `editor`: the headless moodboard editor (element list, drag/resize,
//!   z-order, text styling, render tree, save payload)
//! - `config`: the `~/.hopeboard/config.toml` file shared by server and client

pub mod config;
pub mod editor;
pub mod error;
pub mod models;

pub use config::{HopeConfig, StorageKind};
pub use editor::{
    AddOutcome, BoardEditor, Canvas, Interaction, Point, PointerTarget, RenderTree, StyleCommand,
};
pub use error::{HopeError, Result};
pub use models::{
    Board, BoardUpdate, Dimension, Element, ElementKind, ElementType, Letter, Resource, User,
    ValidationError, Visibility,
};
