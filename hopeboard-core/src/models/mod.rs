//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod board;
pub mod element;
pub mod letter;
pub mod resource;
pub mod user;
pub mod validation;

pub use board::{generate_share_token, validate_color, Board, BoardTitle, BoardUpdate, Visibility};
pub use element::{
    is_spotify_embed, spotify_embed_url, Dimension, Element, ElementKind, ElementType,
    FontStyle, FontWeight, ShapeKind, TextAlign, TextDecoration, TextStyle, MIN_Z_INDEX,
};
pub use letter::{Letter, LetterCategory, LetterFilter, LetterView, NewLetter};
pub use resource::{NewResource, Resource, ResourceTag};
pub use user::{User, UserView, Username};
pub use validation::ValidationError;
