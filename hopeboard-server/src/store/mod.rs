//! Storage behind the HTTP layer
//!
//! Handlers talk to `dyn Store`: `MemoryStore` for tests and local runs,
//! `PgStore` for production. Both are seeded with one welcome letter and
//! one resource.

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hopeboard_core::models::letter::DEFAULT_LETTER_COLOR;
use hopeboard_core::models::{LetterCategory, LetterFilter, ResourceTag};
use hopeboard_core::{Board, Letter, Resource, User};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Session;

pub use memory::MemoryStore;
pub use pool::create_pool;
pub use postgres::PgStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt {resource} row: {reason}")]
    Corrupt {
        resource: &'static str,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record counts reported by `/health`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub letters: u64,
    pub resources: u64,
    pub boards: u64,
    pub users: u64,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_name(&self, username: &str) -> StoreResult<Option<User>>;
    /// `Conflict` when the username is taken
    async fn insert_user(&self, user: User) -> StoreResult<()>;

    async fn insert_session(&self, session: Session) -> StoreResult<()>;
    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>>;
    /// Returns whether a session was removed
    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool>;

    async fn insert_board(&self, board: Board) -> StoreResult<()>;
    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>>;
    async fn board_by_share_token(&self, token: &str) -> StoreResult<Option<Board>>;
    /// Public boards, most recently updated first
    async fn public_boards(&self) -> StoreResult<Vec<Board>>;
    /// Boards owned by `owner`, most recently updated first
    async fn boards_for_owner(&self, owner: Uuid) -> StoreResult<Vec<Board>>;
    /// Overwrite a stored board; `NotFound` if it does not exist
    async fn replace_board(&self, board: &Board) -> StoreResult<()>;

    async fn insert_letter(&self, letter: Letter) -> StoreResult<()>;
    /// Matching letters, newest first
    async fn list_letters(&self, filter: &LetterFilter) -> StoreResult<Vec<Letter>>;
    /// Add one like; `None` when the letter does not exist
    async fn like_letter(&self, id: Uuid) -> StoreResult<Option<usize>>;

    async fn insert_resource(&self, resource: Resource) -> StoreResult<()>;
    /// Resources carrying `tag` (all when `None`), newest first
    async fn list_resources(&self, tag: Option<ResourceTag>) -> StoreResult<Vec<Resource>>;

    async fn counts(&self) -> StoreResult<Counts>;
}

/// The letter and resource every fresh store starts with
pub fn seed_records(now: DateTime<Utc>) -> (Letter, Resource) {
    let letter = Letter {
        id: Uuid::new_v4(),
        recipient: "Anyone feeling alone".into(),
        category: Some(LetterCategory::Hope),
        color: DEFAULT_LETTER_COLOR.into(),
        message: "You are not alone in how you're feeling. Tomorrow is a new day.".into(),
        likes: Vec::new(),
        created_at: now,
    };
    let resource = Resource {
        id: Uuid::new_v4(),
        title: "Mindful Breathing".into(),
        description: "Simple breathing techniques to reduce stress".into(),
        content: "Breathe in for 4 seconds, hold for 2, exhale for 6. Repeat 5-10 times.".into(),
        tags: vec![ResourceTag::Stress, ResourceTag::SelfCare],
        icon: "🧘".into(),
        added_by: None,
        created_at: now,
    };
    (letter, resource)
}
