//! In-memory store
//!
//! One `RwLock` over all collections. Data lives as long as the process.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use hopeboard_core::models::{LetterFilter, ResourceTag};
use hopeboard_core::{Board, Letter, Resource, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{seed_records, Counts, Store, StoreError, StoreResult};
use crate::auth::Session;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    boards: Vec<Board>,
    letters: Vec<Letter>,
    resources: Vec<Resource>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the welcome letter and resource
    pub fn seeded() -> Self {
        let (letter, resource) = seed_records(Utc::now());
        Self {
            inner: RwLock::new(Collections {
                letters: vec![letter],
                resources: vec![resource],
                ..Default::default()
            }),
        }
    }
}

/// Newest first; among equal keys the later insert wins.
fn newest_first<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by_key(|item| Reverse(key(item)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_name(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        inner.users.push(user);
        Ok(())
    }

    async fn insert_session(&self, session: Session) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        inner.sessions.retain(|_, s| !s.is_expired(now));
        inner.sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.sessions.remove(token_hash).is_some())
    }

    async fn insert_board(&self, board: Board) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.boards.iter().any(|b| b.share_token == board.share_token) {
            return Err(StoreError::Conflict("share token already in use".into()));
        }
        inner.boards.push(board);
        Ok(())
    }

    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        let inner = self.inner.read().await;
        Ok(inner.boards.iter().find(|b| b.id == id).cloned())
    }

    async fn board_by_share_token(&self, token: &str) -> StoreResult<Option<Board>> {
        let inner = self.inner.read().await;
        Ok(inner.boards.iter().find(|b| b.share_token == token).cloned())
    }

    async fn public_boards(&self) -> StoreResult<Vec<Board>> {
        let inner = self.inner.read().await;
        let public: Vec<Board> = inner.boards.iter().filter(|b| b.is_public()).cloned().collect();
        Ok(newest_first(&public, |b| b.updated_at))
    }

    async fn boards_for_owner(&self, owner: Uuid) -> StoreResult<Vec<Board>> {
        let inner = self.inner.read().await;
        let owned: Vec<Board> = inner
            .boards
            .iter()
            .filter(|b| b.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(newest_first(&owned, |b| b.updated_at))
    }

    async fn replace_board(&self, board: &Board) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .boards
            .iter_mut()
            .find(|b| b.id == board.id)
            .ok_or_else(|| StoreError::NotFound {
                resource: "board",
                id: board.id.to_string(),
            })?;
        *slot = board.clone();
        Ok(())
    }

    async fn insert_letter(&self, letter: Letter) -> StoreResult<()> {
        self.inner.write().await.letters.push(letter);
        Ok(())
    }

    async fn list_letters(&self, filter: &LetterFilter) -> StoreResult<Vec<Letter>> {
        let inner = self.inner.read().await;
        let matching: Vec<Letter> = inner
            .letters
            .iter()
            .filter(|l| l.matches(filter))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |l| l.created_at))
    }

    async fn like_letter(&self, id: Uuid) -> StoreResult<Option<usize>> {
        let mut inner = self.inner.write().await;
        Ok(inner.letters.iter_mut().find(|l| l.id == id).map(Letter::like))
    }

    async fn insert_resource(&self, resource: Resource) -> StoreResult<()> {
        self.inner.write().await.resources.push(resource);
        Ok(())
    }

    async fn list_resources(&self, tag: Option<ResourceTag>) -> StoreResult<Vec<Resource>> {
        let inner = self.inner.read().await;
        let matching: Vec<Resource> = inner
            .resources
            .iter()
            .filter(|r| r.has_tag(tag))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |r| r.created_at))
    }

    async fn counts(&self) -> StoreResult<Counts> {
        let inner = self.inner.read().await;
        Ok(Counts {
            letters: inner.letters.len() as u64,
            resources: inner.resources.len() as u64,
            boards: inner.boards.len() as u64,
            users: inner.users.len() as u64,
        })
    }
}
