//! Board endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use hopeboard_core::models::BoardTitle;
use hopeboard_core::{Board, BoardUpdate};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, AuthUser, MaybeAuthUser, ValidUuid};
use crate::http::server::AppState;

/// Create board request; the title falls back to "New Board"
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateBoardRequest {
    pub title: Option<String>,
}

/// GET /api/boards/public - public boards, newest update first
async fn public_boards(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Board>>, ApiError> {
    Ok(Json(state.store.public_boards().await?))
}

/// GET /api/boards/user - the caller's boards; empty without a token
async fn user_boards(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> Result<Json<Vec<Board>>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store.boards_for_owner(user.id).await?))
}

/// POST /api/boards
async fn create_board(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let req: CreateBoardRequest = if body.is_empty() {
        CreateBoardRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
            message: format!("invalid board request: {}", e),
        })?
    };
    let title = BoardTitle::or_default(req.title.as_deref())?;
    let board = Board::new(title, auth.user.id, Utc::now());
    state.store.insert_board(board.clone()).await?;

    tracing::info!(board_id = %board.id, owner = %auth.user.id, "created board");
    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /api/boards/{id}
async fn get_board(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .store
        .get_board(id)
        .await?
        .ok_or_else(|| ApiError::not_found("board", id))?;
    Ok(Json(board))
}

/// GET /api/boards/share/{token} - public boards only
async fn shared_board(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<Board>, ApiError> {
    state
        .store
        .board_by_share_token(&token)
        .await?
        .filter(Board::is_public)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("shared board", &token))
}

/// PUT /api/boards/{id} - owner replaces title, visibility, background, elements
async fn replace_board(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ApiJson(update): ApiJson<BoardUpdate>,
) -> Result<Json<Board>, ApiError> {
    let mut board = state
        .store
        .get_board(id)
        .await?
        .ok_or_else(|| ApiError::not_found("board", id))?;

    if !board.is_owned_by(auth.user.id) {
        tracing::warn!(board_id = %id, user_id = %auth.user.id, "rejected update from non-owner");
        return Err(ApiError::Forbidden {
            reason: "only the board owner can update it".into(),
        });
    }

    board.apply(update, Utc::now())?;
    state.store.replace_board(&board).await?;

    tracing::debug!(board_id = %id, elements = board.elements.len(), "saved board");
    Ok(Json(board))
}

/// Board routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/boards", post(create_board))
        .route("/api/boards/public", get(public_boards))
        .route("/api/boards/user", get(user_boards))
        .route("/api/boards/share/{token}", get(shared_board))
        .route("/api/boards/{id}", get(get_board).put(replace_board))
}
