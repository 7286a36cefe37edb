//! Letter endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use hopeboard_core::models::{LetterCategory, LetterFilter, LetterView, NewLetter};
use hopeboard_core::Letter;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidUuid};
use crate::http::server::AppState;

/// Query params for `GET /api/letters`
#[derive(Deserialize, Default)]
pub struct LetterQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl LetterQuery {
    fn into_filter(self) -> Result<LetterFilter, ApiError> {
        Ok(LetterFilter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            category: LetterCategory::parse_optional(self.category.as_deref())?,
        })
    }
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub likes: usize,
}

/// GET /api/letters
async fn list_letters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LetterQuery>,
) -> Result<Json<Vec<LetterView>>, ApiError> {
    let filter = query.into_filter()?;
    let letters = state.store.list_letters(&filter).await?;
    Ok(Json(letters.iter().map(Letter::view).collect()))
}

/// POST /api/letters
async fn create_letter(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<NewLetter>,
) -> Result<(StatusCode, Json<LetterView>), ApiError> {
    let letter = Letter::create(input, Utc::now())?;
    let view = letter.view();
    state.store.insert_letter(letter).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /api/letters/{id}/like
async fn like_letter(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<LikeResponse>, ApiError> {
    let likes = state
        .store
        .like_letter(id)
        .await?
        .ok_or_else(|| ApiError::not_found("letter", id))?;
    Ok(Json(LikeResponse { likes }))
}

/// Letter routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/letters", get(list_letters).post(create_letter))
        .route("/api/letters/{id}/like", post(like_letter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_means_no_filter() {
        let filter = LetterQuery {
            search: Some("  ".into()),
            category: Some(String::new()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, LetterFilter::default());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = LetterQuery {
            search: None,
            category: Some("gossip".into()),
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
