//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::store::Counts;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub counts: Counts,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let counts = state.store.counts().await?;
    Ok(Json(HealthResponse {
        status: "OK",
        message: "Hope Project Backend",
        version: env!("CARGO_PKG_VERSION"),
        counts,
    }))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_seeded_counts() {
        let state = Arc::new(AppState::in_memory());
        let Json(body) = health(State(state)).await.unwrap();
        assert_eq!(body.status, "OK");
        assert_eq!(body.message, "Hope Project Backend");
        assert_eq!(body.counts.letters, 1);
        assert_eq!(body.counts.resources, 1);
        assert_eq!(body.counts.boards, 0);
    }
}
