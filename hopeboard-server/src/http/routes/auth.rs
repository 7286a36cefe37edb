//! Login, session lookup and logout
//!
//! The first login for a username creates the account; later logins must
//! present the same password. Each login issues a new bearer token.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use hopeboard_core::models::{UserView, Username};
use hopeboard_core::{User, ValidationError};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password, AuthError, Session};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, AuthUser};
use crate::http::server::AppState;
use crate::store::StoreError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Kept only when this login creates the account
    #[serde(default, rename = "recoveryNote")]
    pub recovery_note: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: UserView,
}

/// Run argon2 work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("password task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn check_password(user: &User, password: String) -> Result<(), ApiError> {
    let hash = user.password_hash.clone();
    if blocking(move || verify_password(&password, &hash)).await? {
        Ok(())
    } else {
        tracing::info!(username = %user.username, "login rejected");
        Err(ApiError::unauthorized(INVALID_CREDENTIALS))
    }
}

/// Existing user with a matching password, or a new account.
async fn find_or_create(
    state: &AppState,
    username: Username,
    password: String,
    recovery_note: Option<String>,
) -> Result<User, ApiError> {
    if let Some(user) = state.store.find_user_by_name(username.as_str()).await? {
        check_password(&user, password).await?;
        return Ok(user);
    }

    let to_hash = password.clone();
    let hash = blocking(move || hash_password(&to_hash)).await?;
    let user =
        User::new(username, hash, Utc::now()).with_recovery_note(recovery_note.as_deref())?;

    match state.store.insert_user(user.clone()).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, username = %user.username, "created user");
            Ok(user)
        }
        // Lost a race with a concurrent first login for the same name.
        Err(StoreError::Conflict(_)) => {
            let existing = state
                .store
                .find_user_by_name(&user.username)
                .await?
                .ok_or_else(|| ApiError::internal("user vanished after conflict"))?;
            check_password(&existing, password).await?;
            Ok(existing)
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = Username::new(&req.username)?;
    if req.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }

    let user = find_or_create(&state, username, req.password, req.recovery_note).await?;

    let (token, session) = Session::issue(user.id, Utc::now());
    state.store.insert_session(session).await?;

    Ok(Json(LoginResponse {
        token,
        user: user.view(),
    }))
}

/// GET /api/auth/me
async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: auth.user.view(),
    })
}

/// POST /api/auth/logout - revoke the presented session
async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    state.store.delete_session(&auth.token_hash).await?;
    tracing::debug!(user_id = %auth.user.id, "session revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}
