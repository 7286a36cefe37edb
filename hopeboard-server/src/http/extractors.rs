//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use hopeboard_core::{User, ValidationError};
use uuid::Uuid;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::hash_token;

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Resolve a bearer token to its user. `None` for unknown or expired
/// sessions; expired ones are deleted on the way out.
async fn resolve(state: &AppState, token: &str) -> Result<Option<(User, String)>, ApiError> {
    let token_hash = hash_token(token);
    let Some(session) = state.store.find_session(&token_hash).await? else {
        return Ok(None);
    };
    if session.is_expired(Utc::now()) {
        tracing::debug!(user_id = %session.user_id, "dropping expired session");
        state.store.delete_session(&token_hash).await?;
        return Ok(None);
    }
    let user = state.store.find_user(session.user_id).await?;
    Ok(user.map(|u| (u, token_hash)))
}

/// Authenticated caller; rejects with 401 otherwise
pub struct AuthUser {
    pub user: User,
    /// Digest of the presented token, used to revoke the session
    pub token_hash: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::unauthorized("No token provided"))?;
        let (user, token_hash) = resolve(state, token)
            .await?
            .ok_or(ApiError::unauthorized("Invalid token"))?;
        Ok(Self { user, token_hash })
    }
}

/// Caller if a valid bearer token was presented
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };
        Ok(Self(resolve(state, token).await?.map(|(user, _)| user)))
    }
}

/// JSON body whose rejections (bad syntax, wrong types, missing content
/// type) become `{error: "bad_request", message}` responses
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Extract and validate a UUID from path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let uuid = Uuid::parse_str(&id).map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid UUID format",
            })
        })?;

        Ok(Self(uuid))
    }
}
