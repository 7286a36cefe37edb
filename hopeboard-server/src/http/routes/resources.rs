//! Resource endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use hopeboard_core::models::{NewResource, ResourceTag};
use hopeboard_core::Resource;
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, MaybeAuthUser};
use crate::http::server::AppState;

/// `?tag=`; `all` or empty means every resource
#[derive(Deserialize, Default)]
pub struct ResourceQuery {
    pub tag: Option<String>,
}

/// GET /api/resources
async fn list_resources(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let tag = ResourceTag::parse_filter(query.tag.as_deref())?;
    Ok(Json(state.store.list_resources(tag).await?))
}

/// POST /api/resources
async fn create_resource(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    ApiJson(input): ApiJson<NewResource>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let resource = Resource::create(input, user.map(|u| u.id), Utc::now())?;
    state.store.insert_resource(resource.clone()).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Resource routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/resources", get(list_resources).post(create_resource))
}
