//! API Handlers
//!
//! HTTP request handlers for each front-end endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{CacheError, Result};
use crate::group::Group;
use crate::models::{ApiQuery, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Group served by the front end
    pub group: Arc<Group>,
}

impl AppState {
    /// Creates a new AppState serving `group`.
    pub fn new(group: Arc<Group>) -> Self {
        Self { group }
    }
}

/// Handler for GET /api?key=K
///
/// Returns the raw value bytes as `application/octet-stream`; a missing
/// or empty `key` is a bad request.
pub async fn api_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<impl IntoResponse> {
    if query.key.is_empty() {
        return Err(CacheError::BadRequest("key is required".to_string()));
    }

    let view = state.group.get(&query.key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.to_bytes(),
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.group.name(), state.group.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
