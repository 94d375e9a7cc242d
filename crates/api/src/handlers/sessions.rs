//! Handlers for the `/sessions` resource.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::engine::dispatcher::dispatch_session;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a session.
#[derive(Debug, Deserialize)]
pub struct CreateSession {
    /// Comma-delimited list of targets to scrape.
    pub targets: String,
    /// Upper bound on items fetched per job, shared by every job in the
    /// session.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Split the target list into independent jobs and launch one runner per
/// job. Returns 201 with the session record immediately; callers poll
/// `/jobs/{id}` for per-job progress.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSession>,
) -> AppResult<impl IntoResponse> {
    if input.count == 0 {
        return Err(AppError::BadRequest("count must be at least 1".into()));
    }

    let session = dispatch_session(
        Arc::clone(&state.registry),
        Arc::clone(&state.invoker),
        &input.targets,
        input.count,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions
///
/// The persisted history of recent sessions, oldest first, capped at the
/// store's retention limit.
pub async fn list_sessions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sessions = state.registry.recent_sessions().await;
    Ok(Json(DataResponse { data: sessions }))
}
