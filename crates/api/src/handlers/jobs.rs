//! Handlers for the `/jobs` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use magpie_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs/{id}
///
/// Get a single job record by ID. Unknown identifiers return 404, never a
/// default record.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .registry
        .get(&job_id)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Job",
                id: job_id.clone(),
            })
        })?;

    Ok(Json(DataResponse { data: job }))
}
