pub mod health;
pub mod jobs;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions            POST create session, GET recent history
/// /jobs/{id}           GET job status
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sessions", sessions::router())
        .nest("/jobs", jobs::router())
}
