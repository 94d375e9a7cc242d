//! Route definitions for the `/sessions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                -> list_sessions
/// POST   /                -> create_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(sessions::list_sessions).post(sessions::create_session),
    )
}
