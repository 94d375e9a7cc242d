use std::sync::Arc;

use magpie_core::scraper::CommandInvoker;

use crate::config::ServerConfig;
use crate::engine::registry::JobRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The process table plus its persistence, the system's only shared
    /// mutable state.
    pub registry: Arc<JobRegistry>,
    /// Subprocess-backed scraper invoker handed to every job runner task.
    pub invoker: Arc<CommandInvoker>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
