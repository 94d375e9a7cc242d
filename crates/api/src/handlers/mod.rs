//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the orchestration engine and map errors via
//! [`AppError`](crate::error::AppError).

pub mod jobs;
pub mod sessions;
