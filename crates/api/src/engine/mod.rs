//! Job/session orchestration engine.
//!
//! [`registry`] owns the process table (the only shared mutable state),
//! [`runner`] executes one job end-to-end against the external scraper, and
//! [`dispatcher`] fans one caller request out into independent runner tasks.
//! All subprocess work happens outside the registry lock; every table
//! mutation persists before the lock is released.

pub mod dispatcher;
pub mod registry;
pub mod runner;
