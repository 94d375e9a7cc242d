//! External scraper invocation.
//!
//! The scraper is a separate executable invoked once per job with two
//! positional arguments (target, count). On success it writes a JSON array
//! of items to stdout and exits 0; on failure it writes a diagnostic to
//! stderr and exits non-zero. [`ScrapeInvoker`] is the seam between the
//! orchestration engine and that executable; [`CommandInvoker`] is the real
//! subprocess-backed implementation.

mod invoker;
mod subprocess;

pub use invoker::{CommandInvoker, ScrapeError, ScrapeInvoker, ScrapeOutput, ScrapeRequest};
