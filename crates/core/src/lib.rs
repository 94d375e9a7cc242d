//! Core domain types for the magpie scrape-job orchestrator.
//!
//! This crate is transport- and storage-agnostic: it defines job and session
//! records, their lifecycle rules, target-list parsing, and the subprocess
//! invocation of the external scraper. Persistence lives in `magpie-store`,
//! the HTTP surface and orchestration engine in `magpie-api`.

pub mod error;
pub mod job;
pub mod scraper;
pub mod session;
pub mod targets;
pub mod types;
