//! Job records and their lifecycle.
//!
//! A job is one unit of scraping work for a single target. Its status moves
//! `queued -> running -> {complete|error}` and never leaves a terminal state;
//! the transition helpers here enforce that, so callers cannot move a record
//! backward no matter how late their task observes the outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

/// Execution status of a scrape job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created by the dispatcher, runner task not yet started.
    Queued,
    /// The scraper subprocess has been launched.
    Running,
    /// The subprocess exited 0 and its output parsed.
    Complete,
    /// The subprocess failed or produced unusable output.
    Error,
}

impl JobStatus {
    /// Whether this status is terminal (`complete` or `error`).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

/// One unit of scraping work, tracked from dispatch to terminal outcome.
///
/// Invariant: once terminal, exactly one of `results` (non-empty on
/// `complete`) and `error` (non-empty text on `error`) is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// The username/subject being scraped.
    pub target: String,
    pub status: JobStatus,
    /// Scraped items, in scraper output order. Empty until `complete`.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Diagnostic text, present only when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobRecord {
    /// Create a record in the `queued` state for `target`.
    pub fn queued(target: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            target: target.into(),
            status: JobStatus::Queued,
            results: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `running`. Returns `false` and leaves the record untouched if
    /// the job is already terminal.
    pub fn mark_running(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Running;
        self.results.clear();
        self.touch();
        true
    }

    /// Move to `complete` with the parsed result items. Returns `false` if
    /// the job is already terminal.
    pub fn complete(&mut self, results: Vec<Value>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Complete;
        self.results = results;
        self.error = None;
        self.touch();
        true
    }

    /// Move to `error` with a diagnostic. Returns `false` if the job is
    /// already terminal.
    pub fn fail(&mut self, diagnostic: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Error;
        self.results.clear();
        self.error = Some(diagnostic.into());
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
