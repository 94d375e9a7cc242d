//! Durable status persistence for the magpie orchestrator.
//!
//! Two JSON documents live under the data directory and are fully rewritten
//! on every mutation:
//!
//! - `jobs.json` -- the whole job table, a map of job id to job record.
//! - `sessions.json` -- the most recent [`SESSION_HISTORY_LIMIT`] session
//!   records, oldest evicted first.
//!
//! An absent or unparseable file loads as empty state: that is the expected
//! cold start, and it is also how a partial write from a crash recovers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use magpie_core::job::JobRecord;
use magpie_core::session::SessionRecord;
use magpie_core::types::JobId;

/// Maximum number of session records retained in the history file.
pub const SESSION_HISTORY_LIMIT: usize = 20;

const JOBS_FILE: &str = "jobs.json";
const SESSIONS_FILE: &str = "sessions.json";

/// Errors from persistence operations.
///
/// Callers treat these as non-fatal: in-memory state stays authoritative and
/// the failure is logged, never rolled back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Whole-file JSON persistence for the job table and session history.
///
/// The store owns the on-disk representation and is the sole writer of
/// persisted bytes; the in-memory table it serializes remains the source of
/// truth between writes.
#[derive(Debug, Clone)]
pub struct StatusStore {
    jobs_path: PathBuf,
    sessions_path: PathBuf,
}

impl StatusStore {
    /// Create a store rooted at `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            jobs_path: dir.join(JOBS_FILE),
            sessions_path: dir.join(SESSIONS_FILE),
        }
    }

    /// Create the data directory if it does not exist yet.
    pub async fn init(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.jobs_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// Load the persisted job table.
    ///
    /// An absent file or invalid JSON yields an empty table; the latter is
    /// logged since it means a previous write was torn or the file was
    /// edited by hand.
    pub async fn load_jobs(&self) -> HashMap<JobId, JobRecord> {
        read_or_default(&self.jobs_path, "job table").await
    }

    /// Serialize the entire job table and rewrite `jobs.json`.
    pub async fn save_jobs(&self, jobs: &HashMap<JobId, JobRecord>) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(jobs)?;
        tokio::fs::write(&self.jobs_path, data).await?;
        Ok(())
    }

    /// Load the persisted session history, oldest first.
    pub async fn load_sessions(&self) -> Vec<SessionRecord> {
        read_or_default(&self.sessions_path, "session history").await
    }

    /// Append a session to the history, evicting the oldest entries beyond
    /// [`SESSION_HISTORY_LIMIT`], and rewrite `sessions.json`.
    pub async fn append_session(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let mut sessions = self.load_sessions().await;
        sessions.push(session.clone());
        if sessions.len() > SESSION_HISTORY_LIMIT {
            let excess = sessions.len() - SESSION_HISTORY_LIMIT;
            sessions.drain(..excess);
        }

        let data = serde_json::to_string_pretty(&sessions)?;
        tokio::fs::write(&self.sessions_path, data).await?;
        Ok(())
    }
}

/// Read `path` and parse it as `T`, falling back to `T::default()` when the
/// file is absent or its content does not parse.
async fn read_or_default<T>(path: &Path, what: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read {what}, starting empty");
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Persisted {what} is not valid JSON, starting empty");
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
