//! The process table: every job record the orchestrator knows about.
//!
//! [`JobRegistry`] pairs the in-memory table with its [`StatusStore`] so
//! each mutation persists while the lock for that mutation is still held.
//! Releasing the lock between mutate and save would let a later save from a
//! stale snapshot overwrite a newer one.
//!
//! Persistence failures are logged and otherwise ignored: the in-memory
//! table stays authoritative until the next successful write.

use std::collections::HashMap;

use tokio::sync::Mutex;

use magpie_core::job::JobRecord;
use magpie_core::session::SessionRecord;
use magpie_core::types::JobId;
use magpie_store::StatusStore;

/// Lock-guarded job table plus its persistence.
///
/// The mutex is held only across read-check-mutate-persist of table state,
/// never across scraper subprocess execution.
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
    store: StatusStore,
}

impl JobRegistry {
    /// Reconcile the table from disk. Called once at startup; an absent or
    /// corrupt file yields an empty table.
    pub async fn load(store: StatusStore) -> Self {
        let jobs = store.load_jobs().await;
        Self {
            jobs: Mutex::new(jobs),
            store,
        }
    }

    /// Number of jobs currently tracked.
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Insert one `queued` record per `(job_id, target)` pair under a single
    /// lock acquisition, persisting once.
    pub async fn insert_queued(&self, entries: &[(JobId, String)]) {
        let mut jobs = self.jobs.lock().await;
        for (job_id, target) in entries {
            jobs.insert(job_id.clone(), JobRecord::queued(target));
        }
        self.persist(&jobs).await;
    }

    /// Transition a job to `running`.
    pub async fn mark_running(&self, job_id: &str) {
        self.transition(job_id, "running", |job| job.mark_running())
            .await;
    }

    /// Transition a job to `complete` with its parsed result items.
    pub async fn complete(&self, job_id: &str, results: Vec<serde_json::Value>) {
        self.transition(job_id, "complete", |job| job.complete(results))
            .await;
    }

    /// Transition a job to `error` with a diagnostic.
    pub async fn fail(&self, job_id: &str, diagnostic: &str) {
        self.transition(job_id, "error", |job| job.fail(diagnostic))
            .await;
    }

    /// Fetch a copy of one job record.
    pub async fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.jobs.lock().await.get(job_id).cloned()
    }

    /// Copy of the whole table.
    pub async fn snapshot(&self) -> HashMap<JobId, JobRecord> {
        self.jobs.lock().await.clone()
    }

    /// Append a session to the bounded persisted history. Failures are
    /// logged and non-fatal, matching job-table persistence.
    pub async fn append_session(&self, session: &SessionRecord) {
        if let Err(e) = self.store.append_session(session).await {
            tracing::warn!(
                session_id = %session.session_id,
                error = %e,
                "Failed to persist session history",
            );
        }
    }

    /// The persisted session history, oldest first.
    pub async fn recent_sessions(&self) -> Vec<SessionRecord> {
        self.store.load_sessions().await
    }

    /// Apply `apply` to one record and persist, all under one lock
    /// acquisition. A transition refused by the record (already terminal)
    /// or aimed at an unknown id is logged and not persisted.
    async fn transition<F>(&self, job_id: &str, to: &str, apply: F)
    where
        F: FnOnce(&mut JobRecord) -> bool,
    {
        let mut jobs = self.jobs.lock().await;

        let Some(job) = jobs.get_mut(job_id) else {
            tracing::warn!(job_id, to, "Transition for unknown job ignored");
            return;
        };

        if !apply(job) {
            tracing::warn!(
                job_id,
                to,
                status = ?job.status,
                "Transition refused, job already terminal",
            );
            return;
        }

        self.persist(&jobs).await;
    }

    /// Rewrite the persisted table from the locked in-memory state.
    async fn persist(&self, jobs: &HashMap<JobId, JobRecord>) {
        if let Err(e) = self.store.save_jobs(jobs).await {
            tracing::warn!(error = %e, "Failed to persist job table, in-memory state remains authoritative");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
