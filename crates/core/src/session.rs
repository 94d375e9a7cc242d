//! Session records.
//!
//! A session groups the jobs created from one caller request. Sessions are
//! immutable once created; the store keeps a bounded history of the most
//! recent ones.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{JobId, SessionId, Timestamp};

/// A batch of jobs created from one caller request.
///
/// Invariant: `job_ids.len() == target_count`. Each distinct target in the
/// request maps to exactly one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    /// Number of distinct targets in the request.
    pub target_count: usize,
    /// Mapping from target name to the job created for it.
    pub job_ids: HashMap<String, JobId>,
    pub created_at: Timestamp,
}

impl SessionRecord {
    /// Create a session over the given target -> job-id mapping.
    pub fn new(session_id: SessionId, job_ids: HashMap<String, JobId>) -> Self {
        Self {
            session_id,
            target_count: job_ids.len(),
            job_ids,
            created_at: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
