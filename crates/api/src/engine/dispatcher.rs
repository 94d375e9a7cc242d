//! Session dispatcher: fans one caller request out into independent jobs.
//!
//! The dispatcher creates all of a session's `queued` records in one
//! critical section, appends the session to the bounded history, then
//! spawns one detached runner task per job and returns immediately. Job
//! completion is observed only through the registry, never by joining the
//! spawned tasks.

use std::collections::HashMap;
use std::sync::Arc;

use magpie_core::error::CoreError;
use magpie_core::scraper::{ScrapeInvoker, ScrapeRequest};
use magpie_core::session::SessionRecord;
use magpie_core::targets::parse_target_list;
use magpie_core::types::{new_id, JobId};

use super::registry::JobRegistry;
use super::runner::run_job;

/// Create a session plus one queued job per target and launch the runners.
///
/// Returns the immutable session record as soon as every job is queued;
/// callers poll individual jobs for progress. A fault in one runner task
/// never affects its siblings.
pub async fn dispatch_session<I>(
    registry: Arc<JobRegistry>,
    invoker: Arc<I>,
    raw_targets: &str,
    count: u32,
) -> Result<SessionRecord, CoreError>
where
    I: ScrapeInvoker + 'static,
{
    let targets = parse_target_list(raw_targets);
    if targets.is_empty() {
        return Err(CoreError::Validation(
            "target list contains no usable targets".to_string(),
        ));
    }

    let jobs: Vec<(JobId, String)> = targets
        .into_iter()
        .map(|target| (new_id(), target))
        .collect();

    registry.insert_queued(&jobs).await;

    let job_ids: HashMap<String, JobId> = jobs
        .iter()
        .map(|(job_id, target)| (target.clone(), job_id.clone()))
        .collect();
    let session = SessionRecord::new(new_id(), job_ids);
    registry.append_session(&session).await;

    for (job_id, target) in jobs {
        let registry = Arc::clone(&registry);
        let invoker = Arc::clone(&invoker);
        let request = ScrapeRequest { target, count };
        tokio::spawn(run_job(registry, invoker, job_id, request));
    }

    tracing::info!(
        session_id = %session.session_id,
        target_count = session.target_count,
        "Session dispatched",
    );

    Ok(session)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
