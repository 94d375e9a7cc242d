//! Job runner: executes exactly one job end-to-end and records its terminal
//! outcome in the registry.
//!
//! The runner never lets a fault escape: process launch failures, non-zero
//! exits, and unusable output all land the job in `error` with a diagnostic,
//! so a job whose task has ended can never be observed as `running`.

use std::sync::Arc;

use magpie_core::scraper::{ScrapeInvoker, ScrapeOutput, ScrapeRequest};
use magpie_core::types::JobId;
use serde_json::Value;

use super::registry::JobRegistry;

/// Fixed diagnostic recorded when the scraper exits 0 but its stdout is not
/// a JSON array.
pub const PARSE_FAILURE_DIAGNOSTIC: &str = "failed to parse results";

/// Run one job: mark it `running`, invoke the scraper, and record exactly
/// one terminal transition.
///
/// The registry lock is never held across the scraper invocation itself;
/// each transition takes and releases it independently.
pub async fn run_job<I: ScrapeInvoker>(
    registry: Arc<JobRegistry>,
    invoker: Arc<I>,
    job_id: JobId,
    request: ScrapeRequest,
) {
    tracing::info!(
        job_id = %job_id,
        target = %request.target,
        count = request.count,
        "Starting scrape job",
    );

    registry.mark_running(&job_id).await;

    match invoker.invoke(&request).await {
        Ok(output) if output.succeeded() => record_success(&registry, &job_id, output).await,
        Ok(output) => {
            let diagnostic = failure_diagnostic(&output);
            tracing::error!(
                job_id = %job_id,
                exit_code = output.exit_code,
                error = %diagnostic,
                "Scrape job failed",
            );
            registry.fail(&job_id, &diagnostic).await;
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Failed to run scraper");
            registry.fail(&job_id, &e.to_string()).await;
        }
    }
}

/// Parse a successful invocation's stdout and record the terminal state.
async fn record_success(registry: &JobRegistry, job_id: &str, output: ScrapeOutput) {
    match serde_json::from_str::<Vec<Value>>(output.stdout.trim()) {
        Ok(items) => {
            tracing::info!(
                job_id,
                items = items.len(),
                duration_ms = output.duration_ms,
                "Scrape job completed",
            );
            registry.complete(job_id, items).await;
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Scraper stdout is not a JSON array");
            registry.fail(job_id, PARSE_FAILURE_DIAGNOSTIC).await;
        }
    }
}

/// Diagnostic for a non-zero exit: trimmed stderr, or a fixed text when the
/// scraper wrote nothing (the `error` field must never be empty).
fn failure_diagnostic(output: &ScrapeOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        format!("scraper exited with status {}", output.exit_code)
    } else {
        stderr.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
