//! Scraper invocation interface and shared types.

use std::fmt;
use std::path::PathBuf;

use super::subprocess;

/// Parameters for one scraper invocation.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// The username/subject to scrape; first positional argument.
    pub target: String,
    /// Upper bound on how many items the scraper fetches; second positional
    /// argument.
    pub count: u32,
}

/// Captured output from a scraper invocation that produced an exit status.
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ScrapeOutput {
    /// Whether the process exited successfully.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that can occur while launching or communicating with the scraper
/// process. A non-zero exit is not an error here; it is reported through
/// [`ScrapeOutput::exit_code`].
#[derive(Debug)]
pub enum ScrapeError {
    /// An I/O error occurred while spawning or reading from the process.
    Io(std::io::Error),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Trait over the external scraper so the orchestration engine can be
/// exercised without a real executable.
pub trait ScrapeInvoker: Send + Sync {
    /// Run one scrape and capture its outcome.
    fn invoke(
        &self,
        request: &ScrapeRequest,
    ) -> impl std::future::Future<Output = Result<ScrapeOutput, ScrapeError>> + Send;
}

/// Invoker that spawns the configured executable as a child process.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: PathBuf,
}

impl CommandInvoker {
    /// Create an invoker for the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ScrapeInvoker for CommandInvoker {
    async fn invoke(&self, request: &ScrapeRequest) -> Result<ScrapeOutput, ScrapeError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg(&request.target).arg(request.count.to_string());
        subprocess::run_command(&mut cmd).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a temporary executable script from the given body.
    ///
    /// The file is closed before returning; a write handle still open at
    /// spawn time would make exec fail with ETXTBSY.
    fn write_temp_script(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("scraper.sh");
        std::fs::write(&path, format!("#!/bin/bash\n{body}")).expect("write script");

        let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod script");
        path
    }

    fn request() -> ScrapeRequest {
        ScrapeRequest {
            target: "alice".to_string(),
            count: 3,
        }
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = write_temp_script(&dir, "echo '[{\"text\": \"hi\"}]'\n");
        let output = CommandInvoker::new(script)
            .invoke(&request())
            .await
            .expect("invoke");
        assert!(output.succeeded());
        assert!(output.stdout.contains("hi"));
    }

    #[tokio::test]
    async fn passes_target_and_count_as_arguments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = write_temp_script(&dir, "echo \"[\\\"$1:$2\\\"]\"\n");
        let output = CommandInvoker::new(script)
            .invoke(&request())
            .await
            .expect("invoke");
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("alice:3"));
    }

    #[tokio::test]
    async fn captures_stderr_and_exit_code_on_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = write_temp_script(&dir, "echo 'login rejected' >&2\nexit 3\n");
        let output = CommandInvoker::new(script)
            .invoke(&request())
            .await
            .expect("invoke");
        assert!(!output.succeeded());
        assert_eq!(output.exit_code, 3);
        assert!(output.stderr.contains("login rejected"));
    }

    #[tokio::test]
    async fn missing_executable_is_an_io_error() {
        let result = CommandInvoker::new("/nonexistent/scraper")
            .invoke(&request())
            .await;
        assert!(matches!(result, Err(ScrapeError::Io(_))));
    }
}
