use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use magpie_api::config::ServerConfig;
use magpie_api::engine::registry::JobRegistry;
use magpie_api::routes;
use magpie_api::state::AppState;
use magpie_core::scraper::CommandInvoker;
use magpie_store::StatusStore;

/// A fully wired application over a scratch data directory and a stub
/// scraper script. Dropping it removes the directory.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<JobRegistry>,
    data_dir: tempfile::TempDir,
}

impl TestApp {
    /// Path of the directory backing this app's persisted state.
    #[allow(dead_code)]
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(data_dir: &std::path::Path, scraper_bin: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: data_dir.to_path_buf(),
        scraper_bin: scraper_bin.to_path_buf(),
    }
}

/// Build the full application router with all middleware layers, backed by
/// a tempdir and a stub scraper whose body is `scraper_body` (a bash
/// script; `$1` is the target, `$2` the count).
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub async fn build_test_app(scraper_body: &str) -> TestApp {
    let data_dir = tempfile::tempdir().expect("create tempdir");
    let scraper_bin = write_stub_scraper(data_dir.path(), scraper_body);

    let config = test_config(data_dir.path(), &scraper_bin);

    let store = StatusStore::new(&config.data_dir);
    let registry = Arc::new(JobRegistry::load(store).await);
    let invoker = Arc::new(CommandInvoker::new(&config.scraper_bin));

    let state = AppState {
        registry: Arc::clone(&registry),
        invoker,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        router,
        registry,
        data_dir,
    }
}

/// Write an executable bash script into `dir` and return its path.
fn write_stub_scraper(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("scraper.sh");
    let mut f = std::fs::File::create(&path).expect("create stub scraper");
    writeln!(f, "#!/bin/bash").expect("write shebang");
    writeln!(f, "{body}").expect("write body");

    let mut perms = f.metadata().expect("script metadata").permissions();
    perms.set_mode(0o755);
    f.set_permissions(perms).expect("chmod script");
    path
}

/// Issue a GET request against the app.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request")
}

/// Issue a POST request with a JSON body against the app.
#[allow(dead_code)]
pub async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
        )
        .await
        .expect("send request")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Poll the registry until `job_id` reaches a terminal state.
#[allow(dead_code)]
pub async fn wait_for_terminal(registry: &JobRegistry, job_id: &str) {
    for _ in 0..500 {
        if let Some(job) = registry.get(job_id).await {
            if job.status.is_terminal() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not reach a terminal state in time");
}
