//! HTTP server: routes, shared state and request handlers.
//!
//! | Method | Path     | Body          | Response                                   |
//! |--------|----------|---------------|--------------------------------------------|
//! | GET    | `/`      | —             | configuration page (HTML)                  |
//! | POST   | `/save`  | option map    | `{"status"}`                               |
//! | POST   | `/clean` | —             | `{"status","message"}`                     |
//! | POST   | `/apply` | option map    | `{"status","output"}`                      |
//! | POST   | `/build` | —             | streamed `text/plain`, ends with sentinel  |
//!
//! A body that is not a JSON option map is answered with the extractor's
//! 4xx status and the usual JSON shape (`status: "error"` plus the reason in
//! `message` or `output`), so the page can always parse the reply.
//!
//! No in-memory state survives between requests apart from the config, the
//! build directory handle and one async mutex.  Options are re-scanned and
//! the snapshot re-read on every page load.
//!
//! # Build directory lock
//!
//! Clean, apply and build all work inside the same directory.  They take
//! `build_lock` for their whole duration; for a build that means until the
//! child exits, even if the browser has already disconnected.  Concurrent
//! actions therefore run one after another instead of interleaving inside
//! the build tree.

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::application::{build_sentinel, render_page, BUILD_FAILED};
use crate::domain::options::merge_saved;
use crate::domain::{ApplyResponse, CleanResponse, OptionSet, SaveResponse, Status, ToolConfig};
use crate::infrastructure::build_dir::BuildDirectory;
use crate::infrastructure::cmake_lists::{read_cmake_options, ScanError};
use crate::infrastructure::command_runner::{
    CommandRunner, OutputEvent, OUTPUT_CHANNEL_CAPACITY,
};
use crate::infrastructure::settings_store::SettingsStore;

// ── Shared state ──────────────────────────────────────────────────────────────

/// State shared by all handlers.  Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ToolConfig>,
    pub store: SettingsStore,
    pub build_dir: BuildDirectory,
    build_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Builds the state from `config`.  Does not touch the file system.
    pub fn new(config: ToolConfig) -> Self {
        Self {
            store: SettingsStore::new(&config.settings_path),
            build_dir: BuildDirectory::new(&config.build_dir),
            config: Arc::new(config),
            build_lock: Arc::new(Mutex::new(())),
        }
    }

    fn runner(&self) -> CommandRunner {
        CommandRunner::new(&self.config.cmake_program, self.build_dir.path())
    }

    /// Last saved snapshot.  A snapshot that cannot be read counts as none.
    fn load_saved(&self) -> Option<OptionSet> {
        match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("ignoring unreadable settings snapshot: {e}");
                None
            }
        }
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Builds the router with every endpoint and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_config_page))
        .route("/save", post(save_options))
        .route("/clean", post(clean_build_dir))
        .route("/apply", post(apply_options))
        .route("/build", post(run_build))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the build directory, binds `config.bind_addr` and serves until
/// Ctrl+C.
///
/// # Errors
///
/// Returns an error if the build directory cannot be created, the listener
/// cannot be bound, or the server fails.
pub async fn run_server(config: ToolConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    state
        .build_dir
        .ensure()
        .context("failed to prepare build directory")?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {bind_addr}"))?;

    info!(
        "serving {} on http://{bind_addr} (build dir {})",
        state.config.project_root.display(),
        state.build_dir.path().display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C — shutting down"),
        Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// The page cannot render without the option source.
struct PageError(ScanError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("cannot render configuration page: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Cannot read build configuration: {}\n", self.0),
        )
            .into_response()
    }
}

/// `GET /`
async fn show_config_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let scanned = read_cmake_options(&state.config.cmake_lists_path()).map_err(PageError)?;
    let options = merge_saved(scanned, state.load_saved().as_ref());

    if let Err(e) = state.build_dir.ensure() {
        warn!("{e}");
    }

    Ok(Html(render_page(&options, &state.build_dir.status())))
}

/// Logs a rejected request body and returns its status and reason.
fn rejection_parts(rejection: &JsonRejection) -> (StatusCode, String) {
    let reason = rejection.body_text();
    warn!("rejected option body: {reason}");
    (rejection.status(), reason)
}

/// `POST /save`
async fn save_options(
    State(state): State<AppState>,
    body: Result<Json<OptionSet>, JsonRejection>,
) -> (StatusCode, Json<SaveResponse>) {
    let options = match body {
        Ok(Json(options)) => options,
        Err(rejection) => {
            let (code, reason) = rejection_parts(&rejection);
            let response = SaveResponse {
                status: Status::Error,
                message: Some(reason),
            };
            return (code, Json(response));
        }
    };

    let status = match state.store.save(&options) {
        Ok(()) => {
            info!("saved {} option(s)", options.len());
            Status::Success
        }
        Err(e) => {
            warn!("{e}");
            Status::Error
        }
    };
    (StatusCode::OK, Json(SaveResponse { status, message: None }))
}

/// `POST /clean`
async fn clean_build_dir(State(state): State<AppState>) -> Json<CleanResponse> {
    let _guard = state.build_lock.lock().await;

    let result = state.build_dir.ensure().and_then(|_| state.build_dir.clean());
    let response = match result {
        Ok(()) => CleanResponse {
            status: Status::Success,
            message: "Build directory cleaned successfully".to_string(),
        },
        Err(e) => {
            warn!("{e}");
            CleanResponse {
                status: Status::Error,
                message: e.to_string(),
            }
        }
    };
    Json(response)
}

/// `POST /apply`: persist, then configure.
async fn apply_options(
    State(state): State<AppState>,
    body: Result<Json<OptionSet>, JsonRejection>,
) -> Response {
    let options = match body {
        Ok(Json(options)) => options,
        Err(rejection) => {
            let (code, reason) = rejection_parts(&rejection);
            let response = ApplyResponse {
                status: Status::Error,
                output: reason,
            };
            return (code, Json(response)).into_response();
        }
    };

    if let Err(e) = state.store.save(&options) {
        warn!("{e}");
        return Json(ApplyResponse {
            status: Status::Error,
            output: format!("Failed to save options: {e}"),
        })
        .into_response();
    }

    let _guard = state.build_lock.lock().await;

    if let Err(e) = state.build_dir.ensure() {
        warn!("{e}");
        return Json(ApplyResponse {
            status: Status::Error,
            output: e.to_string(),
        })
        .into_response();
    }

    let response = match state
        .runner()
        .configure(&state.config.project_root, &options)
        .await
    {
        Ok(captured) => ApplyResponse {
            status: Status::from_success(captured.success),
            output: captured.output,
        },
        Err(e) => {
            error!("{e}");
            ApplyResponse {
                status: Status::Error,
                output: e.to_string(),
            }
        }
    };
    Json(response).into_response()
}

/// `POST /build`: stream output as plain text.
///
/// The response starts immediately; a background task owns the lock and the
/// child and pushes chunks into the body channel as they are produced.
async fn run_build(State(state): State<AppState>) -> Response {
    let (tx, rx) = mpsc::channel::<String>(OUTPUT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let _guard = state.build_lock.lock().await;
        stream_build(&state, ChunkSink::new(tx)).await;
    });

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

async fn stream_build(state: &AppState, mut sink: ChunkSink) {
    if let Err(e) = state.build_dir.ensure() {
        warn!("{e}");
        sink.send(format!("{e}\n")).await;
        sink.send(BUILD_FAILED.to_string()).await;
        return;
    }

    let mut events = match state.runner().build() {
        Ok(events) => events,
        Err(e) => {
            error!("{e}");
            sink.send(format!("{e}\n")).await;
            sink.send(BUILD_FAILED.to_string()).await;
            return;
        }
    };

    let mut success = false;
    while let Some(event) = events.recv().await {
        match event {
            OutputEvent::Line(line) => sink.send(line).await,
            OutputEvent::Exited(outcome) => success = outcome.success,
        }
    }

    info!("build finished (success = {success})");
    sink.send(build_sentinel(success).to_string()).await;
}

/// Response body writer that goes quiet once the client has disconnected.
struct ChunkSink {
    tx: mpsc::Sender<String>,
    client_gone: bool,
}

impl ChunkSink {
    fn new(tx: mpsc::Sender<String>) -> Self {
        Self {
            tx,
            client_gone: false,
        }
    }

    async fn send(&mut self, chunk: String) {
        if self.client_gone {
            return;
        }
        if self.tx.send(chunk).await.is_err() {
            info!("build client disconnected; build continues without output");
            self.client_gone = true;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chunk_sink_goes_quiet_after_disconnect() {
        // Arrange
        let (tx, rx) = mpsc::channel(1);
        let mut sink = ChunkSink::new(tx);
        drop(rx);

        // Act
        sink.send("line\n".to_string()).await;
        sink.send("more\n".to_string()).await;

        // Assert
        assert!(sink.client_gone);
    }

    #[tokio::test]
    async fn test_chunk_sink_forwards_while_connected() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChunkSink::new(tx);

        sink.send("a\n".to_string()).await;
        sink.send("b\n".to_string()).await;

        assert_eq!(rx.recv().await.as_deref(), Some("a\n"));
        assert_eq!(rx.recv().await.as_deref(), Some("b\n"));
        assert!(!sink.client_gone);
    }

    #[test]
    fn test_app_state_new_does_not_create_build_dir() {
        let root = tempfile::tempdir().unwrap();
        let build = root.path().join("build");
        let state = AppState::new(ToolConfig::for_project(root.path(), &build));

        assert!(!build.exists());
        assert_eq!(state.build_dir.path(), build);
        assert_eq!(state.store.path(), state.config.settings_path);
    }

    #[test]
    fn test_load_saved_treats_corrupt_snapshot_as_none() {
        let root = tempfile::tempdir().unwrap();
        let config = ToolConfig::for_project(root.path(), root.path().join("build"));
        std::fs::create_dir_all(config.settings_path.parent().unwrap()).unwrap();
        std::fs::write(&config.settings_path, "not = [valid").unwrap();

        let state = AppState::new(config);

        assert!(state.load_saved().is_none());
    }
}
