//! HTTP server exposing agent flow structure and runs.
//!
//! Routes: `GET /`, `GET /api/graph/structure/:agent_id`, `POST /api/graph/run/:agent_id`.
//! Configure via env: GRAPH_STORE, TOPICFLOW_FIXTURE, NEO4J_*, MAX_STEPS, LISTEN, LOG_FILE.
//! See topicflow's `FlowConfig::from_env()`. Load .env with dotenv.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use topicflow::{
    ExecutionError, ExecutionState, FlowConfig, FlowError, FlowRuntime, LoadError,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

/// Shared state for all routes.
struct AppState {
    runtime: FlowRuntime,
}

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing to stdout; if `LOG_FILE` is set, also appends plain text to that file.
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,topicflow=debug,topicflow_server=debug")
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(filter.clone());
    let registry = tracing_subscriber::registry().with(stdout_layer);

    match std::env::var("LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_filter(filter);
            registry.with(file_layer).init();
            info!(path = %path, "logging to file");
        }
        Err(_) => registry.init(),
    }
    Ok(())
}

fn app(runtime: FlowRuntime) -> Router {
    let state = Arc::new(AppState { runtime });
    Router::new()
        .route("/", get(root))
        .route("/api/graph/structure/:agent_id", get(graph_structure))
        .route("/api/graph/run/:agent_id", post(graph_run))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    info_span!("request", method = %req.method(), uri = %req.uri())
                }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    init_tracing()?;

    let config = FlowConfig::from_env()?;
    info!(
        store = ?config.store,
        max_steps = config.max_steps,
        "flow config loaded"
    );
    let runtime = FlowRuntime::from_config(&config).await?;

    info!("listening on http://{}", config.listen);
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    axum::serve(listener, app(runtime)).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Agent flow API is running" }))
}

async fn graph_structure(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let spec = state.runtime.structure(&agent_id).await?;
    Ok(Json(spec))
}

/// Runs the agent's flow. The body is the initial state object; an empty body means `{}`.
async fn graph_run(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let initial = parse_initial_state(&body)?;
    let graph = state.runtime.compile(&agent_id).await?;
    let engine = *state.runtime.engine();

    tracing::debug!(agent_id = %agent_id, entry = graph.entry_node(), "graph run");
    let result = tokio::task::spawn_blocking(move || engine.invoke(&graph, initial))
        .await
        .map_err(|e| ServerError::Internal(format!("graph run task failed: {}", e)))?
        .map_err(|e| {
            tracing::warn!(agent_id = %agent_id, error = %e, "graph run failed");
            ServerError::Flow(FlowError::from(e))
        })?;

    Ok(Json(json!({ "result": result })))
}

fn parse_initial_state(body: &[u8]) -> Result<ExecutionState, ServerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ExecutionState::new());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {}", e)))?;
    if !value.is_object() {
        return Err(ServerError::BadRequest(
            "request body must be a JSON object".into(),
        ));
    }
    ExecutionState::from_json(value)
        .map_err(|e| ServerError::BadRequest(format!("invalid initial state: {}", e)))
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Flow(FlowError::Load(LoadError::NoGraphData { .. })) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Flow(FlowError::Execution(
                ExecutionError::Handler { .. }
                | ExecutionError::Routing { .. }
                | ExecutionError::StepLimitExceeded { .. },
            )) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Flow(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(json!({ "error": { "message": self.to_string() } })),
        )
            .into_response()
    }
}
