//! Web server for the task page and CRUD endpoints.
//!
//! Every mutating endpoint re-reads the full task list and responds with a
//! fresh [`TaskPage`], so the client always holds a server-consistent
//! snapshot instead of merging deltas.

use axum::{
    Json, Router,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Html,
    routing::{get, patch, post},
};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::models::{TaskChanges, TaskInput};
use crate::storage::Storage;
use crate::web::render::TaskPage;
use crate::{Error, Result};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Storage instance, serialized behind a Mutex so each request's
    /// read-modify-write runs alone against the database
    pub storage: Arc<Mutex<Storage>>,
}

/// Error payload for a failed request: status plus a JSON body.
type ErrorResponse = (StatusCode, Json<serde_json::Value>);

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/tasks", post(create_task))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and block until shutdown.
pub async fn start_server(data_dir: &Path, host: &str, port: u16) -> Result<()> {
    if !Storage::exists(data_dir) {
        return Err(Error::NotInitialized);
    }
    let storage = Storage::open(data_dir)?;

    let state = AppState {
        storage: Arc::new(Mutex::new(storage)),
    };
    let app = router(state);

    let host_addr: IpAddr = host
        .parse()
        .map_err(|e| Error::Other(format!("Invalid host address '{}': {}", host, e)))?;
    let addr = SocketAddr::from((host_addr, port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving task list at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}

/// The embedded page shell. The placeholder is replaced with the initial
/// page JSON on every request to `/`.
const INDEX_HTML: &str = include_str!("index.html");
const INITIAL_PAGE_SLOT: &str = "__INITIAL_PAGE__";

/// Serve the page with the current task list as initial props.
async fn serve_index(State(state): State<AppState>) -> std::result::Result<Html<String>, ErrorResponse> {
    let storage = state.storage.lock().await;
    let page = render_page(&storage)?;

    let props = serde_json::to_string(&page).map_err(|e| error_response(e.into()))?;
    // `<` must not terminate the embedded <script> element early.
    let props = props.replace('<', "\\u003c");

    Ok(Html(INDEX_HTML.replace(INITIAL_PAGE_SLOT, &props)))
}

/// Create a task, then respond with the freshly re-read page.
async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> std::result::Result<Json<TaskPage>, ErrorResponse> {
    let mut storage = state.storage.lock().await;

    let task = storage.create_task(&input).map_err(error_response)?;
    tracing::info!(id = task.id, "created task");

    Ok(Json(render_page(&storage)?))
}

/// Update a task, then respond with the freshly re-read page.
async fn update_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    Json(changes): Json<TaskChanges>,
) -> std::result::Result<Json<TaskPage>, ErrorResponse> {
    let mut storage = state.storage.lock().await;

    let task = storage.update_task(id, &changes).map_err(error_response)?;
    tracing::info!(id = task.id, completed = task.completed, "updated task");

    Ok(Json(render_page(&storage)?))
}

/// Delete a task, then respond with the freshly re-read page.
async fn delete_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
) -> std::result::Result<Json<TaskPage>, ErrorResponse> {
    let mut storage = state.storage.lock().await;

    storage.delete_task(id).map_err(error_response)?;
    tracing::info!(id, "deleted task");

    Ok(Json(render_page(&storage)?))
}

/// Re-read the full list and build the page view model.
fn render_page(storage: &Storage) -> std::result::Result<TaskPage, ErrorResponse> {
    storage
        .list_tasks()
        .map(TaskPage::new)
        .map_err(error_response)
}

/// Map a crate error onto the transport: 422 with field messages for
/// validation, 404 for a missing task, 500 for everything else.
fn error_response(err: Error) -> ErrorResponse {
    match err {
        Error::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "message": errors.to_string(),
                "errors": errors.field_messages(),
            })),
        ),
        Error::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": err.to_string() })),
        ),
        other => {
            tracing::error!(error = %other, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal server error" })),
            )
        }
    }
}
