//! API server core: shared state, route handlers, and server startup.
//!
//! Implements the task contract the client consumes:
//! `GET /tasks`, `POST /tasks`, `PATCH /tasks/{id}`, `DELETE /tasks/{id}`.
//! Bodies use the wire field names (`is_completed`, RFC 3339 `due_date`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::{Duration, Utc};
use taskdeck_api::task::{Priority, validate_title};
use taskdeck_api::wire::{NewTaskBody, RemoteTask, TaskPatch};

use crate::store::TaskTable;

/// Shared server state holding the task table.
pub struct ServerState {
    /// The in-memory task list.
    pub tasks: TaskTable,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Creates state with an empty task table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: TaskTable::new(),
        }
    }

    /// Creates state pre-populated with a few demo tasks: one due soon, one
    /// overdue, one completed.
    #[must_use]
    pub fn with_demo_data() -> Self {
        let now = Utc::now();
        let tasks = vec![
            RemoteTask {
                id: 1,
                title: "Review pull requests".to_string(),
                description: "At least the two oldest".to_string(),
                due_date: Some(now + Duration::minutes(20)),
                priority: Priority::High,
                completed: false,
            },
            RemoteTask {
                id: 2,
                title: "Renew domain".to_string(),
                description: String::new(),
                due_date: Some(now - Duration::days(1)),
                priority: Priority::Medium,
                completed: false,
            },
            RemoteTask {
                id: 3,
                title: "Book dentist appointment".to_string(),
                description: String::new(),
                due_date: None,
                priority: Priority::Low,
                completed: true,
            },
        ];
        Self {
            tasks: TaskTable::with_tasks(tasks),
        }
    }
}

/// Builds the router with all task routes attached.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/tasks",
            axum::routing::get(list_tasks).post(create_task),
        )
        .route(
            "/tasks/{id}",
            axum::routing::patch(patch_task).delete(delete_task),
        )
        .with_state(state)
}

/// `GET /tasks`: returns every task in insertion order.
async fn list_tasks(State(state): State<Arc<ServerState>>) -> Json<Vec<RemoteTask>> {
    Json(state.tasks.list().await)
}

/// `POST /tasks`: creates a task and returns it with its assigned id.
///
/// Rejects empty or oversized titles with 422; clients validate before
/// sending, so this only catches misbehaving callers.
async fn create_task(
    State(state): State<Arc<ServerState>>,
    Json(mut body): Json<NewTaskBody>,
) -> impl IntoResponse {
    match validate_title(&body.title) {
        Ok(title) => body.title = title,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting create with invalid title");
            return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
        }
    }
    let created = state.tasks.create(body).await;
    tracing::info!(id = created.id, title = %created.title, "task created");
    (StatusCode::CREATED, Json(created)).into_response()
}

/// `PATCH /tasks/{id}`: merges the set fields into an existing task.
async fn patch_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<RemoteTask>, StatusCode> {
    if let Some(title) = &patch.title
        && validate_title(title).is_err()
    {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    match state.tasks.patch(id, &patch).await {
        Some(updated) => {
            tracing::info!(id, "task updated");
            Ok(Json(updated))
        }
        None => {
            tracing::warn!(id, "patch for unknown task");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// `DELETE /tasks/{id}`: removes a task.
async fn delete_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
) -> StatusCode {
    if state.tasks.delete(id).await {
        tracing::info!(id, "task deleted");
        StatusCode::NO_CONTENT
    } else {
        tracing::warn!(id, "delete for unknown task");
        StatusCode::NOT_FOUND
    }
}

/// Starts the API server on the given address and returns the bound address
/// and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the API server with pre-configured [`ServerState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task api server error");
        }
    });

    Ok((bound_addr, handle))
}
