//! Optimistic mutation coordinator bridging the TUI to the task API.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async [`ApiClient`]. It spawns a background tokio
//! task and communicates with the main thread via [`SyncCommand`] /
//! [`SyncEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── SyncEvent ───  coordinator task
//!                     ─── SyncCommand →
//! ```
//!
//! Commands are processed strictly one at a time, so two mutations of the
//! same task can never interleave their remote calls. Every mutation follows
//! the same shape: validate, try the remote call, apply the authoritative
//! result on success or the same change locally on failure, then emit a
//! fresh snapshot. A remote failure is never surfaced as an error; the user
//! sees an info notice that the change was saved locally.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use taskdeck_api::task::{Task, TaskDraft, validate_title};
use taskdeck_api::wire::TaskPatch;
use tokio::sync::mpsc;

use crate::notify::Notification;
use crate::store::TaskStore;

use super::client::{ApiClient, ApiConfig};
use super::SyncError;

/// Commands sent from the TUI main loop to the coordinator task.
#[derive(Debug)]
pub enum SyncCommand {
    /// Fetch the full collection and seed the store.
    LoadInitial,
    /// Create a task from user-entered fields.
    Create {
        /// The new task's fields.
        draft: TaskDraft,
    },
    /// Replace the editable fields of an existing task.
    Update {
        /// Target task id.
        id: i64,
        /// Replacement fields.
        draft: TaskDraft,
    },
    /// Flip a task's completion flag.
    ToggleCompleted {
        /// Target task id.
        id: i64,
    },
    /// Delete a task.
    Delete {
        /// Target task id.
        id: i64,
    },
    /// Gracefully shut down the coordinator task.
    Shutdown,
}

/// Events sent from the coordinator (and the due-date monitor) to the TUI.
#[derive(Debug)]
pub enum SyncEvent {
    /// The store changed; re-render from this copy of its contents.
    Snapshot {
        /// All tasks in insertion order.
        tasks: Vec<Task>,
    },
    /// Something to show the user as a toast.
    Notice(Notification),
}

/// Default capacity for the command and event channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Spawn the coordinator background task and return the command sender.
///
/// The caller provides the shared store and the event sender half; events
/// are drained on each tick of the poll-based TUI loop. Sending
/// [`SyncCommand::LoadInitial`] after spawning performs the initial load.
///
/// # Errors
///
/// Returns [`SyncError`] if the API base URL is invalid or the HTTP client
/// cannot be built. No network traffic happens here.
pub fn spawn_sync(
    api_config: &ApiConfig,
    store: Arc<RwLock<TaskStore>>,
    evt_tx: mpsc::Sender<SyncEvent>,
) -> Result<mpsc::Sender<SyncCommand>, SyncError> {
    let client = ApiClient::new(api_config)?;
    let (cmd_tx, cmd_rx) = mpsc::channel::<SyncCommand>(DEFAULT_CHANNEL_CAPACITY);

    let mut coordinator = Coordinator::new(client, store, evt_tx);
    tokio::spawn(async move {
        coordinator.run(cmd_rx).await;
    });

    Ok(cmd_tx)
}

/// The coordinator's state: the HTTP client, the shared store, and the
/// fallback id counter for offline creates.
pub struct Coordinator {
    client: ApiClient,
    store: Arc<RwLock<TaskStore>>,
    evt_tx: mpsc::Sender<SyncEvent>,
    /// Next locally generated id. Starts at the negated epoch-millis of
    /// coordinator startup and decreases, so local ids are always negative
    /// and never collide with positive server ids or each other.
    next_fallback_id: i64,
}

impl Coordinator {
    /// Creates a coordinator over the given client and shared store.
    #[must_use]
    pub fn new(
        client: ApiClient,
        store: Arc<RwLock<TaskStore>>,
        evt_tx: mpsc::Sender<SyncEvent>,
    ) -> Self {
        Self {
            client,
            store,
            evt_tx,
            next_fallback_id: -Utc::now().timestamp_millis(),
        }
    }

    /// Command loop: processes commands sequentially until the channel
    /// closes or [`SyncCommand::Shutdown`] arrives.
    pub async fn run(&mut self, mut cmd_rx: mpsc::Receiver<SyncCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                SyncCommand::LoadInitial => self.load_initial().await,
                SyncCommand::Create { draft } => self.create(draft).await,
                SyncCommand::Update { id, draft } => self.update(id, draft).await,
                SyncCommand::ToggleCompleted { id } => self.toggle_completed(id).await,
                SyncCommand::Delete { id } => self.delete(id).await,
                SyncCommand::Shutdown => {
                    tracing::info!("sync coordinator shutting down");
                    break;
                }
            }
        }
    }

    /// Seeds the store from the server, or starts empty when unreachable.
    pub async fn load_initial(&mut self) {
        match self.client.fetch_all().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.store.write().replace_all(tasks);
                tracing::info!(count, "initial load complete");
                self.notify(Notification::success(format!(
                    "Connected, {count} tasks loaded"
                )))
                .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "initial load failed, starting offline");
                self.notify(Notification::info(
                    "Server unreachable, starting with an empty list",
                ))
                .await;
            }
        }
        self.emit_snapshot().await;
    }

    /// Creates a task: remote first, local fallback with a generated
    /// negative id when the server is unreachable.
    pub async fn create(&mut self, mut draft: TaskDraft) {
        match validate_title(&draft.title) {
            Ok(title) => draft.title = title,
            Err(e) => {
                self.notify(Notification::error(e.to_string())).await;
                return;
            }
        }

        match self.client.create(draft.clone()).await {
            Ok(task) => {
                tracing::info!(id = task.id, "task created on server");
                self.store.write().insert(task);
                self.notify(Notification::success("Task created")).await;
            }
            Err(e) => {
                let id = self.alloc_fallback_id();
                tracing::warn!(error = %e, fallback_id = id, "create failed, applying locally");
                self.store.write().insert(draft.into_task(id));
                self.notify(Notification::info(
                    "Saved locally, server unreachable",
                ))
                .await;
            }
        }
        self.emit_snapshot().await;
    }

    /// Replaces a task's editable fields. Tasks that only exist locally
    /// (negative id) are edited without a remote call; for everything else
    /// the server is asked first and its record wins.
    pub async fn update(&mut self, id: i64, mut draft: TaskDraft) {
        match validate_title(&draft.title) {
            Ok(title) => draft.title = title,
            Err(e) => {
                self.notify(Notification::error(e.to_string())).await;
                return;
            }
        }

        let patch = TaskPatch::from_draft(draft);
        if id < 0 {
            self.store.write().apply(id, &patch);
            self.notify(Notification::info("Saved locally, task is not synced"))
                .await;
        } else {
            match self.client.update(id, &patch).await {
                Ok(task) => {
                    tracing::info!(id, "task updated on server");
                    // Unknown local id is a silent no-op; the server copy
                    // still reflects the edit.
                    self.store.write().replace(id, task);
                    self.notify(Notification::success("Task updated")).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "update failed, applying locally");
                    self.store.write().apply(id, &patch);
                    self.notify(Notification::info(
                        "Saved locally, server unreachable",
                    ))
                    .await;
                }
            }
        }
        self.emit_snapshot().await;
    }

    /// Flips a task's completion flag. The new value is derived from the
    /// store, so an unknown id is a complete no-op apart from a notice.
    pub async fn toggle_completed(&mut self, id: i64) {
        let current = self.store.read().find(id).map(|t| t.completed);
        let Some(current) = current else {
            tracing::warn!(id, "toggle for unknown task");
            self.notify(Notification::error("Task no longer exists")).await;
            self.emit_snapshot().await;
            return;
        };
        let completed = !current;
        let done_msg = if completed { "Task completed" } else { "Task reopened" };

        if id < 0 {
            self.store.write().set_completed(id, completed);
            self.notify(Notification::info("Saved locally, task is not synced"))
                .await;
        } else {
            match self.client.update(id, &TaskPatch::completion(completed)).await {
                Ok(task) => {
                    self.store.write().replace(id, task);
                    self.notify(Notification::success(done_msg)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "toggle failed, applying locally");
                    self.store.write().set_completed(id, completed);
                    self.notify(Notification::info(
                        "Saved locally, server unreachable",
                    ))
                    .await;
                }
            }
        }
        self.emit_snapshot().await;
    }

    /// Deletes a task, removing it locally even when the server call fails.
    pub async fn delete(&mut self, id: i64) {
        if id < 0 {
            self.store.write().remove(id);
            self.notify(Notification::success("Task deleted")).await;
        } else {
            match self.client.delete(id).await {
                Ok(()) => {
                    tracing::info!(id, "task deleted on server");
                    self.store.write().remove(id);
                    self.notify(Notification::success("Task deleted")).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "delete failed, removing locally");
                    self.store.write().remove(id);
                    self.notify(Notification::info(
                        "Deleted locally, server unreachable",
                    ))
                    .await;
                }
            }
        }
        self.emit_snapshot().await;
    }

    fn alloc_fallback_id(&mut self) -> i64 {
        let id = self.next_fallback_id;
        self.next_fallback_id -= 1;
        id
    }

    async fn notify(&self, notification: Notification) {
        let _ = self.evt_tx.send(SyncEvent::Notice(notification)).await;
    }

    async fn emit_snapshot(&self) {
        let tasks = self.store.read().tasks().to_vec();
        let _ = self.evt_tx.send(SyncEvent::Snapshot { tasks }).await;
    }
}
