//! Recurring due-date scanner.
//!
//! A background task that periodically walks the shared store and emits a
//! notice for every incomplete task that is due soon or overdue. Notices
//! re-fire on every tick while the condition holds; there is no
//! de-duplication. The monitor is explicitly owned: it starts via
//! [`DueMonitor::spawn`] and runs until [`DueMonitorHandle::stop`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use taskdeck_api::task::Task;
use tokio::sync::mpsc;

use crate::notify::Notification;
use crate::store::TaskStore;
use crate::sync::SyncEvent;

/// Settings for the due-date monitor.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// How often to scan the store.
    pub check_period: Duration,
    /// How far ahead a due date counts as "due soon".
    pub due_soon_window: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_period: Duration::from_secs(5 * 60),
            due_soon_window: Duration::from_secs(30 * 60),
        }
    }
}

/// Spawns and owns the scanning task.
pub struct DueMonitor;

/// Handle for stopping a running monitor.
pub struct DueMonitorHandle {
    task: tokio::task::JoinHandle<()>,
}

impl DueMonitorHandle {
    /// Stops the monitor. Idempotent; safe to call after the runtime
    /// started shutting down.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the monitor task has finished or been aborted.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DueMonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl DueMonitor {
    /// Starts scanning `store` every `config.check_period`, sending notices
    /// through `evt_tx`. The first scan happens immediately.
    #[must_use]
    pub fn spawn(
        store: Arc<RwLock<TaskStore>>,
        evt_tx: mpsc::Sender<SyncEvent>,
        config: MonitorConfig,
    ) -> DueMonitorHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.check_period);
            loop {
                ticker.tick().await;
                let notices = {
                    let store = store.read();
                    scan(store.tasks(), Utc::now(), config.due_soon_window)
                };
                for notice in notices {
                    if evt_tx.send(SyncEvent::Notice(notice)).await.is_err() {
                        // Receiver dropped; nothing left to notify.
                        return;
                    }
                }
            }
        });
        DueMonitorHandle { task }
    }
}

/// Produces the notices for one scan of the task list at `now`.
///
/// Overdue incomplete tasks get an error notice; incomplete tasks due
/// within `due_soon_window` get an info notice. Completed tasks and tasks
/// without a due date are skipped.
fn scan(tasks: &[Task], now: DateTime<Utc>, due_soon_window: Duration) -> Vec<Notification> {
    let window = chrono::Duration::from_std(due_soon_window)
        .unwrap_or_else(|_| chrono::Duration::minutes(30));
    let mut notices = Vec::new();
    for task in tasks {
        if task.completed {
            continue;
        }
        let Some(due) = task.due_date else { continue };
        if due < now {
            notices.push(Notification::error(format!("Overdue: {}", task.title)));
        } else if due - now <= window {
            notices.push(Notification::info(format!("Due soon: {}", task.title)));
        }
    }
    notices
}
