//! In-memory task table backing the API server.
//!
//! The [`TaskTable`] owns the server's task list and assigns sequential
//! positive ids on create. Mutations on unknown ids return `None`/`false`
//! so handlers can map them to 404 responses.

use taskdeck_api::task::Task;
use taskdeck_api::wire::{NewTaskBody, RemoteTask, TaskPatch};
use tokio::sync::RwLock;

/// Thread-safe in-memory task list with sequential id assignment.
pub struct TaskTable {
    inner: RwLock<TableInner>,
}

struct TableInner {
    tasks: Vec<RemoteTask>,
    next_id: i64,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTable {
    /// Creates an empty table. The first created task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a table pre-populated with the given tasks.
    ///
    /// The id counter continues after the highest seeded id.
    #[must_use]
    pub fn with_tasks(tasks: Vec<RemoteTask>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(TableInner { tasks, next_id }),
        }
    }

    /// Returns all tasks in insertion order.
    pub async fn list(&self) -> Vec<RemoteTask> {
        let inner = self.inner.read().await;
        inner.tasks.clone()
    }

    /// Inserts a new task from a create body, assigning the next id.
    pub async fn create(&self, body: NewTaskBody) -> RemoteTask {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let task = RemoteTask {
            id,
            title: body.title,
            description: body.description,
            due_date: body.due_date,
            priority: body.priority,
            completed: body.completed,
        };
        inner.tasks.push(task.clone());
        task
    }

    /// Merges a patch into the task with the given id, returning the updated
    /// record, or `None` if no such task exists.
    pub async fn patch(&self, id: i64, patch: &TaskPatch) -> Option<RemoteTask> {
        let mut inner = self.inner.write().await;
        let slot = inner.tasks.iter_mut().find(|t| t.id == id)?;
        let mut task = Task::from(slot.clone());
        patch.apply_to(&mut task);
        *slot = RemoteTask::from(task);
        Some(slot.clone())
    }

    /// Removes the task with the given id. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        inner.tasks.len() != before
    }

    /// Returns the number of stored tasks.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.tasks.len()
    }

    /// Returns whether the table holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
