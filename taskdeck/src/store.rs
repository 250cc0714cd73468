//! In-memory task store, the single source of truth for rendering.
//!
//! The store holds tasks in insertion order. Mutations on ids that are not
//! present return `false` and change nothing; the coordinator decides what
//! to surface to the user. Overdue status and the aggregate counts are
//! always derived from the current list, never cached.

use chrono::{DateTime, Utc};
use taskdeck_api::task::Task;
use taskdeck_api::wire::TaskPatch;

/// Which subset of tasks to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Not completed and not overdue.
    Pending,
    /// Completed tasks.
    Completed,
    /// Incomplete tasks whose due date has passed.
    Overdue,
}

impl Filter {
    /// Returns whether a task belongs to this filter at `now`.
    #[must_use]
    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed && !task.is_overdue(now),
            Self::Completed => task.completed,
            Self::Overdue => task.is_overdue(now),
        }
    }

    /// Next filter in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Completed,
            Self::Completed => Self::Overdue,
            Self::Overdue => Self::All,
        }
    }

    /// Short label for the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }
}

/// Aggregate task counts for the stats line.
///
/// `pending` is `total - completed`, so `total == completed + pending`
/// always holds. Overdue tasks are never completed, so `overdue <= pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks not yet completed.
    pub pending: usize,
    /// Incomplete tasks past their due date.
    pub overdue: usize,
}

impl Stats {
    /// Computes counts over a task slice at `now`.
    #[must_use]
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}

/// Ordered in-memory task list.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates a store seeded with the given tasks.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Replaces the entire contents, used when (re)loading from the server.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// All tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Inserts a task, replacing any existing task with the same id so id
    /// uniqueness always holds.
    pub fn insert(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        } else {
            self.tasks.push(task);
        }
    }

    /// Replaces the task with the given id. Returns whether it existed.
    pub fn replace(&mut self, id: i64, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Merges a patch into the task with the given id.
    /// Returns whether it existed.
    pub fn apply(&mut self, id: i64, patch: &TaskPatch) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                patch.apply_to(task);
                true
            }
            None => false,
        }
    }

    /// Sets the completion flag on a task. Returns whether it existed.
    pub fn set_completed(&mut self, id: i64, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Removes the task with the given id. Returns whether it existed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Tasks matching `filter` at `now`, in insertion order.
    pub fn iter_filtered(
        &self,
        filter: Filter,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| filter.matches(t, now))
    }

    /// Aggregate counts at `now`.
    #[must_use]
    pub fn stats(&self, now: DateTime<Utc>) -> Stats {
        Stats::compute(&self.tasks, now)
    }

    /// Number of tasks in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
