//! Canonical task model shared by the client and the task API server.
//!
//! This is the single internal record shape: everything that talks to the
//! remote API converts to and from [`crate::wire`] types at the HTTP
//! boundary, and everything else works with [`Task`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Validation errors for user-entered task fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Title is empty or whitespace-only.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Title exceeds [`MAX_TITLE_LENGTH`] characters.
    #[error("task title exceeds {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
}

/// Validates a task title, returning the trimmed form.
///
/// # Errors
///
/// Returns [`TaskError::TitleEmpty`] for empty or whitespace-only input and
/// [`TaskError::TitleTooLong`] when the trimmed title exceeds
/// [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::TitleEmpty);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

/// Task priority. Defaults to [`Priority::Medium`] when the user leaves the
/// field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Parses a lowercase priority name, falling back to the default for
    /// anything unrecognized.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A to-do item.
///
/// Server-assigned ids are positive; ids generated locally when a remote
/// create fails are negative (epoch milliseconds negated), so the two ranges
/// never collide. Overdue status is derived via [`Task::is_overdue`] and is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the store.
    pub id: i64,
    /// Non-empty title.
    pub title: String,
    /// Free-form description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Returns whether this task has a locally generated fallback id,
    /// i.e. it was created while the remote API was unreachable.
    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.id < 0
    }

    /// Returns whether the task is overdue at `now`: has a due date in the
    /// past and is not completed. Always recomputed, never cached.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// User-entered fields for creating a task or replacing its editable fields.
///
/// The id and completion flag are never part of a draft: ids come from the
/// server (or the local fallback generator) and completion is toggled
/// through its own operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title, validated with [`validate_title`] before use.
    pub title: String,
    /// Description, may be empty.
    pub description: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority, defaulting to medium.
    pub priority: Priority,
}

impl TaskDraft {
    /// Builds a [`Task`] from this draft with the given id, not completed.
    #[must_use]
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            completed: false,
        }
    }
}
