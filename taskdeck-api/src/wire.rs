//! JSON wire types for the remote task API.
//!
//! The remote contract names its completion flag `is_completed` and carries
//! due dates as RFC 3339 strings (or null). All translation between the wire
//! shape and the canonical [`Task`] happens here and nowhere else; request
//! bodies never include an id (the server assigns ids on create).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskDraft};

/// A task as the remote API represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    /// Server-assigned id, positive.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Description, may be absent or empty.
    #[serde(default)]
    pub description: String,
    /// Due date as RFC 3339, or null/absent.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Priority as a lowercase string.
    #[serde(default)]
    pub priority: Priority,
    /// Completion flag under the remote field name.
    #[serde(rename = "is_completed", default)]
    pub completed: bool,
}

impl From<RemoteTask> for Task {
    fn from(remote: RemoteTask) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            description: remote.description,
            due_date: remote.due_date,
            priority: remote.priority,
            completed: remote.completed,
        }
    }
}

impl From<Task> for RemoteTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            completed: task.completed,
        }
    }
}

/// Request body for creating a task. No id field: the server assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaskBody {
    /// Task title.
    pub title: String,
    /// Description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Due date, or null.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Priority as a lowercase string.
    #[serde(default)]
    pub priority: Priority,
    /// Completion flag; new tasks start incomplete.
    #[serde(rename = "is_completed", default)]
    pub completed: bool,
}

impl From<TaskDraft> for NewTaskBody {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            completed: false,
        }
    }
}

/// Partial update body for `PATCH /tasks/{id}`.
///
/// Unset fields are omitted from the serialized body and leave the remote
/// record untouched. `due_date` is double-optional: `None` omits the field,
/// `Some(None)` explicitly clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due date; `Some(None)` clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New priority, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New completion flag, if changing.
    #[serde(
        rename = "is_completed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<bool>,
}

/// Serde adapter for `Option<Option<T>>`: present-but-null means
/// `Some(None)`, absent means `None` (handled by `default` + `skip`).
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

impl TaskPatch {
    /// Patch that replaces every editable field from a draft.
    #[must_use]
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            due_date: Some(draft.due_date),
            priority: Some(draft.priority),
            completed: None,
        }
    }

    /// Patch that only changes the completion flag.
    #[must_use]
    pub const fn completion(completed: bool) -> Self {
        Self {
            title: None,
            description: None,
            due_date: None,
            priority: None,
            completed: Some(completed),
        }
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }

    /// Merges the set fields into `task`, leaving unset fields alone.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
