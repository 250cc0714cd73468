//! Property-based tests for the remote wire format.
//!
//! Uses proptest to verify:
//! 1. Any `Task` survives the trip through `RemoteTask` JSON and back.
//! 2. `TaskPatch` serialization only ever emits the fields that were set.
//! 3. Applying a patch built from a draft reproduces the draft's fields.
//! 4. Title validation accepts exactly the trimmed, bounded titles.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use taskdeck_api::task::{MAX_TITLE_LENGTH, Priority, Task, TaskDraft, validate_title};
use taskdeck_api::wire::{RemoteTask, TaskPatch};

// --- Strategies ---

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Second-aligned timestamps within a sane range. RFC 3339 text keeps
/// second precision, so sub-second values would not round-trip.
fn arb_due_date() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<i64>(),
        "[^\x00]{1,64}",
        "[^\x00]{0,128}",
        prop::option::of(arb_due_date()),
        arb_priority(),
        any::<bool>(),
    )
        .prop_map(|(id, title, description, due_date, priority, completed)| Task {
            id,
            title,
            description,
            due_date,
            priority,
            completed,
        })
}

fn arb_draft() -> impl Strategy<Value = TaskDraft> {
    (
        "[^\x00]{1,64}",
        "[^\x00]{0,128}",
        prop::option::of(arb_due_date()),
        arb_priority(),
    )
        .prop_map(|(title, description, due_date, priority)| TaskDraft {
            title,
            description,
            due_date,
            priority,
        })
}

// --- Properties ---

#[test]
fn empty_patch_serializes_to_an_empty_object() {
    let patch = TaskPatch::default();
    assert!(patch.is_empty());
    let json = serde_json::to_value(&patch).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

proptest! {
    /// Local task -> wire representation -> JSON -> wire -> local task is
    /// lossless.
    #[test]
    fn task_round_trips_through_wire_json(task in arb_task()) {
        let remote = RemoteTask::from(task.clone());
        let json = serde_json::to_string(&remote).unwrap();
        let decoded: RemoteTask = serde_json::from_str(&json).unwrap();
        let back = Task::from(decoded);
        prop_assert_eq!(task, back);
    }

    /// The wire field name for completion never leaks the local name.
    #[test]
    fn completion_uses_the_remote_field_name(task in arb_task()) {
        let json = serde_json::to_value(RemoteTask::from(task)).unwrap();
        prop_assert!(json.get("is_completed").is_some());
        prop_assert!(json.get("completed").is_none());
    }

    /// A completion-only patch carries exactly one field.
    #[test]
    fn completion_patch_is_minimal(completed in any::<bool>()) {
        let json = serde_json::to_value(TaskPatch::completion(completed)).unwrap();
        let object = json.as_object().unwrap();
        prop_assert_eq!(object.len(), 1);
        prop_assert_eq!(object.get("is_completed"), Some(&serde_json::json!(completed)));
    }

    /// Applying a draft-derived patch overwrites exactly the draft fields.
    #[test]
    fn draft_patch_apply_reproduces_draft(task in arb_task(), draft in arb_draft()) {
        let patch = TaskPatch::from_draft(draft.clone());
        let mut patched = task.clone();
        patch.apply_to(&mut patched);

        prop_assert_eq!(patched.id, task.id);
        prop_assert_eq!(patched.completed, task.completed);
        prop_assert_eq!(patched.title, draft.title);
        prop_assert_eq!(patched.description, draft.description);
        prop_assert_eq!(patched.due_date, draft.due_date);
        prop_assert_eq!(patched.priority, draft.priority);
    }

    /// A draft-derived patch round-trips through JSON.
    #[test]
    fn draft_patch_round_trips_through_json(draft in arb_draft()) {
        let patch = TaskPatch::from_draft(draft);
        let json = serde_json::to_string(&patch).unwrap();
        let decoded: TaskPatch = serde_json::from_str(&json).unwrap();

        let mut a = Task { id: 1, title: "x".into(), description: String::new(), due_date: None, priority: Priority::Low, completed: false };
        let mut b = a.clone();
        patch.apply_to(&mut a);
        decoded.apply_to(&mut b);
        prop_assert_eq!(a, b);
    }

    /// Validation accepts any title whose trimmed form is non-empty and
    /// within bounds, and returns the trimmed form.
    #[test]
    fn validation_trims_and_bounds(raw in "[ ]{0,3}[a-zA-Z0-9 ]{0,300}[ ]{0,3}") {
        let trimmed = raw.trim();
        let result = validate_title(&raw);
        if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_LENGTH {
            prop_assert!(result.is_err());
        } else {
            prop_assert_eq!(result.unwrap(), trimmed);
        }
    }
}
