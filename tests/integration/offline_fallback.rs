//! Offline behavior of the sync pipeline.
//!
//! Points a coordinator at a port that is guaranteed closed and checks
//! that every mutation still lands in the local store, with informational
//! notices instead of hard failures.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use taskdeck::notify::{Notification, Severity};
use taskdeck::store::TaskStore;
use taskdeck::sync::client::ApiConfig;
use taskdeck::sync::{SyncCommand, SyncEvent, spawn_sync};
use taskdeck_api::task::{Priority, Task, TaskDraft};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind a listener just to learn a free port, then drop it so the port
/// is closed when the client connects.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

struct Harness {
    cmd_tx: mpsc::Sender<SyncCommand>,
    evt_rx: mpsc::Receiver<SyncEvent>,
    store: Arc<RwLock<TaskStore>>,
}

fn offline_harness() -> Harness {
    let api_config = ApiConfig {
        base_url: closed_port_url(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    };
    let store = Arc::new(RwLock::new(TaskStore::new()));
    let (evt_tx, evt_rx) = mpsc::channel(64);
    let cmd_tx = spawn_sync(&api_config, Arc::clone(&store), evt_tx)
        .expect("spawn does not touch the network");

    Harness {
        cmd_tx,
        evt_rx,
        store,
    }
}

async fn next_event(rx: &mut mpsc::Receiver<SyncEvent>) -> SyncEvent {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

async fn next_snapshot(rx: &mut mpsc::Receiver<SyncEvent>) -> Vec<Task> {
    loop {
        if let SyncEvent::Snapshot { tasks } = next_event(rx).await {
            return tasks;
        }
    }
}

async fn next_notice(rx: &mut mpsc::Receiver<SyncEvent>) -> Notification {
    loop {
        if let SyncEvent::Notice(notice) = next_event(rx).await {
            return notice;
        }
    }
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        due_date: None,
        priority: Priority::Medium,
    }
}

#[tokio::test]
async fn initial_load_degrades_to_empty_list() {
    let mut h = offline_harness();

    h.cmd_tx.send(SyncCommand::LoadInitial).await.unwrap();
    let notice = next_notice(&mut h.evt_rx).await;
    assert_eq!(notice.severity, Severity::Info);
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn create_falls_back_to_local_task() {
    let mut h = offline_harness();

    h.cmd_tx
        .send(SyncCommand::Create {
            draft: draft("Unsent letter"),
        })
        .await
        .unwrap();

    let notice = next_notice(&mut h.evt_rx).await;
    assert_eq!(notice.severity, Severity::Info, "offline save is not an error");
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].id < 0, "local-only tasks carry negative ids");
    assert!(tasks[0].is_local_only());
    assert_eq!(tasks[0].title, "Unsent letter");
}

#[tokio::test]
async fn repeated_offline_creates_get_distinct_ids() {
    let mut h = offline_harness();

    for title in ["a", "b", "c"] {
        h.cmd_tx
            .send(SyncCommand::Create {
                draft: draft(title),
            })
            .await
            .unwrap();
        let _ = next_snapshot(&mut h.evt_rx).await;
    }

    let store = h.store.read();
    let ids: Vec<i64> = store.tasks().iter().map(|t| t.id).collect();
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len(), "ids must not collide");
    assert!(ids.iter().all(|&id| id < 0));
}

#[tokio::test]
async fn full_lifecycle_works_without_a_server() {
    let mut h = offline_harness();

    // Create.
    h.cmd_tx
        .send(SyncCommand::Create {
            draft: draft("Errand"),
        })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut h.evt_rx).await;
    let id = tasks[0].id;

    // Edit. Local-only tasks skip the network entirely.
    let mut edited = draft("Errand (revised)");
    edited.priority = Priority::High;
    h.cmd_tx
        .send(SyncCommand::Update { id, draft: edited })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert_eq!(tasks[0].title, "Errand (revised)");
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].id, id, "editing keeps the fallback id");

    // Toggle.
    h.cmd_tx
        .send(SyncCommand::ToggleCompleted { id })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert!(tasks[0].completed);

    // Delete.
    h.cmd_tx.send(SyncCommand::Delete { id }).await.unwrap();
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert!(tasks.is_empty());
    assert!(h.store.read().is_empty());
}

#[tokio::test]
async fn toggle_of_vanished_task_reports_an_error() {
    let mut h = offline_harness();

    h.cmd_tx
        .send(SyncCommand::ToggleCompleted { id: 42 })
        .await
        .unwrap();

    let notice = next_notice(&mut h.evt_rx).await;
    assert_eq!(notice.severity, Severity::Error);
    let tasks = next_snapshot(&mut h.evt_rx).await;
    assert!(tasks.is_empty(), "store is untouched");
}

#[tokio::test]
async fn every_mutation_ends_with_a_snapshot() {
    let mut h = offline_harness();

    let commands = [
        SyncCommand::LoadInitial,
        SyncCommand::Create {
            draft: draft("first"),
        },
        SyncCommand::ToggleCompleted { id: 999 },
        SyncCommand::Delete { id: 999 },
    ];
    for command in commands {
        h.cmd_tx.send(command).await.unwrap();
        // Whatever notices precede it, a snapshot must follow.
        let _ = next_snapshot(&mut h.evt_rx).await;
    }
}
