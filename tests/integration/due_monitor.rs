//! Due-date monitor behavior against a shared store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::mpsc;

use taskdeck::monitor::{DueMonitor, MonitorConfig};
use taskdeck::notify::Severity;
use taskdeck::store::TaskStore;
use taskdeck::sync::SyncEvent;
use taskdeck_api::task::{Priority, Task};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn task_due_in(id: i64, title: &str, offset: chrono::Duration) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        due_date: Some(Utc::now() + offset),
        priority: Priority::Medium,
        completed: false,
    }
}

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        check_period: Duration::from_millis(50),
        due_soon_window: Duration::from_secs(30 * 60),
    }
}

async fn recv_notice(rx: &mut mpsc::Receiver<SyncEvent>) -> taskdeck::notify::Notification {
    loop {
        let event = tokio::time::timeout(RECV_TIMEOUT, rx.recv())
            .await
            .expect("event within timeout")
            .expect("channel open");
        if let SyncEvent::Notice(notice) = event {
            return notice;
        }
    }
}

#[tokio::test]
async fn overdue_task_triggers_error_notice() {
    let store = Arc::new(RwLock::new(TaskStore::from_tasks(vec![task_due_in(
        1,
        "File taxes",
        chrono::Duration::hours(-2),
    )])));
    let (evt_tx, mut evt_rx) = mpsc::channel(16);
    let monitor = DueMonitor::spawn(Arc::clone(&store), evt_tx, fast_config());

    let notice = recv_notice(&mut evt_rx).await;
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("File taxes"));

    monitor.stop();
}

#[tokio::test]
async fn due_soon_task_triggers_info_notice() {
    let store = Arc::new(RwLock::new(TaskStore::from_tasks(vec![task_due_in(
        1,
        "Standup",
        chrono::Duration::minutes(10),
    )])));
    let (evt_tx, mut evt_rx) = mpsc::channel(16);
    let monitor = DueMonitor::spawn(Arc::clone(&store), evt_tx, fast_config());

    let notice = recv_notice(&mut evt_rx).await;
    assert_eq!(notice.severity, Severity::Info);
    assert!(notice.message.contains("Standup"));

    monitor.stop();
}

#[tokio::test]
async fn notices_repeat_on_later_scans() {
    let store = Arc::new(RwLock::new(TaskStore::from_tasks(vec![task_due_in(
        1,
        "Persistent nag",
        chrono::Duration::hours(-1),
    )])));
    let (evt_tx, mut evt_rx) = mpsc::channel(16);
    let monitor = DueMonitor::spawn(Arc::clone(&store), evt_tx, fast_config());

    // The monitor keeps no per-task memory, so the same overdue task is
    // reported on every scan.
    let first = recv_notice(&mut evt_rx).await;
    let second = recv_notice(&mut evt_rx).await;
    assert_eq!(first.message, second.message);

    monitor.stop();
}

#[tokio::test]
async fn completing_a_task_silences_it() {
    let mut task = task_due_in(1, "Done deal", chrono::Duration::hours(-1));
    let store = Arc::new(RwLock::new(TaskStore::from_tasks(vec![task.clone()])));
    let (evt_tx, mut evt_rx) = mpsc::channel(16);
    let monitor = DueMonitor::spawn(Arc::clone(&store), evt_tx, fast_config());

    // It nags while open.
    let _ = recv_notice(&mut evt_rx).await;

    // Complete it, let in-flight scans settle, then drain the backlog.
    task.completed = true;
    store.write().replace(1, task);
    tokio::time::sleep(Duration::from_millis(150)).await;
    while evt_rx.try_recv().is_ok() {}

    // After a few scan periods no further notice should arrive.
    let quiet = tokio::time::timeout(Duration::from_millis(300), recv_notice(&mut evt_rx)).await;
    assert!(quiet.is_err(), "completed tasks are never reported");

    monitor.stop();
}

#[tokio::test]
async fn stop_halts_scanning() {
    let store = Arc::new(RwLock::new(TaskStore::from_tasks(vec![task_due_in(
        1,
        "Noisy",
        chrono::Duration::hours(-1),
    )])));
    let (evt_tx, mut evt_rx) = mpsc::channel(16);
    let monitor = DueMonitor::spawn(Arc::clone(&store), evt_tx, fast_config());

    let _ = recv_notice(&mut evt_rx).await;
    monitor.stop();

    // Give the abort a moment to land, then drain the channel.
    tokio::time::sleep(Duration::from_millis(100)).await;
    while evt_rx.try_recv().is_ok() {}

    let quiet = tokio::time::timeout(Duration::from_millis(300), evt_rx.recv()).await;
    assert!(quiet.is_err(), "no events after stop");
}
