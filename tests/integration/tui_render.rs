//! TUI rendering checks against an in-memory backend.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use taskdeck::app::{App, Mode};
use taskdeck::notify::Notification;
use taskdeck::ui;
use taskdeck::ui::theme::Theme;
use taskdeck_api::task::{Priority, Task};

fn test_app() -> App {
    App::new(Theme::Dark, "%Y-%m-%d %H:%M".to_string())
}

fn sample_task(id: i64, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        due_date: None,
        priority: Priority::Medium,
        completed: false,
    }
}

/// Render one frame and return the screen contents as a string.
fn render_to_string(app: &App) -> String {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn empty_list_shows_placeholder() {
    let app = test_app();
    let screen = render_to_string(&app);
    assert!(screen.contains("No tasks"));
    assert!(screen.contains("0 tasks"));
}

#[test]
fn tasks_render_with_checkbox_and_priority() {
    let mut app = test_app();
    let mut done = sample_task(2, "Shipped thing");
    done.completed = true;
    app.apply_snapshot(vec![sample_task(1, "Open thing"), done]);

    let screen = render_to_string(&app);
    assert!(screen.contains("[ ] [medium] Open thing"));
    assert!(screen.contains("[\u{2713}] [medium] Shipped thing"));
}

#[test]
fn due_date_and_sync_marker_are_visible() {
    let mut app = test_app();
    let mut task = sample_task(-17, "Local draft");
    task.due_date = Some(Utc::now() + Duration::days(1));
    app.apply_snapshot(vec![task]);

    let screen = render_to_string(&app);
    assert!(screen.contains("due "));
    assert!(screen.contains("(not synced)"));
}

#[test]
fn status_bar_reports_stats_and_filter() {
    let mut app = test_app();
    let mut done = sample_task(2, "b");
    done.completed = true;
    app.apply_snapshot(vec![sample_task(1, "a"), done]);

    let screen = render_to_string(&app);
    assert!(screen.contains("2 tasks"));
    assert!(screen.contains("1 done"));
    assert!(screen.contains("1 pending"));
    assert!(screen.contains("filter(All)"));
}

#[test]
fn filter_hides_non_matching_tasks() {
    let mut app = test_app();
    let mut done = sample_task(2, "Finished");
    done.completed = true;
    app.apply_snapshot(vec![sample_task(1, "Ongoing"), done]);

    app.handle_key_event(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE));
    let screen = render_to_string(&app);
    assert!(screen.contains("Ongoing"));
    assert!(!screen.contains("Finished"));
    assert!(screen.contains("Pending"), "filter label in the frame");
}

#[test]
fn form_overlay_renders_fields() {
    let mut app = test_app();
    app.handle_key_event(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    assert!(matches!(app.mode, Mode::Form(_)));

    let screen = render_to_string(&app);
    assert!(screen.contains("New task"));
    assert!(screen.contains("Title:"));
    assert!(screen.contains("Due date:"));
    assert!(screen.contains("Priority:"));
}

#[test]
fn confirm_overlay_names_the_task() {
    let mut app = test_app();
    app.apply_snapshot(vec![sample_task(9, "Doomed chore")]);
    app.handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE));

    let screen = render_to_string(&app);
    assert!(screen.contains("Delete 'Doomed chore'?"));
    assert!(screen.contains("y: delete"));
}

#[test]
fn toasts_appear_above_the_status_bar() {
    let mut app = test_app();
    app.push_notice(Notification::success("Task created"));

    let screen = render_to_string(&app);
    assert!(screen.contains("Task created"));
}
