//! Terminal UI rendering.

pub mod form;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let now = Utc::now();

    let toast_count = u16::try_from(app.toasts().count()).unwrap_or(0);
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(toast_count),
            Constraint::Length(1),
        ])
        .split(frame.area());

    task_list::render(frame, main_chunks[0], app, now);
    render_toasts(frame, main_chunks[1], app);
    status_bar::render(frame, main_chunks[2], app, now);

    match &app.mode {
        Mode::List => {}
        Mode::Form(form) => form::render_form(frame, frame.area(), app, form),
        Mode::ConfirmDelete { title, .. } => {
            form::render_confirm(frame, frame.area(), app, title);
        }
    }
}

/// Render transient notification toasts just above the status bar.
fn render_toasts(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let lines: Vec<Line> = app
        .toasts()
        .map(|notice| {
            let style = match notice.severity {
                crate::notify::Severity::Info => app.theme.dimmed(),
                crate::notify::Severity::Success => app.theme.success(),
                crate::notify::Severity::Error => app.theme.error(),
            };
            Line::from(vec![
                Span::styled(notice.severity.symbol(), style),
                Span::raw(" "),
                Span::styled(notice.message.clone(), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Compute a centered rectangle of the given size within `area`.
#[must_use]
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
