//! Task list rendering.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use taskdeck_api::task::Task;

use super::theme::priority_color;
use crate::app::App;

/// Render the task list for the active filter.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let visible = app.visible_tasks(now);
    let block = Block::default()
        .title(Span::styled(
            format!(" Tasks \u{2500} {} ", app.filter.label()),
            app.theme.panel_title(),
        ))
        .borders(Borders::ALL)
        .border_style(app.theme.dimmed());

    if visible.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No tasks. Press 'n' to create one.",
            app.theme.dimmed(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| ListItem::new(task_line(task, app, now)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected.min(visible.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Build the display line for a single task.
fn task_line<'a>(task: &'a Task, app: &App, now: DateTime<Utc>) -> Line<'a> {
    let theme = app.theme;
    let checkbox = if task.completed {
        "[\u{2713}]"
    } else {
        "[ ]"
    };
    let title_style = if task.completed {
        theme.completed()
    } else if task.is_overdue(now) {
        theme.overdue()
    } else {
        theme.normal()
    };

    let mut spans = vec![
        Span::styled(checkbox, theme.normal()),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority),
            ratatui::style::Style::default().fg(priority_color(task.priority)),
        ),
        Span::raw(" "),
        Span::styled(task.title.as_str(), title_style),
    ];

    if let Some(due) = task.due_date {
        let due_style = if task.is_overdue(now) {
            theme.overdue()
        } else {
            theme.dimmed()
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("due {}", due.format(&app.timestamp_format)),
            due_style,
        ));
    }

    if task.is_local_only() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("(not synced)", theme.warning()));
    }

    Line::from(spans)
}
