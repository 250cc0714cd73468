//! Create/edit form and delete confirmation overlays.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use taskdeck_api::task::Priority;

use super::centered_rect;
use crate::app::{App, FormField, FormState};

const FORM_WIDTH: u16 = 60;
const FORM_HEIGHT: u16 = 12;

/// Render the task form as a centered overlay.
pub fn render_form(frame: &mut Frame, area: Rect, app: &App, form: &FormState) {
    let theme = app.theme;
    let rect = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, rect);

    let title = if form.editing.is_some() {
        " Edit task "
    } else {
        " New task "
    };
    let block = Block::default()
        .title(Span::styled(title, theme.panel_title()))
        .borders(Borders::ALL)
        .border_style(theme.highlighted());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    render_text_field(frame, rows[0], app, form, FormField::Title, "Title", &form.title);
    render_text_field(
        frame,
        rows[1],
        app,
        form,
        FormField::Description,
        "Description",
        &form.description,
    );
    render_text_field(
        frame,
        rows[2],
        app,
        form,
        FormField::DueDate,
        "Due date",
        &form.due_date,
    );
    render_priority_field(frame, rows[3], app, form);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Tab: next field  Enter: save  Esc: cancel",
        theme.dimmed(),
    )));
    frame.render_widget(hint, rows[4]);
}

fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    form: &FormState,
    field: FormField,
    label: &str,
    value: &str,
) {
    let theme = app.theme;
    let focused = form.focus == field;
    let label_style = if focused {
        theme.highlighted()
    } else {
        theme.dimmed()
    };

    let mut spans = vec![
        Span::styled(format!("{label}: "), label_style),
        Span::styled(value.to_string(), theme.normal()),
    ];
    if focused {
        // Block cursor at the end of the focused field.
        spans.push(Span::styled("\u{2588}", theme.highlighted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_priority_field(frame: &mut Frame, area: Rect, app: &App, form: &FormState) {
    let theme = app.theme;
    let focused = form.focus == FormField::Priority;
    let label_style = if focused {
        theme.highlighted()
    } else {
        theme.dimmed()
    };

    let mut spans = vec![Span::styled("Priority: ", label_style)];
    for priority in [Priority::Low, Priority::Medium, Priority::High] {
        let style = if priority == form.priority {
            theme.selected()
        } else {
            theme.dimmed()
        };
        spans.push(Span::styled(format!(" {priority} "), style));
        spans.push(Span::raw(" "));
    }
    if focused {
        spans.push(Span::styled("\u{2190}/\u{2192} to change", theme.dimmed()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the delete confirmation prompt as a centered overlay.
pub fn render_confirm(frame: &mut Frame, area: Rect, app: &App, title: &str) {
    let theme = app.theme;
    let rect = centered_rect(50, 5, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(" Delete task ", theme.panel_title()))
        .borders(Borders::ALL)
        .border_style(theme.error());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::from(Span::styled(
            format!("Delete '{title}'?"),
            theme.normal(),
        )),
        Line::default(),
        Line::from(Span::styled("y: delete  n: cancel", theme.dimmed())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
