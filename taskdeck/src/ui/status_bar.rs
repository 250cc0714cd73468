//! Status bar rendering.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::store::Stats;

/// Render the one-line status bar: counters on the left, key hints on
/// the right.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let theme = app.theme;
    let stats = Stats::compute(app.tasks(), now);

    let counters = format!(
        " {} tasks \u{2502} {} done \u{2502} {} pending \u{2502} {} overdue ",
        stats.total, stats.completed, stats.pending, stats.overdue,
    );
    let hints = format!(
        "n:new e:edit space:toggle d:delete f:filter({}) t:theme({}) q:quit ",
        app.filter.label(),
        app.theme.label(),
    );

    let gap =
        (area.width as usize).saturating_sub(counters.chars().count() + hints.chars().count());
    let line = Line::from(vec![
        Span::raw(counters),
        Span::raw(" ".repeat(gap)),
        Span::raw(hints),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
}
