//! Theme and styling for the TUI.
//!
//! Two built-in themes (dark and light) with the chosen theme persisted
//! to a small preference file next to the config, so the `t` toggle
//! survives restarts. Preference I/O is best-effort; failures fall back
//! to the configured default.

use std::path::PathBuf;

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the whole UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Short name shown in the status bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    const fn fg(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    const fn fg_dim(self) -> Color {
        match self {
            Self::Dark => Color::Gray,
            Self::Light => Color::DarkGray,
        }
    }

    const fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Blue,
        }
    }

    /// Normal text style.
    #[must_use]
    pub fn normal(self) -> Style {
        Style::default().fg(self.fg())
    }

    /// Dimmed text style (due dates, metadata).
    #[must_use]
    pub fn dimmed(self) -> Style {
        Style::default().fg(self.fg_dim())
    }

    /// Bold text style.
    #[must_use]
    pub fn bold(self) -> Style {
        Style::default().fg(self.fg()).add_modifier(Modifier::BOLD)
    }

    /// Highlighted style (focused form field, active borders).
    #[must_use]
    pub fn highlighted(self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }

    /// Selected row style.
    #[must_use]
    pub fn selected(self) -> Style {
        match self {
            Self::Dark => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Self::Light => Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Style for completed tasks (struck through, dimmed).
    #[must_use]
    pub fn completed(self) -> Style {
        Style::default()
            .fg(self.fg_dim())
            .add_modifier(Modifier::CROSSED_OUT)
    }

    /// Style for overdue tasks.
    #[must_use]
    pub fn overdue(self) -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    /// Style for "due soon" hints and warnings.
    #[must_use]
    pub fn warning(self) -> Style {
        Style::default().fg(Color::Yellow)
    }

    /// Style for success indicators.
    #[must_use]
    pub fn success(self) -> Style {
        Style::default().fg(Color::Green)
    }

    /// Style for error indicators.
    #[must_use]
    pub fn error(self) -> Style {
        Style::default().fg(Color::Red)
    }

    /// Status bar style.
    #[must_use]
    pub fn status_bar(self) -> Style {
        match self {
            Self::Dark => Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50)),
            Self::Light => Style::default().fg(Color::Black).bg(Color::Rgb(210, 215, 230)),
        }
    }

    /// Panel title style.
    #[must_use]
    pub fn panel_title(self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }
}

/// Color for a priority marker, shared by both themes.
#[must_use]
pub const fn priority_color(priority: taskdeck_api::task::Priority) -> Color {
    match priority {
        taskdeck_api::task::Priority::Low => Color::Blue,
        taskdeck_api::task::Priority::Medium => Color::Yellow,
        taskdeck_api::task::Priority::High => Color::Red,
    }
}

fn preference_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("theme"))
}

/// Load the saved theme preference, if any.
#[must_use]
pub fn load_preference() -> Option<Theme> {
    let path = preference_path()?;
    match std::fs::read_to_string(path).ok()?.trim() {
        "dark" => Some(Theme::Dark),
        "light" => Some(Theme::Light),
        _ => None,
    }
}

/// Persist the theme preference. Failures are logged and ignored.
pub fn save_preference(theme: Theme) {
    let Some(path) = preference_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::debug!("could not create config dir: {e}");
            return;
        }
    }
    if let Err(e) = std::fs::write(&path, theme.label()) {
        tracing::debug!("could not save theme preference: {e}");
    }
}
