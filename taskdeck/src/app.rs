//! Application state and input handling for the `TaskDeck` TUI.
//!
//! `App` owns everything the render pass needs: the latest task snapshot,
//! the active filter, selection, modal state, and transient toasts. Input
//! handling translates key events into [`SyncCommand`]s; the caller is
//! responsible for dispatching them to the sync coordinator.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_api::task::{MAX_TITLE_LENGTH, Priority, Task, TaskDraft, validate_title};

use crate::notify::Notification;
use crate::store::Filter;
use crate::sync::SyncCommand;
use crate::ui::theme::Theme;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Maximum number of toasts kept visible at once.
const MAX_TOASTS: usize = 4;

/// Which input of the task form currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
    Priority,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Priority,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
            Self::Priority => Self::DueDate,
        }
    }
}

/// State of the create/edit form overlay.
#[derive(Debug, Clone)]
pub struct FormState {
    /// `Some(id)` when editing an existing task, `None` when creating.
    pub editing: Option<i64>,
    pub title: String,
    pub description: String,
    /// Raw due-date text, parsed on submit.
    pub due_date: String,
    pub priority: Priority,
    pub focus: FormField,
    /// Cursor position (byte offset) within the focused text field.
    pub cursor: usize,
}

impl FormState {
    /// Blank form for creating a new task.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: Priority::Medium,
            focus: FormField::Title,
            cursor: 0,
        }
    }

    /// Form pre-filled from an existing task for editing.
    #[must_use]
    pub fn editing(task: &Task, timestamp_format: &str) -> Self {
        Self {
            editing: Some(task.id),
            title: task.title.clone(),
            cursor: task.title.len(),
            description: task.description.clone(),
            due_date: task
                .due_date
                .map(|due| due.format(timestamp_format).to_string())
                .unwrap_or_default(),
            priority: task.priority,
            focus: FormField::Title,
        }
    }

    /// Mutable reference to the focused text field, if the focused field
    /// is a text field.
    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }

    fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text() {
            if cursor <= text.len() {
                text.insert(cursor, c);
                self.cursor = cursor + c.len_utf8();
            }
        }
    }

    fn delete_char(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text() {
            if cursor > 0 && cursor <= text.len() {
                let mut start = cursor - 1;
                while !text.is_char_boundary(start) {
                    start -= 1;
                }
                text.remove(start);
                self.cursor = start;
            }
        }
    }

    fn move_focus(&mut self, field: FormField) {
        self.focus = field;
        self.cursor = match field {
            FormField::Title => self.title.len(),
            FormField::Description => self.description.len(),
            FormField::DueDate => self.due_date.len(),
            FormField::Priority => 0,
        };
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Current interaction mode of the UI.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Browsing the task list.
    List,
    /// Creating or editing a task in the form overlay.
    Form(FormState),
    /// Awaiting confirmation before deleting a task.
    ConfirmDelete { id: i64, title: String },
}

/// A notification with an on-screen expiry.
#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    expires_at: Instant,
}

/// Top-level application state.
pub struct App {
    /// Latest task snapshot from the sync coordinator.
    tasks: Vec<Task>,
    /// Active list filter.
    pub filter: Filter,
    /// Selected row within the filtered view.
    pub selected: usize,
    pub mode: Mode,
    toasts: VecDeque<Toast>,
    pub theme: Theme,
    /// Format string used to render and parse due dates.
    pub timestamp_format: String,
    /// Longest title the form accepts, never above the API limit.
    max_title_length: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(theme: Theme, timestamp_format: String) -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            selected: 0,
            mode: Mode::List,
            toasts: VecDeque::new(),
            theme,
            timestamp_format,
            max_title_length: MAX_TITLE_LENGTH,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_max_title_length(mut self, max_title_length: usize) -> Self {
        self.max_title_length = max_title_length.min(MAX_TITLE_LENGTH);
        self
    }

    /// All tasks in the latest snapshot, unfiltered.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks matching the active filter, in snapshot order.
    #[must_use]
    pub fn visible_tasks(&self, now: DateTime<Utc>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task, now))
            .collect()
    }

    /// The currently selected task, if the filtered view is non-empty.
    #[must_use]
    pub fn selected_task(&self, now: DateTime<Utc>) -> Option<&Task> {
        self.visible_tasks(now).get(self.selected).copied()
    }

    /// Replace the task list with a fresh snapshot, keeping the selection
    /// in bounds.
    pub fn apply_snapshot(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.clamp_selection(Utc::now());
    }

    /// Queue a notification toast.
    pub fn push_notice(&mut self, notification: Notification) {
        self.toasts.push_back(Toast {
            notification,
            expires_at: Instant::now() + TOAST_TTL,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Active toasts, oldest first.
    pub fn toasts(&self) -> impl Iterator<Item = &Notification> {
        self.toasts.iter().map(|toast| &toast.notification)
    }

    /// Periodic housekeeping: drop expired toasts.
    pub fn tick(&mut self) {
        let now = Instant::now();
        while self
            .toasts
            .front()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toasts.pop_front();
        }
    }

    fn clamp_selection(&mut self, now: DateTime<Utc>) {
        let visible = self.visible_tasks(now).len();
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    /// Handle a key event, returning a sync command to dispatch if the
    /// key triggered a mutation.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match &self.mode {
            Mode::List => self.handle_list_key(key),
            Mode::Form(_) => self.handle_form_key(key),
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        let now = Utc::now();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let visible = self.visible_tasks(now).len();
                if visible > 0 && self.selected + 1 < visible {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('n') => {
                self.mode = Mode::Form(FormState::new());
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task(now) {
                    self.mode = Mode::Form(FormState::editing(task, &self.timestamp_format));
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(task) = self.selected_task(now) {
                    return Some(SyncCommand::ToggleCompleted { id: task.id });
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task(now) {
                    self.mode = Mode::ConfirmDelete {
                        id: task.id,
                        title: task.title.clone(),
                    };
                }
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.selected = 0;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.toggle();
                crate::ui::theme::save_preference(self.theme);
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        let Mode::Form(form) = &mut self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::List;
            }
            KeyCode::Tab | KeyCode::Down => {
                let next = form.focus.next();
                form.move_focus(next);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let prev = form.focus.prev();
                form.move_focus(prev);
            }
            KeyCode::Left if form.focus == FormField::Priority => {
                form.priority = match form.priority {
                    Priority::Low => Priority::High,
                    Priority::Medium => Priority::Low,
                    Priority::High => Priority::Medium,
                };
            }
            KeyCode::Right if form.focus == FormField::Priority => {
                form.priority = match form.priority {
                    Priority::Low => Priority::Medium,
                    Priority::Medium => Priority::High,
                    Priority::High => Priority::Low,
                };
            }
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.insert_char(c);
            }
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        let Mode::ConfirmDelete { id, .. } = &self.mode else {
            return None;
        };
        let id = *id;
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = Mode::List;
                Some(SyncCommand::Delete { id })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.mode = Mode::List;
                None
            }
            _ => None,
        }
    }

    /// Validate the form and turn it into a create or update command.
    ///
    /// On a rejected title or an unparsable due date the form stays open
    /// with an error toast so the user can fix the input.
    fn submit_form(&mut self) -> Option<SyncCommand> {
        let Mode::Form(form) = &self.mode else {
            return None;
        };

        let title = match validate_title(&form.title) {
            Ok(title) => title,
            Err(error) => {
                self.push_notice(Notification::error(error.to_string()));
                return None;
            }
        };
        if title.chars().count() > self.max_title_length {
            let limit = self.max_title_length;
            self.push_notice(Notification::error(format!(
                "task title exceeds {limit} characters"
            )));
            return None;
        }

        let due_date = match parse_due_date(&form.due_date, &self.timestamp_format) {
            Ok(due) => due,
            Err(UnrecognizedDate) => {
                let input = form.due_date.trim().to_string();
                self.push_notice(Notification::error(format!(
                    "Unrecognized due date '{input}'"
                )));
                return None;
            }
        };

        let draft = TaskDraft {
            title,
            description: form.description.trim().to_string(),
            due_date,
            priority: form.priority,
        };
        let command = match form.editing {
            Some(id) => SyncCommand::Update { id, draft },
            None => SyncCommand::Create { draft },
        };
        self.mode = Mode::List;
        Some(command)
    }
}

/// Marker error for a due date string that matched no accepted format.
#[derive(Debug, PartialEq, Eq)]
struct UnrecognizedDate;

/// Parse a user-entered due date.
///
/// Accepts the configured timestamp format, a bare `YYYY-MM-DD` date
/// (interpreted as midnight UTC), or the empty string for "no due date".
fn parse_due_date(
    input: &str,
    timestamp_format: &str,
) -> Result<Option<DateTime<Utc>>, UnrecognizedDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, timestamp_format) {
        return Ok(Some(dt.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(dt.and_utc()));
        }
    }
    Err(UnrecognizedDate)
}
