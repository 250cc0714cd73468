//! User-facing notifications, displayed as transient toasts.

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational, including offline fallbacks.
    Info,
    /// An operation succeeded.
    Success,
    /// An operation failed and was not applied.
    Error,
}

impl Severity {
    /// Display symbol prefixed to the toast text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Info => "\u{2139}",
            Self::Success => "\u{2713}",
            Self::Error => "\u{2717}",
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Presentation severity.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
}

impl Notification {
    /// Info-severity notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Success-severity notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Error-severity notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}
