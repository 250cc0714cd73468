//! Remote synchronization: HTTP client and the optimistic mutation
//! coordinator that mediates between the UI and the task API.

pub mod client;
pub mod coordinator;

pub use client::ApiClient;
pub use coordinator::{DEFAULT_CHANNEL_CAPACITY, SyncCommand, SyncEvent, spawn_sync};

/// Errors from the remote sync layer.
///
/// Every variant is treated the same way by the coordinator: the mutation
/// is downgraded to a local-only edit and the user is told the change was
/// saved locally. Nothing here is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The configured API base URL could not be parsed.
    #[error("invalid api base url {url}: {source}")]
    InvalidBaseUrl {
        /// The offending URL string.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    BuildClient(#[source] reqwest::Error),

    /// The request could not be completed (connect, timeout, I/O).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}")]
    Http {
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}
