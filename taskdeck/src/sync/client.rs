//! HTTP client for the remote task API.
//!
//! One method per remote operation, each a single round trip with no
//! retries. Wire translation (`is_completed`, RFC 3339 due dates) happens
//! in the shared wire types; callers only ever see canonical [`Task`]
//! values.

use std::time::Duration;

use taskdeck_api::task::{Task, TaskDraft};
use taskdeck_api::wire::{NewTaskBody, RemoteTask, TaskPatch};
use url::Url;

use super::SyncError;

/// Connection settings for the task API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `http://127.0.0.1:8700`.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

/// Client for the task API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidBaseUrl`] if the base URL does not parse
    /// and [`SyncError::BuildClient`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, SyncError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| SyncError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(SyncError::BuildClient)?;

        Ok(Self { http, base_url })
    }

    /// Fetches the full task collection.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_all(&self) -> Result<Vec<Task>, SyncError> {
        let response = self
            .http
            .get(self.endpoint("tasks"))
            .send()
            .await?;
        let remote: Vec<RemoteTask> = check_status(response)?
            .json()
            .await
            .map_err(SyncError::Decode)?;
        Ok(remote.into_iter().map(Task::from).collect())
    }

    /// Creates a task, returning the server record with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure, a non-2xx status, or an
    /// undecodable body.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, SyncError> {
        let body = NewTaskBody::from(draft);
        let response = self
            .http
            .post(self.endpoint("tasks"))
            .json(&body)
            .send()
            .await?;
        let remote: RemoteTask = check_status(response)?
            .json()
            .await
            .map_err(SyncError::Decode)?;
        Ok(Task::from(remote))
    }

    /// Applies a partial update, returning the updated server record.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure, a non-2xx status
    /// (including 404 for unknown ids), or an undecodable body.
    pub async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, SyncError> {
        let response = self
            .http
            .patch(self.endpoint(&format!("tasks/{id}")))
            .json(patch)
            .send()
            .await?;
        let remote: RemoteTask = check_status(response)?
            .json()
            .await
            .map_err(SyncError::Decode)?;
        Ok(Task::from(remote))
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure or a non-2xx status.
    pub async fn delete(&self, id: i64) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("tasks/{id}")))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// Joins a path onto the base URL without double slashes.
    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }
}

/// Maps a non-success status to [`SyncError::Http`].
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::Http { status })
    }
}
