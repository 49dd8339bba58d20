//! The remote record gateway contract.
//!
//! The task service is treated as a remote object store with eventual,
//! non-transactional writes: fetch a snapshot, request field writes, never
//! assume a write lands before the next read. The rule engine only talks to
//! this trait; [`TaskClient`](crate::client::TaskClient) is the production
//! implementation.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::objects::Task;

/// Errors produced by gateway operations.
///
/// Callers treat every variant as recoverable: failures are logged with
/// context and never retried (the upstream webhook redelivery mechanism is
/// the retry path).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Fetch/update primitives against the remote task store.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetch a task snapshot. `Ok(None)` when the task does not exist.
    async fn get_task(&self, task_id: &str) -> Result<Option<Task>, GatewayError>;

    /// Set the task's status string.
    async fn update_status(&self, task_id: &str, status: &str) -> Result<(), GatewayError>;

    /// Set or clear (`None`) the task's due date, in epoch milliseconds.
    async fn update_due_date(
        &self,
        task_id: &str,
        due_ms: Option<i64>,
    ) -> Result<(), GatewayError>;

    /// Set a date-valued custom field (with time-of-day significance).
    async fn set_date_field(
        &self,
        task_id: &str,
        field_id: &str,
        value_ms: i64,
    ) -> Result<(), GatewayError>;

    /// Clear a custom field.
    async fn clear_field(&self, task_id: &str, field_id: &str) -> Result<(), GatewayError>;

    /// Add the task to a list.
    async fn add_to_list(&self, list_id: &str, task_id: &str) -> Result<(), GatewayError>;

    /// Remove the task from a list.
    async fn remove_from_list(&self, list_id: &str, task_id: &str) -> Result<(), GatewayError>;
}
