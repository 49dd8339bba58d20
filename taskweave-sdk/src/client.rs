//! Reqwest-backed implementation of [`RecordGateway`].
//!
//! Every request carries the static service token and inherits the
//! client-wide timeout; there is no retry logic at this layer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::json;
use url::Url;

use crate::gateway::{GatewayError, RecordGateway};
use crate::objects::Task;

/// Default timeout applied to every gateway request.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// HTTP client for the task-service record API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl TaskClient {
    /// Create a new client.
    ///
    /// * `base_url` – root URL of the task service API.
    /// * `token` – static bearer token for the `Authorization` header.
    ///
    /// Fails only when the TLS backend cannot be initialized; the timeout
    /// is never silently dropped.
    pub fn new(base_url: Url, token: impl Into<String>) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy or a different timeout).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl RecordGateway for TaskClient {
    async fn get_task(&self, task_id: &str) -> Result<Option<Task>, GatewayError> {
        let url = self.endpoint(&format!("/task/{task_id}"))?;
        let resp = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let task = parse_response(resp).await?;
        Ok(Some(task))
    }

    async fn update_status(&self, task_id: &str, status: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/task/{task_id}"))?;
        let resp = self
            .http
            .put(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "status": status }))
            .send()
            .await?;
        check_response(resp).await
    }

    async fn update_due_date(
        &self,
        task_id: &str,
        due_ms: Option<i64>,
    ) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/task/{task_id}"))?;
        let resp = self
            .http
            .put(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "due_date": due_ms }))
            .send()
            .await?;
        check_response(resp).await
    }

    async fn set_date_field(
        &self,
        task_id: &str,
        field_id: &str,
        value_ms: i64,
    ) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/task/{task_id}/field/{field_id}"))?;
        let resp = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&json!({
                "value": value_ms,
                "value_options": { "time": true },
            }))
            .send()
            .await?;
        check_response(resp).await
    }

    async fn clear_field(&self, task_id: &str, field_id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/task/{task_id}/field/{field_id}"))?;
        let resp = self
            .http
            .delete(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        check_response(resp).await
    }

    async fn add_to_list(&self, list_id: &str, task_id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/list/{list_id}/task/{task_id}"))?;
        let resp = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        check_response(resp).await
    }

    async fn remove_from_list(&self, list_id: &str, task_id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/list/{list_id}/task/{task_id}"))?;
        let resp = self
            .http
            .delete(url)
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        check_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(GatewayError::Json)
}

async fn check_response(resp: reqwest::Response) -> Result<(), GatewayError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Api { status, body });
    }
    Ok(())
}
