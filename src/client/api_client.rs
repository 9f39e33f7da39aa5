use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::error::{ApiError, ApiResult};
use crate::client::models::{
    CreateLabelRequest, CreateProjectRequest, CreateTaskRequest, Label, Project, Task, TaskFilter,
    UpdateTaskRequest,
};
use crate::config::Config;

/// Longest slice of an error body echoed back to the caller.
const MAX_ERROR_BODY: usize = 500;

/// Install the ring crypto provider for rustls. Safe to call repeatedly.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Client for the Todoist REST API.
///
/// Cheap to clone: clones share one connection pool. Holds exactly one
/// bearer token for its lifetime.
#[derive(Clone, Debug)]
pub struct TodoistClient {
    base_url: Url,
    client: Client,
}

impl TodoistClient {
    /// Create a client from startup configuration.
    pub fn new(config: &Config) -> ApiResult<Self> {
        install_crypto_provider();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token()))
            .map_err(|e| ApiError::Setup {
                message: e.to_string(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Setup {
                message: e.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url().clone(),
            client,
        })
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL. Each segment is percent-encoded, so ids cannot
    /// escape their path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(method = %method, path = url.path(), "Todoist request");
        self.client.request(method, url)
    }

    /// Send a request, turning non-success statuses into typed errors.
    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(status = status.as_u16(), %message, "Todoist API rejected request");
        Err(ApiError::from_status(status.as_u16(), message))
    }

    /// Send a request and deserialize the JSON body.
    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        let response = Self::send(request).await?;
        response.json().await.map_err(|e| ApiError::InvalidResponse {
            message: e.to_string(),
        })
    }

    // ----------------------------------------------------------------- tasks

    /// List active tasks. Only the filters that are set go on the query string.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> ApiResult<Vec<Task>> {
        Self::send_json(self.request(Method::GET, &["tasks"]).query(filter)).await
    }

    pub async fn get_task(&self, id: &str) -> ApiResult<Task> {
        Self::send_json(self.request(Method::GET, &["tasks", id])).await
    }

    pub async fn create_task(&self, body: &CreateTaskRequest) -> ApiResult<Task> {
        Self::send_json(self.request(Method::POST, &["tasks"]).json(body)).await
    }

    /// Partial update; the remote API takes updates as POST on the task path.
    pub async fn update_task(&self, id: &str, body: &UpdateTaskRequest) -> ApiResult<Task> {
        Self::send_json(self.request(Method::POST, &["tasks", id]).json(body)).await
    }

    pub async fn close_task(&self, id: &str) -> ApiResult<()> {
        Self::send(self.request(Method::POST, &["tasks", id, "close"])).await?;
        Ok(())
    }

    pub async fn reopen_task(&self, id: &str) -> ApiResult<()> {
        Self::send(self.request(Method::POST, &["tasks", id, "reopen"])).await?;
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        Self::send(self.request(Method::DELETE, &["tasks", id])).await?;
        Ok(())
    }

    // -------------------------------------------------------------- projects

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        Self::send_json(self.request(Method::GET, &["projects"])).await
    }

    pub async fn get_project(&self, id: &str) -> ApiResult<Project> {
        Self::send_json(self.request(Method::GET, &["projects", id])).await
    }

    pub async fn create_project(&self, body: &CreateProjectRequest) -> ApiResult<Project> {
        Self::send_json(self.request(Method::POST, &["projects"]).json(body)).await
    }

    // ---------------------------------------------------------------- labels

    pub async fn list_labels(&self) -> ApiResult<Vec<Label>> {
        Self::send_json(self.request(Method::GET, &["labels"])).await
    }

    pub async fn create_label(&self, body: &CreateLabelRequest) -> ApiResult<Label> {
        Self::send_json(self.request(Method::POST, &["labels"]).json(body)).await
    }
}

/// Pull a human-readable message out of an error response.
///
/// Prefers a JSON `error` or `message` field, then the raw body, then the
/// status reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_ERROR_BODY).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
