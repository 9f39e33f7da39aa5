//! HTTP client for the Todoist REST API.
//!
//! One method per remote endpoint; each issues exactly one request and maps
//! non-success statuses onto [`ApiError`].

mod api_client;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod mock_api;

pub use api_client::{TodoistClient, install_crypto_provider};
pub use error::{ApiError, ApiResult};
pub use models::{
    CreateLabelRequest, CreateProjectRequest, CreateTaskRequest, Due, Label, Project, Task,
    TaskFilter, UpdateTaskRequest,
};
