//! MCP tool implementations
//!
//! Parameter structs and handler logic, organized by entity type. The
//! `#[tool]` registrations live on [`TodoistServer`](crate::mcp::TodoistServer).

mod labels;
mod projects;
mod tasks;


pub use labels::{CreateLabelParams, ListLabelsParams};
pub use projects::{CreateProjectParams, GetProjectParams, ListProjectsParams};
pub use tasks::{
    CreateTaskParams, GetTaskParams, ListTasksParams, TaskIdParams, UpdateTaskParams,
};

use miette::Diagnostic;
use rmcp::model::{CallToolResult, Content};
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::client::ApiError;

/// Output format for read tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown
    #[default]
    Markdown,
    /// Raw JSON as returned by Todoist
    Json,
}

/// Failure of a single tool invocation.
#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {message}")]
    #[diagnostic(code(todoist_mcp::tool::validation))]
    Validation { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to encode response: {message}")]
    #[diagnostic(code(todoist_mcp::tool::encode))]
    Encode { message: String },
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Encode {
            message: e.to_string(),
        }
    }
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation {
            message: message.into(),
        }
    }

    /// Actionable message shown to the assistant.
    pub fn user_message(&self) -> String {
        match self {
            ToolError::Validation { message } => format!("Error: {}", message),
            ToolError::Encode { message } => format!("Error: {}", message),
            ToolError::Api(api) => api_message(api),
        }
    }

    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(self.user_message())])
    }
}

fn api_message(error: &ApiError) -> String {
    match (error.status(), error) {
        (Some(400), ApiError::Remote { message, .. }) => format!(
            "Error: Invalid request. Check your parameters are correct. (Todoist: {})",
            message
        ),
        (Some(401), _) => {
            "Error: Invalid API token. Check TODOIST_API_TOKEN is correct.".to_string()
        }
        (Some(403), _) => {
            "Error: Permission denied. You may not have access to this resource.".to_string()
        }
        (Some(404), _) => "Error: Resource not found. Check the ID is correct.".to_string(),
        (Some(429), _) => {
            "Error: Rate limit exceeded. Please wait before making more requests.".to_string()
        }
        (Some(status), _) if status >= 500 => {
            "Error: Todoist server error. Please try again later.".to_string()
        }
        (Some(status), ApiError::Remote { message, .. }) => {
            format!("Error: API request failed with status {}: {}", status, message)
        }
        (_, ApiError::Timeout) => "Error: Request timed out. Please try again.".to_string(),
        (_, e) if e.is_unreachable() => {
            "Error: Could not reach the Todoist API. Check your network connection.".to_string()
        }
        (_, e) => format!("Error: {}", e),
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Convert a handler outcome into what the assistant sees. Failures become
/// error results, never protocol errors.
pub(crate) fn finish(tool: &str, outcome: ToolResult<CallToolResult>) -> CallToolResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!(tool, error = %e, "Tool invocation failed");
            e.into_call_result()
        }
    }
}

pub(crate) fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Render a read result: pretty JSON, or Markdown with the raw value attached
/// as structured content.
pub(crate) fn read_result<T: Serialize>(
    value: &T,
    format: ResponseFormat,
    markdown: impl FnOnce(&T) -> String,
) -> ToolResult<CallToolResult> {
    match format {
        ResponseFormat::Json => Ok(text_result(serde_json::to_string_pretty(value)?)),
        ResponseFormat::Markdown => {
            let raw = match serde_json::to_value(value)? {
                object @ serde_json::Value::Object(_) => object,
                other => serde_json::json!({ "items": other }),
            };
            let mut result = text_result(markdown(value));
            result.structured_content = Some(raw);
            Ok(result)
        }
    }
}

// =============================================================================
// Argument checks
// =============================================================================

/// Trim a required string and enforce its length bounds.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> ToolResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation(format!("{} must not be empty", field)));
    }
    check_max(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trim an optional string; blank values count as absent.
pub(crate) fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ToolResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_max(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

fn check_max(field: &str, value: &str, max: usize) -> ToolResult<()> {
    if value.chars().count() > max {
        return Err(ToolError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Ids become URL path segments, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn required_id(field: &str, value: &str) -> ToolResult<String> {
    let id = required_text(field, value, MAX_ID_LEN)?;
    check_id_chars(field, &id)?;
    Ok(id)
}

pub(crate) fn optional_id(field: &str, value: Option<&str>) -> ToolResult<Option<String>> {
    let id = optional_text(field, value, MAX_ID_LEN)?;
    if let Some(id) = &id {
        check_id_chars(field, id)?;
    }
    Ok(id)
}

fn check_id_chars(field: &str, id: &str) -> ToolResult<()> {
    if id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "{} may only contain letters, digits, '_' and '-'",
            field
        )))
    }
}

const MAX_ID_LEN: usize = 128;

/// Priority must be one of 1-4 (4 is highest).
pub(crate) fn check_priority(priority: Option<i64>) -> ToolResult<Option<u8>> {
    match priority {
        None => Ok(None),
        Some(p @ 1..=4) => Ok(Some(p as u8)),
        Some(p) => Err(ToolError::validation(format!(
            "priority must be between 1 and 4 (4 is highest), got {}",
            p
        ))),
    }
}

/// Validate a `YYYY-MM-DD` date.
pub(crate) fn check_due_date(due_date: Option<&str>) -> ToolResult<Option<String>> {
    match due_date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|_| Some(date.to_string()))
            .map_err(|_| ToolError::validation("due_date must be in YYYY-MM-DD format")),
    }
}

/// Trim label names, dropping blanks.
pub(crate) fn clean_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
