//! Task tool handlers.

use rmcp::model::CallToolResult;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{CreateTaskRequest, TaskFilter, UpdateTaskRequest};
use crate::mcp::format;
use crate::mcp::server::TodoistServer;
use crate::mcp::tools::{
    ResponseFormat, ToolError, ToolResult, check_due_date, check_priority, clean_labels,
    optional_id, optional_text, read_result, required_id, required_text, text_result,
};

const MAX_CONTENT: usize = 5000;
const MAX_DESCRIPTION: usize = 16000;
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    #[schemars(description = "Filter by project ID. If not set, returns all tasks.")]
    pub project_id: Option<String>,
    #[schemars(description = "Filter by label name (e.g., 'urgent', 'work')")]
    pub label: Option<String>,
    #[schemars(
        description = "Todoist filter query (e.g., 'today', 'overdue', 'p1', 'due before: tomorrow')"
    )]
    pub filter: Option<String>,
    #[schemars(description = "Maximum tasks to return (default: 50, max: 200)")]
    pub limit: Option<i64>,
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTaskParams {
    #[schemars(description = "The task ID (e.g., '2995104339')")]
    pub task_id: String,
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    #[schemars(description = "Task content/title (e.g., 'Buy groceries', 'Review PR #123')")]
    pub content: String,
    #[schemars(description = "Detailed task description")]
    pub description: Option<String>,
    #[schemars(description = "Project ID to add task to. If not set, adds to Inbox.")]
    pub project_id: Option<String>,
    #[schemars(
        description = "Natural language due date (e.g., 'tomorrow', 'next Monday', 'Jan 15', 'every week')"
    )]
    pub due_string: Option<String>,
    #[schemars(description = "Due date in YYYY-MM-DD format (e.g., '2024-01-15')")]
    pub due_date: Option<String>,
    #[schemars(description = "Priority 1-4 (4 is highest/red, 1 is lowest)")]
    pub priority: Option<i64>,
    #[schemars(description = "List of label names to apply (e.g., ['work', 'urgent'])")]
    pub labels: Option<Vec<String>>,
    #[schemars(description = "Parent task ID to create as a subtask")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    #[schemars(description = "The task ID to update")]
    pub task_id: String,
    #[schemars(description = "New task content/title")]
    pub content: Option<String>,
    #[schemars(description = "New task description. An empty string clears it.")]
    pub description: Option<String>,
    #[schemars(description = "Natural language due date (e.g., 'tomorrow', 'next Monday')")]
    pub due_string: Option<String>,
    #[schemars(description = "Due date in YYYY-MM-DD format")]
    pub due_date: Option<String>,
    #[schemars(description = "Priority 1-4 (4 is highest)")]
    pub priority: Option<i64>,
    #[schemars(description = "List of label names (replaces existing labels)")]
    pub labels: Option<Vec<String>>,
}

/// Shared by complete, reopen and delete.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TaskIdParams {
    #[schemars(description = "The task ID")]
    pub task_id: String,
}

// =============================================================================
// Validation
// =============================================================================

impl ListTasksParams {
    pub(crate) fn validate(&self) -> ToolResult<(TaskFilter, usize)> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ToolError::validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        // The filter grammar belongs to Todoist; only surrounding whitespace is stripped.
        let filter = TaskFilter {
            project_id: optional_id("project_id", self.project_id.as_deref())?,
            label: optional_text("label", self.label.as_deref(), 255)?,
            filter: optional_text("filter", self.filter.as_deref(), 1024)?,
        };
        Ok((filter, limit as usize))
    }
}

impl CreateTaskParams {
    pub(crate) fn validate(&self) -> ToolResult<CreateTaskRequest> {
        let due_date = check_due_date(self.due_date.as_deref())?;
        let due_string = optional_text("due_string", self.due_string.as_deref(), 255)?;
        let labels = self
            .labels
            .as_deref()
            .map(clean_labels)
            .filter(|l| !l.is_empty());

        Ok(CreateTaskRequest {
            content: required_text("content", &self.content, MAX_CONTENT)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION,
            )?,
            project_id: optional_id("project_id", self.project_id.as_deref())?,
            // due_string wins when both are given
            due_date: if due_string.is_some() { None } else { due_date },
            due_string,
            priority: check_priority(self.priority)?,
            labels,
            parent_id: optional_id("parent_id", self.parent_id.as_deref())?,
        })
    }
}

impl UpdateTaskParams {
    pub(crate) fn validate(&self) -> ToolResult<(String, UpdateTaskRequest)> {
        let task_id = required_id("task_id", &self.task_id)?;
        let due_date = check_due_date(self.due_date.as_deref())?;
        let due_string = optional_text("due_string", self.due_string.as_deref(), 255)?;

        // An explicit empty description is a request to clear it.
        let description = match self.description.as_deref().map(str::trim) {
            Some(d) if d.chars().count() > MAX_DESCRIPTION => {
                return Err(ToolError::validation(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION
                )));
            }
            other => other.map(str::to_string),
        };

        let request = UpdateTaskRequest {
            content: optional_text("content", self.content.as_deref(), MAX_CONTENT)?,
            description,
            due_date: if due_string.is_some() { None } else { due_date },
            due_string,
            priority: check_priority(self.priority)?,
            labels: self.labels.as_deref().map(clean_labels),
        };

        if request.is_empty() {
            return Err(ToolError::validation(
                "No fields to update. Provide at least one field to change.",
            ));
        }
        Ok((task_id, request))
    }
}

// =============================================================================
// Handlers
// =============================================================================

impl TodoistServer {
    pub(crate) async fn run_list_tasks(
        &self,
        params: ListTasksParams,
    ) -> ToolResult<CallToolResult> {
        let (filter, limit) = params.validate()?;
        let mut tasks = self.client().list_tasks(&filter).await?;
        debug!(count = tasks.len(), limit, "Listed tasks");

        if tasks.is_empty() {
            return Ok(text_result("No tasks found matching your criteria."));
        }
        tasks.truncate(limit);

        read_result(&tasks, params.response_format, |t| format::tasks_markdown(t))
    }

    pub(crate) async fn run_get_task(&self, params: GetTaskParams) -> ToolResult<CallToolResult> {
        let id = required_id("task_id", &params.task_id)?;
        let task = self.client().get_task(&id).await?;
        read_result(&task, params.response_format, format::task_markdown)
    }

    pub(crate) async fn run_create_task(
        &self,
        params: CreateTaskParams,
    ) -> ToolResult<CallToolResult> {
        let request = params.validate()?;
        let task = self.client().create_task(&request).await?;

        let due = task
            .due
            .as_ref()
            .map(|d| format!(" due {}", format::format_due(Some(d))))
            .unwrap_or_default();
        Ok(text_result(format!(
            "✅ Created task **{}**{} (ID: `{}`)",
            task.content, due, task.id
        )))
    }

    pub(crate) async fn run_update_task(
        &self,
        params: UpdateTaskParams,
    ) -> ToolResult<CallToolResult> {
        let (id, request) = params.validate()?;
        let task = self.client().update_task(&id, &request).await?;
        Ok(text_result(format!(
            "✅ Updated task **{}** (ID: `{}`)",
            task.content, task.id
        )))
    }

    pub(crate) async fn run_complete_task(
        &self,
        params: TaskIdParams,
    ) -> ToolResult<CallToolResult> {
        let id = required_id("task_id", &params.task_id)?;
        self.client().close_task(&id).await?;
        Ok(text_result(format!("✅ Completed task (ID: `{}`)", id)))
    }

    pub(crate) async fn run_reopen_task(&self, params: TaskIdParams) -> ToolResult<CallToolResult> {
        let id = required_id("task_id", &params.task_id)?;
        self.client().reopen_task(&id).await?;
        Ok(text_result(format!("✅ Reopened task (ID: `{}`)", id)))
    }

    pub(crate) async fn run_delete_task(&self, params: TaskIdParams) -> ToolResult<CallToolResult> {
        let id = required_id("task_id", &params.task_id)?;
        self.client().delete_task(&id).await?;
        Ok(text_result(format!("🗑️ Deleted task (ID: `{}`)", id)))
    }
}
