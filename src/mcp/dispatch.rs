//! Name-based dispatch over the closed set of tool calls.
//!
//! Serves MCP `tools/call` requests and the `call` subcommand alike, so
//! malformed arguments always surface as error results.

use rmcp::model::{CallToolResult, JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::mcp::server::TodoistServer;
use crate::mcp::tools::{
    CreateLabelParams, CreateProjectParams, CreateTaskParams, GetProjectParams, GetTaskParams,
    ListLabelsParams, ListProjectsParams, ListTasksParams, TaskIdParams, ToolError, ToolResult,
    UpdateTaskParams, finish,
};

/// One fully-typed tool invocation.
#[derive(Debug)]
pub enum ToolCall {
    ListTasks(ListTasksParams),
    GetTask(GetTaskParams),
    CreateTask(CreateTaskParams),
    UpdateTask(UpdateTaskParams),
    CompleteTask(TaskIdParams),
    ReopenTask(TaskIdParams),
    DeleteTask(TaskIdParams),
    ListProjects(ListProjectsParams),
    GetProject(GetProjectParams),
    CreateProject(CreateProjectParams),
    ListLabels(ListLabelsParams),
    CreateLabel(CreateLabelParams),
}

/// Every tool name this server answers to.
pub const TOOL_NAMES: [&str; 12] = [
    "todoist_list_tasks",
    "todoist_get_task",
    "todoist_create_task",
    "todoist_update_task",
    "todoist_complete_task",
    "todoist_reopen_task",
    "todoist_delete_task",
    "todoist_list_projects",
    "todoist_get_project",
    "todoist_create_project",
    "todoist_list_labels",
    "todoist_create_label",
];

fn arguments<T: DeserializeOwned>(args: JsonObject) -> ToolResult<T> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::validation(e.to_string()))
}

impl ToolCall {
    /// Parse a raw invocation. Missing or mistyped arguments and unknown
    /// names fail here, before any request is made.
    pub fn parse(name: &str, args: Option<JsonObject>) -> ToolResult<Self> {
        let args = args.unwrap_or_default();
        let call = match name {
            "todoist_list_tasks" => ToolCall::ListTasks(arguments(args)?),
            "todoist_get_task" => ToolCall::GetTask(arguments(args)?),
            "todoist_create_task" => ToolCall::CreateTask(arguments(args)?),
            "todoist_update_task" => ToolCall::UpdateTask(arguments(args)?),
            "todoist_complete_task" => ToolCall::CompleteTask(arguments(args)?),
            "todoist_reopen_task" => ToolCall::ReopenTask(arguments(args)?),
            "todoist_delete_task" => ToolCall::DeleteTask(arguments(args)?),
            "todoist_list_projects" => ToolCall::ListProjects(arguments(args)?),
            "todoist_get_project" => ToolCall::GetProject(arguments(args)?),
            "todoist_create_project" => ToolCall::CreateProject(arguments(args)?),
            "todoist_list_labels" => ToolCall::ListLabels(arguments(args)?),
            "todoist_create_label" => ToolCall::CreateLabel(arguments(args)?),
            other => {
                return Err(ToolError::validation(format!(
                    "unknown tool '{}'. Available tools: {}",
                    other,
                    TOOL_NAMES.join(", ")
                )));
            }
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListTasks(_) => "todoist_list_tasks",
            ToolCall::GetTask(_) => "todoist_get_task",
            ToolCall::CreateTask(_) => "todoist_create_task",
            ToolCall::UpdateTask(_) => "todoist_update_task",
            ToolCall::CompleteTask(_) => "todoist_complete_task",
            ToolCall::ReopenTask(_) => "todoist_reopen_task",
            ToolCall::DeleteTask(_) => "todoist_delete_task",
            ToolCall::ListProjects(_) => "todoist_list_projects",
            ToolCall::GetProject(_) => "todoist_get_project",
            ToolCall::CreateProject(_) => "todoist_create_project",
            ToolCall::ListLabels(_) => "todoist_list_labels",
            ToolCall::CreateLabel(_) => "todoist_create_label",
        }
    }
}

impl TodoistServer {
    /// Parse and run a raw invocation. Always yields a result; failures are
    /// reported with `is_error` set.
    pub async fn invoke(&self, name: &str, args: Option<JsonObject>) -> CallToolResult {
        match ToolCall::parse(name, args) {
            Ok(call) => self.execute(call).await,
            Err(e) => finish(name, Err(e)),
        }
    }

    /// Run a parsed invocation.
    pub async fn execute(&self, call: ToolCall) -> CallToolResult {
        let name = call.name();
        info!(tool = name, "Executing tool");
        let outcome = match call {
            ToolCall::ListTasks(p) => self.run_list_tasks(p).await,
            ToolCall::GetTask(p) => self.run_get_task(p).await,
            ToolCall::CreateTask(p) => self.run_create_task(p).await,
            ToolCall::UpdateTask(p) => self.run_update_task(p).await,
            ToolCall::CompleteTask(p) => self.run_complete_task(p).await,
            ToolCall::ReopenTask(p) => self.run_reopen_task(p).await,
            ToolCall::DeleteTask(p) => self.run_delete_task(p).await,
            ToolCall::ListProjects(p) => self.run_list_projects(p).await,
            ToolCall::GetProject(p) => self.run_get_project(p).await,
            ToolCall::CreateProject(p) => self.run_create_project(p).await,
            ToolCall::ListLabels(p) => self.run_list_labels(p).await,
            ToolCall::CreateLabel(p) => self.run_create_label(p).await,
        };
        finish(name, outcome)
    }
}
