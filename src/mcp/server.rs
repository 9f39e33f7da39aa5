//! MCP server implementation
//!
//! Registers every Todoist tool with the rmcp router, which supplies the tool
//! list and schemas. Incoming calls are dispatched by name; each registration
//! is also a thin typed wrapper around the same dispatcher.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_router,
};

use crate::client::TodoistClient;
use crate::mcp::dispatch::ToolCall;
use crate::mcp::tools::{
    CreateLabelParams, CreateProjectParams, CreateTaskParams, GetProjectParams, GetTaskParams,
    ListLabelsParams, ListProjectsParams, ListTasksParams, TaskIdParams, UpdateTaskParams,
};

const INSTRUCTIONS: &str = "Todoist MCP Server - Manage Todoist tasks, projects and labels. \
Use todoist_list_projects to find project IDs and todoist_list_tasks to find task IDs. \
Due dates accept natural language ('tomorrow', 'every week'). \
Priority 4 is highest, 1 is lowest.";

/// MCP server exposing the Todoist API as tools.
///
/// Holds no state besides the client, so clones may serve sessions concurrently.
#[derive(Clone)]
pub struct TodoistServer {
    client: TodoistClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TodoistServer {
    pub fn new(client: TodoistClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    pub(crate) fn client(&self) -> &TodoistClient {
        &self.client
    }

    /// Definitions of every registered tool.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    // ---------------------------------------------------------------- tasks

    #[tool(
        name = "todoist_list_tasks",
        description = "List tasks from Todoist with optional filters. Supports filtering by project, label, or Todoist's filter syntax. Common filters: 'today', 'tomorrow', 'overdue', 'p1', 'p2', 'no due date', 'due before: tomorrow', '7 days', '@label_name', '#project_name'.",
        annotations(
            title = "List Todoist Tasks",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn list_tasks(
        &self,
        params: Parameters<ListTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::ListTasks(params.0)).await)
    }

    #[tool(
        name = "todoist_get_task",
        description = "Get details of a specific task, including content, description, due date, priority and labels.",
        annotations(
            title = "Get Todoist Task",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn get_task(
        &self,
        params: Parameters<GetTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::GetTask(params.0)).await)
    }

    #[tool(
        name = "todoist_create_task",
        description = "Create a new task in Todoist. Supports natural language due dates like 'tomorrow', 'next Monday', 'every week'. Priority 4 is highest (red), priority 1 is lowest. Returns the new task ID.",
        annotations(
            title = "Create Todoist Task",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    pub async fn create_task(
        &self,
        params: Parameters<CreateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::CreateTask(params.0)).await)
    }

    #[tool(
        name = "todoist_update_task",
        description = "Update an existing task. Only provided fields are changed; labels replace the existing set. To clear a due date, use the Todoist app.",
        annotations(
            title = "Update Todoist Task",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn update_task(
        &self,
        params: Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::UpdateTask(params.0)).await)
    }

    #[tool(
        name = "todoist_complete_task",
        description = "Mark a task as complete. For recurring tasks, this closes the current occurrence and schedules the next one.",
        annotations(
            title = "Complete Todoist Task",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn complete_task(
        &self,
        params: Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::CompleteTask(params.0)).await)
    }

    #[tool(
        name = "todoist_reopen_task",
        description = "Reopen a completed task.",
        annotations(
            title = "Reopen Todoist Task",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn reopen_task(
        &self,
        params: Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::ReopenTask(params.0)).await)
    }

    #[tool(
        name = "todoist_delete_task",
        description = "Permanently delete a task. This cannot be undone; prefer todoist_complete_task unless the user asked for deletion.",
        annotations(
            title = "Delete Todoist Task",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn delete_task(
        &self,
        params: Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::DeleteTask(params.0)).await)
    }

    // ------------------------------------------------------------- projects

    #[tool(
        name = "todoist_list_projects",
        description = "List all projects in the Todoist account, including shared projects and sub-projects. Use this to get project IDs for creating tasks in specific projects.",
        annotations(
            title = "List Todoist Projects",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn list_projects(
        &self,
        params: Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::ListProjects(params.0)).await)
    }

    #[tool(
        name = "todoist_get_project",
        description = "Get details of a specific project, including name, color and metadata.",
        annotations(
            title = "Get Todoist Project",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn get_project(
        &self,
        params: Parameters<GetProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::GetProject(params.0)).await)
    }

    #[tool(
        name = "todoist_create_project",
        description = "Create a new project. Provide parent_id to create a sub-project. Returns the new project ID.",
        annotations(
            title = "Create Todoist Project",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    pub async fn create_project(
        &self,
        params: Parameters<CreateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::CreateProject(params.0)).await)
    }

    // --------------------------------------------------------------- labels

    #[tool(
        name = "todoist_list_labels",
        description = "List all personal labels. Labels can be applied to tasks for organization and filtering.",
        annotations(
            title = "List Todoist Labels",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn list_labels(
        &self,
        params: Parameters<ListLabelsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::ListLabels(params.0)).await)
    }

    #[tool(
        name = "todoist_create_label",
        description = "Create a new personal label. Returns the new label ID.",
        annotations(
            title = "Create Todoist Label",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    pub async fn create_label(
        &self,
        params: Parameters<CreateLabelParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(ToolCall::CreateLabel(params.0)).await)
    }
}

impl ServerHandler for TodoistServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_instructions(INSTRUCTIONS)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    /// Every call goes through [`TodoistServer::invoke`], so malformed
    /// arguments come back as error results rather than protocol errors.
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.invoke(&request.name, request.arguments).await)
    }
}
