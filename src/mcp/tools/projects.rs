//! Project tool handlers.

use rmcp::model::CallToolResult;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::client::CreateProjectRequest;
use crate::mcp::format;
use crate::mcp::server::TodoistServer;
use crate::mcp::tools::{
    ResponseFormat, ToolResult, optional_id, optional_text, read_result, required_id,
    required_text, text_result,
};

const MAX_NAME: usize = 500;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectsParams {
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectParams {
    #[schemars(description = "The project ID (e.g., '2203306141')")]
    pub project_id: String,
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateProjectParams {
    #[schemars(description = "Name of the project (e.g., 'Work Tasks', 'Home Renovation')")]
    pub name: String,
    #[schemars(description = "Parent project ID to create as a sub-project")]
    pub parent_id: Option<String>,
    #[schemars(
        description = "Color name: berry_red, red, orange, yellow, olive_green, lime_green, green, mint_green, teal, sky_blue, light_blue, blue, grape, violet, lavender, magenta, salmon, charcoal, grey, taupe"
    )]
    pub color: Option<String>,
    #[schemars(description = "Whether to mark as favorite")]
    #[serde(default)]
    pub is_favorite: bool,
}

impl CreateProjectParams {
    pub(crate) fn validate(&self) -> ToolResult<CreateProjectRequest> {
        Ok(CreateProjectRequest {
            name: required_text("name", &self.name, MAX_NAME)?,
            parent_id: optional_id("parent_id", self.parent_id.as_deref())?,
            color: optional_text("color", self.color.as_deref(), 64)?,
            is_favorite: self.is_favorite.then_some(true),
        })
    }
}

impl TodoistServer {
    pub(crate) async fn run_list_projects(
        &self,
        params: ListProjectsParams,
    ) -> ToolResult<CallToolResult> {
        let projects = self.client().list_projects().await?;
        if projects.is_empty() {
            return Ok(text_result("No projects found."));
        }
        read_result(&projects, params.response_format, |p| {
            format::projects_markdown(p)
        })
    }

    pub(crate) async fn run_get_project(
        &self,
        params: GetProjectParams,
    ) -> ToolResult<CallToolResult> {
        let id = required_id("project_id", &params.project_id)?;
        let project = self.client().get_project(&id).await?;
        read_result(&project, params.response_format, format::project_markdown)
    }

    pub(crate) async fn run_create_project(
        &self,
        params: CreateProjectParams,
    ) -> ToolResult<CallToolResult> {
        let request = params.validate()?;
        let project = self.client().create_project(&request).await?;
        Ok(text_result(format!(
            "✅ Created project **{}** (ID: `{}`)",
            project.name, project.id
        )))
    }
}
