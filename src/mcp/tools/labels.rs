//! Label tool handlers.

use rmcp::model::CallToolResult;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::client::CreateLabelRequest;
use crate::mcp::format;
use crate::mcp::server::TodoistServer;
use crate::mcp::tools::{
    ResponseFormat, ToolResult, optional_text, read_result, required_text, text_result,
};

const MAX_NAME: usize = 255;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListLabelsParams {
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateLabelParams {
    #[schemars(description = "Label name (e.g., 'urgent', 'work', 'personal')")]
    pub name: String,
    #[schemars(
        description = "Color name: berry_red, red, orange, yellow, olive_green, lime_green, green, mint_green, teal, sky_blue, light_blue, blue, grape, violet, lavender, magenta, salmon, charcoal, grey, taupe"
    )]
    pub color: Option<String>,
    #[schemars(description = "Whether to mark as favorite")]
    #[serde(default)]
    pub is_favorite: bool,
}

impl CreateLabelParams {
    pub(crate) fn validate(&self) -> ToolResult<CreateLabelRequest> {
        Ok(CreateLabelRequest {
            name: required_text("name", &self.name, MAX_NAME)?,
            color: optional_text("color", self.color.as_deref(), 64)?,
            is_favorite: self.is_favorite.then_some(true),
        })
    }
}

impl TodoistServer {
    pub(crate) async fn run_list_labels(
        &self,
        params: ListLabelsParams,
    ) -> ToolResult<CallToolResult> {
        let labels = self.client().list_labels().await?;
        if labels.is_empty() {
            return Ok(text_result(
                "No labels found. Create labels to organize your tasks.",
            ));
        }
        read_result(&labels, params.response_format, |l| format::labels_markdown(l))
    }

    pub(crate) async fn run_create_label(
        &self,
        params: CreateLabelParams,
    ) -> ToolResult<CallToolResult> {
        let request = params.validate()?;
        let label = self.client().create_label(&request).await?;
        Ok(text_result(format!(
            "✅ Created label **{}** (ID: `{}`)",
            label.name, label.id
        )))
    }
}
