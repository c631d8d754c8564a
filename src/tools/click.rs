use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the click tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// Visible label, accessible name or CSS selector of the element
    #[serde(alias = "label", alias = "selector")]
    pub target: String,
}

/// Tool for clicking elements
#[derive(Default)]
pub struct ClickTool;

#[async_trait]
impl Tool for ClickTool {
    type Params = ClickParams;

    fn name(&self) -> &str {
        "click"
    }

    async fn execute_typed(&self, params: ClickParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let report = context.session.click(&params.target).await?;
        Ok(ToolResult::success_with(format!("Clicked '{}'", report.target), report))
    }
}
