use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CloseParams {}

/// Close the browser and reset the session
#[derive(Default)]
pub struct CloseTool;

#[async_trait]
impl Tool for CloseTool {
    type Params = CloseParams;

    fn name(&self) -> &str {
        "close"
    }

    async fn execute_typed(&self, _params: CloseParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let closed = context.session.close().await?;
        let message = if closed { "Browser closed" } else { "No browser was open" };
        Ok(ToolResult::success_with(message, serde_json::json!({ "closed": closed })))
    }
}
