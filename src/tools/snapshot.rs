use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the snapshot tool (no parameters needed)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotParams {}

/// Summarize the buttons, links and forms currently rendered
#[derive(Default)]
pub struct SnapshotTool;

#[async_trait]
impl Tool for SnapshotTool {
    type Params = SnapshotParams;

    fn name(&self) -> &str {
        "snapshot"
    }

    async fn execute_typed(&self, _params: SnapshotParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let snapshot = context.session.snapshot().await?;
        let message = format!(
            "{} button(s), {} link(s), {} form(s)",
            snapshot.buttons.len(),
            snapshot.links.len(),
            snapshot.forms.len()
        );
        Ok(ToolResult::success_with(message, snapshot))
    }
}
