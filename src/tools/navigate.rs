use crate::browser::WaitPolicy;
use crate::error::Result;
use crate::tools::utils::normalize_url;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the navigate tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to
    pub url: String,

    /// Wait for the load event (default: true)
    #[serde(default = "default_wait")]
    pub wait_for_load: bool,
}

fn default_wait() -> bool {
    true
}

/// Tool for navigating to a URL and capturing its network calls
#[derive(Default)]
pub struct NavigateTool;

#[async_trait]
impl Tool for NavigateTool {
    type Params = NavigateParams;

    fn name(&self) -> &str {
        "navigate"
    }

    async fn execute_typed(&self, params: NavigateParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let normalized_url = normalize_url(&params.url);
        let wait = if params.wait_for_load { WaitPolicy::Load } else { WaitPolicy::Commit };

        let report = context.session.navigate(&normalized_url, wait).await?;

        Ok(ToolResult::success_with(format!("Navigated to {}", report.final_url), report))
    }
}
