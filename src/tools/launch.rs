use crate::browser::{ConnectionOptions, LaunchOptions};
use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LaunchParams {
    /// Run without a visible window (default: true)
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Attach to a running browser at this DevTools WebSocket URL instead of launching
    #[serde(default)]
    pub ws_url: Option<String>,
}

fn default_headless() -> bool {
    true
}

/// Start (or attach to) the session's browser. Idempotent.
#[derive(Default)]
pub struct LaunchTool;

#[async_trait]
impl Tool for LaunchTool {
    type Params = LaunchParams;

    fn name(&self) -> &str {
        "launch"
    }

    async fn execute_typed(&self, params: LaunchParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let report = match params.ws_url {
            Some(ws_url) => context.session.connect(ConnectionOptions::new(ws_url)).await?,
            None => {
                context
                    .session
                    .launch(LaunchOptions::new().headless(params.headless))
                    .await?
            }
        };

        let message = if report.already_running { "Browser already running" } else { "Browser launched" };
        Ok(ToolResult::success_with(message, report))
    }
}
