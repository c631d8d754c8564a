//! Typed session operations
//!
//! Each operation is a [`Tool`] with JSON-schema described parameters. The
//! [`ToolRegistry`] dispatches by name and shapes every outcome as
//! `{ ok, message | error, errorKind?, ...fields }`.

pub mod click;
pub mod close;
pub mod contract;
pub mod fill;
pub mod fill_form;
pub mod launch;
pub mod navigate;
pub mod snapshot;
pub mod utils;

pub use click::ClickTool;
pub use close::CloseTool;
pub use contract::GenerateContractTool;
pub use fill::FillTool;
pub use fill_form::FillFormTool;
pub use launch::LaunchTool;
pub use navigate::NavigateTool;
pub use snapshot::SnapshotTool;

use crate::browser::Session;
use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a tool operates on
pub struct ToolContext<'a> {
    pub session: &'a mut Session,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }
}

/// Outcome of one tool call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,

    /// Human-readable summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Operation-specific fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// [`BrowserError::kind`] of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
            error_kind: None,
        }
    }

    pub fn success_with(message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Dropping unserializable tool data: {}", e);
                None
            }
        };
        Self {
            data,
            ..Self::success(message)
        }
    }

    pub fn failure(error: &BrowserError) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
        }
    }

    /// Flatten into `{ ok, message | error, errorKind?, ...fields }`
    pub fn to_response(&self) -> Value {
        let mut response = Map::new();
        response.insert("ok".to_string(), Value::Bool(self.success));

        if let Some(message) = &self.message {
            response.insert("message".to_string(), Value::String(message.clone()));
        }
        if let Some(error) = &self.error {
            response.insert("error".to_string(), Value::String(error.clone()));
        }
        if let Some(kind) = &self.error_kind {
            response.insert("errorKind".to_string(), Value::String(kind.clone()));
        }

        match &self.data {
            Some(Value::Object(fields)) => {
                for (key, value) in fields {
                    response.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            Some(other) => {
                response.insert("data".to_string(), other.clone());
            }
            None => {}
        }

        Value::Object(response)
    }
}

/// A named operation with typed parameters
#[async_trait]
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema + Send;

    fn name(&self) -> &str;

    /// JSON Schema of [`Tool::Params`]
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }

    async fn execute_typed(&self, params: Self::Params, context: &mut ToolContext<'_>) -> Result<ToolResult>;

    /// Deserialize `params` and run the tool
    async fn execute(&self, params: Value, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let params = if params.is_null() { Value::Object(Map::new()) } else { params };
        let params: Self::Params = serde_json::from_value(params)
            .map_err(|e| BrowserError::InvalidArgument(format!("Invalid parameters for '{}': {}", Tool::name(self), e)))?;
        self.execute_typed(params, context).await
    }
}

/// Object-safe view of a [`Tool`] for the registry
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    async fn execute(&self, params: Value, context: &mut ToolContext<'_>) -> Result<ToolResult>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    async fn execute(&self, params: Value, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        Tool::execute(self, params, context).await
    }
}

/// Tools by name, in registration order
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ToolRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self { tools: IndexMap::new() }
    }

    /// A registry with every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LaunchTool);
        registry.register(NavigateTool);
        registry.register(ClickTool);
        registry.register(FillTool);
        registry.register(FillFormTool);
        registry.register(SnapshotTool);
        registry.register(GenerateContractTool);
        registry.register(CloseTool);
        registry
    }

    /// Add a tool, replacing any tool of the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// `{ name, parameters }` for every tool
    pub fn describe(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|tool| serde_json::json!({ "name": tool.name(), "parameters": tool.parameters_schema() }))
            .collect()
    }

    /// Run a tool by name
    pub async fn execute(&self, name: &str, params: Value, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let tool = self.get(name).ok_or_else(|| BrowserError::ToolExecutionFailed {
            tool: name.to_string(),
            reason: "unknown tool".to_string(),
        })?;

        log::debug!("Executing tool '{}'", name);
        tool.execute(params, context).await
    }

    /// Run a tool by name, folding any error into a failed [`ToolResult`]
    pub async fn dispatch(&self, name: &str, params: Value, context: &mut ToolContext<'_>) -> ToolResult {
        match self.execute(name, params, context).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Tool '{}' failed: {}", name, e);
                ToolResult::failure(&e)
            }
        }
    }
}
