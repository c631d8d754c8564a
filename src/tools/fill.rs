use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FillParams {
    /// Field name, label text or placeholder
    #[serde(alias = "name", alias = "selector")]
    pub field: String,

    /// Value to enter; non-strings are converted to text
    pub value: Value,
}

#[derive(Default)]
pub struct FillTool;

#[async_trait]
impl Tool for FillTool {
    type Params = FillParams;

    fn name(&self) -> &str {
        "fill"
    }

    async fn execute_typed(&self, params: FillParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let report = context.session.fill(&params.field, &params.value).await?;
        Ok(ToolResult::success_with(format!("Filled '{}'", report.field), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Session;
    use crate::resolver::Locator;
    use crate::testing::FakePage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fill_reports_coerced_value() {
        let page = Arc::new(FakePage::new().with_element(Locator::FieldName("quantity".into())));
        let mut session = Session::default();
        session.attach(page);
        let mut context = ToolContext::new(&mut session);

        let params: FillParams = serde_json::from_value(serde_json::json!({ "name": "quantity", "value": 2 })).unwrap();
        let response = FillTool.execute_typed(params, &mut context).await.unwrap().to_response();

        assert_eq!(response["field"], "quantity");
        assert_eq!(response["value"], "2");
        assert_eq!(response["strategy"], "field_name");
    }
}
