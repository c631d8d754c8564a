use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FillFormParams {
    /// Field → value pairs, as an object or a JSON string of one; filled in key order
    pub fields: Value,
}

/// Read a batch payload. Anything but an object (or a string holding one) is an empty batch.
pub fn parse_batch(payload: &Value) -> IndexMap<String, Value> {
    match payload {
        Value::Object(fields) => fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::String(text) => match serde_json::from_str::<IndexMap<String, Value>>(text) {
            Ok(fields) => fields,
            Err(e) => {
                log::warn!("Ignoring malformed fill payload: {}", e);
                IndexMap::new()
            }
        },
        other => {
            log::warn!("Ignoring fill payload that is not an object: {}", other);
            IndexMap::new()
        }
    }
}

/// Fill several fields in one call
#[derive(Default)]
pub struct FillFormTool;

#[async_trait]
impl Tool for FillFormTool {
    type Params = FillFormParams;

    fn name(&self) -> &str {
        "fill_form"
    }

    async fn execute_typed(&self, params: FillFormParams, context: &mut ToolContext<'_>) -> Result<ToolResult> {
        let fields = parse_batch(&params.fields);
        let filled = context.session.fill_batch(&fields).await?;

        Ok(ToolResult::success_with(
            format!("Filled {} field(s)", filled.len()),
            serde_json::json!({ "filled": filled }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Session;
    use crate::resolver::Locator;
    use crate::testing::FakePage;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parse_batch_accepts_object_and_string() {
        let from_object = parse_batch(&json!({ "b": 1, "a": "x" }));
        assert_eq!(from_object.keys().collect::<Vec<_>>(), vec!["b", "a"]);

        let from_string = parse_batch(&json!(r#"{"email":"a@b.c","name":"Ada"}"#));
        assert_eq!(from_string.keys().collect::<Vec<_>>(), vec!["email", "name"]);
    }

    #[test]
    fn test_parse_batch_degrades_to_empty() {
        assert!(parse_batch(&json!("{not json")).is_empty());
        assert!(parse_batch(&json!([1, 2])).is_empty());
        assert!(parse_batch(&json!(null)).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_no_op() {
        let page = Arc::new(FakePage::new());
        let mut session = Session::default();
        session.attach(page.clone());
        let mut context = ToolContext::new(&mut session);

        let params = FillFormParams { fields: json!("oops") };
        let response = FillFormTool.execute_typed(params, &mut context).await.unwrap().to_response();

        assert_eq!(response["ok"], true);
        assert_eq!(response["filled"], json!([]));
        assert!(page.fills.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_failure_names_field() {
        let page = Arc::new(FakePage::new().with_element(Locator::FieldName("name".into())));
        let mut session = Session::default();
        session.attach(page);
        let mut context = ToolContext::new(&mut session);

        let params = FillFormParams {
            fields: json!({ "name": "Ada", "phone": "555" }),
        };
        let err = FillFormTool.execute_typed(params, &mut context).await.unwrap_err();
        let response = ToolResult::failure(&err).to_response();

        assert_eq!(response["errorKind"], "resolution");
        assert!(response["error"].as_str().unwrap().contains("phone"));
    }
}
