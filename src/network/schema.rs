//! Shallow schema inference for request bodies.
//!
//! Only top-level keys are typed; nested values report `array` / `object`
//! without descending.

use crate::dom::ValueType;
use indexmap::IndexMap;
use serde_json::Value;

/// Field name used when a body is not a JSON object
pub const RAW_BODY_FIELD: &str = "body";

/// Ordered mapping of body key to inferred type
pub type BodySchema = IndexMap<String, ValueType>;

/// Type of a single JSON value; `null` is approximated as `string`
pub fn json_value_type(value: &Value) -> ValueType {
    match value {
        Value::String(_) | Value::Null => ValueType::String,
        Value::Number(_) => ValueType::Number,
        Value::Bool(_) => ValueType::Boolean,
        Value::Array(_) => ValueType::Array,
        Value::Object(_) => ValueType::Object,
    }
}

/// Infer a schema for a captured request body.
///
/// Returns `None` for an absent or blank body. Never fails: a body that is not
/// JSON degrades to a single synthetic `body: string` field.
pub fn infer_body_schema(body: Option<&str>) -> Option<BodySchema> {
    let raw = body.map(str::trim).filter(|b| !b.is_empty())?;

    let mut schema = BodySchema::new();
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            for (key, value) in &map {
                schema.insert(key.clone(), json_value_type(value));
            }
        }
        Ok(other) => {
            schema.insert(RAW_BODY_FIELD.to_string(), json_value_type(&other));
        }
        Err(e) => {
            log::debug!("Request body is not JSON ({}), recording raw body type", e);
            schema.insert(RAW_BODY_FIELD.to_string(), ValueType::String);
        }
    }
    Some(schema)
}
