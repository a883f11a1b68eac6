//! Translation of operation descriptors into completion function schemas.

use serde_json::{Value, json};

use super::OperationDescriptor;
use crate::model::ToolSpec;

/// Name used when a provider omits one.
pub const PLACEHOLDER_NAME: &str = "tool";

/// Translate one descriptor. Total: every key is always present.
///
/// Falls back to `title` for the description, then to the empty string; a
/// missing schema becomes `{"type": "object", "properties": {}}`.
pub fn to_tool_spec(descriptor: &OperationDescriptor) -> ToolSpec {
    let name = descriptor
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(PLACEHOLDER_NAME);

    let description = descriptor
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .or(descriptor.title.as_deref())
        .unwrap_or_default();

    let parameters = descriptor
        .input_schema
        .clone()
        .map(Value::Object)
        .unwrap_or_else(empty_object_schema);

    ToolSpec::function(name, description, parameters)
}

pub fn to_tool_specs(descriptors: &[OperationDescriptor]) -> Vec<ToolSpec> {
    descriptors.iter().map(to_tool_spec).collect()
}

fn empty_object_schema() -> Value {
    json!({"type": "object", "properties": {}})
}
