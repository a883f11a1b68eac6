//! Operation descriptors as discovered from a tool provider.

use rmcp::model::Tool;
use serde_json::{Map, Value};

/// Metadata describing one callable remote operation.
///
/// Every field is optional: providers are free to omit any of them, and
/// [`to_tool_spec`](super::to_tool_spec) fills in defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationDescriptor {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub input_schema: Option<Map<String, Value>>,
}

impl OperationDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl From<Tool> for OperationDescriptor {
    fn from(tool: Tool) -> Self {
        let name = Some(tool.name.to_string()).filter(|n| !n.is_empty());
        let description = tool.description.map(|d| d.to_string());
        let input_schema = Some(tool.input_schema.as_ref().clone()).filter(|s| !s.is_empty());

        Self {
            name,
            title: tool.title,
            description,
            input_schema,
        }
    }
}
