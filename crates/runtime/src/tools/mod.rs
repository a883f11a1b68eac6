//! Tool discovery, schema translation and invocation.

mod descriptor;
pub mod errors;
mod host;
mod mcp_host;
mod outcome;
mod schema;

pub use descriptor::OperationDescriptor;
pub use errors::ToolError;
pub use host::ToolHost;
pub use mcp_host::{McpToolHost, result_text};
pub use outcome::ToolInvocationOutcome;
pub use schema::{PLACEHOLDER_NAME, to_tool_spec, to_tool_specs};
