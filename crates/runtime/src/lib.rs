//! Tool-calling chat runtime.
//!
//! Connects to an MCP tool provider, advertises its operations to a
//! chat-completion model as function schemas, executes whatever tool calls
//! the model requests and hands the results back for a final answer.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{McpToolHost, OpenAiBackend, Orchestrator, OrchestratorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let tools = McpToolHost::connect("http://localhost:8080/mcp").await?;
//! let backend = OpenAiBackend::builder("sk-...").build()?;
//! let config = OrchestratorConfig::default();
//!
//! let mut stdout = std::io::stdout();
//! Orchestrator::new(&backend, &tools, &config)
//!     .run("what is temperature in bengaluru today?", &mut stdout)
//!     .await?;
//! tools.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod mcp;
pub mod model;
mod orchestrator;
pub mod providers;
pub mod tools;

pub use error::{Error, Result};
pub use mcp::{McpClient, McpError};
pub use model::{Backend, Message, ModelError, Role, ToolCall, ToolChoice, ToolSpec};
pub use orchestrator::{DEFAULT_PROMPT, Orchestrator, OrchestratorConfig, parse_arguments};
pub use providers::{DEFAULT_BASE_URL, OpenAiBackend, OpenAiBackendBuilder};
pub use tools::{McpToolHost, OperationDescriptor, ToolHost, ToolInvocationOutcome};
