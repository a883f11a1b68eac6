//! MCP (Model Context Protocol) client over streamable HTTP.
//!
//! # Example
//!
//! ```ignore
//! use runtime::mcp::McpClient;
//!
//! # async fn example() -> Result<(), runtime::mcp::McpError> {
//! let client = McpClient::connect("http://localhost:8080/mcp").await?;
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {}", tool.name);
//! }
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, Tool},
    service::{RoleClient, RunningService},
    transport::StreamableHttpClientTransport,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Error type for MCP operations.
pub type McpError = Box<dyn std::error::Error + Send + Sync>;

/// An MCP client connected to one server.
///
/// The session is closed by [`shutdown`](Self::shutdown), or cancelled when
/// the client is dropped.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,
    url: String,
}

impl McpClient {
    /// Connect and complete the MCP initialize handshake.
    pub async fn connect(url: impl Into<String>) -> Result<Self, McpError> {
        let url = url.into();
        let transport = StreamableHttpClientTransport::from_uri(url.clone());
        let service = ().serve(transport).await?;
        debug!(%url, "mcp session established");

        Ok(Self { service, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// List every tool the server exposes, following pagination.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        Ok(self.service.list_all_tools().await?)
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        let params = CallToolRequestParams {
            name: name.into().into(),
            arguments,
            meta: None,
            task: None,
        };

        Ok(self.service.call_tool(params).await?)
    }

    /// Close the session.
    pub async fn shutdown(self) -> Result<(), McpError> {
        let reason = self.service.cancel().await?;
        debug!(url = %self.url, ?reason, "mcp session closed");
        Ok(())
    }
}
