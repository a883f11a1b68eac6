//! MCP-backed tool host.

use rmcp::model::CallToolResult;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{OperationDescriptor, ToolError, ToolHost, ToolInvocationOutcome};
use crate::Error;
use crate::mcp::{McpClient, McpError};

/// Tool host backed by a remote MCP server.
pub struct McpToolHost {
    client: McpClient,
    descriptors: Vec<OperationDescriptor>,
}

impl McpToolHost {
    /// Connect to the server at `url` and cache its operation catalogue.
    ///
    /// Both the handshake and the initial listing must succeed.
    pub async fn connect(url: impl Into<String>) -> crate::Result<Self> {
        let url = url.into();
        let connect_err = |e: McpError| Error::Connect {
            url: url.clone(),
            reason: e.to_string(),
        };

        let client = McpClient::connect(url.clone()).await.map_err(connect_err)?;
        let descriptors: Vec<OperationDescriptor> = client
            .list_tools()
            .await
            .map_err(connect_err)?
            .into_iter()
            .map(OperationDescriptor::from)
            .collect();

        info!(url = client.url(), tools = descriptors.len(), "discovered tools");
        Ok(Self {
            client,
            descriptors,
        })
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }

    /// Close the MCP session.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.client.shutdown().await
    }
}

impl ToolHost for McpToolHost {
    fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> ToolInvocationOutcome {
        if !self.descriptors.iter().any(|d| d.name.as_deref() == Some(name)) {
            return ToolError::NotFound(name.to_string()).into();
        }

        let result = match self.client.call_tool(name, Some(arguments)).await {
            Ok(result) => result,
            Err(e) => return ToolError::Execution(e.to_string()).into(),
        };

        let text = result_text(&result);
        debug!(tool = name, bytes = text.len(), "tool result");

        if result.is_error == Some(true) {
            warn!(tool = name, "tool reported an error");
            return ToolError::Reported(text).into();
        }
        ToolInvocationOutcome::success(text)
    }
}

/// Reduce a tool result to plain text for the model.
///
/// Prefers structured content serialized as JSON, then the concatenated text
/// blocks, then the whole result serialized.
pub fn result_text(result: &CallToolResult) -> String {
    if let Some(structured) = &result.structured_content {
        if let Ok(json) = serde_json::to_string(structured) {
            return json;
        }
    }

    let texts: Vec<&str> = result
        .content
        .iter()
        .filter_map(|block| block.as_text())
        .map(|t| t.text.as_str())
        .collect();
    if !texts.is_empty() {
        return texts.join("\n");
    }

    serde_json::to_string(result).unwrap_or_else(|_| format!("{result:?}"))
}
