//! MCP tool server exposing `get_weather` over streamable HTTP.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        StreamableHttpService, session::local::LocalSessionManager,
    },
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::client::WeatherClient;
use crate::error::Error as SetupError;
use crate::report::Units;

/// Default mount path of the MCP endpoint.
pub const DEFAULT_PATH: &str = "/mcp";

const INSTRUCTIONS: &str = "Weather agent. Call get_weather with a city name and a unit \
system (metric or imperial) to get current conditions.";

/// Arguments of the `get_weather` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// City name, e.g. "Bengaluru".
    pub city: String,
    /// Unit system sent upstream: "metric" or "imperial".
    pub units: Units,
    /// Language code for the description.
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "en".to_string()
}

/// The tool provider: one `get_weather` operation.
#[derive(Clone)]
pub struct WeatherServer {
    client: WeatherClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Returns current weather from wttr.in: temperature, humidity, wind, \
                       description and feels-like, in both metric and imperial units."
    )]
    async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!(city = %request.city, units = %request.units, lang = %request.lang, "get_weather");

        let result = self
            .client
            .get_weather(&request.city, request.units, &request.lang)
            .await;
        let value = serde_json::to_value(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::structured(value))
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather_agent".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }
}

/// Build the axum router serving MCP at `path`.
///
/// Each MCP session gets its own [`WeatherServer`] sharing `client`.
pub fn router(client: WeatherClient, path: &str) -> crate::Result<axum::Router> {
    if !path.starts_with('/') {
        return Err(SetupError::InvalidPath(path.to_string()));
    }

    let service = StreamableHttpService::new(
        move || Ok(WeatherServer::new(client.clone())),
        Arc::new(LocalSessionManager::default()),
        Default::default(),
    );

    Ok(axum::Router::new().nest_service(path, service))
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: axum::Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> crate::Result<()> {
    info!(addr = %listener.local_addr()?, "weather server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
