//! End-to-end: a real weather MCP server, a stubbed upstream and a scripted
//! model.

use std::net::SocketAddr;
use std::sync::Mutex;

use axum::Router;
use axum::routing::get;
use runtime::model::{ModelRequest, ModelResponse, Part, Usage};
use runtime::{
    Backend, Error, McpToolHost, Message, ModelError, Orchestrator, OrchestratorConfig, Role,
    ToolCall, ToolHost, ToolInvocationOutcome,
};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use weather::WeatherClient;

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Upstream stub followed by the MCP server in front of it.
async fn weather_server() -> String {
    let upstream = Router::new().route(
        "/{city}",
        get(|| async {
            axum::Json(json!({
                "current_condition": [{
                    "temp_C": "27", "temp_F": "81",
                    "FeelsLikeC": "29", "FeelsLikeF": "84",
                    "humidity": "58",
                    "windspeedKmph": "11", "windspeedMiles": "7",
                    "observation_time": "06:15 AM",
                    "weatherDesc": [{"value": "Partly cloudy"}]
                }]
            }))
        }),
    );
    let upstream = spawn(upstream).await;

    let client = WeatherClient::builder()
        .upstream(format!("http://{upstream}"))
        .build()
        .unwrap();
    let addr = spawn(weather::router(client, "/mcp").unwrap()).await;
    format!("http://{addr}/mcp")
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn discovers_get_weather() {
    let host = McpToolHost::connect(weather_server().await).await.unwrap();

    let descriptors = host.descriptors();
    assert_eq!(descriptors.len(), 1);
    let tool = &descriptors[0];
    assert_eq!(tool.name.as_deref(), Some("get_weather"));

    let schema = tool.input_schema.as_ref().unwrap();
    assert_eq!(schema["type"], json!("object"));
    assert!(schema["properties"].get("city").is_some());
    assert!(schema["properties"].get("units").is_some());

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn invoke_returns_structured_weather() {
    let host = McpToolHost::connect(weather_server().await).await.unwrap();

    let outcome = host
        .invoke("get_weather", args(json!({"city": "Bengaluru", "units": "metric"})))
        .await;
    let ToolInvocationOutcome::Success { text } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["weather"]["city"], json!("Bengaluru"));
    assert_eq!(value["weather"]["temp_c"], json!("27"));
    assert_eq!(value["weather"]["desc"], json!("Partly cloudy"));

    let empty = host
        .invoke("get_weather", args(json!({"city": "", "units": "metric"})))
        .await;
    let ToolInvocationOutcome::Success { text } = empty else {
        panic!("expected a reported failure payload, got {empty:?}");
    };
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["ok"], json!(false));
    assert_eq!(value["error"], json!("city must not be empty"));

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn bad_arguments_and_unknown_tools_fail() {
    let host = McpToolHost::connect(weather_server().await).await.unwrap();

    let missing = host.invoke("get_weather", Map::new()).await;
    assert!(missing.is_failure(), "{missing:?}");

    let unknown = host.invoke("get_time", Map::new()).await;
    assert!(unknown.is_failure(), "{unknown:?}");

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreachable_provider_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/mcp");
    let err = McpToolHost::connect(url.clone()).await.err().unwrap();
    match err {
        Error::Connect { url: failed, .. } => assert_eq!(failed, url),
        other => panic!("unexpected error: {other}"),
    }
}

/// Asks for Bengaluru's weather, then echoes the tool message it got back.
#[derive(Default)]
struct EchoModel {
    turns: Mutex<usize>,
}

impl Backend for EchoModel {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let turn = {
            let mut turns = self.turns.lock().unwrap();
            *turns += 1;
            *turns
        };

        let message = if turn == 1 {
            assert_eq!(request.tools.len(), 1);
            assert_eq!(request.tools[0].name(), "get_weather");
            Message {
                role: Role::Assistant,
                parts: vec![Part::ToolCall(ToolCall {
                    id: "call_1".into(),
                    name: "get_weather".into(),
                    arguments: r#"{"city":"Bengaluru","units":"metric"}"#.into(),
                })],
            }
        } else {
            let tool = request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::Tool)
                .unwrap();
            let Part::ToolResult(result) = &tool.parts[0] else {
                panic!("tool message without a result");
            };
            assert_eq!(result.tool_call_id, "call_1");
            let value: Value = serde_json::from_str(&result.content).unwrap();
            Message::assistant(format!(
                "It is {}°C in Bengaluru.",
                value["weather"]["temp_c"].as_str().unwrap()
            ))
        };

        Ok(ModelResponse {
            message,
            usage: Usage::default(),
        })
    }
}

#[tokio::test]
async fn full_conversation() {
    let host = McpToolHost::connect(weather_server().await).await.unwrap();
    let model = EchoModel::default();
    let config = OrchestratorConfig::default();

    let mut out = Vec::new();
    Orchestrator::new(&model, &host, &config)
        .run("what is temperature in bengaluru today?", &mut out)
        .await
        .unwrap();
    host.shutdown().await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains(r#"[Executing tool] get_weather({"city":"Bengaluru","units":"metric"})"#));
    assert!(printed.contains("Final: It is 27°C in Bengaluru."));
    assert_eq!(*model.turns.lock().unwrap(), 2);
}
