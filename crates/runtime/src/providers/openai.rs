//! OpenAI-compatible chat-completions backend.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolSpec,
    Usage,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API root; `/chat/completions` is appended.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on one completion request, connect to last byte.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

fn no_tools(tools: &&[ToolSpec]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ApiToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAiBackendBuilder {
    api_key: String,
    base_url: String,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl OpenAiBackendBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiBackend, ModelError> {
        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ModelError::Network(format!("cannot build http client: {e}")))?;

        Ok(OpenAiBackend {
            client,
            api_key: self.api_key,
            endpoint,
            max_tokens: self.max_tokens,
        })
    }
}

/// Chat-completions backend speaking the OpenAI wire format.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_tokens: Option<u32>,
}

impl OpenAiBackend {
    pub fn builder(api_key: impl Into<String>) -> OpenAiBackendBuilder {
        OpenAiBackendBuilder::new(api_key)
    }

    fn role_to_api(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    fn message_to_api(msg: &Message) -> ApiMessage {
        let mut content = String::new();
        let mut tool_calls = Vec::new();
        let mut tool_call_id = None;

        for part in &msg.parts {
            match part {
                Part::Text(text) => content.push_str(text),
                Part::ToolCall(call) => tool_calls.push(ApiToolCall {
                    id: call.id.clone(),
                    kind: "function".to_string(),
                    function: ApiFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                }),
                Part::ToolResult(result) => {
                    tool_call_id = Some(result.tool_call_id.clone());
                    content.push_str(&result.content);
                }
            }
        }

        ApiMessage {
            role: Self::role_to_api(msg.role),
            content,
            tool_calls,
            tool_call_id,
        }
    }

    fn response_to_message(message: ApiResponseMessage) -> Message {
        let mut parts = Vec::new();

        if let Some(text) = message.content.filter(|t| !t.is_empty()) {
            parts.push(Part::Text(text));
        }

        for call in message.tool_calls.unwrap_or_default() {
            if call.kind != "function" {
                warn!(id = %call.id, kind = %call.kind, "ignoring non-function tool call");
                continue;
            }
            parts.push(Part::ToolCall(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            }));
        }

        Message {
            role: Role::Assistant,
            parts,
        }
    }

    fn parse_response(body: &[u8]) -> Result<ModelResponse, ModelError> {
        let api_response: ApiResponse = serde_json::from_slice(body)
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no choices".into()))?;

        let usage = api_response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(ModelResponse {
            message: Self::response_to_message(choice.message),
            usage,
        })
    }
}

impl std::fmt::Display for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "openai({})", self.endpoint)
    }
}

impl Backend for OpenAiBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let api_request = ApiRequest {
            model: request.model,
            messages: request.messages.iter().map(Self::message_to_api).collect(),
            tools: request.tools,
            tool_choice: request
                .tool_choice
                .filter(|_| !request.tools.is_empty())
                .map(|choice| choice.as_str()),
            temperature: request.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            model = request.model,
            messages = api_request.messages.len(),
            tools = request.tools.len(),
            "chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ModelError::Unauthorized(format!("{status}"))
                }
                _ => ModelError::Api(format!("{status}: {body}")),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let parsed = Self::parse_response(&body)?;
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            tool_calls = parsed.message.tool_calls().len(),
            "chat completion response"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn backend_display() {
        let backend = OpenAiBackend::builder("sk-test")
            .base_url("http://localhost:1234/v1/")
            .build()
            .unwrap();
        assert_eq!(
            backend.to_string(),
            "openai(http://localhost:1234/v1/chat/completions)"
        );
    }

    #[test]
    fn assistant_tool_calls_serialize_with_empty_content() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![Part::ToolCall(ToolCall {
                id: "call_1".into(),
                name: "get_weather".into(),
                arguments: r#"{"city":"Bengaluru"}"#.into(),
            })],
        };
        let value = serde_json::to_value(OpenAiBackend::message_to_api(&msg)).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"city\":\"Bengaluru\"}"}
                }]
            })
        );
    }

    #[test]
    fn tool_result_serializes_with_correlation_id() {
        let msg = Message::tool_result("call_1", r#"{"ok":true}"#);
        let value = serde_json::to_value(OpenAiBackend::message_to_api(&msg)).unwrap();
        assert_eq!(
            value,
            json!({"role": "tool", "content": "{\"ok\":true}", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn request_omits_tools_when_empty() {
        let messages = [Message::system("s"), Message::user("u")];
        let request = ApiRequest {
            model: "gpt-4o",
            messages: messages.iter().map(OpenAiBackend::message_to_api).collect(),
            tools: &[],
            tool_choice: None,
            temperature: Some(0.2),
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert_eq!(value["messages"][0]["role"], json!("system"));
        assert!((value["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn parses_text_response() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });
        let response = OpenAiBackend::parse_response(body.to_string().as_bytes()).unwrap();
        assert_eq!(response.message.text(), "Hi there");
        assert!(response.message.tool_calls().is_empty());
        assert_eq!(response.usage.input_tokens, 12);
    }

    #[test]
    fn parses_tool_call_response() {
        let body = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "a", "type": "function",
                     "function": {"name": "get_weather", "arguments": "{\"city\":\"Delhi\"}"}},
                    {"id": "b", "type": "custom",
                     "function": {"name": "other", "arguments": "{}"}}
                ]
            }}]
        });
        let response = OpenAiBackend::parse_response(body.to_string().as_bytes()).unwrap();
        let calls = response.message.tool_calls();
        assert_eq!(response.message.text(), "");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[0].arguments, "{\"city\":\"Delhi\"}");
    }

    #[test]
    fn rejects_response_without_choices() {
        let err = OpenAiBackend::parse_response(br#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));

        let err = OpenAiBackend::parse_response(b"not json").unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn sends_bearer_auth_and_tools() {
        use axum::{Json, Router, http::HeaderMap, routing::post};
        use std::sync::{Arc, Mutex};

        let seen: Arc<Mutex<Option<(String, Value)>>> = Arc::default();
        let recorder = seen.clone();
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *recorder.lock().unwrap() = Some((auth, body));
                    Json(json!({"choices": [{"message": {"content": "ok"}}]}))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let backend = OpenAiBackend::builder("sk-test")
            .base_url(format!("http://{addr}/v1"))
            .build()
            .unwrap();
        let messages = [Message::user("hi")];
        let tools = [ToolSpec::function("get_weather", "", json!({"type": "object"}))];
        let response = backend
            .call(ModelRequest {
                model: "gpt-4o-mini",
                messages: &messages,
                tools: &tools,
                tool_choice: Some(crate::model::ToolChoice::Auto),
                temperature: Some(0.2),
            })
            .await
            .unwrap();
        assert_eq!(response.message.text(), "ok");

        let (auth, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["tool_choice"], json!("auto"));
        assert_eq!(body["tools"][0]["function"]["name"], json!("get_weather"));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_dedicated_error() {
        use axum::{Router, http::StatusCode, routing::post};

        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let backend = OpenAiBackend::builder("sk-bad")
            .base_url(format!("http://{addr}/v1"))
            .build()
            .unwrap();
        let messages = [Message::user("hi")];
        let err = backend
            .call(ModelRequest {
                model: "gpt-4o-mini",
                messages: &messages,
                tools: &[],
                tool_choice: None,
                temperature: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn stalled_endpoint_times_out() {
        use axum::{Json, Router, routing::post};
        use std::time::Instant;

        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": [{"message": {"content": "late"}}]}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let timeout = Duration::from_millis(200);
        let backend = OpenAiBackend::builder("sk-test")
            .base_url(format!("http://{addr}/v1"))
            .timeout(timeout)
            .build()
            .unwrap();
        let messages = [Message::user("hi")];

        let started = Instant::now();
        let err = backend
            .call(ModelRequest {
                model: "gpt-4o-mini",
                messages: &messages,
                tools: &[],
                tool_choice: None,
                temperature: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Network(_)), "{err}");
        assert!(started.elapsed() < timeout + Duration::from_secs(1));
    }
}
