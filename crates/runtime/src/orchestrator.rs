//! The discovery → completion → tool call → completion flow.

use std::io::Write;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::model::{Backend, Message, ModelRequest, ToolCall, ToolChoice};
use crate::tools::{ToolError, ToolHost, to_tool_specs};
use crate::Result;

/// Utterance used when none is given on the command line.
pub const DEFAULT_PROMPT: &str = "what is temperature in bengaluru today?";

/// Model and prompt settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Model for the first, tool-selecting call.
    pub model: String,
    /// Model for the follow-up call after tools ran.
    pub final_model: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub max_tokens: Option<u32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            final_model: "gpt-4o".to_string(),
            temperature: 0.2,
            system_prompt: "You are a helpful assistant.".to_string(),
            max_tokens: None,
        }
    }
}

/// Drives one user utterance through the model and the tool provider.
pub struct Orchestrator<'a, B, H> {
    backend: &'a B,
    tools: &'a H,
    config: &'a OrchestratorConfig,
}

impl<'a, B: Backend, H: ToolHost> Orchestrator<'a, B, H> {
    pub fn new(backend: &'a B, tools: &'a H, config: &'a OrchestratorConfig) -> Self {
        Self {
            backend,
            tools,
            config,
        }
    }

    /// Run `user_text` to a final answer, writing the conversation to `out`.
    ///
    /// Tool calls are executed one after another in the order the model
    /// returned them; each is answered by exactly one tool message before the
    /// follow-up completion is requested.
    pub async fn run<W: Write>(&self, user_text: &str, out: &mut W) -> Result<()> {
        let specs = to_tool_specs(self.tools.descriptors());
        debug!(
            tools = %serde_json::to_string(&specs).unwrap_or_default(),
            "translated tool schemas"
        );

        let mut messages = vec![
            Message::system(&self.config.system_prompt),
            Message::user(user_text),
        ];

        let first = self
            .backend
            .call(ModelRequest {
                model: &self.config.model,
                messages: &messages,
                tools: &specs,
                tool_choice: Some(ToolChoice::Auto),
                temperature: Some(self.config.temperature),
            })
            .await?;

        let reply = first.message;
        let text = reply.text();
        let calls = reply.tool_calls();

        if !text.is_empty() {
            writeln!(out, "Assistant: {text}")?;
        }
        if calls.is_empty() {
            if text.is_empty() {
                warn!("model returned neither text nor tool calls");
            }
            return Ok(());
        }

        messages.push(reply);
        for call in &calls {
            let content = self.execute(call, out).await?;
            messages.push(Message::tool_result(&call.id, content));
        }

        let last = self
            .backend
            .call(ModelRequest {
                model: &self.config.final_model,
                messages: &messages,
                tools: &[],
                tool_choice: None,
                temperature: Some(self.config.temperature),
            })
            .await?;

        writeln!(out, "\nFinal: {}", last.message.text())?;
        Ok(())
    }

    async fn execute<W: Write>(&self, call: &ToolCall, out: &mut W) -> Result<String> {
        let arguments = parse_arguments(&call.arguments);
        writeln!(
            out,
            "\n[Executing tool] {}({})",
            call.name,
            Value::Object(arguments.clone())
        )?;

        info!(tool = %call.name, id = %call.id, "executing tool");
        let outcome = self.tools.invoke(&call.name, arguments).await;
        if outcome.is_failure() {
            warn!(tool = %call.name, "tool invocation failed");
        }
        let content = outcome.into_content();
        debug!(tool = %call.name, %content, "tool result");
        Ok(content)
    }
}

/// Parse a model-produced argument payload.
///
/// Blank payloads, malformed JSON and non-object values all yield an empty
/// object; the run continues either way.
pub fn parse_arguments(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }

    let err = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => return map,
        Ok(other) => ToolError::InvalidInput(format!("expected an object, got {other}")),
        Err(e) => ToolError::InvalidInput(e.to_string()),
    };
    warn!(error = %err, raw, "substituting empty arguments");
    Map::new()
}
