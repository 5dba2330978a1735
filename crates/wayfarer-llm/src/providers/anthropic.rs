use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wayfarer_core::config::ModelConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_core::types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct AnthropicClient {
    http: Client,
}

impl AnthropicClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum AnthropicBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

/// Split a message list into the system prompt and wire messages.
fn convert_messages(messages: Vec<ChatMessage>) -> (Option<String>, Vec<AnthropicMessage>) {
    let mut system = String::new();
    let mut wire = Vec::new();

    for msg in messages {
        let role = match msg.role {
            Role::System => {
                if !system.is_empty() {
                    system.push('\n');
                }
                system.push_str(&msg.text());
                continue;
            }
            Role::User => "user",
            Role::Assistant => "assistant",
        };

        let content: Vec<serde_json::Value> = msg
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => {
                    serde_json::json!({"type": "text", "text": text})
                }
                ContentBlock::ToolUse { id, name, input } => serde_json::json!({
                    "type": "tool_use", "id": id, "name": name, "input": input,
                }),
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => serde_json::json!({
                    "type": "tool_result",
                    "tool_use_id": tool_use_id,
                    "content": content,
                    "is_error": is_error,
                }),
            })
            .collect();

        wire.push(AnthropicMessage {
            role: role.to_string(),
            content,
        });
    }

    let system = if system.is_empty() {
        None
    } else {
        Some(system)
    };
    (system, wire)
}

impl LlmClient for AnthropicClient {
    fn complete(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
        tools: &[ToolDefinition],
        tool_choice: Option<&str>,
    ) -> BoxFuture<'_, Result<ChatResponse>> {
        let config = config.clone();
        let tools = tools.to_vec();
        let tool_choice = tool_choice.map(|s| s.to_string());

        Box::pin(async move {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| WayfarerError::Config("model.api_key is not set".into()))?;
            let url = config
                .base_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string());

            let (system, wire_messages) = convert_messages(messages);

            let request = AnthropicRequest {
                model: config.model_id.clone(),
                max_tokens: config.max_tokens,
                system,
                messages: wire_messages,
                temperature: Some(config.temperature),
                tools: tools
                    .iter()
                    .map(|t| AnthropicTool {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        input_schema: t.input_schema.clone(),
                    })
                    .collect(),
                tool_choice: tool_choice
                    .map(|name| serde_json::json!({"type": "tool", "name": name})),
            };

            debug!(model = %config.model_id, "Sending messages request");

            let resp = self
                .http
                .post(&url)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request)
                .send()
                .await
                .map_err(|e| WayfarerError::LlmRequest(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(WayfarerError::LlmRequest(format!("{}: {}", status, body)));
            }

            let parsed: AnthropicResponse = resp
                .json()
                .await
                .map_err(|e| WayfarerError::LlmParse(e.to_string()))?;

            let content = parsed
                .content
                .into_iter()
                .filter_map(|block| match block {
                    AnthropicBlock::Text { text } => Some(ContentBlock::Text { text }),
                    AnthropicBlock::ToolUse { id, name, input } => {
                        Some(ContentBlock::ToolUse { id, name, input })
                    }
                    AnthropicBlock::Unknown => None,
                })
                .collect();

            let stop_reason = match parsed.stop_reason.as_deref() {
                Some("tool_use") => StopReason::ToolUse,
                Some("max_tokens") => StopReason::MaxTokens,
                _ => StopReason::EndTurn,
            };

            Ok(ChatResponse {
                content,
                stop_reason,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_are_extracted() {
        let (system, wire) = convert_messages(vec![
            ChatMessage::system("first"),
            ChatMessage::user("hi"),
            ChatMessage::system("second"),
        ]);
        assert_eq!(system.as_deref(), Some("first\nsecond"));
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "user");
    }

    #[test]
    fn test_tool_result_block_shape() {
        let (_, wire) = convert_messages(vec![ChatMessage::tool_result("t1", "ok", false)]);
        assert_eq!(wire[0].role, "user");
        assert_eq!(wire[0].content[0]["type"], "tool_result");
        assert_eq!(wire[0].content[0]["tool_use_id"], "t1");
    }
}
