use futures::future::BoxFuture;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::types::{ChatMessage, ChatResponse, ToolDefinition, ToolResult};

/// LLM client — multi-provider, request/response.
pub trait LlmClient: Send + Sync + 'static {
    /// Send a chat request and receive the aggregated response.
    ///
    /// `tool_choice` forces the model to call the named tool; the response is
    /// then guaranteed to carry at least one tool-use block on success.
    fn complete(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
        tools: &[ToolDefinition],
        tool_choice: Option<&str>,
    ) -> BoxFuture<'_, Result<ChatResponse>>;
}

/// Tool — extensible tool execution.
///
/// Tools own their credentials and HTTP clients; nothing is resolved from
/// process-wide state. Remote failures the model can react to are reported
/// in-band via `ToolResult::error`, not as `Err`.
pub trait Tool: Send + Sync + 'static {
    /// Tool name (used in LLM tool calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema for tool input.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>>;

    /// Timeout in seconds for this tool.
    fn timeout_secs(&self) -> u64 {
        30
    }
}
