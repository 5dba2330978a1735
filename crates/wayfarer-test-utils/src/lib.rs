//! Scripted mocks for exercising graphs without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures::future::BoxFuture;

use wayfarer_core::config::ModelConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::{LlmClient, Tool};
use wayfarer_core::types::{
    ChatMessage, ChatResponse, ContentBlock, StopReason, ToolDefinition, ToolResult,
};

/// LLM client that replays a scripted sequence of responses.
///
/// Each `complete` call pops the next response; an exhausted script is an
/// `LlmRequest` error, which doubles as a "collaborator raises" stand-in.
pub struct MockLlm {
    responses: Mutex<VecDeque<ChatResponse>>,
    calls: AtomicUsize,
}

impl MockLlm {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self::new(vec![])
    }

    /// Scripted plain-text response.
    pub fn text(text: impl Into<String>) -> ChatResponse {
        ChatResponse {
            content: vec![ContentBlock::Text { text: text.into() }],
            stop_reason: StopReason::EndTurn,
        }
    }

    /// Scripted tool-call response.
    pub fn tool_call(name: impl Into<String>, input: serde_json::Value) -> ChatResponse {
        ChatResponse {
            content: vec![ContentBlock::ToolUse {
                id: "call_0".into(),
                name: name.into(),
                input,
            }],
            stop_reason: StopReason::ToolUse,
        }
    }

    /// Number of completion requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlm {
    fn complete(
        &self,
        _config: &ModelConfig,
        _messages: Vec<ChatMessage>,
        _tools: &[ToolDefinition],
        _tool_choice: Option<&str>,
    ) -> BoxFuture<'_, Result<ChatResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        Box::pin(async move {
            next.ok_or_else(|| WayfarerError::LlmRequest("mock script exhausted".into()))
        })
    }
}

/// Tool returning a canned result and counting invocations.
pub struct MockTool {
    name: String,
    result: ToolResult,
    invocations: AtomicUsize,
}

impl MockTool {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: ToolResult::success(content),
            invocations: AtomicUsize::new(0),
        }
    }

    /// A tool whose result is flagged as an in-band error.
    pub fn failing(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: ToolResult::error(content),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Test tool with a canned result."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let result = self.result.clone();
        Box::pin(async move { Ok(result) })
    }
}
