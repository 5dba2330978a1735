use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use wayfarer_core::config::ModelConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_core::types::{ChatMessage, ContentBlock, Role, ToolResult};
use wayfarer_tools::ToolRegistry;

use crate::node::Node;
use crate::state::{Origin, RunState, StateUpdate};

/// The internal reason/act loop an [`AgentNode`] delegates to.
///
/// Repeatedly asks the LLM for either a final answer or tool invocations,
/// executes the requested tools, and feeds their results back until the
/// model stops calling tools or the turn cap is hit. Tool failures are fed
/// back in-band; only LLM transport failures abort the loop.
pub struct AgentRunner {
    llm: Arc<dyn LlmClient>,
    model: ModelConfig,
    tools: Arc<ToolRegistry>,
    max_turns: usize,
}

impl AgentRunner {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: ModelConfig,
        tools: Arc<ToolRegistry>,
        max_turns: usize,
    ) -> Self {
        Self {
            llm,
            model,
            tools,
            max_turns,
        }
    }

    /// Run the loop to completion, returning the final answer text.
    pub async fn run(&self, system_prompt: &str, history: Vec<ChatMessage>) -> Result<String> {
        let mut messages = vec![ChatMessage::system(system_prompt)];
        messages.extend(history);

        let tool_defs = self.tools.definitions();

        for turn in 0..self.max_turns {
            debug!(turn, "Starting agent turn");

            let response = self
                .llm
                .complete(&self.model, messages.clone(), &tool_defs, None)
                .await?;

            let tool_uses: Vec<(String, String, serde_json::Value)> = response
                .tool_uses()
                .into_iter()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();
            let text = response.text();

            messages.push(ChatMessage {
                role: Role::Assistant,
                content: response.content,
                timestamp: Some(Utc::now()),
            });

            if tool_uses.is_empty() {
                debug!(turn = turn + 1, "Agent run complete");
                return Ok(text);
            }

            let mut result_blocks = Vec::new();
            for (id, name, input) in tool_uses {
                let result = match self.tools.execute(&name, input).await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(tool = %name, error = %e, "Tool execution failed");
                        ToolResult::error(e.to_string())
                    }
                };
                result_blocks.push(ContentBlock::ToolResult {
                    tool_use_id: id,
                    content: result.content,
                    is_error: result.is_error,
                });
            }

            messages.push(ChatMessage {
                role: Role::User,
                content: result_blocks,
                timestamp: Some(Utc::now()),
            });
        }

        Err(WayfarerError::MaxTurnsExceeded(self.max_turns))
    }
}

/// Render the run's message history for an LLM prompt, quoting who said
/// what.
pub(crate) fn render_history(state: &RunState) -> Vec<ChatMessage> {
    state
        .messages
        .iter()
        .map(|m| match &m.origin {
            Origin::External => ChatMessage::user(m.content.clone()),
            Origin::Node(name) => ChatMessage::user(format!("{}: {}", name, m.content)),
        })
        .collect()
}

/// Adapts an agent (system prompt + tools + LLM) into a graph node.
///
/// Whatever tool traffic happens inside the runner, the graph observes
/// exactly one appended message, attributed to this node.
pub struct AgentNode {
    name: String,
    system_prompt: String,
    runner: AgentRunner,
}

impl AgentNode {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        runner: AgentRunner,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Node<RunState> for AgentNode {
    fn run<'a>(&'a self, state: &'a RunState) -> BoxFuture<'a, Result<StateUpdate>> {
        Box::pin(async move {
            let history = render_history(state);
            let output = self.runner.run(&self.system_prompt, history).await?;
            Ok(StateUpdate::message(&self.name, output))
        })
    }
}
