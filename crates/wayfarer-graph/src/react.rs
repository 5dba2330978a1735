use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tracing::{info, warn};

use wayfarer_core::config::ModelConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_core::types::{ChatMessage, ContentBlock, Role, ToolResult};
use wayfarer_tools::ToolRegistry;

use crate::agent::render_history;
use crate::node::Node;
use crate::state::{AgentOutcome, AgentStep, RunState, StateUpdate, ToolInvocation};

/// Single reasoning step: ask the model for either a final answer or the
/// next tool invocation, and record the outcome.
///
/// Unlike [`AgentNode`](crate::agent::AgentNode), the tool loop here is
/// spread across the graph itself: this node only reasons, while a
/// [`ToolExecutorNode`] acts and a router keyed on the outcome kind decides
/// whether to loop back or exit.
pub struct ReasonNode {
    name: String,
    system_prompt: String,
    llm: Arc<dyn LlmClient>,
    model: ModelConfig,
    tools: Arc<ToolRegistry>,
}

impl ReasonNode {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        model: ModelConfig,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            llm,
            model,
            tools,
        }
    }

    /// Replay the scratchpad as tool-use / tool-result message pairs.
    fn render_scratchpad(state: &RunState) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        for (i, step) in state.intermediate_steps.iter().enumerate() {
            let call_id = format!("step_{i}");
            messages.push(ChatMessage {
                role: Role::Assistant,
                content: vec![ContentBlock::ToolUse {
                    id: call_id.clone(),
                    name: step.action.tool.clone(),
                    input: step.action.input.clone(),
                }],
                timestamp: Some(Utc::now()),
            });
            messages.push(ChatMessage::tool_result(
                call_id,
                step.observation.clone(),
                false,
            ));
        }
        messages
    }
}

impl Node<RunState> for ReasonNode {
    fn run<'a>(&'a self, state: &'a RunState) -> BoxFuture<'a, Result<StateUpdate>> {
        Box::pin(async move {
            let mut messages = vec![ChatMessage::system(&self.system_prompt)];
            messages.extend(render_history(state));
            messages.extend(Self::render_scratchpad(state));

            let response = self
                .llm
                .complete(&self.model, messages, &self.tools.definitions(), None)
                .await?;

            let outcome = match response.tool_uses().first() {
                Some((_, name, input)) => {
                    info!(node = %self.name, tool = %name, "Agent requested a tool");
                    AgentOutcome::Action(ToolInvocation {
                        tool: name.to_string(),
                        input: (*input).clone(),
                    })
                }
                None => {
                    info!(node = %self.name, "Agent produced a final answer");
                    AgentOutcome::Finish {
                        output: response.text(),
                    }
                }
            };

            Ok(StateUpdate::outcome(outcome))
        })
    }
}

/// Executes the pending tool action and records the observation on the
/// scratchpad.
pub struct ToolExecutorNode {
    name: String,
    tools: Arc<ToolRegistry>,
}

impl ToolExecutorNode {
    pub fn new(name: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            name: name.into(),
            tools,
        }
    }
}

impl Node<RunState> for ToolExecutorNode {
    fn run<'a>(&'a self, state: &'a RunState) -> BoxFuture<'a, Result<StateUpdate>> {
        Box::pin(async move {
            let invocation = match &state.agent_outcome {
                Some(AgentOutcome::Action(invocation)) => invocation.clone(),
                _ => {
                    return Err(WayfarerError::Config(format!(
                        "node '{}' reached without a pending action",
                        self.name
                    )))
                }
            };

            let result = match self
                .tools
                .execute(&invocation.tool, invocation.input.clone())
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!(tool = %invocation.tool, error = %e, "Tool execution failed");
                    ToolResult::error(e.to_string())
                }
            };

            info!(
                node = %self.name,
                tool = %invocation.tool,
                is_error = result.is_error,
                "Executed tool action"
            );

            Ok(StateUpdate::step(AgentStep {
                action: invocation,
                observation: result.content,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_test_utils::{MockLlm, MockTool};

    fn model() -> ModelConfig {
        ModelConfig {
            provider: "openai".into(),
            model_id: "test".into(),
            api_key: Some("k".into()),
            base_url: None,
            max_tokens: 256,
            temperature: 0.0,
            retry: None,
        }
    }

    #[tokio::test]
    async fn test_reason_node_records_action() {
        let llm = Arc::new(MockLlm::new(vec![MockLlm::tool_call(
            "get_weather",
            serde_json::json!({"location": "Seoul"}),
        )]));
        let node = ReasonNode::new(
            "agent",
            "You are a helpful assistant.",
            llm,
            model(),
            Arc::new(ToolRegistry::new()),
        );

        let update = node
            .run(&RunState::with_input("weather in Seoul?"))
            .await
            .unwrap();
        match update.agent_outcome.unwrap() {
            AgentOutcome::Action(invocation) => {
                assert_eq!(invocation.tool, "get_weather");
                assert_eq!(invocation.input["location"], "Seoul");
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reason_node_records_finish() {
        let llm = Arc::new(MockLlm::new(vec![MockLlm::text("It is sunny.")]));
        let node = ReasonNode::new(
            "agent",
            "You are a helpful assistant.",
            llm,
            model(),
            Arc::new(ToolRegistry::new()),
        );

        let update = node
            .run(&RunState::with_input("weather in Seoul?"))
            .await
            .unwrap();
        match update.agent_outcome.unwrap() {
            AgentOutcome::Finish { output } => assert_eq!(output, "It is sunny."),
            other => panic!("expected finish, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tool_executor_appends_step() {
        let mut tools = ToolRegistry::new();
        tools.register(MockTool::new("get_weather", "{\"temp_c\": 21}"));
        let node = ToolExecutorNode::new("tool_executor", Arc::new(tools));

        let mut state = RunState::with_input("weather?");
        state.agent_outcome = Some(AgentOutcome::Action(ToolInvocation {
            tool: "get_weather".into(),
            input: serde_json::json!({"location": "Seoul"}),
        }));

        let update = node.run(&state).await.unwrap();
        assert_eq!(update.intermediate_steps.len(), 1);
        assert_eq!(update.intermediate_steps[0].observation, "{\"temp_c\": 21}");
        assert!(update.messages.is_empty());
    }

    #[tokio::test]
    async fn test_tool_executor_without_action_fails() {
        let node = ToolExecutorNode::new("tool_executor", Arc::new(ToolRegistry::new()));
        let err = node.run(&RunState::with_input("hi")).await.unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_tool_is_soft_failure() {
        let node = ToolExecutorNode::new("tool_executor", Arc::new(ToolRegistry::new()));
        let mut state = RunState::default();
        state.agent_outcome = Some(AgentOutcome::Action(ToolInvocation {
            tool: "ghost".into(),
            input: serde_json::json!({}),
        }));

        let update = node.run(&state).await.unwrap();
        assert!(update.intermediate_steps[0]
            .observation
            .contains("Tool not found"));
    }
}
