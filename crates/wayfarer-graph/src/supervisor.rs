use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::json;
use tracing::info;

use wayfarer_core::config::ModelConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_core::types::{ChatMessage, ToolDefinition};

use crate::agent::render_history;
use crate::node::Node;
use crate::state::{RunState, StateUpdate};

/// Option a supervisor returns when the team is done.
pub const FINISH: &str = "FINISH";

const ROUTE_TOOL: &str = "route";

/// A node that asks the LLM which team member should act next.
///
/// The model is forced to call a `route` tool whose schema enumerates the
/// closed option set (members plus [`FINISH`]), so the answer is always a
/// declared option or a parse error, never free text. The choice lands in
/// the `next` field for the paired structural router to read.
pub struct SupervisorNode {
    name: String,
    system_prompt: String,
    members: Vec<String>,
    llm: Arc<dyn LlmClient>,
    model: ModelConfig,
}

impl SupervisorNode {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        members: Vec<String>,
        llm: Arc<dyn LlmClient>,
        model: ModelConfig,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            members,
            llm,
            model,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn option_set(&self) -> Vec<String> {
        let mut options = vec![FINISH.to_string()];
        options.extend(self.members.iter().cloned());
        options
    }

    fn route_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: ROUTE_TOOL.into(),
            description: "Select the next role.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "next": {
                        "type": "string",
                        "enum": self.option_set(),
                    }
                },
                "required": ["next"]
            }),
        }
    }
}

impl Node<RunState> for SupervisorNode {
    fn run<'a>(&'a self, state: &'a RunState) -> BoxFuture<'a, Result<StateUpdate>> {
        Box::pin(async move {
            let mut messages = vec![ChatMessage::system(&self.system_prompt)];
            messages.extend(render_history(state));
            messages.push(ChatMessage::system(format!(
                "Given the conversation above, who should act next? \
                 Or should we FINISH? Select one of: {}",
                self.option_set().join(", ")
            )));

            let response = self
                .llm
                .complete(
                    &self.model,
                    messages,
                    &[self.route_definition()],
                    Some(ROUTE_TOOL),
                )
                .await?;

            let next = response
                .tool_uses()
                .into_iter()
                .find(|(_, name, _)| *name == ROUTE_TOOL)
                .and_then(|(_, _, input)| input["next"].as_str().map(str::to_string))
                .ok_or_else(|| {
                    WayfarerError::LlmParse("supervisor did not produce a route".into())
                })?;

            info!(supervisor = %self.name, next = %next, "Supervisor routed");
            Ok(StateUpdate::route(next))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_test_utils::MockLlm;

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

    #[test]
    fn test_route_definition_enumerates_options() {
        let node = SupervisorNode::new(
            "team_supervisor",
            "You are a supervisor.",
            vec!["travel_agent".into(), "visualizer".into()],
            Arc::new(MockLlm::new(vec![])),
            model(),
        );
        let def = node.route_definition();
        let options = def.input_schema["properties"]["next"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], FINISH);
    }

    #[tokio::test]
    async fn test_supervisor_sets_next() {
        let llm = Arc::new(MockLlm::new(vec![MockLlm::tool_call(
            ROUTE_TOOL,
            serde_json::json!({"next": "travel_agent"}),
        )]));
        let node = SupervisorNode::new(
            "team_supervisor",
            "You are a supervisor.",
            vec!["travel_agent".into()],
            llm,
            model(),
        );

        let update = node
            .run(&RunState::with_input("plan my trip"))
            .await
            .unwrap();
        assert_eq!(update.next.as_deref(), Some("travel_agent"));
        assert!(update.messages.is_empty());
    }

    #[tokio::test]
    async fn test_missing_route_is_parse_error() {
        let llm = Arc::new(MockLlm::new(vec![MockLlm::text("I think travel_agent")]));
        let node = SupervisorNode::new(
            "team_supervisor",
            "You are a supervisor.",
            vec!["travel_agent".into()],
            llm,
            model(),
        );

        let err = node.run(&RunState::with_input("hi")).await.unwrap_err();
        assert!(matches!(err, WayfarerError::LlmParse(_)));
    }
}
