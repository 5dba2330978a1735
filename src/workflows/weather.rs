use std::sync::Arc;

use wayfarer_core::config::AppConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_graph::{
    AgentOutcome, Graph, GraphBuilder, ReasonNode, RunState, ToolExecutorNode, END,
};
use wayfarer_tools::builtin::{GenerateImageTool, WeatherTool};
use wayfarer_tools::ToolRegistry;

use crate::prompts;

pub const AGENT: &str = "agent";
pub const TOOL_EXECUTOR: &str = "tool_executor";

/// Weather Q&A as a two-node reason/act loop: the agent node decides on a
/// tool call or a final answer, the executor node performs the call, and a
/// type-discriminated router loops until the outcome is a final answer.
pub fn build_weather_graph(config: &AppConfig, llm: Arc<dyn LlmClient>) -> Result<Graph<RunState>> {
    let weather = config.weather.as_ref().ok_or_else(|| {
        WayfarerError::Config("[weather] section is required for the weather workflow".into())
    })?;
    let image = config.image.as_ref().ok_or_else(|| {
        WayfarerError::Config("[image] section is required for the weather workflow".into())
    })?;

    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool::new(&weather.api_key));
    registry.register(GenerateImageTool::new(
        &image.api_key,
        &image.model,
        &image.size,
        &config.output.images_dir,
    ));
    let tools = Arc::new(registry);

    GraphBuilder::new()
        .add_node(
            AGENT,
            ReasonNode::new(
                AGENT,
                prompts::WEATHER_AGENT_SYSTEM_PROMPT,
                llm,
                config.model.clone(),
                tools.clone(),
            ),
        )
        .add_node(TOOL_EXECUTOR, ToolExecutorNode::new(TOOL_EXECUTOR, tools))
        .set_entry_point(AGENT)
        .add_edge(TOOL_EXECUTOR, AGENT)
        .add_conditional_edges(
            AGENT,
            |state: &RunState| match state.agent_outcome {
                Some(AgentOutcome::Finish { .. }) => "END".into(),
                _ => "continue".into(),
            },
            &[("continue", TOOL_EXECUTOR), ("END", END)],
        )
        .with_step_limit(config.graph.step_limit)
        .compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::config::{ImageConfig, ModelConfig, OutputConfig, WeatherConfig};
    use wayfarer_test_utils::MockLlm;

    fn test_config() -> AppConfig {
        AppConfig {
            model: ModelConfig {
                provider: "openai".into(),
                model_id: "test".into(),
                api_key: Some("k".into()),
                base_url: None,
                max_tokens: 256,
                temperature: 0.0,
                retry: None,
            },
            fallback_models: vec![],
            agent: Default::default(),
            graph: Default::default(),
            output: OutputConfig::default(),
            weather: Some(WeatherConfig {
                api_key: "w".into(),
            }),
            tavily: None,
            image: Some(ImageConfig {
                api_key: "i".into(),
                model: "dall-e-3".into(),
                size: "1024x1024".into(),
            }),
        }
    }

    #[test]
    fn test_graph_construction() {
        let graph = build_weather_graph(&test_config(), Arc::new(MockLlm::new(vec![]))).unwrap();
        assert_eq!(graph.entry_point(), AGENT);
        assert_eq!(graph.node_names().len(), 2);
    }

    #[test]
    fn test_missing_weather_section() {
        let mut config = test_config();
        config.weather = None;
        let err = build_weather_graph(&config, Arc::new(MockLlm::new(vec![]))).unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tool_executor() {
        let llm = Arc::new(MockLlm::new(vec![MockLlm::text(
            "Seoul is currently clear and 21C.",
        )]));

        let graph = build_weather_graph(&test_config(), llm).unwrap();
        let report = graph
            .execute(RunState::with_input("What is the weather in Seoul?"))
            .await
            .unwrap();

        assert_eq!(report.trace(), vec![AGENT]);
        match report.state.agent_outcome.unwrap() {
            AgentOutcome::Finish { output } => {
                assert_eq!(output, "Seoul is currently clear and 21C.")
            }
            other => panic!("expected finish, got {other:?}"),
        }
    }
}
