use std::sync::Arc;

use wayfarer_core::config::AppConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_graph::{
    AgentNode, AgentRunner, Graph, GraphBuilder, RunState, SupervisorNode, END, FINISH,
};
use wayfarer_tools::builtin::{GenerateImageTool, MarkdownToPdfTool, WebSearchTool};
use wayfarer_tools::ToolRegistry;

use crate::prompts;

pub const TRAVEL_AGENT: &str = "travel_agent";
pub const LANGUAGE_ASSISTANT: &str = "language_assistant";
pub const VISUALIZER: &str = "visualizer";
pub const DESIGNER: &str = "designer";
pub const TEAM_SUPERVISOR: &str = "team_supervisor";

/// Supervisor-led travel team. The supervisor dispatches members until it
/// has an itinerary, language tips, and an image path, then routes FINISH
/// to the designer, which renders the final PDF.
pub fn build_travel_graph(config: &AppConfig, llm: Arc<dyn LlmClient>) -> Result<Graph<RunState>> {
    let tavily = config.tavily.as_ref().ok_or_else(|| {
        WayfarerError::Config("[tavily] section is required for the travel workflow".into())
    })?;
    let image = config.image.as_ref().ok_or_else(|| {
        WayfarerError::Config("[image] section is required for the travel workflow".into())
    })?;

    let members: Vec<String> = vec![
        TRAVEL_AGENT.into(),
        LANGUAGE_ASSISTANT.into(),
        VISUALIZER.into(),
    ];

    let agent = |name: &str, prompt: String, tools: ToolRegistry| {
        AgentNode::new(
            name,
            prompt,
            AgentRunner::new(
                llm.clone(),
                config.model.clone(),
                Arc::new(tools),
                config.agent.max_turns,
            ),
        )
    };

    let mut travel_tools = ToolRegistry::new();
    travel_tools.register(WebSearchTool::new(&tavily.api_key, tavily.max_results));

    let mut language_tools = ToolRegistry::new();
    language_tools.register(WebSearchTool::new(&tavily.api_key, tavily.max_results));

    let mut visual_tools = ToolRegistry::new();
    visual_tools.register(GenerateImageTool::new(
        &image.api_key,
        &image.model,
        &image.size,
        &config.output.images_dir,
    ));

    let mut designer_tools = ToolRegistry::new();
    designer_tools.register(MarkdownToPdfTool::new(
        &config.output.output_dir,
        &config.output.wkhtmltopdf_path,
    ));

    GraphBuilder::new()
        .add_node(
            TEAM_SUPERVISOR,
            SupervisorNode::new(
                TEAM_SUPERVISOR,
                prompts::supervisor_prompt(prompts::TEAM_SUPERVISOR_SYSTEM_PROMPT, &members),
                members,
                llm.clone(),
                config.model.clone(),
            ),
        )
        .add_node(
            TRAVEL_AGENT,
            agent(
                TRAVEL_AGENT,
                prompts::TRAVEL_AGENT_SYSTEM_PROMPT.into(),
                travel_tools,
            ),
        )
        .add_node(
            LANGUAGE_ASSISTANT,
            agent(
                LANGUAGE_ASSISTANT,
                prompts::LANGUAGE_ASSISTANT_SYSTEM_PROMPT.into(),
                language_tools,
            ),
        )
        .add_node(
            VISUALIZER,
            agent(
                VISUALIZER,
                prompts::VISUALIZER_SYSTEM_PROMPT.into(),
                visual_tools,
            ),
        )
        .add_node(
            DESIGNER,
            agent(
                DESIGNER,
                prompts::designer_prompt(
                    prompts::DESIGNER_SYSTEM_PROMPT,
                    &config.output.images_dir,
                ),
                designer_tools,
            ),
        )
        .set_entry_point(TEAM_SUPERVISOR)
        .add_edge(TRAVEL_AGENT, TEAM_SUPERVISOR)
        .add_edge(LANGUAGE_ASSISTANT, TEAM_SUPERVISOR)
        .add_edge(VISUALIZER, TEAM_SUPERVISOR)
        .add_edge(DESIGNER, END)
        .add_conditional_edges(
            TEAM_SUPERVISOR,
            |state: &RunState| state.next.clone().unwrap_or_default(),
            &[
                (TRAVEL_AGENT, TRAVEL_AGENT),
                (LANGUAGE_ASSISTANT, LANGUAGE_ASSISTANT),
                (VISUALIZER, VISUALIZER),
                (FINISH, DESIGNER),
            ],
        )
        .with_step_limit(config.graph.step_limit)
        .compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::config::{ImageConfig, ModelConfig, OutputConfig, TavilyConfig};
    use wayfarer_graph::Origin;
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
            weather: None,
            tavily: Some(TavilyConfig {
                api_key: "t".into(),
                max_results: 3,
            }),
            image: Some(ImageConfig {
                api_key: "i".into(),
                model: "dall-e-3".into(),
                size: "1024x1024".into(),
            }),
        }
    }

    #[test]
    fn test_graph_construction() {
        let graph = build_travel_graph(&test_config(), Arc::new(MockLlm::new(vec![]))).unwrap();
        assert_eq!(graph.entry_point(), TEAM_SUPERVISOR);
        assert_eq!(graph.node_names().len(), 5);
    }

    #[test]
    fn test_missing_tavily_section() {
        let mut config = test_config();
        config.tavily = None;
        let err = build_travel_graph(&config, Arc::new(MockLlm::new(vec![]))).unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }

    #[tokio::test]
    async fn test_supervised_run_dispatches_then_designs() {
        let llm = Arc::new(MockLlm::new(vec![
            MockLlm::tool_call("route", serde_json::json!({"next": TRAVEL_AGENT})),
            MockLlm::text("Day 1: Montmartre. Day 2: the Louvre. Day 3: Versailles."),
            MockLlm::tool_call("route", serde_json::json!({"next": FINISH})),
            MockLlm::text("output/itinerary.pdf"),
        ]));

        let graph = build_travel_graph(&test_config(), llm).unwrap();
        let report = graph
            .execute(RunState::with_input("I want to go to Paris for three days"))
            .await
            .unwrap();

        assert_eq!(
            report.trace(),
            vec![TEAM_SUPERVISOR, TRAVEL_AGENT, TEAM_SUPERVISOR, DESIGNER]
        );
        let last = report.state.last_message().unwrap();
        assert_eq!(last.origin, Origin::Node(DESIGNER.into()));
        assert_eq!(last.content, "output/itinerary.pdf");
    }
}
