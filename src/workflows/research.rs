use std::sync::Arc;

use wayfarer_core::config::AppConfig;
use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::LlmClient;
use wayfarer_graph::{AgentNode, AgentRunner, Graph, GraphBuilder, RunState, SaveNode, END};
use wayfarer_tools::builtin::{ResearchTool, WebSearchTool};
use wayfarer_tools::ToolRegistry;

use crate::prompts;

pub const TAVILY_AGENT: &str = "tavily_agent";
pub const RESEARCH_AGENT: &str = "search_evaluator_agent";
pub const SAVE_FILE: &str = "save_file";

/// Linear research pipeline: search the web, read the promising pages
/// concurrently, write the report to disk.
pub fn build_research_graph(
    config: &AppConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<Graph<RunState>> {
    let tavily = config.tavily.as_ref().ok_or_else(|| {
        WayfarerError::Config("[tavily] section is required for the research workflow".into())
    })?;

    let mut search_tools = ToolRegistry::new();
    search_tools.register(WebSearchTool::new(&tavily.api_key, tavily.max_results));

    let mut research_tools = ToolRegistry::new();
    research_tools.register(ResearchTool::new());

    let agent = |name: &str, prompt: &str, tools: ToolRegistry| {
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

    GraphBuilder::new()
        .add_node(
            TAVILY_AGENT,
            agent(
                TAVILY_AGENT,
                prompts::TAVILY_AGENT_SYSTEM_PROMPT,
                search_tools,
            ),
        )
        .add_node(
            RESEARCH_AGENT,
            agent(
                RESEARCH_AGENT,
                prompts::RESEARCHER_SYSTEM_PROMPT,
                research_tools,
            ),
        )
        .add_node(SAVE_FILE, SaveNode::new(SAVE_FILE, &config.output.output_dir))
        .set_entry_point(TAVILY_AGENT)
        .add_edge(TAVILY_AGENT, RESEARCH_AGENT)
        .add_edge(RESEARCH_AGENT, SAVE_FILE)
        .add_edge(SAVE_FILE, END)
        .with_step_limit(config.graph.step_limit)
        .compile()
}
