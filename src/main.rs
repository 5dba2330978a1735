mod prompts;
mod workflows;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wayfarer_core::config::AppConfig;
use wayfarer_core::traits::LlmClient;
use wayfarer_graph::{AgentOutcome, ExecutionReport, RunState};

#[derive(Parser)]
#[command(name = "wayfarer", version, about = "Agent workflow graphs over a shared run state")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "wayfarer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a weather question with a tool-calling agent loop
    Weather {
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Produce a travel itinerary PDF with a supervisor-led agent team
    Travel {
        #[arg(trailing_var_arg = true)]
        request: Vec<String>,
    },
    /// Research a topic on the web and save a markdown report
    Research {
        #[arg(trailing_var_arg = true)]
        topic: Vec<String>,
    },
}

fn join_input(words: Vec<String>) -> anyhow::Result<String> {
    let input = words.join(" ");
    if input.trim().is_empty() {
        bail!("no input text provided");
    }
    Ok(input)
}

fn print_report(report: &ExecutionReport<RunState>) {
    info!(
        trace = ?report.trace(),
        total_elapsed_ms = report.total_elapsed_ms,
        "Run finished"
    );

    let final_text = match &report.state.agent_outcome {
        Some(AgentOutcome::Finish { output }) => output.clone(),
        _ => report
            .state
            .last_message()
            .map(|m| m.content.clone())
            .unwrap_or_default(),
    };
    println!("{final_text}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayfarer=info,warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let llm: Arc<dyn LlmClient> = wayfarer_llm::build_client(&config);

    let (graph, input) = match cli.command {
        Commands::Weather { query } => (
            workflows::build_weather_graph(&config, llm)?,
            join_input(query)?,
        ),
        Commands::Travel { request } => (
            workflows::build_travel_graph(&config, llm)?,
            join_input(request)?,
        ),
        Commands::Research { topic } => (
            workflows::build_research_graph(&config, llm)?,
            join_input(topic)?,
        ),
    };

    let report = graph.execute(RunState::with_input(input)).await?;
    print_report(&report);

    Ok(())
}
