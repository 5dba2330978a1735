pub mod providers;
pub mod retry;

use std::sync::Arc;

use wayfarer_core::config::{AppConfig, ModelConfig};
use wayfarer_core::traits::LlmClient;

pub use providers::anthropic::AnthropicClient;
pub use providers::openai::OpenAiClient;
pub use retry::RetryingClient;

/// Create an LLM client based on the provider name.
pub fn create_client(config: &ModelConfig) -> Box<dyn LlmClient> {
    match config.provider.as_str() {
        "anthropic" | "claude" => Box::new(AnthropicClient::new()),
        // Everything else uses the OpenAI-compatible client
        _ => Box::new(OpenAiClient::new()),
    }
}

/// Build the client stack for an application config: provider client wrapped
/// in retry/fallback handling.
pub fn build_client(config: &AppConfig) -> Arc<dyn LlmClient> {
    let primary = create_client(&config.model);
    let fallbacks = config
        .fallback_models
        .iter()
        .map(|m| (m.clone(), create_client(m)))
        .collect();
    let retry = config.model.retry.clone().unwrap_or_default();
    Arc::new(RetryingClient::new(primary, fallbacks, retry))
}
