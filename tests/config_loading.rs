use std::io::Write;

use wayfarer_core::config::AppConfig;

#[test]
fn test_load_full_config_from_file() {
    let toml_content = r#"
[model]
provider = "openai"
model_id = "gpt-4o-mini"
api_key = "sk-test-key"
max_tokens = 2048
temperature = 0.5

[model.retry]
max_retries = 3

[[fallback_models]]
provider = "anthropic"
model_id = "claude-sonnet-4-20250514"
api_key = "sk-fallback"

[agent]
max_turns = 6

[graph]
step_limit = 25

[output]
output_dir = "/tmp/wayfarer-out"
images_dir = "/tmp/wayfarer-images"

[weather]
api_key = "weather-key"

[tavily]
api_key = "tavily-key"
max_results = 4

[image]
api_key = "image-key"
size = "512x512"
"#;

    let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
    tmp.write_all(toml_content.as_bytes()).expect("write toml");

    let config = AppConfig::load(tmp.path()).expect("load config");

    assert_eq!(config.model.provider, "openai");
    assert_eq!(config.model.model_id, "gpt-4o-mini");
    assert_eq!(config.model.api_key, Some("sk-test-key".to_string()));
    assert_eq!(config.model.max_tokens, 2048);
    assert_eq!(config.model.retry.unwrap().max_retries, 3);

    assert_eq!(config.fallback_models.len(), 1);
    assert_eq!(config.fallback_models[0].provider, "anthropic");

    assert_eq!(config.agent.max_turns, 6);
    assert_eq!(config.graph.step_limit, 25);
    assert_eq!(config.output.output_dir, "/tmp/wayfarer-out");
    assert_eq!(config.weather.unwrap().api_key, "weather-key");
    assert_eq!(config.tavily.unwrap().max_results, 4);
    assert_eq!(config.image.as_ref().unwrap().size, "512x512");
    assert_eq!(config.image.unwrap().model, "dall-e-3");
}

#[test]
fn test_env_var_expansion() {
    std::env::set_var("WAYFARER_CONFIG_TEST_KEY", "sk-from-env");

    let toml_content = r#"
[model]
model_id = "gpt-4o-mini"
api_key = "${WAYFARER_CONFIG_TEST_KEY}"
"#;

    let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
    tmp.write_all(toml_content.as_bytes()).expect("write toml");

    let config = AppConfig::load(tmp.path()).expect("load config");
    assert_eq!(config.model.api_key, Some("sk-from-env".to_string()));
}

#[test]
fn test_missing_file_is_config_not_found() {
    let err = AppConfig::load(std::path::Path::new("/nonexistent/wayfarer.toml")).unwrap_err();
    assert!(matches!(
        err,
        wayfarer_core::error::WayfarerError::ConfigNotFound(_)
    ));
}
