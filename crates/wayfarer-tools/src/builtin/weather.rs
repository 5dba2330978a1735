use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::Tool;
use wayfarer_core::types::ToolResult;

const WEATHER_API_URL: &str = "http://api.weatherapi.com/v1/current.json";

/// Current-conditions lookup backed by weatherapi.com.
pub struct WeatherTool {
    api_key: String,
    http: reqwest::Client,
}

impl WeatherTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct WeatherInput {
    #[serde(default)]
    location: String,
}

impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a specified location."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Must be a valid location in city format."
                }
            },
            "required": ["location"]
        })
    }

    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        Box::pin(async move {
            let params: WeatherInput = serde_json::from_value(input)
                .map_err(|e| WayfarerError::ToolValidation(e.to_string()))?;

            if params.location.is_empty() {
                return Ok(ToolResult::error(
                    "Please provide a location and call the get_weather function again.",
                ));
            }

            debug!(location = %params.location, "Fetching current weather");

            let resp = self
                .http
                .get(WEATHER_API_URL)
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("q", params.location.as_str()),
                    ("aqi", "no"),
                    ("alerts", "no"),
                ])
                .send()
                .await
                .map_err(|e| WayfarerError::ToolExecution {
                    tool: "get_weather".into(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            let body = resp.text().await.map_err(|e| WayfarerError::ToolExecution {
                tool: "get_weather".into(),
                message: e.to_string(),
            })?;

            if !status.is_success() {
                return Ok(ToolResult::error(format!("HTTP {}: {}", status, body)));
            }

            Ok(ToolResult::success(body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_location_is_soft_failure() {
        let tool = WeatherTool::new("key");
        let result = tool
            .execute(serde_json::json!({"location": ""}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.content.contains("provide a location"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_validation_error() {
        let tool = WeatherTool::new("key");
        let err = tool
            .execute(serde_json::json!({"location": 42}))
            .await
            .unwrap_err();
        assert!(matches!(err, WayfarerError::ToolValidation(_)));
    }
}
