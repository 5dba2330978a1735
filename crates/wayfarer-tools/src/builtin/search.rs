use futures::future::BoxFuture;
use serde_json::json;

use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::Tool;
use wayfarer_core::types::ToolResult;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Web search backed by the Tavily API.
pub struct WebSearchTool {
    api_key: String,
    max_results: u64,
    http: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(api_key: impl Into<String>, max_results: u64) -> Self {
        Self {
            api_key: api_key.into(),
            max_results,
            http: reqwest::Client::new(),
        }
    }
}

fn format_results(body: &serde_json::Value) -> String {
    body["results"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|r| {
                    format!(
                        "**{}**\n{}\nURL: {}",
                        r["title"].as_str().unwrap_or(""),
                        r["content"].as_str().unwrap_or(""),
                        r["url"].as_str().unwrap_or("")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n---\n\n")
        })
        .unwrap_or_else(|| "No results found.".into())
}

impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns relevant results with snippets."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        Box::pin(async move {
            let query = input["query"]
                .as_str()
                .ok_or_else(|| WayfarerError::ToolValidation("'query' must be a string".into()))?;

            let resp = self
                .http
                .post(TAVILY_API_URL)
                .json(&json!({
                    "api_key": self.api_key,
                    "query": query,
                    "max_results": self.max_results,
                }))
                .send()
                .await
                .map_err(|e| WayfarerError::ToolExecution {
                    tool: "web_search".into(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Ok(ToolResult::error(format!("Search failed: HTTP {}", status)));
            }

            let body: serde_json::Value =
                resp.json().await.map_err(|e| WayfarerError::ToolExecution {
                    tool: "web_search".into(),
                    message: e.to_string(),
                })?;

            Ok(ToolResult::success(format_results(&body)))
        })
    }
}
