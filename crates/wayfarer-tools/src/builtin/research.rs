use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::Tool;
use wayfarer_core::types::ToolResult;

const MAX_PAGE_CHARS: usize = 8_000;

/// Fetch the text content of several pages in one call.
///
/// All URLs are fetched concurrently and joined before the tool returns, so
/// the fan-out never outlives the node that requested it. Per-URL failures
/// are reported in-band so the agent can work with the pages that succeeded.
pub struct ResearchTool {
    http: reqwest::Client,
}

impl ResearchTool {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for ResearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ResearchInput {
    research_urls: Vec<String>,
}

async fn fetch_page(http: &reqwest::Client, url: &str) -> String {
    let request = http
        .get(url)
        .timeout(std::time::Duration::from_secs(20))
        .header(reqwest::header::USER_AGENT, "Wayfarer/0.4");
    let resp = match request.send().await {
        Ok(r) => r,
        Err(e) => return format!("Failed to fetch {}: {}", url, e),
    };
    let status = resp.status();
    if !status.is_success() {
        return format!("Failed to fetch {}: HTTP {}", url, status);
    }
    match resp.text().await {
        Ok(html) => {
            debug!(url, "Page fetched");
            parse_html(&html)
        }
        Err(e) => format!("Failed to read {}: {}", url, e),
    }
}

/// Strip markup and boilerplate, returning readable text truncated to a
/// size the model can digest.
fn parse_html(html: &str) -> String {
    let re_script = regex::Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    let cleaned = re_script.replace_all(html, "");
    let re_style = regex::Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    let cleaned = re_style.replace_all(&cleaned, "");

    let re_tags = regex::Regex::new(r"<[^>]+>").unwrap();
    let text = re_tags.replace_all(&cleaned, " ");

    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    text.chars().take(MAX_PAGE_CHARS).collect()
}

impl Tool for ResearchTool {
    fn name(&self) -> &str {
        "research"
    }

    fn description(&self) -> &str {
        "Get content of provided URLs for research purposes."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "research_urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Must be a list of valid URLs."
                }
            },
            "required": ["research_urls"]
        })
    }

    fn timeout_secs(&self) -> u64 {
        60
    }

    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        Box::pin(async move {
            let params: ResearchInput = serde_json::from_value(input)
                .map_err(|e| WayfarerError::ToolValidation(e.to_string()))?;

            if params.research_urls.is_empty() {
                return Ok(ToolResult::error("No URLs provided to research."));
            }

            let fetches = params
                .research_urls
                .iter()
                .map(|url| fetch_page(&self.http, url));
            let contents: Vec<String> = futures::future::join_all(fetches).await;

            Ok(ToolResult::success(serde_json::to_string(&contents)?))
        })
    }
}
