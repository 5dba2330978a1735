use std::path::PathBuf;

use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::Tool;
use wayfarer_core::types::ToolResult;

const IMAGES_API_URL: &str = "https://api.openai.com/v1/images/generations";

/// Generate an image from a description and download it to disk.
pub struct GenerateImageTool {
    api_key: String,
    model: String,
    size: String,
    images_dir: PathBuf,
    http: reqwest::Client,
}

impl GenerateImageTool {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        size: impl Into<String>,
        images_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            size: size.into(),
            images_dir: images_dir.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn download(&self, image_url: &str) -> Result<ToolResult> {
        let resp = self
            .http
            .get(image_url)
            .send()
            .await
            .map_err(|e| WayfarerError::ToolExecution {
                tool: "generate_image".into(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Ok(ToolResult::error("Could not download image from URL."));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| WayfarerError::ToolExecution {
                tool: "generate_image".into(),
                message: e.to_string(),
            })?;

        tokio::fs::create_dir_all(&self.images_dir).await?;
        let image_path = self.images_dir.join(format!("{}.png", Uuid::new_v4()));
        tokio::fs::write(&image_path, &bytes).await?;

        info!(path = %image_path.display(), "Image saved");
        Ok(ToolResult::success(image_path.display().to_string()))
    }
}

#[derive(Deserialize)]
struct GenerateImageInput {
    image_description: String,
}

impl Tool for GenerateImageTool {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generate an image based on a detailed description."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "image_description": {
                    "type": "string",
                    "description": "A detailed description of the desired image."
                }
            },
            "required": ["image_description"]
        })
    }

    fn timeout_secs(&self) -> u64 {
        120
    }

    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        Box::pin(async move {
            let params: GenerateImageInput = serde_json::from_value(input)
                .map_err(|e| WayfarerError::ToolValidation(e.to_string()))?;

            debug!(model = %self.model, "Requesting image generation");

            let resp = self
                .http
                .post(IMAGES_API_URL)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": self.model,
                    "prompt": params.image_description,
                    "size": self.size,
                    "quality": "standard",
                    "n": 1,
                }))
                .send()
                .await
                .map_err(|e| WayfarerError::ToolExecution {
                    tool: "generate_image".into(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Ok(ToolResult::error(format!(
                    "Image generation failed: HTTP {}: {}",
                    status, body
                )));
            }

            let body: serde_json::Value =
                resp.json().await.map_err(|e| WayfarerError::ToolExecution {
                    tool: "generate_image".into(),
                    message: e.to_string(),
                })?;

            match body["data"][0]["url"].as_str() {
                Some(url) => self.download(url).await,
                None => Ok(ToolResult::error("No image URL returned from API.")),
            }
        })
    }
}
