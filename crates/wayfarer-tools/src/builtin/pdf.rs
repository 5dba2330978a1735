use std::path::PathBuf;
use std::process::Stdio;

use futures::future::BoxFuture;
use pulldown_cmark::{html, Parser};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use wayfarer_core::error::{Result, WayfarerError};
use wayfarer_core::traits::Tool;
use wayfarer_core::types::ToolResult;

/// Render markdown to a PDF file via wkhtmltopdf.
pub struct MarkdownToPdfTool {
    output_dir: PathBuf,
    wkhtmltopdf: String,
}

impl MarkdownToPdfTool {
    pub fn new(output_dir: impl Into<PathBuf>, wkhtmltopdf: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            wkhtmltopdf: wkhtmltopdf.into(),
        }
    }
}

#[derive(Deserialize)]
struct MarkdownToPdfInput {
    markdown_text: String,
}

/// Convert markdown text to a full HTML document.
fn generate_html_text(markdown_text: &str) -> String {
    // Models sometimes emit file:// prefixes on local image paths; wkhtmltopdf
    // wants plain paths.
    let markdown_text = markdown_text.replace("file:///", "").replace("file://", "");

    let mut body = String::new();
    html::push_html(&mut body, Parser::new(&markdown_text));

    format!(
        r#"<html>
<head>
    <style>
        @import url('https://fonts.googleapis.com/css2?family=Roboto&display=swap');
        body {{
            font-family: 'Roboto', sans-serif;
            line-height: 150%;
        }}
    </style>
</head>
<body>
{}
</body>
</html>"#,
        body
    )
}

impl Tool for MarkdownToPdfTool {
    fn name(&self) -> &str {
        "markdown_to_pdf_file"
    }

    fn description(&self) -> &str {
        "Convert markdown text to a PDF file. Takes valid markdown as a string as input and will return a string file-path to the generated PDF."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "markdown_text": {
                    "type": "string",
                    "description": "Markdown text to convert to PDF, provided in valid markdown format."
                }
            },
            "required": ["markdown_text"]
        })
    }

    fn timeout_secs(&self) -> u64 {
        60
    }

    fn execute(&self, input: serde_json::Value) -> BoxFuture<'_, Result<ToolResult>> {
        Box::pin(async move {
            let params: MarkdownToPdfInput = serde_json::from_value(input)
                .map_err(|e| WayfarerError::ToolValidation(e.to_string()))?;

            let html_text = generate_html_text(&params.markdown_text);

            tokio::fs::create_dir_all(&self.output_dir).await?;
            let pdf_path = self.output_dir.join(format!("{}.pdf", Uuid::new_v4()));

            let mut child = match tokio::process::Command::new(&self.wkhtmltopdf)
                .arg("--encoding")
                .arg("UTF-8")
                .arg("--enable-local-file-access")
                .arg("--print-media-type")
                .arg("--no-stop-slow-scripts")
                .arg("-")
                .arg(&pdf_path)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
            {
                Ok(child) => child,
                Err(e) => {
                    return Ok(ToolResult::error(format!(
                        "wkhtmltopdf is not available ({}): install it or set output.wkhtmltopdf_path.",
                        e
                    )));
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(html_text.as_bytes()).await?;
            }

            let output = child.wait_with_output().await?;
            if !output.status.success() || !pdf_path.exists() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Ok(ToolResult::error(format!(
                    "Could not generate PDF, please check your input and try again. {}",
                    stderr.trim()
                )));
            }

            info!(path = %pdf_path.display(), "PDF generated");
            Ok(ToolResult::success(pdf_path.display().to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_html_renders_markdown() {
        let html_text = generate_html_text("# Title\n\nSome **bold** text.");
        assert!(html_text.contains("<h1>Title</h1>"));
        assert!(html_text.contains("<strong>bold</strong>"));
        assert!(html_text.contains("Roboto"));
    }

    #[test]
    fn test_generate_html_strips_file_scheme() {
        let html_text = generate_html_text("![map](file:///images/abc.png)");
        assert!(!html_text.contains("file://"));
        assert!(html_text.contains("images/abc.png"));
    }
}
