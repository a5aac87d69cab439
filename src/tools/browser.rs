// ABOUTME: BrowserTool - fetches a page and reduces it to readable text.
// ABOUTME: Strips scripts, styles, and markup; decodes common entities.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ToolError;
use crate::tool::{Tool, ToolOutput};

const DEFAULT_MAX_CHARS: usize = 40_000;

/// Tool for reading web pages.
pub struct BrowserTool {
    client: reqwest::Client,
}

impl Default for BrowserTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserTool {
    /// Create a new BrowserTool with default settings.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("squad/0.3")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Remove an element and its contents for every occurrence of `open`.
    fn drop_element(html: &str, open: &str, close: &str) -> String {
        let mut result = html.to_string();
        while let Some(start) = result.find(open) {
            match result[start..].find(close) {
                Some(end) => {
                    result = format!("{}{}", &result[..start], &result[start + end + close.len()..]);
                }
                None => break,
            }
        }
        result
    }

    /// Reduce an HTML document to plain text.
    fn readable_text(html: &str) -> String {
        let mut result = Self::drop_element(html, "<script", "</script>");
        result = Self::drop_element(&result, "<style", "</style>");

        for tag in &[
            "</p>", "</div>", "</h1>", "</h2>", "</h3>", "</h4>", "</h5>", "</h6>", "<br>",
            "<br/>", "</li>", "</tr>",
        ] {
            result = result.replace(tag, &format!("{tag}\n"));
        }

        let mut text = String::new();
        let mut in_tag = false;
        for ch in result.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(ch),
                _ => {}
            }
        }

        let text = text
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'");

        // Collapse runs of whitespace, keep at most single blank-free newlines
        let mut collapsed = String::new();
        let mut prev_space = false;
        let mut prev_newline = false;
        for ch in text.chars() {
            if ch == '\n' {
                if !prev_newline {
                    collapsed.push('\n');
                    prev_newline = true;
                }
                prev_space = true;
            } else if ch.is_whitespace() {
                if !prev_space {
                    collapsed.push(' ');
                    prev_space = true;
                }
                prev_newline = false;
            } else {
                collapsed.push(ch);
                prev_space = false;
                prev_newline = false;
            }
        }

        collapsed.trim().to_string()
    }
}

#[derive(Deserialize)]
struct BrowserParams {
    url: String,
    #[serde(default = "default_max_chars")]
    max_chars: usize,
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

#[async_trait]
impl Tool for BrowserTool {
    fn name(&self) -> &str {
        "browser"
    }

    fn description(&self) -> &str {
        "Open a URL and return the page content as readable plain text."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to open"
                },
                "max_chars": {
                    "type": "integer",
                    "description": "Maximum characters of text to return (default: 40000)",
                    "default": DEFAULT_MAX_CHARS
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, anyhow::Error> {
        let params: BrowserParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let url = if params.url.starts_with("http://") || params.url.starts_with("https://") {
            params.url
        } else {
            format!("https://{}", params.url)
        };

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(ToolOutput::error(format!("Failed to open URL: {e}"))),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(ToolOutput::error(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_lowercase().contains("text/html"));

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(ToolOutput::error(format!("Failed to read response: {e}"))),
        };

        let content = if is_html {
            Self::readable_text(&body)
        } else {
            body
        };

        let content = if content.len() > params.max_chars {
            let mut cut = params.max_chars;
            while !content.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}...\n[truncated at {} of {} characters]",
                &content[..cut],
                cut,
                content.len()
            )
        } else {
            content
        };

        Ok(ToolOutput::text(content))
    }
}
