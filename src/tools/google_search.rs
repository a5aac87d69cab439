// ABOUTME: GoogleSearchTool - web search for agents.
// ABOUTME: Backed by the DuckDuckGo HTML endpoint; no API key required.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ToolError;
use crate::tool::{Tool, ToolOutput};

/// One parsed search hit.
#[derive(Debug, Clone)]
struct SearchHit {
    title: String,
    url: String,
    snippet: String,
}

/// Tool for searching the web.
pub struct GoogleSearchTool {
    client: reqwest::Client,
}

impl Default for GoogleSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleSearchTool {
    /// Create a new search tool.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; squad/0.3)")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn strip_tags(html: &str) -> String {
        let mut text = String::new();
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(ch),
                _ => {}
            }
        }
        text.replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
    }

    /// Unwrap DuckDuckGo's redirect URLs (uddg= query parameter).
    fn unwrap_redirect(raw: &str) -> String {
        let Some(pos) = raw.find("uddg=") else {
            return raw.to_string();
        };
        let encoded = &raw[pos + 5..];
        let encoded = match encoded.find('&') {
            Some(amp) => &encoded[..amp],
            None => encoded,
        };
        urlencoding::decode(encoded)
            .map(|s| s.to_string())
            .unwrap_or_else(|_| raw.to_string())
    }

    /// Parse search hits out of the DuckDuckGo HTML response.
    fn parse_hits(html: &str) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        let mut remaining = html;

        while let Some(start) = remaining.find("class=\"result__a\"") {
            remaining = &remaining[start..];

            let Some(href_start) = remaining.find("href=\"") else {
                remaining = &remaining[1..];
                continue;
            };
            let after_href = &remaining[href_start + 6..];
            let Some(href_end) = after_href.find('"') else {
                remaining = &remaining[1..];
                continue;
            };
            let url = Self::unwrap_redirect(&after_href[..href_end]);

            let title = match remaining.find('>') {
                Some(gt) => {
                    let after = &remaining[gt + 1..];
                    match after.find("</a>") {
                        Some(end) => Self::strip_tags(&after[..end]),
                        None => String::new(),
                    }
                }
                None => String::new(),
            };

            let snippet = match remaining.find("class=\"result__snippet\"") {
                Some(snip_start) => {
                    let after = &remaining[snip_start..];
                    match after.find('>') {
                        Some(gt) => {
                            let body = &after[gt + 1..];
                            match body.find("</") {
                                Some(end) => Self::strip_tags(&body[..end]),
                                None => String::new(),
                            }
                        }
                        None => String::new(),
                    }
                }
                None => String::new(),
            };

            if !url.is_empty() && !title.is_empty() {
                hits.push(SearchHit {
                    title: title.trim().to_string(),
                    url,
                    snippet: snippet.trim().to_string(),
                });
            }

            match remaining.get(1..) {
                Some(rest) => remaining = rest,
                None => break,
            }
        }

        hits
    }
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    8
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &str {
        "googleSearch"
    }

    fn description(&self) -> &str {
        "Search the web. Returns result titles, URLs, and snippets."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results (default: 8)",
                    "default": 8
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, anyhow::Error> {
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(&params.query)
        );

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(ToolOutput::error(format!("Search failed: {e}"))),
        };

        if !response.status().is_success() {
            return Ok(ToolOutput::error(format!(
                "Search failed with status: {}",
                response.status()
            )));
        }

        let html = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(ToolOutput::error(format!("Failed to read response: {e}"))),
        };

        let hits: Vec<_> = Self::parse_hits(&html)
            .into_iter()
            .take(params.max_results)
            .collect();

        if hits.is_empty() {
            return Ok(ToolOutput::text("No results found."));
        }

        let mut output = format!("{} results for \"{}\":\n\n", hits.len(), params.query);
        for (i, hit) in hits.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}\n   {}\n   {}\n\n",
                i + 1,
                hit.title,
                hit.url,
                if hit.snippet.is_empty() {
                    "(no snippet)"
                } else {
                    &hit.snippet
                }
            ));
        }

        Ok(ToolOutput::text(output))
    }
}
