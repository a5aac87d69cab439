// ABOUTME: Anthropic Claude API client implementation.
// ABOUTME: Maps the flat chat-message history onto Anthropic's content blocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, FinishReason, TokenUsage, ToolCall,
};
use crate::error::LlmError;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: Vec<WireContent>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

#[derive(Debug, Serialize)]
struct WireTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    id: String,
    model: String,
    content: Vec<WireContent>,
    stop_reason: Option<String>,
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}

/// Convert the flat message history to Anthropic's shape: system messages
/// are hoisted into the top-level `system` field, tool outputs become
/// `tool_result` blocks inside a user message.
fn to_wire_request(req: &ChatRequest) -> WireRequest {
    let mut system_parts = Vec::new();
    let mut messages: Vec<WireMessage> = Vec::new();

    for msg in &req.messages {
        match msg.role {
            ChatRole::System => system_parts.push(msg.content.clone()),
            ChatRole::User => messages.push(WireMessage {
                role: "user".to_string(),
                content: vec![WireContent::Text {
                    text: msg.content.clone(),
                }],
            }),
            ChatRole::Assistant => {
                let mut content = Vec::new();
                if !msg.content.is_empty() {
                    content.push(WireContent::Text {
                        text: msg.content.clone(),
                    });
                }
                for call in &msg.tool_calls {
                    content.push(WireContent::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.arguments.clone(),
                    });
                }
                messages.push(WireMessage {
                    role: "assistant".to_string(),
                    content,
                });
            }
            ChatRole::Tool => {
                let block = WireContent::ToolResult {
                    tool_use_id: msg.tool_call_id.clone().unwrap_or_default(),
                    content: msg.content.clone(),
                };
                // Consecutive tool outputs share one user message
                match messages.last_mut() {
                    Some(last)
                        if last.role == "user"
                            && last
                                .content
                                .iter()
                                .all(|c| matches!(c, WireContent::ToolResult { .. })) =>
                    {
                        last.content.push(block);
                    }
                    _ => messages.push(WireMessage {
                        role: "user".to_string(),
                        content: vec![block],
                    }),
                }
            }
        }
    }

    WireRequest {
        model: req.model.clone(),
        messages,
        max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system: if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        },
        temperature: req.temperature,
        tools: req
            .tools
            .iter()
            .map(|t| WireTool {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.parameters.clone(),
            })
            .collect(),
    }
}

fn parse_stop_reason(s: Option<&str>) -> FinishReason {
    match s {
        Some("tool_use") => FinishReason::ToolCalls,
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

fn from_wire_response(resp: WireResponse) -> ChatResponse {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in resp.content {
        match block {
            WireContent::Text { text: t } => text.push_str(&t),
            WireContent::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                id,
                name,
                arguments: input,
            }),
            WireContent::ToolResult { .. } => {}
        }
    }

    ChatResponse {
        id: resp.id,
        model: resp.model,
        message: ChatMessage {
            role: ChatRole::Assistant,
            content: text,
            tool_calls,
            tool_call_id: None,
        },
        finish_reason: parse_stop_reason(resp.stop_reason.as_deref()),
        usage: TokenUsage {
            prompt_tokens: resp.usage.input_tokens,
            completion_tokens: resp.usage.output_tokens,
        },
    }
}

/// Client for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_base: String,
    api_key: String,
    http: reqwest::Client,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: ANTHROPIC_API_BASE.to_string(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            LlmError::Configuration("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different base URL (proxies, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl super::client::LlmClient for AnthropicClient {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire_req = to_wire_request(req);
        let url = format!("{}/messages", self.api_base.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&wire_req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<WireError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let wire_resp: WireResponse = response.json().await?;
        Ok(from_wire_response(wire_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_hoisted() {
        let req = ChatRequest::new("claude-3-5-sonnet-20241022")
            .message(ChatMessage::system("be terse"))
            .message(ChatMessage::user("hi"));

        let wire = to_wire_request(&req);
        assert_eq!(wire.system.as_deref(), Some("be terse"));
        assert_eq!(wire.messages.len(), 1);
        assert_eq!(wire.messages[0].role, "user");
    }

    #[test]
    fn test_tool_outputs_grouped_into_user_message() {
        let req = ChatRequest::new("claude-3-5-sonnet-20241022")
            .message(ChatMessage::user("run things"))
            .message(ChatMessage::assistant_tool_calls(
                "",
                vec![
                    ToolCall {
                        id: "a".into(),
                        name: "terminal".into(),
                        arguments: serde_json::json!({"command": "ls"}),
                    },
                    ToolCall {
                        id: "b".into(),
                        name: "terminal".into(),
                        arguments: serde_json::json!({"command": "pwd"}),
                    },
                ],
            ))
            .message(ChatMessage::tool_output("a", "out-a"))
            .message(ChatMessage::tool_output("b", "out-b"));

        let wire = to_wire_request(&req);
        // user, assistant, single grouped tool-result user message
        assert_eq!(wire.messages.len(), 3);
        assert_eq!(wire.messages[2].role, "user");
        assert_eq!(wire.messages[2].content.len(), 2);
    }

    #[test]
    fn test_response_with_tool_use() {
        let raw = serde_json::json!({
            "id": "msg_1",
            "model": "claude-3-5-sonnet-20241022",
            "content": [
                {"type": "text", "text": "Running it."},
                {"type": "tool_use", "id": "tu_1", "name": "terminal",
                 "input": {"command": "whoami"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 9, "output_tokens": 7}
        });

        let wire: WireResponse = serde_json::from_value(raw).unwrap();
        let resp = from_wire_response(wire);

        assert_eq!(resp.finish_reason, FinishReason::ToolCalls);
        assert_eq!(resp.text(), "Running it.");
        assert_eq!(resp.message.tool_calls[0].id, "tu_1");
        assert_eq!(resp.usage.completion_tokens, 7);
    }
}
