// ABOUTME: OpenAI-compatible chat completions client.
// ABOUTME: Also covers DeepSeek and any other provider speaking the same wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, FinishReason, TokenUsage, ToolCall, ToolSpec,
};
use crate::error::LlmError;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Wire format for a chat completions request.
#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object.
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    id: String,
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}

fn to_wire_message(msg: &ChatMessage) -> WireMessage {
    let role = match msg.role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::Tool => "tool",
    };

    let tool_calls: Vec<WireToolCall> = msg
        .tool_calls
        .iter()
        .map(|c| WireToolCall {
            id: c.id.clone(),
            call_type: "function".to_string(),
            function: WireFunctionCall {
                name: c.name.clone(),
                arguments: serde_json::to_string(&c.arguments).unwrap_or_default(),
            },
        })
        .collect();

    WireMessage {
        role: role.to_string(),
        content: if msg.content.is_empty() && !tool_calls.is_empty() {
            None
        } else {
            Some(msg.content.clone())
        },
        tool_calls: if tool_calls.is_empty() {
            None
        } else {
            Some(tool_calls)
        },
        tool_call_id: msg.tool_call_id.clone(),
    }
}

fn to_wire_request(req: &ChatRequest) -> WireRequest {
    WireRequest {
        model: req.model.clone(),
        messages: req.messages.iter().map(to_wire_message).collect(),
        temperature: req.temperature,
        max_tokens: req.max_tokens,
        tools: req
            .tools
            .iter()
            .map(|t: &ToolSpec| WireTool {
                tool_type: "function".to_string(),
                function: WireFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect(),
    }
}

fn parse_finish_reason(s: Option<&str>) -> FinishReason {
    match s {
        Some("tool_calls") => FinishReason::ToolCalls,
        Some("length") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

fn from_wire_response(resp: WireResponse) -> ChatResponse {
    let choice = resp.choices.into_iter().next();

    let (message, finish_reason) = match choice {
        Some(c) => {
            let tool_calls: Vec<ToolCall> = c
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: serde_json::from_str(&call.function.arguments)
                        .unwrap_or_default(),
                })
                .collect();

            (
                ChatMessage {
                    role: ChatRole::Assistant,
                    content: c.message.content.unwrap_or_default(),
                    tool_calls,
                    tool_call_id: None,
                },
                parse_finish_reason(c.finish_reason.as_deref()),
            )
        }
        None => (ChatMessage::assistant(""), FinishReason::Stop),
    };

    let usage = resp
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    ChatResponse {
        id: resp.id,
        model: resp.model,
        message,
        finish_reason,
        usage,
    }
}

/// Client for OpenAI-compatible chat completion endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_base: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client against the official OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the OPENAI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            LlmError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different OpenAI-compatible base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl super::client::LlmClient for OpenAiClient {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire_req = to_wire_request(req);
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
