// ABOUTME: Defines the LlmClient trait - the abstraction layer that allows
// ABOUTME: squad to work with any LLM provider (OpenAI, Anthropic, etc.)

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse};
use crate::error::LlmError;

/// Trait for LLM client implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run a chat completion and return the full response.
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError>;
}
