// ABOUTME: Model factory - resolves a model identifier to a bound inference client.
// ABOUTME: Provider is explicit or inferred from the model name prefix.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::client::LlmClient;
use super::{AnthropicClient, OpenAiClient};
use crate::error::LlmError;

const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com/v1";

/// Declarative model selection, as it appears in a team definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider id ("openai", "anthropic", "deepseek", or a custom
    /// OpenAI-compatible provider with `api_base` set). Inferred from the
    /// model name when absent.
    #[serde(default)]
    pub provider: Option<String>,

    /// Model identifier, e.g. "gpt-4o-mini" or "claude-3-5-sonnet-20241022".
    pub name: String,

    #[serde(default)]
    pub temperature: Option<f64>,

    /// Override for the provider's endpoint.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Credential override; provider environment variables are the fallback.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ModelConfig {
    /// Config for a model name with everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            provider: None,
            name: name.into(),
            temperature: None,
            api_base: None,
            api_key: None,
        }
    }
}

/// Infer a provider id from well-known model name prefixes.
fn infer_provider(model_name: &str) -> Option<&'static str> {
    if model_name.starts_with("gpt") || model_name.starts_with("o1") {
        Some("openai")
    } else if model_name.starts_with("claude") {
        Some("anthropic")
    } else if model_name.starts_with("deepseek") {
        Some("deepseek")
    } else {
        None
    }
}

fn credential(explicit: &Option<String>, env_var: &str) -> Result<String, LlmError> {
    if let Some(key) = explicit {
        return Ok(key.clone());
    }
    std::env::var(env_var).map_err(|_| {
        LlmError::Configuration(format!("{env_var} environment variable not set"))
    })
}

/// Resolves model identifiers to callable inference clients.
#[derive(Debug, Default)]
pub struct ModelFactory;

impl ModelFactory {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a model config to a bound client.
    ///
    /// Fails with [`LlmError::UnknownModel`] when neither an explicit provider
    /// nor the model name identifies an endpoint. Credentials come from the
    /// config or the provider's environment variable; network contact is
    /// deferred to the first request.
    pub fn resolve(&self, config: &ModelConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
        let provider = match &config.provider {
            Some(p) => p.as_str(),
            None => infer_provider(&config.name)
                .ok_or_else(|| LlmError::UnknownModel(config.name.clone()))?,
        };

        match provider {
            "openai" => {
                let key = credential(&config.api_key, "OPENAI_API_KEY")?;
                let mut client = OpenAiClient::new(key);
                if let Some(base) = &config.api_base {
                    client = client.with_api_base(base);
                }
                Ok(Arc::new(client))
            }
            "anthropic" | "claude" => {
                let key = credential(&config.api_key, "ANTHROPIC_API_KEY")?;
                let mut client = AnthropicClient::new(key);
                if let Some(base) = &config.api_base {
                    client = client.with_api_base(base);
                }
                Ok(Arc::new(client))
            }
            "deepseek" => {
                let key = credential(&config.api_key, "DEEPSEEK_API_KEY")?;
                let base = config.api_base.as_deref().unwrap_or(DEEPSEEK_API_BASE);
                Ok(Arc::new(OpenAiClient::new(key).with_api_base(base)))
            }
            other => match &config.api_base {
                // Any OpenAI-compatible endpoint works as a custom provider
                Some(base) => {
                    let key = config.api_key.clone().unwrap_or_default();
                    Ok(Arc::new(OpenAiClient::new(key).with_api_base(base)))
                }
                None => Err(LlmError::UnknownModel(format!(
                    "{other}/{}",
                    config.name
                ))),
            },
        }
    }
}
