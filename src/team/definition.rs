// ABOUTME: Declarative team definitions - the YAML document a team is built from.
// ABOUTME: Validation is eager and aggregated; a bad definition never half-constructs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::llm::ModelConfig;

fn default_max_steps() -> usize {
    20
}

fn default_enable_logging() -> bool {
    true
}

fn default_tool_timeout_secs() -> u64 {
    120
}

/// Execution flags from the `config` section of a team definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamFlags {
    /// Emit per-step INFO events during execution.
    #[serde(default = "default_enable_logging")]
    pub enable_logging: bool,

    /// Upper bound on a single tool invocation, in seconds. A timeout is
    /// reported to the agent as a tool failure.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for TeamFlags {
    fn default() -> Self {
        Self {
            enable_logging: default_enable_logging(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// One agent entry in a team definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Unique name within the team.
    pub name: String,

    /// Short role label, e.g. "researcher".
    #[serde(default)]
    pub role: String,

    /// Longer description used when deciding which agent should act.
    #[serde(default)]
    pub description: String,

    /// System prompt for the agent's model calls.
    pub system_prompt: String,

    /// Names of tools this agent may invoke. Must exist in the registry
    /// when the team is constructed.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A complete declarative team definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub version: Option<String>,

    /// Total step budget across all agents in one execution.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    pub model: ModelConfig,

    #[serde(default)]
    pub config: TeamFlags,

    pub agents: Vec<AgentDefinition>,
}

impl TeamDefinition {
    /// Parse a definition from a YAML document and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let definition: TeamDefinition = serde_yaml::from_str(yaml)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load and validate a definition from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Validate the definition, collecting every problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("team name must not be empty".to_string());
        }
        if self.max_steps == 0 {
            problems.push("max_steps must be greater than zero".to_string());
        }
        if self.model.name.trim().is_empty() {
            problems.push("model name must not be empty".to_string());
        }
        if self.agents.is_empty() {
            problems.push("team must declare at least one agent".to_string());
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                problems.push("agent name must not be empty".to_string());
                continue;
            }
            if !seen.insert(agent.name.as_str()) {
                problems.push(format!("duplicate agent name '{}'", agent.name));
            }
            if agent.system_prompt.trim().is_empty() {
                problems.push(format!(
                    "agent '{}' must have a system_prompt",
                    agent.name
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
