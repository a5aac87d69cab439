// ABOUTME: Defines all error types for the squad library using thiserror.
// ABOUTME: Each concern has its own error enum, unified under SquadError.

/// Top-level error type for the squad library.
#[derive(Debug, thiserror::Error)]
pub enum SquadError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),
}

/// Errors from loading and validating team definitions.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid team definition: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },
}

/// Errors from task construction.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task description must not be empty")]
    EmptyDescription,
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

/// Errors from tool operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    Execution(#[source] anyhow::Error),

    #[error("Tool '{tool}' timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },
}

/// Errors from tool permission checks.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("Tool '{0}' is not in this agent's permitted set")]
    Denied(String),
}

/// Unrecoverable errors inside an agent's think-act loop.
///
/// Tool failures never appear here: they are fed back to the model as
/// observations. Only conditions the agent cannot reason past escalate.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Model invocation failed: {0}")]
    Model(#[from] LlmError),

    #[error("Step budget exhausted ({limit} steps) without task completion")]
    StepBudgetExceeded { limit: usize },

    #[error("Delegation decision failed: {0}")]
    Decision(String),
}
