// ABOUTME: Defines the Tool trait - the core abstraction for agent capabilities.
// ABOUTME: Tools have a name, description, schema, and async execute method.

use async_trait::async_trait;

use super::ToolOutput;

/// A capability an agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for the model.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    ///
    /// Expected failures (bad command, unreachable host) come back as
    /// `ToolOutput` with `is_error` set; `Err` is for malformed parameters
    /// and infrastructure faults.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, anyhow::Error>;
}
