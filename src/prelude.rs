// ABOUTME: Convenience re-exports for the common path: define a team,
// ABOUTME: hand it a task, read the report.

pub use crate::error::SquadError;
pub use crate::llm::{LlmClient, ModelConfig, ModelFactory};
pub use crate::team::{Task, Team, TeamDefinition, TeamReport};
pub use crate::tool::{Tool, ToolOutput, ToolRegistry};
