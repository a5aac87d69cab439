// ABOUTME: Task - the unit of work submitted to a team for execution.
// ABOUTME: Validates its description eagerly; immutable once constructed.

use std::collections::HashMap;

use crate::error::TaskError;

/// A unit of work: a natural-language description plus optional
/// structured context.
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    context: HashMap<String, serde_json::Value>,
}

impl Task {
    /// Create a task. Fails if the description is empty after trimming.
    pub fn new(description: impl Into<String>) -> Result<Self, TaskError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        Ok(Self {
            description,
            context: HashMap::new(),
        })
    }

    /// Attach a context value.
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn context(&self) -> &HashMap<String, serde_json::Value> {
        &self.context
    }

    /// Render the context map as a prompt block, if any context exists.
    pub fn context_block(&self) -> Option<String> {
        if self.context.is_empty() {
            return None;
        }
        let mut keys: Vec<_> = self.context.keys().collect();
        keys.sort();
        let lines: Vec<String> = keys
            .into_iter()
            .map(|k| format!("{k}: {}", self.context[k]))
            .collect();
        Some(lines.join("\n"))
    }
}
