// ABOUTME: Defines the ToolOutput type - a unified structure for tool
// ABOUTME: execution outcomes carrying content and an error flag.

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The output content, or the failure description when `is_error`.
    pub content: String,

    /// Whether this output represents a failure.
    pub is_error: bool,
}

impl ToolOutput {
    /// Create a successful text output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error output.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

impl Default for ToolOutput {
    fn default() -> Self {
        Self::text("")
    }
}
