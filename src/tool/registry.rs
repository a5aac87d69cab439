// ABOUTME: Implements the ToolRegistry - the global catalog of named
// ABOUTME: capabilities that team definitions are validated against.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;
use crate::llm::ToolSpec;

/// The catalog of available tools.
///
/// Populated once at startup; teams are validated against it at construction
/// time, so it has no runtime mutation story.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in capabilities:
    /// `terminal`, `browser`, `saveFile`, `googleSearch`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(crate::tools::TerminalTool);
        registry.register(crate::tools::BrowserTool::new());
        registry.register(crate::tools::SaveFileTool);
        registry.register(crate::tools::GoogleSearchTool::new());
        registry
    }

    /// Register a tool. Replaces any previous tool with the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a tool from an Arc.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check whether a tool name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names, sorted alphabetically.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Specs for every registered tool, for handing to a model.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }
}
