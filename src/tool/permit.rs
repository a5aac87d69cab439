// ABOUTME: PermittedTools - a per-agent allowlist view over the registry.
// ABOUTME: Validated at team construction; lookups outside the set are denied.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Tool, ToolRegistry};
use crate::error::{ConfigError, PermissionError};
use crate::llm::ToolSpec;

/// The enumerated set of tools one agent is allowed to invoke.
///
/// Resolved against the registry when the team is built, so an unknown tool
/// name fails construction instead of surfacing mid-run. At run time a
/// lookup for anything outside the set is rejected here, before any tool
/// code executes.
pub struct PermittedTools {
    tools: HashMap<String, Arc<dyn Tool>>,
    // Declaration order, for stable spec lists
    order: Vec<String>,
}

impl PermittedTools {
    /// Select the named tools from the registry for the given agent.
    pub fn select(
        registry: &ToolRegistry,
        agent: &str,
        names: &[String],
    ) -> Result<Self, ConfigError> {
        let mut tools = HashMap::new();
        let mut order = Vec::new();

        for name in names {
            let tool = registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownTool {
                    agent: agent.to_string(),
                    tool: name.clone(),
                })?;
            if tools.insert(name.clone(), tool).is_none() {
                order.push(name.clone());
            }
        }

        Ok(Self { tools, order })
    }

    /// An empty permitted set (agent reasons without tools).
    pub fn none() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Check if a tool name is in the permitted set.
    pub fn is_permitted(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get a permitted tool by name.
    ///
    /// Anything outside the set is denied, whether or not the registry
    /// knows it.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, PermissionError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| PermissionError::Denied(name.to_string()))
    }

    /// Permitted tool names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of permitted tools.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Specs for the permitted tools, for handing to a model.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }
}
