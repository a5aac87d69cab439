// ABOUTME: Team - the execution engine built from a validated definition.
// ABOUTME: Owns the agents, the step budget, and the coordination strategy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use super::agent::{Agent, StepBudget};
use super::definition::TeamDefinition;
use super::report::{Outcome, TeamReport};
use super::strategy::{SequentialHandoff, Strategy};
use super::task::Task;
use crate::error::SquadError;
use crate::llm::{LlmClient, ModelFactory};
use crate::tool::{PermittedTools, ToolRegistry};

/// A team of agents bound to a model and a tool registry, ready to execute
/// tasks. Immutable once constructed.
pub struct Team {
    name: String,
    description: String,
    version: Option<String>,
    max_steps: usize,
    enable_logging: bool,
    agents: Vec<Agent>,
    strategy: Box<dyn Strategy>,
}

impl Team {
    /// Build a team from a validated definition, resolving the model through
    /// the factory and every agent's tool list against the registry.
    pub fn from_definition(
        definition: TeamDefinition,
        registry: &ToolRegistry,
        factory: &ModelFactory,
    ) -> Result<Self, SquadError> {
        let client = factory.resolve(&definition.model)?;
        Self::from_definition_with_client(definition, registry, client)
    }

    /// Build a team with an already-constructed inference client.
    pub fn from_definition_with_client(
        definition: TeamDefinition,
        registry: &ToolRegistry,
        client: Arc<dyn LlmClient>,
    ) -> Result<Self, SquadError> {
        definition.validate()?;

        let tool_timeout = Duration::from_secs(definition.config.tool_timeout_secs);
        let mut agents = Vec::with_capacity(definition.agents.len());

        for agent_def in &definition.agents {
            let tools = PermittedTools::select(registry, &agent_def.name, &agent_def.tools)?;
            agents.push(Agent::new(
                &agent_def.name,
                &agent_def.role,
                &agent_def.description,
                &agent_def.system_prompt,
                &definition.model.name,
                definition.model.temperature,
                Arc::clone(&client),
                tools,
                tool_timeout,
                definition.config.enable_logging,
            ));
        }

        Ok(Self {
            name: definition.name,
            description: definition.description,
            version: definition.version,
            max_steps: definition.max_steps,
            enable_logging: definition.config.enable_logging,
            agents,
            strategy: Box::new(SequentialHandoff),
        })
    }

    /// Replace the coordination strategy.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Execute a task to completion.
    ///
    /// Never panics and never returns Err: every failure mode lands in the
    /// report's outcome, with the reports of agents that finished before the
    /// failure preserved.
    pub async fn execute(&self, task: Task) -> TeamReport {
        let started = Instant::now();
        if self.enable_logging {
            info!(team = %self.name, task = %task.description(), "team execution started");
        }

        let mut budget = StepBudget::new(self.max_steps);
        let run = self.strategy.run(&self.agents, &task, &mut budget).await;

        let outcome = match run.failure {
            None => {
                // The last agent to act speaks for the team
                let summary = run
                    .reports
                    .last()
                    .map(|r| r.answer.clone())
                    .unwrap_or_default();
                Outcome::Success { summary }
            }
            Some(failure) => Outcome::Failure {
                error: failure.to_string(),
            },
        };

        let elapsed = started.elapsed();
        if self.enable_logging {
            match &outcome {
                Outcome::Success { .. } => {
                    info!(team = %self.name, steps = budget.used(), ?elapsed,
                          "team execution succeeded");
                }
                Outcome::Failure { error } => {
                    error!(team = %self.name, steps = budget.used(), ?elapsed,
                           %error, "team execution failed");
                }
            }
        }

        TeamReport {
            team: self.name.clone(),
            task: task.description().to_string(),
            outcome,
            agent_reports: run.reports,
            elapsed,
        }
    }
}
