// ABOUTME: Result types for team execution - per-agent reports and the
// ABOUTME: aggregated team report with a success/failure outcome.

use std::time::Duration;

use crate::llm::TokenUsage;

/// Final outcome of a team execution. The enum shape guarantees a summary
/// exists exactly when the run succeeded and an error exactly when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { summary: String },
    Failure { error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            Outcome::Success { summary } => Some(summary),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

/// What one agent produced during a run.
#[derive(Debug, Clone)]
pub struct AgentReport {
    /// Name of the agent.
    pub agent: String,

    /// The agent's final answer for its part of the task.
    pub answer: String,

    /// Reasoning steps the agent consumed from the team budget.
    pub steps: usize,

    /// Number of tool invocations made.
    pub tool_calls: usize,

    /// Token usage across the agent's model calls.
    pub usage: TokenUsage,
}

/// Aggregated result of `Team::execute`.
#[derive(Debug, Clone)]
pub struct TeamReport {
    /// Name of the team that ran.
    pub team: String,

    /// The task description that was executed.
    pub task: String,

    /// Success with a summary, or failure with a diagnostic error.
    pub outcome: Outcome,

    /// Reports from each agent that ran, in execution order. Present for
    /// failed runs too, up to the point of failure.
    pub agent_reports: Vec<AgentReport>,

    /// Wall-clock duration of the execution.
    pub elapsed: Duration,
}

impl TeamReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn summary(&self) -> Option<&str> {
        self.outcome.summary()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }

    /// Total steps consumed across all agents.
    pub fn steps_used(&self) -> usize {
        self.agent_reports.iter().map(|r| r.steps).sum()
    }

    /// Total token usage across all agents.
    pub fn usage(&self) -> TokenUsage {
        let mut total = TokenUsage::default();
        for report in &self.agent_reports {
            total.absorb(&report.usage);
        }
        total
    }
}
