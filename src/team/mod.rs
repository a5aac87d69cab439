// ABOUTME: Team orchestration - definitions, tasks, agents, strategies,
// ABOUTME: and the execution engine that ties them together.

mod agent;
mod definition;
mod report;
mod strategy;
mod task;
#[allow(clippy::module_inception)]
mod team;


pub use agent::{Agent, StepBudget};
pub use definition::{AgentDefinition, TeamDefinition, TeamFlags};
pub use report::{AgentReport, Outcome, TeamReport};
pub use strategy::{Delegation, Handoff, SequentialHandoff, Strategy, StrategyRun};
pub use task::Task;
pub use team::Team;
