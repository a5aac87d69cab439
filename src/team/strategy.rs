// ABOUTME: Coordination strategies - how a team routes a task across its agents.
// ABOUTME: Sequential hand-off runs agents in order; delegation lets a model pick.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::agent::{Agent, StepBudget};
use super::report::AgentReport;
use super::task::Task;
use crate::error::RunError;
use crate::llm::{ChatMessage, ChatRequest, LlmClient};

/// An earlier agent's contribution, forwarded to whoever acts next.
#[derive(Debug, Clone)]
pub struct Handoff {
    pub agent: String,
    pub answer: String,
}

/// Result of a strategy run. Reports are kept even when the run failed,
/// covering every agent that finished before the failure.
pub struct StrategyRun {
    pub reports: Vec<AgentReport>,
    pub failure: Option<RunError>,
}

impl StrategyRun {
    fn ok(reports: Vec<AgentReport>) -> Self {
        Self {
            reports,
            failure: None,
        }
    }

    fn failed(reports: Vec<AgentReport>, failure: RunError) -> Self {
        Self {
            reports,
            failure: Some(failure),
        }
    }
}

/// How a team distributes a task across its agents.
#[async_trait]
pub trait Strategy: Send + Sync {
    async fn run(&self, agents: &[Agent], task: &Task, budget: &mut StepBudget) -> StrategyRun;
}

/// Runs every agent once, in declaration order, forwarding each agent's
/// answer to the ones after it. The default strategy.
pub struct SequentialHandoff;

#[async_trait]
impl Strategy for SequentialHandoff {
    async fn run(&self, agents: &[Agent], task: &Task, budget: &mut StepBudget) -> StrategyRun {
        let mut reports = Vec::with_capacity(agents.len());
        let mut prior: Vec<Handoff> = Vec::new();

        for agent in agents {
            info!(agent = %agent.name(), "agent taking over");

            match agent.run(task, &prior, None, budget).await {
                Ok(report) => {
                    prior.push(Handoff {
                        agent: report.agent.clone(),
                        answer: report.answer.clone(),
                    });
                    reports.push(report);
                }
                Err(e) => return StrategyRun::failed(reports, e),
            }
        }

        StrategyRun::ok(reports)
    }
}

/// A model-driven decision about who acts next.
#[derive(Debug, Deserialize)]
struct Decision {
    /// Index of the chosen agent, or -1 when the task is complete.
    id: i64,
    #[serde(default)]
    subtask: String,
}

/// Lets a coordinator model decide which agent acts next and what its
/// assignment is, until the model declares the task complete.
pub struct Delegation {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl Delegation {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn roster(agents: &[Agent]) -> String {
        agents
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{i}. {} ({}): {}", a.name(), a.role(), a.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn opening_decision_prompt(agents: &[Agent], task: &Task) -> String {
        format!(
            "You coordinate a team of agents working on a task.\n\n\
             Task: {}\n\nTeam members:\n{}\n\n\
             Pick the member who should act first and give them a concrete subtask.\n\
             Respond with only a JSON object: {{\"id\": <member number>, \"subtask\": \"<what they should do>\"}}",
            task.description(),
            Self::roster(agents),
        )
    }

    fn next_decision_prompt(agents: &[Agent], task: &Task, prior: &[Handoff]) -> String {
        let history = prior
            .iter()
            .map(|h| format!("### {}\n{}", h.agent, h.answer))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "You coordinate a team of agents working on a task.\n\n\
             Task: {}\n\nTeam members:\n{}\n\nWork so far:\n{}\n\n\
             If the task is complete, respond with {{\"id\": -1}}. Otherwise pick the next\n\
             member and give them a concrete subtask.\n\
             Respond with only a JSON object: {{\"id\": <member number>, \"subtask\": \"<what they should do>\"}}",
            task.description(),
            Self::roster(agents),
            history,
        )
    }

    async fn decide(&self, prompt: String) -> Result<Decision, RunError> {
        let request = ChatRequest::new(&self.model)
            .message(ChatMessage::user(prompt))
            .temperature(0.0);
        let response = self.client.complete(&request).await?;
        parse_decision(response.text())
    }
}

/// Extract a decision object from model output, tolerating code fences
/// and surrounding prose.
fn parse_decision(text: &str) -> Result<Decision, RunError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => {
            return Err(RunError::Decision(format!(
                "no JSON object in response: {text:?}"
            )));
        }
    };

    serde_json::from_str(json)
        .map_err(|e| RunError::Decision(format!("malformed decision {json:?}: {e}")))
}

#[async_trait]
impl Strategy for Delegation {
    async fn run(&self, agents: &[Agent], task: &Task, budget: &mut StepBudget) -> StrategyRun {
        let mut reports = Vec::new();
        let mut prior: Vec<Handoff> = Vec::new();

        let mut decision = match self.decide(Self::opening_decision_prompt(agents, task)).await {
            Ok(d) => d,
            Err(e) => return StrategyRun::failed(reports, e),
        };

        loop {
            if decision.id < 0 {
                debug!("coordinator declared the task complete");
                return StrategyRun::ok(reports);
            }

            let Some(agent) = usize::try_from(decision.id).ok().and_then(|i| agents.get(i))
            else {
                warn!(id = decision.id, "coordinator picked an unknown member");
                return StrategyRun::failed(
                    reports,
                    RunError::Decision(format!("no team member with id {}", decision.id)),
                );
            };

            info!(agent = %agent.name(), subtask = %decision.subtask, "delegating");

            let assignment = if decision.subtask.trim().is_empty() {
                None
            } else {
                Some(decision.subtask.as_str())
            };

            match agent.run(task, &prior, assignment, budget).await {
                Ok(report) => {
                    prior.push(Handoff {
                        agent: report.agent.clone(),
                        answer: report.answer.clone(),
                    });
                    reports.push(report);
                }
                Err(e) => return StrategyRun::failed(reports, e),
            }

            decision = match self
                .decide(Self::next_decision_prompt(agents, task, &prior))
                .await
            {
                Ok(d) => d,
                Err(e) => return StrategyRun::failed(reports, e),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision_plain_json() {
        let d = parse_decision(r#"{"id": 2, "subtask": "scan the logs"}"#).unwrap();
        assert_eq!(d.id, 2);
        assert_eq!(d.subtask, "scan the logs");
    }

    #[test]
    fn test_parse_decision_fenced() {
        let d = parse_decision("```json\n{\"id\": -1}\n```").unwrap();
        assert_eq!(d.id, -1);
        assert_eq!(d.subtask, "");
    }

    #[test]
    fn test_parse_decision_with_prose() {
        let d = parse_decision("Sure, here is my choice: {\"id\": 0, \"subtask\": \"start\"} hope that helps").unwrap();
        assert_eq!(d.id, 0);
    }

    #[test]
    fn test_parse_decision_rejects_garbage() {
        assert!(matches!(
            parse_decision("no json here"),
            Err(RunError::Decision(_))
        ));
        assert!(matches!(
            parse_decision("{not valid}"),
            Err(RunError::Decision(_))
        ));
    }
}
