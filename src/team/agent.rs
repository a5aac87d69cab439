// ABOUTME: Agent - a named role bound to a model, system prompt, and
// ABOUTME: permitted tool set, executing the think-act loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::report::AgentReport;
use super::strategy::Handoff;
use super::task::Task;
use crate::error::{RunError, ToolError};
use crate::llm::{ChatMessage, ChatRequest, LlmClient, ToolCall};
use crate::tool::PermittedTools;

const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Shared step budget for one team execution. Each model round-trip by any
/// agent consumes one step.
#[derive(Debug)]
pub struct StepBudget {
    limit: usize,
    used: usize,
}

impl StepBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Consume one step. Returns false when the budget is exhausted.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.used
    }
}

/// A member of a team: immutable once constructed.
pub struct Agent {
    name: String,
    role: String,
    description: String,
    system_prompt: String,
    model: String,
    temperature: Option<f64>,
    client: Arc<dyn LlmClient>,
    tools: PermittedTools,
    tool_timeout: Duration,
    log_steps: bool,
}

impl Agent {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
        temperature: Option<f64>,
        client: Arc<dyn LlmClient>,
        tools: PermittedTools,
        tool_timeout: Duration,
        log_steps: bool,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
            model: model.into(),
            temperature,
            client,
            tools,
            tool_timeout,
            log_steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Names of tools this agent may invoke.
    pub fn tool_names(&self) -> &[String] {
        self.tools.names()
    }

    /// Build the opening user prompt: the task, its context, what other
    /// agents produced so far, and an optional narrower assignment.
    fn opening_prompt(&self, task: &Task, prior: &[Handoff], assignment: Option<&str>) -> String {
        let mut prompt = format!("## Task\n{}\n", task.description());

        if let Some(context) = task.context_block() {
            prompt.push_str(&format!("\n## Context\n{context}\n"));
        }

        if !prior.is_empty() {
            prompt.push_str("\n## Work completed by other team members\n");
            for handoff in prior {
                prompt.push_str(&format!("### {}\n{}\n\n", handoff.agent, handoff.answer));
            }
        }

        if let Some(assignment) = assignment {
            prompt.push_str(&format!("\n## Your assignment\n{assignment}\n"));
        }

        prompt
    }

    /// Run the think-act loop for this agent's part of the task.
    ///
    /// The loop calls the model, executes any requested tool calls, feeds
    /// the observations back, and finishes when the model answers without
    /// tool calls. Tool failures are observations, not errors; only model
    /// failure or budget exhaustion aborts the run.
    pub async fn run(
        &self,
        task: &Task,
        prior: &[Handoff],
        assignment: Option<&str>,
        budget: &mut StepBudget,
    ) -> Result<AgentReport, RunError> {
        let run_id = Uuid::new_v4();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(self.opening_prompt(task, prior, assignment)),
        ];

        let mut steps = 0;
        let mut tool_calls_made = 0;
        let mut usage = crate::llm::TokenUsage::default();

        loop {
            if !budget.try_consume() {
                warn!(agent = %self.name, %run_id, limit = budget.limit(),
                      "step budget exhausted");
                return Err(RunError::StepBudgetExceeded {
                    limit: budget.limit(),
                });
            }
            steps += 1;

            let mut request = ChatRequest::new(&self.model)
                .messages(messages.clone())
                .tools(self.tools.specs())
                .max_tokens(DEFAULT_MAX_TOKENS);
            if let Some(t) = self.temperature {
                request = request.temperature(t);
            }

            let response = self.client.complete(&request).await?;
            usage.absorb(&response.usage);

            if self.log_steps {
                info!(agent = %self.name, %run_id, step = steps,
                      tool_calls = response.message.tool_calls.len(),
                      "agent step completed");
            }

            if response.has_tool_calls() {
                messages.push(response.message.clone());

                for call in &response.message.tool_calls {
                    tool_calls_made += 1;
                    let observation = self.invoke_tool(call).await;
                    messages.push(ChatMessage::tool_output(&call.id, observation));
                }

                continue;
            }

            // No tool calls: the agent considers its part done
            return Ok(AgentReport {
                agent: self.name.clone(),
                answer: response.text().to_string(),
                steps,
                tool_calls: tool_calls_made,
                usage,
            });
        }
    }

    /// Invoke one tool call and produce the observation text for the model.
    ///
    /// Permission denials are caught here, before any tool code runs.
    /// Failures of every kind become error observations.
    async fn invoke_tool(&self, call: &ToolCall) -> String {
        let tool = match self.tools.get(&call.name) {
            Ok(tool) => tool,
            Err(denied) => {
                warn!(agent = %self.name, tool = %call.name, "tool permission denied");
                return format!("Error: {denied}");
            }
        };

        debug!(agent = %self.name, tool = %call.name, "invoking tool");

        let execute = tool.execute(call.arguments.clone());
        let outcome = tokio::time::timeout(self.tool_timeout, execute).await;

        match outcome {
            Err(_) => {
                let err = ToolError::Timeout {
                    tool: call.name.clone(),
                    seconds: self.tool_timeout.as_secs(),
                };
                warn!(agent = %self.name, tool = %call.name, "{err}");
                format!("Error: {err}")
            }
            Ok(Err(e)) => {
                let err = ToolError::Execution(e);
                warn!(agent = %self.name, tool = %call.name, "{err}");
                format!("Error: {err}")
            }
            Ok(Ok(output)) if output.is_error => format!("Error: {}", output.content),
            Ok(Ok(output)) => output.content,
        }
    }
}
