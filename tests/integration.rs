// ABOUTME: Integration tests for team execution - full runs over a scripted
// ABOUTME: inference client, exercising tools, budgets, and failure paths.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use squad::error::{ConfigError, LlmError, SquadError};
use squad::llm::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, FinishReason, LlmClient, TokenUsage,
    ToolCall,
};
use squad::team::{Delegation, Task, Team, TeamDefinition};
use squad::tool::ToolRegistry;

/// Replays a fixed sequence of responses and records every request it saw.
struct ScriptedClient {
    responses: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<ChatResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().ok_or(LlmError::Api {
            status: 500,
            message: "script exhausted".to_string(),
        })
    }
}

fn text_response(content: &str) -> ChatResponse {
    ChatResponse {
        id: "resp".to_string(),
        model: "scripted".to_string(),
        message: ChatMessage::assistant(content),
        finish_reason: FinishReason::Stop,
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        },
    }
}

fn tool_call_response(tool: &str, arguments: serde_json::Value) -> ChatResponse {
    ChatResponse {
        id: "resp".to_string(),
        model: "scripted".to_string(),
        message: ChatMessage::assistant_tool_calls(
            "",
            vec![ToolCall {
                id: "call-1".to_string(),
                name: tool.to_string(),
                arguments,
            }],
        ),
        finish_reason: FinishReason::ToolCalls,
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        },
    }
}

fn definition(yaml: &str) -> TeamDefinition {
    // Every test builds a definition, so tracing is wired up here once
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
    TeamDefinition::from_yaml_str(yaml).unwrap()
}

const OPERATOR_TEAM: &str = r#"
name: shell-ops
description: Runs shell commands
model:
  name: gpt-4o-mini
agents:
  - name: operator
    role: executor
    description: Executes shell commands
    system_prompt: You run commands and report their output.
    tools:
      - terminal
"#;

#[tokio::test]
async fn test_single_agent_uses_tool_and_succeeds() {
    let client = ScriptedClient::new(vec![
        tool_call_response("terminal", json!({"command": "echo squad-ok"})),
        text_response("The command printed squad-ok."),
    ]);
    let team = Team::from_definition_with_client(
        definition(OPERATOR_TEAM),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap();

    let task = Task::new("Run echo squad-ok and report the output").unwrap();
    let report = team.execute(task).await;

    assert!(report.is_success(), "outcome: {:?}", report.outcome);
    assert_eq!(report.summary(), Some("The command printed squad-ok."));
    assert_eq!(report.agent_reports.len(), 1);
    assert_eq!(report.agent_reports[0].agent, "operator");
    assert_eq!(report.agent_reports[0].steps, 2);
    assert_eq!(report.agent_reports[0].tool_calls, 1);
    assert_eq!(report.steps_used(), 2);
    assert_eq!(report.usage().prompt_tokens, 20);

    // The second request carries the real tool output back to the model
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    let observation = requests[1]
        .messages
        .iter()
        .find(|m| m.role == ChatRole::Tool)
        .expect("tool observation message");
    assert!(observation.content.contains("squad-ok"));
    assert_eq!(observation.tool_call_id.as_deref(), Some("call-1"));

    // Only the permitted tool was offered
    assert_eq!(requests[0].tools.len(), 1);
    assert_eq!(requests[0].tools[0].name, "terminal");
}

#[tokio::test]
async fn test_failed_tool_becomes_error_observation() {
    let client = ScriptedClient::new(vec![
        tool_call_response("terminal", json!({"command": "exit 7"})),
        text_response("The command failed with exit code 7."),
    ]);
    let team = Team::from_definition_with_client(
        definition(OPERATOR_TEAM),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap();

    let report = team.execute(Task::new("Run exit 7").unwrap()).await;

    // A tool failure is fed back to the agent, not escalated
    assert!(report.is_success());

    let requests = client.requests();
    let observation = requests[1]
        .messages
        .iter()
        .find(|m| m.role == ChatRole::Tool)
        .expect("tool observation message");
    assert!(observation.content.starts_with("Error:"));
    assert!(observation.content.contains('7'));
}

#[tokio::test]
async fn test_unpermitted_tool_denied_before_execution() {
    // The model asks for saveFile, which this agent was never granted
    let client = ScriptedClient::new(vec![
        tool_call_response("saveFile", json!({"path": "/tmp/x", "content": "hi"})),
        text_response("I cannot write files."),
    ]);
    let team = Team::from_definition_with_client(
        definition(OPERATOR_TEAM),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap();

    let report = team.execute(Task::new("Write a file").unwrap()).await;
    assert!(report.is_success());

    let requests = client.requests();
    let observation = requests[1]
        .messages
        .iter()
        .find(|m| m.role == ChatRole::Tool)
        .expect("tool observation message");
    assert!(observation.content.contains("not in this agent's permitted set"));
}

#[tokio::test]
async fn test_step_budget_exhaustion_fails_the_run() {
    let yaml = r#"
name: tight-budget
max_steps: 1
model:
  name: gpt-4o-mini
agents:
  - name: operator
    system_prompt: You run commands.
    tools:
      - terminal
"#;
    // The script keeps asking for tools, so the single step is never enough
    let client = ScriptedClient::new(vec![
        tool_call_response("terminal", json!({"command": "echo first"})),
        tool_call_response("terminal", json!({"command": "echo second"})),
    ]);
    let team =
        Team::from_definition_with_client(definition(yaml), &ToolRegistry::builtin(), client)
            .unwrap();

    let report = team.execute(Task::new("Loop forever").unwrap()).await;

    assert!(!report.is_success());
    assert!(report.summary().is_none());
    let error = report.error().expect("failure carries an error");
    assert!(error.contains("budget"), "unexpected error: {error}");
}

#[tokio::test]
async fn test_model_failure_preserves_earlier_reports() {
    let yaml = r#"
name: relay
model:
  name: gpt-4o-mini
agents:
  - name: first
    system_prompt: Answer briefly.
  - name: second
    system_prompt: Answer briefly.
"#;
    // One response for the first agent; the second agent's call hits an
    // exhausted script and fails.
    let client = ScriptedClient::new(vec![text_response("first agent done")]);
    let team =
        Team::from_definition_with_client(definition(yaml), &ToolRegistry::builtin(), client)
            .unwrap();

    let report = team.execute(Task::new("Relay work").unwrap()).await;

    assert!(!report.is_success());
    assert_eq!(report.agent_reports.len(), 1);
    assert_eq!(report.agent_reports[0].agent, "first");
    assert!(report.error().unwrap().contains("script exhausted"));
}

#[tokio::test]
async fn test_sequential_handoff_forwards_prior_answers() {
    let yaml = r#"
name: relay
model:
  name: gpt-4o-mini
agents:
  - name: researcher
    system_prompt: Research things.
  - name: writer
    system_prompt: Write things up.
"#;
    let client = ScriptedClient::new(vec![
        text_response("finding: the sky is blue"),
        text_response("Report: the sky is blue."),
    ]);
    let team = Team::from_definition_with_client(
        definition(yaml),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap();

    let report = team.execute(Task::new("Describe the sky").unwrap()).await;

    assert!(report.is_success());
    assert_eq!(report.summary(), Some("Report: the sky is blue."));
    assert_eq!(report.agent_reports.len(), 2);

    // The writer's prompt includes the researcher's answer
    let requests = client.requests();
    let writer_prompt = &requests[1].messages[1].content;
    assert!(writer_prompt.contains("researcher"));
    assert!(writer_prompt.contains("the sky is blue"));
}

#[tokio::test]
async fn test_delegation_strategy_routes_by_coordinator() {
    let yaml = r#"
name: delegated
model:
  name: gpt-4o-mini
agents:
  - name: researcher
    role: researcher
    description: Finds facts
    system_prompt: Research things.
  - name: writer
    role: writer
    description: Writes reports
    system_prompt: Write things up.
"#;
    let client = ScriptedClient::new(vec![
        // Coordinator: send the writer (index 1) straight in
        text_response(r#"{"id": 1, "subtask": "Write a one-line report"}"#),
        // The writer's answer
        text_response("One-line report."),
        // Coordinator: done
        text_response(r#"{"id": -1}"#),
    ]);
    let team = Team::from_definition_with_client(
        definition(yaml),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap()
    .with_strategy(Delegation::new(client.clone(), "gpt-4o-mini"));

    let report = team.execute(Task::new("Produce a report").unwrap()).await;

    assert!(report.is_success(), "outcome: {:?}", report.outcome);
    assert_eq!(report.summary(), Some("One-line report."));
    assert_eq!(report.agent_reports.len(), 1);
    assert_eq!(report.agent_reports[0].agent, "writer");

    // The writer saw its assignment
    let requests = client.requests();
    let writer_prompt = &requests[1].messages[1].content;
    assert!(writer_prompt.contains("Write a one-line report"));
}

#[tokio::test]
async fn test_garbled_delegation_decision_fails_the_run() {
    let yaml = r#"
name: delegated
model:
  name: gpt-4o-mini
agents:
  - name: solo
    system_prompt: Work alone.
"#;
    let client = ScriptedClient::new(vec![text_response("I pick the best agent for this!")]);
    let team = Team::from_definition_with_client(
        definition(yaml),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap()
    .with_strategy(Delegation::new(client, "gpt-4o-mini"));

    let report = team.execute(Task::new("Anything").unwrap()).await;

    assert!(!report.is_success());
    assert!(report.error().unwrap().contains("decision"));
}

#[test]
fn test_unknown_tool_rejected_at_construction() {
    let yaml = r#"
name: bad-tools
model:
  name: gpt-4o-mini
agents:
  - name: operator
    system_prompt: You run commands.
    tools:
      - quantumDrive
"#;
    let client = ScriptedClient::new(vec![]);
    let result =
        Team::from_definition_with_client(definition(yaml), &ToolRegistry::builtin(), client);

    match result {
        Err(SquadError::Config(ConfigError::UnknownTool { agent, tool })) => {
            assert_eq!(agent, "operator");
            assert_eq!(tool, "quantumDrive");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected construction to fail"),
    }
}

#[tokio::test]
async fn test_slow_tool_times_out_into_error_observation() {
    let yaml = r#"
name: slow-ops
model:
  name: gpt-4o-mini
config:
  tool_timeout_secs: 1
agents:
  - name: operator
    system_prompt: You run commands.
    tools:
      - terminal
"#;
    let client = ScriptedClient::new(vec![
        tool_call_response("terminal", json!({"command": "sleep 5"})),
        text_response("The command did not finish in time."),
    ]);
    let team = Team::from_definition_with_client(
        definition(yaml),
        &ToolRegistry::builtin(),
        client.clone(),
    )
    .unwrap();

    let report = team.execute(Task::new("Run something slow").unwrap()).await;

    // The timeout reaches the agent as a failed observation, not a hang
    assert!(report.is_success());

    let requests = client.requests();
    let observation = requests[1]
        .messages
        .iter()
        .find(|m| m.role == ChatRole::Tool)
        .expect("tool observation message");
    assert!(observation.content.starts_with("Error:"));
    assert!(observation.content.contains("timed out"));
}

#[tokio::test]
async fn test_persistently_failing_tool_ends_in_failure_report() {
    let yaml = r#"
name: broken-ops
max_steps: 2
model:
  name: gpt-4o-mini
agents:
  - name: operator
    system_prompt: You run commands.
    tools:
      - terminal
"#;
    // The command never works, the agent keeps retrying, and the run ends
    // as a failure report rather than a panic or an Err
    let client = ScriptedClient::new(vec![
        tool_call_response("terminal", json!({"command": "no-such-binary-here"})),
        tool_call_response("terminal", json!({"command": "no-such-binary-here"})),
    ]);
    let team =
        Team::from_definition_with_client(definition(yaml), &ToolRegistry::builtin(), client)
            .unwrap();

    let report = team.execute(Task::new("Use the broken tool").unwrap()).await;

    assert!(!report.is_success());
    assert!(report.summary().is_none());
    assert!(!report.error().unwrap().is_empty());
}
