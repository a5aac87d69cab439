// ABOUTME: TerminalTool - executes shell commands for agents.
// ABOUTME: Captures stdout/stderr and reports non-zero exit codes as failures.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ToolError;
use crate::tool::{Tool, ToolOutput};

/// Tool for executing shell commands.
/// Uses `sh -c` on Unix and `cmd.exe /C` on Windows.
pub struct TerminalTool;

#[derive(Deserialize)]
struct TerminalParams {
    command: String,
    #[serde(default)]
    working_dir: Option<String>,
}

#[async_trait]
impl Tool for TerminalTool {
    fn name(&self) -> &str {
        "terminal"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. Use for provisioning commands, \
         checking system state, or running scripts."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "working_dir": {
                    "type": "string",
                    "description": "Directory to run the command in (default: current directory)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, anyhow::Error> {
        let params: TerminalParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd.exe");
            c.arg("/C").arg(&params.command);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.arg("-c").arg(&params.command);
            c
        };
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        if let Some(dir) = params.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            let content = if stderr.trim().is_empty() {
                stdout.to_string()
            } else {
                format!("{stdout}\n[stderr]\n{stderr}")
            };
            Ok(ToolOutput::text(content))
        } else {
            Ok(ToolOutput::error(format!(
                "Command exited with code {}\n[stdout]\n{}\n[stderr]\n{}",
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_terminal_echo() {
        let tool = TerminalTool;
        let output = tool
            .execute(serde_json::json!({"command": "echo provisioning"}))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert!(output.content.contains("provisioning"));
    }

    #[tokio::test]
    async fn test_terminal_nonzero_exit() {
        let tool = TerminalTool;
        let output = tool
            .execute(serde_json::json!({"command": "exit 3"}))
            .await
            .unwrap();

        assert!(output.is_error);
        assert!(output.content.contains("code 3"));
    }

    #[tokio::test]
    async fn test_terminal_working_dir() {
        let tool = TerminalTool;
        let tmp = std::env::temp_dir();
        let command = if cfg!(target_os = "windows") { "cd" } else { "pwd" };

        let output = tool
            .execute(serde_json::json!({
                "command": command,
                "working_dir": tmp.to_string_lossy()
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert!(!output.content.trim().is_empty());
    }

    #[tokio::test]
    async fn test_terminal_missing_command_param() {
        let tool = TerminalTool;
        let result = tool.execute(serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
