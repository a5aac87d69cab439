// ABOUTME: SaveFileTool - persists content to a path on disk.
// ABOUTME: Creates parent directories as needed, overwrites existing files.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ToolError;
use crate::tool::{Tool, ToolOutput};

/// Tool for saving content to files.
pub struct SaveFileTool;

#[derive(Deserialize)]
struct SaveFileParams {
    path: String,
    content: String,
}

#[async_trait]
impl Tool for SaveFileTool {
    fn name(&self) -> &str {
        "saveFile"
    }

    fn description(&self) -> &str {
        "Save content to a file. Creates the file and any missing parent directories, \
         overwriting an existing file at the same path."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Destination path for the file"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, anyhow::Error> {
        let params: SaveFileParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        if let Some(parent) = Path::new(&params.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        match tokio::fs::write(&params.path, &params.content).await {
            Ok(()) => Ok(ToolOutput::text(format!(
                "Saved {} bytes to {}",
                params.content.len(),
                params.path
            ))),
            Err(e) => Ok(ToolOutput::error(format!("Failed to save file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");

        let tool = SaveFileTool;
        let output = tool
            .execute(serde_json::json!({
                "path": path.to_str().unwrap(),
                "content": "# Findings"
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Findings");
    }

    #[tokio::test]
    async fn test_save_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("report.md");

        let tool = SaveFileTool;
        let output = tool
            .execute(serde_json::json!({
                "path": path.to_str().unwrap(),
                "content": "nested"
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_file_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");
        std::fs::write(&path, "old").unwrap();

        let tool = SaveFileTool;
        tool.execute(serde_json::json!({
            "path": path.to_str().unwrap(),
            "content": "new"
        }))
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
