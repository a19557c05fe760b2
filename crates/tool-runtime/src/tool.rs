use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::name::ToolName;

/// Describes a tool's interface for engine consumption: which capability
/// it implements, what it does, and the JSON Schema of its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: ToolName,
    /// Human-readable description for the engine's model.
    pub description: String,
    /// JSON Schema describing the expected input.
    pub input_schema: Value,
}

/// Result of executing a tool, handed back to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Matches the engine's call id; the engine sets it when correlating.
    pub tool_call_id: String,
    /// Result content (text or serialized structure)
    pub content: String,
    /// Whether this result represents an error
    pub is_error: bool,
}

/// Context a tool executes under: the project the invocation is scoped to.
pub struct ToolContext {
    pub project_id: String,
}

/// The extension point for retrieval capabilities.
///
/// Implementations are object-safe, Send + Sync, and async; production
/// ones live outside this core, next to the stores they query.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (capability, description, schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.description)
    }
}

/// Test tool returning a fixed payload for whichever capability it is
/// registered under.
#[cfg(any(test, feature = "test-utils"))]
pub struct CannedTool {
    pub name: ToolName,
    pub payload: String,
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Tool for CannedTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: "Returns a canned payload. For testing.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _input: Value, _context: &ToolContext) -> Result<ToolResult, ToolError> {
        Ok(ToolResult {
            tool_call_id: String::new(),
            content: self.payload.clone(),
            is_error: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_serialization() {
        let def = ToolDefinition {
            name: ToolName::AskKnowledgeGraphQueries,
            description: "Query the knowledge graph".to_string(),
            input_schema: serde_json::json!({"type": "object"}),
        };
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("ask_knowledge_graph_queries"));

        let roundtrip: ToolDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.name, ToolName::AskKnowledgeGraphQueries);
    }

    #[tokio::test]
    async fn test_canned_tool() {
        let tool = CannedTool {
            name: ToolName::GetCodeFileStructure,
            payload: "src/\n  lib.rs".to_string(),
        };
        assert_eq!(tool.definition().name, ToolName::GetCodeFileStructure);

        let ctx = ToolContext {
            project_id: "proj-1".to_string(),
        };
        let result = tool.execute(serde_json::json!({}), &ctx).await.unwrap();
        assert_eq!(result.content, "src/\n  lib.rs");
        assert!(!result.is_error);
    }
}
