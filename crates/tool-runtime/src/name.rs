//! The closed set of capabilities agents can request.
//!
//! Capability names are fixed at compile time: an unknown wire name is a
//! parse error at the edge, and a name with no registered implementation
//! is a build-time resolution error, never a silent miss at lookup time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A retrieval capability an agent can ask the registry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Free-form queries against the code knowledge graph.
    AskKnowledgeGraphQueries,
    /// Look up graph nodes carrying given tags.
    GetNodesFromTags,
    /// Fetch the file tree of a project or one of its directories.
    GetCodeFileStructure,
    /// Fetch source code for a batch of graph node ids.
    GetCodeFromMultipleNodeIds,
}

impl ToolName {
    /// Every capability in the closed set.
    pub const ALL: [ToolName; 4] = [
        ToolName::AskKnowledgeGraphQueries,
        ToolName::GetNodesFromTags,
        ToolName::GetCodeFileStructure,
        ToolName::GetCodeFromMultipleNodeIds,
    ];

    /// Stable wire name, as sent to the execution engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AskKnowledgeGraphQueries => "ask_knowledge_graph_queries",
            ToolName::GetNodesFromTags => "get_nodes_from_tags",
            ToolName::GetCodeFileStructure => "get_code_file_structure",
            ToolName::GetCodeFromMultipleNodeIds => "get_code_from_multiple_node_ids",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ToolNameParseError {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tool name '{name}'")]
pub struct ToolNameParseError {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_roundtrip() {
        for name in ToolName::ALL {
            assert_eq!(name.as_str().parse::<ToolName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_wire_name_rejected() {
        let err = "nonexistent_tool".parse::<ToolName>().unwrap_err();
        assert_eq!(err.name, "nonexistent_tool");
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ToolName::GetCodeFileStructure).unwrap();
        assert_eq!(json, "\"get_code_file_structure\"");

        let parsed: ToolName = serde_json::from_str("\"get_nodes_from_tags\"").unwrap();
        assert_eq!(parsed, ToolName::GetNodesFromTags);
    }
}
