use crate::name::ToolName;
use crate::tool::{Tool, ToolDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved, shareable, invocable tool.
pub type ToolHandle = Arc<dyn Tool>;

/// Manages available tool implementations, keyed by capability.
/// Registration happens once at setup; lookups after that are read-only
/// and safe across threads via Arc wrapping of individual tools.
pub struct ToolRegistry {
    tools: HashMap<ToolName, ToolHandle>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under the capability its definition names.
    /// Returns an error if that capability already has an implementation.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let name = tool.definition().name;
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    /// Look up a single capability.
    pub fn get(&self, name: ToolName) -> Option<ToolHandle> {
        self.tools.get(&name).cloned()
    }

    /// Resolve a set of capabilities into handles, in request order.
    /// Fails on the first capability with no registered implementation;
    /// a missing tool is an error, never a silent no-op.
    pub fn resolve(&self, names: &[ToolName]) -> Result<Vec<ToolHandle>, ToolResolutionError> {
        names
            .iter()
            .map(|&name| {
                self.get(name)
                    .ok_or(ToolResolutionError::Unknown(name))
            })
            .collect()
    }

    /// List all registered tool definitions (for sending to the engine).
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateName(ToolName),
}

/// Raised at agent build time when a requested capability has no
/// registered implementation.
#[derive(Debug, thiserror::Error)]
pub enum ToolResolutionError {
    #[error("no tool registered for '{0}'")]
    Unknown(ToolName),
}
