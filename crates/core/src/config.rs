use serde::{Deserialize, Serialize};

/// A single unit of work handed to the execution engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Instructions the engine follows for this task.
    pub description: String,
    /// Format contract for the task's result.
    pub expected_output: String,
}

impl TaskConfig {
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// Declarative description of an agent: who it is, what it is after,
/// and the ordered tasks it works through.
///
/// Built only via [`AgentConfig::new`]; fields are read-only afterwards.
/// Deserialization runs the same validation, so a serialized config
/// cannot sidestep it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawAgentConfig")]
pub struct AgentConfig {
    role: String,
    goal: String,
    backstory: String,
    tasks: Vec<TaskConfig>,
}

impl AgentConfig {
    /// Validating constructor. The task list must be non-empty and every
    /// task must carry a description.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        tasks: Vec<TaskConfig>,
    ) -> Result<Self, ConfigurationError> {
        if tasks.is_empty() {
            return Err(ConfigurationError::NoTasks);
        }
        if let Some(index) = tasks.iter().position(|t| t.description.trim().is_empty()) {
            return Err(ConfigurationError::EmptyTaskDescription { index });
        }
        Ok(Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tasks,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn tasks(&self) -> &[TaskConfig] {
        &self.tasks
    }
}

/// Mirror type used to funnel deserialization through validation.
#[derive(Deserialize)]
struct RawAgentConfig {
    role: String,
    goal: String,
    backstory: String,
    tasks: Vec<TaskConfig>,
}

impl TryFrom<RawAgentConfig> for AgentConfig {
    type Error = ConfigurationError;

    fn try_from(raw: RawAgentConfig) -> Result<Self, Self::Error> {
        AgentConfig::new(raw.role, raw.goal, raw.backstory, raw.tasks)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("agent config must contain at least one task")]
    NoTasks,
    #[error("task {index} has an empty description")]
    EmptyTaskDescription { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = AgentConfig::new(
            "Answerer",
            "Answer questions",
            "You answer questions.",
            vec![TaskConfig::new("Answer the query", "Markdown response")],
        )
        .unwrap();

        assert_eq!(config.role(), "Answerer");
        assert_eq!(config.tasks().len(), 1);
        assert_eq!(config.tasks()[0].expected_output, "Markdown response");
    }

    #[test]
    fn test_empty_task_list_rejected() {
        let err = AgentConfig::new("r", "g", "b", vec![]).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoTasks));
    }

    #[test]
    fn test_blank_description_rejected() {
        let tasks = vec![
            TaskConfig::new("fine", "out"),
            TaskConfig::new("   ", "out"),
        ];
        let err = AgentConfig::new("r", "g", "b", tasks).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::EmptyTaskDescription { index: 1 }
        ));
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"role": "r", "goal": "g", "backstory": "b", "tasks": []}"#;
        assert!(serde_json::from_str::<AgentConfig>(json).is_err());

        let json =
            r#"{"role": "r", "goal": "g", "backstory": "b", "tasks": [{"description": "d", "expected_output": "o"}]}"#;
        let config: AgentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tasks().len(), 1);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = AgentConfig::new(
            "r",
            "g",
            "b",
            vec![TaskConfig::new("d", "o")],
        )
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let roundtrip: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.role(), "r");
        assert_eq!(roundtrip.tasks().len(), 1);
    }
}
