use serde::{Deserialize, Serialize};

/// Who produced a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything one invocation needs to know: the project it concerns,
/// the live query, prior turns, and supplementary context accumulated
/// before execution.
///
/// An owned value. Extending it goes through consuming builders that
/// return a new context, so concurrent invocations never alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatContext {
    pub project_id: String,
    pub query: String,
    pub history: Vec<ChatTurn>,
    pub additional_context: String,
}

impl ChatContext {
    pub fn new(project_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            query: query.into(),
            history: Vec::new(),
            additional_context: String::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// Returns a new context with `extra` appended to the supplementary
    /// context accumulator.
    pub fn with_additional_context(mut self, extra: &str) -> Self {
        self.additional_context.push_str(extra);
        self
    }

    /// History flattened to one `role: content` line per turn, for
    /// inclusion in prompts.
    pub fn history_text(&self) -> String {
        self.history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Assistant => "assistant",
                };
                format!("{}: {}", role, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = ChatContext::new("proj-1", "where is the parser?");
        assert_eq!(ctx.project_id, "proj-1");
        assert!(ctx.history.is_empty());
        assert!(ctx.additional_context.is_empty());
    }

    #[test]
    fn test_with_additional_context_appends() {
        let ctx = ChatContext::new("proj-1", "q")
            .with_additional_context("first")
            .with_additional_context(" second");
        assert_eq!(ctx.additional_context, "first second");
    }

    #[test]
    fn test_copies_do_not_alias() {
        let original = ChatContext::new("proj-1", "q").with_additional_context("base");
        let extended = original.clone().with_additional_context(" more");

        assert_eq!(original.additional_context, "base");
        assert_eq!(extended.additional_context, "base more");
    }

    #[test]
    fn test_history_text() {
        let ctx = ChatContext::new("proj-1", "q").with_history(vec![
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
        ]);
        assert_eq!(ctx.history_text(), "user: hi\nassistant: hello");
    }
}
