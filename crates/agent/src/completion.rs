use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// A chat message for one-shot completion calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One-shot completion boundary for callers that need a single model
/// response outside the full engine loop (e.g. routing decisions).
/// Implementations live with the model backends, not here.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, EngineError>;
}

/// Scripted provider for exercising completion consumers in tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedCompletion {
        pub fn new() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
            }
        }

        pub fn queue_reply(&self, reply: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(reply.to_string()));
        }

        pub fn queue_failure(&self, message: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(message.to_string()));
        }
    }

    impl Default for ScriptedCompletion {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        async fn complete(
            &self,
            _messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, EngineError> {
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(EngineError::Execution(message)),
                None => Ok(String::new()),
            }
        }
    }
}
