use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use quarry_core::{AgentConfig, ChatAgentResponse, ChatContext};
use quarry_tool_runtime::ToolHandle;

/// Stream of response chunks. Pull-based: the consumer's poll rate is
/// the backpressure, and dropping the stream is the cancellation
/// mechanism. A failure terminates the stream with an error item;
/// chunks already delivered remain valid.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<ChatAgentResponse, EngineError>> + Send>>;

/// The external reasoning/tool-orchestration runtime agents delegate to.
///
/// This trait lives with the agents (the consumer), not with any engine
/// implementation. The engine owns the reasoning loop, tool invocation,
/// and retries on transient failures; its errors pass through this core
/// unchanged.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run to completion and return the single terminal response.
    async fn execute(
        &self,
        config: &AgentConfig,
        tools: &[ToolHandle],
        ctx: &ChatContext,
    ) -> Result<ChatAgentResponse, EngineError>;

    /// Run incrementally, producing a finite, ordered, non-restartable
    /// chunk sequence whose concatenation equals the blocking result.
    async fn execute_stream(
        &self,
        config: &AgentConfig,
        tools: &[ToolHandle],
        ctx: &ChatContext,
    ) -> Result<ResponseStream, EngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine execution failed: {0}")]
    Execution(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Mock engine for exercising agents without a real runtime.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use futures::stream;
    use quarry_tool_runtime::ToolName;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One scripted engine reply.
    enum Scripted {
        Chunks(Vec<ChatAgentResponse>),
        FailAfter(Vec<ChatAgentResponse>, String),
    }

    /// What the engine was invoked with, captured for assertions.
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub config: AgentConfig,
        pub tool_names: Vec<ToolName>,
        pub ctx: ChatContext,
    }

    /// Replays scripted responses in queue order and records every
    /// invocation. With nothing queued it replies with an empty
    /// response.
    pub struct MockEngine {
        scripted: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self {
                scripted: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue a chunked response for the next call.
        pub fn queue_chunks(&self, chunks: Vec<ChatAgentResponse>) {
            self.scripted
                .lock()
                .unwrap()
                .push_back(Scripted::Chunks(chunks));
        }

        /// Queue a single-chunk text response.
        pub fn queue_text(&self, text: &str) {
            self.queue_chunks(vec![ChatAgentResponse::new(text)]);
        }

        /// Queue a failure surfaced after the given chunks (mid-stream
        /// for the streaming path, before any output for the blocking
        /// one).
        pub fn queue_failure_after(&self, chunks: Vec<ChatAgentResponse>, message: &str) {
            self.scripted
                .lock()
                .unwrap()
                .push_back(Scripted::FailAfter(chunks, message.to_string()));
        }

        /// Queue an immediate failure.
        pub fn queue_failure(&self, message: &str) {
            self.queue_failure_after(Vec::new(), message);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, config: &AgentConfig, tools: &[ToolHandle], ctx: &ChatContext) {
            self.calls.lock().unwrap().push(RecordedCall {
                config: config.clone(),
                tool_names: tools.iter().map(|t| t.definition().name).collect(),
                ctx: ctx.clone(),
            });
        }

        fn next_scripted(&self) -> Scripted {
            self.scripted
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Scripted::Chunks(vec![ChatAgentResponse::default()]))
        }
    }

    impl Default for MockEngine {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ExecutionEngine for MockEngine {
        async fn execute(
            &self,
            config: &AgentConfig,
            tools: &[ToolHandle],
            ctx: &ChatContext,
        ) -> Result<ChatAgentResponse, EngineError> {
            self.record(config, tools, ctx);
            match self.next_scripted() {
                Scripted::Chunks(chunks) => Ok(ChatAgentResponse::concat(chunks)),
                Scripted::FailAfter(_, message) => Err(EngineError::Execution(message)),
            }
        }

        async fn execute_stream(
            &self,
            config: &AgentConfig,
            tools: &[ToolHandle],
            ctx: &ChatContext,
        ) -> Result<ResponseStream, EngineError> {
            self.record(config, tools, ctx);
            let items: Vec<Result<ChatAgentResponse, EngineError>> = match self.next_scripted() {
                Scripted::Chunks(chunks) => chunks.into_iter().map(Ok).collect(),
                Scripted::FailAfter(chunks, message) => chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(EngineError::Execution(message))))
                    .collect(),
            };
            Ok(Box::pin(stream::iter(items)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockEngine;
    use super::*;
    use futures::StreamExt;
    use quarry_core::{AgentConfig, TaskConfig};

    fn config() -> AgentConfig {
        AgentConfig::new("r", "g", "b", vec![TaskConfig::new("d", "o")]).unwrap()
    }

    #[tokio::test]
    async fn test_mock_replays_in_queue_order() {
        let engine = MockEngine::new();
        engine.queue_text("first");
        engine.queue_text("second");

        let ctx = ChatContext::new("p", "q");
        let a = engine.execute(&config(), &[], &ctx).await.unwrap();
        let b = engine.execute(&config(), &[], &ctx).await.unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
        assert_eq!(engine.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_stream_ends_with_error_item() {
        let engine = MockEngine::new();
        engine.queue_failure_after(vec![ChatAgentResponse::new("partial")], "cut");

        let ctx = ChatContext::new("p", "q");
        let mut stream = engine.execute_stream(&config(), &[], &ctx).await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap().content, "partial");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
