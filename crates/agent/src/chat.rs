use std::sync::Arc;

use async_trait::async_trait;

use quarry_core::{AgentConfig, ChatAgentResponse, ChatContext, ConfigurationError};
use quarry_tool_runtime::{ToolHandle, ToolResolutionError};

use crate::engine::{EngineError, ExecutionEngine, ResponseStream};
use crate::structure::EnrichmentError;

/// Umbrella error for agent construction and execution. Every stage's
/// error converts in unchanged; nothing is retried or downgraded here.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("tool resolution error: {0}")]
    ToolResolution(#[from] ToolResolutionError),
    #[error("enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Contract every agent variant implements.
///
/// An invocation moves through build (tool resolution), enrichment, and
/// engine delegation. A failure at any stage is terminal for that
/// invocation, and a setup failure means the engine is never reached.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Resolve tools and assemble the runnable form. Resolution
    /// failures surface here, before any engine call.
    fn build(&self) -> Result<ExecutableAgent, AgentError>;

    /// One blocking invocation: build, enrich, delegate, and return the
    /// single terminal response.
    async fn run(&self, ctx: ChatContext) -> Result<ChatAgentResponse, AgentError>;

    /// Same setup as [`ChatAgent::run`], delegating to the engine's
    /// incremental interface instead. Concatenating the yielded chunks
    /// in order equals the blocking result for a deterministic engine.
    async fn run_stream(&self, ctx: ChatContext) -> Result<ResponseStream, AgentError>;
}

/// An agent after successful tool resolution: configuration and
/// resolved handles bound to an engine. Holds nothing else and only
/// delegates.
pub struct ExecutableAgent {
    config: AgentConfig,
    tools: Vec<ToolHandle>,
    engine: Arc<dyn ExecutionEngine>,
}

impl ExecutableAgent {
    pub fn new(
        config: AgentConfig,
        tools: Vec<ToolHandle>,
        engine: Arc<dyn ExecutionEngine>,
    ) -> Self {
        Self {
            config,
            tools,
            engine,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &[ToolHandle] {
        &self.tools
    }

    pub async fn run(&self, ctx: &ChatContext) -> Result<ChatAgentResponse, EngineError> {
        self.engine.execute(&self.config, &self.tools, ctx).await
    }

    pub async fn run_stream(&self, ctx: &ChatContext) -> Result<ResponseStream, EngineError> {
        self.engine
            .execute_stream(&self.config, &self.tools, ctx)
            .await
    }
}
