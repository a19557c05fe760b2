use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use quarry_core::{AgentConfig, ChatAgentResponse, ChatContext, ConfigurationError, TaskConfig};
use quarry_tool_runtime::{ToolName, ToolRegistry};

use crate::chat::{AgentError, ChatAgent, ExecutableAgent};
use crate::engine::{ExecutionEngine, ResponseStream};
use crate::structure::{ContextEnricher, StructureService};

/// Capabilities the QnA agent requests at build time.
const QNA_TOOLS: [ToolName; 4] = [
    ToolName::AskKnowledgeGraphQueries,
    ToolName::GetNodesFromTags,
    ToolName::GetCodeFileStructure,
    ToolName::GetCodeFromMultipleNodeIds,
];

/// Retrieval agent answering repository questions through the code
/// knowledge graph. Both paths build, enrich the context with the
/// project's file structure, then delegate to the engine.
pub struct QnaAgent {
    engine: Arc<dyn ExecutionEngine>,
    registry: Arc<ToolRegistry>,
    enricher: ContextEnricher,
}

impl QnaAgent {
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        registry: Arc<ToolRegistry>,
        structure: Arc<dyn StructureService>,
    ) -> Self {
        Self {
            engine,
            registry,
            enricher: ContextEnricher::new(structure),
        }
    }

    fn config() -> Result<AgentConfig, ConfigurationError> {
        AgentConfig::new(
            QNA_ROLE,
            QNA_GOAL,
            QNA_BACKSTORY,
            vec![TaskConfig::new(QNA_TASK, QNA_EXPECTED_OUTPUT)],
        )
    }
}

#[async_trait]
impl ChatAgent for QnaAgent {
    fn build(&self) -> Result<ExecutableAgent, AgentError> {
        let config = Self::config()?;
        let tools = self.registry.resolve(&QNA_TOOLS)?;
        debug!(role = config.role(), tool_count = tools.len(), "qna agent built");
        Ok(ExecutableAgent::new(config, tools, Arc::clone(&self.engine)))
    }

    async fn run(&self, ctx: ChatContext) -> Result<ChatAgentResponse, AgentError> {
        let start = Instant::now();
        let agent = self.build()?;
        let ctx = self.enricher.enrich(ctx).await?;
        let response = agent.run(&ctx).await?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "qna run complete"
        );
        Ok(response)
    }

    async fn run_stream(&self, ctx: ChatContext) -> Result<ResponseStream, AgentError> {
        let agent = self.build()?;
        let ctx = self.enricher.enrich(ctx).await?;
        let stream = agent.run_stream(&ctx).await?;
        debug!("qna stream started");
        Ok(stream)
    }
}

const QNA_ROLE: &str = "Repository QnA Agent";

const QNA_GOAL: &str =
    "Answer questions about the repository in detail, grounded in retrieved code";

const QNA_BACKSTORY: &str = "\
You query a code knowledge graph and refine the results into precise, \
comprehensive answers. Work with minimal tool iterations, enrich the \
initial results with surrounding context, and keep every claim traceable \
to the files it came from.";

const QNA_TASK: &str = "\
1. Study the provided file structure to locate relevant directories and files.
2. When a directory's contents are elided, fetch its nested structure before
   going deeper; only request code once complete file paths are known. Node
   lookups take files, functions, or classes, never directories.
3. Query the knowledge graph when the structure alone cannot answer the
   question, and fall back to tag lookups only as a last resort.
4. Retrieve code for the most promising nodes and weigh its relevance
   against the question before using it.
5. Compose a focused answer: cite the files it rests on, include code
   snippets in fenced blocks with a language tag, and trim cited paths to
   the project-relative portion.
6. Build on earlier turns for follow-ups, state clearly when something is
   unknown, and suggest a narrower question when the query is too broad.";

const QNA_EXPECTED_OUTPUT: &str = "\
Markdown-formatted chat response grounded in the provided code context and \
tool results, with citations for every referenced file";
