//! Pre-invocation context enrichment.
//!
//! Before an agent runs, its context is extended with a repository
//! structure summary fetched from the structure service. The block is
//! appended exactly once per enrichment call; a fetch failure surfaces
//! to the caller instead of letting the agent run on a different basis
//! than recorded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use quarry_core::ChatContext;

/// Label introducing the appended structure block.
const STRUCTURE_LABEL: &str = "File Structure of the project:";

/// Fetches a textual repository-structure summary for a project.
///
/// Implemented outside this core, next to whatever store holds the
/// project's file tree.
#[async_trait]
pub trait StructureService: Send + Sync {
    async fn fetch_structure(&self, project_id: &str) -> Result<String, StructureFetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StructureFetchError {
    #[error("unknown project: {0}")]
    UnknownProject(String),
    #[error("structure fetch failed: {0}")]
    Fetch(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Structure(#[from] StructureFetchError),
}

/// Appends the project's file structure to a context before the agent
/// runs.
pub struct ContextEnricher {
    service: Arc<dyn StructureService>,
}

impl ContextEnricher {
    pub fn new(service: Arc<dyn StructureService>) -> Self {
        Self { service }
    }

    /// Consumes a context and returns a new one whose additional
    /// context ends with exactly one appended structure block. Each
    /// call appends independently; enriching an already-enriched
    /// context again appends a second block.
    pub async fn enrich(&self, ctx: ChatContext) -> Result<ChatContext, EnrichmentError> {
        let structure = self.service.fetch_structure(&ctx.project_id).await?;
        debug!(
            project_id = %ctx.project_id,
            structure_len = structure.len(),
            "context enriched with file structure"
        );
        Ok(ctx.with_additional_context(&format!("\n{STRUCTURE_LABEL}\n{structure}")))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;

    /// Structure service returning a fixed summary for any project.
    pub struct FixedStructureService {
        pub structure: String,
    }

    #[async_trait]
    impl StructureService for FixedStructureService {
        async fn fetch_structure(&self, _project_id: &str) -> Result<String, StructureFetchError> {
            Ok(self.structure.clone())
        }
    }

    /// Structure service failing every fetch.
    pub struct FailingStructureService;

    #[async_trait]
    impl StructureService for FailingStructureService {
        async fn fetch_structure(&self, project_id: &str) -> Result<String, StructureFetchError> {
            Err(StructureFetchError::UnknownProject(project_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn enricher(structure: &str) -> ContextEnricher {
        ContextEnricher::new(Arc::new(FixedStructureService {
            structure: structure.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_enrich_appends_exactly_one_block() {
        let ctx = ChatContext::new("proj-1", "q").with_additional_context("existing");
        let enriched = enricher("src/\n  lib.rs").enrich(ctx).await.unwrap();

        assert!(enriched.additional_context.starts_with("existing"));
        assert_eq!(
            enriched.additional_context.matches(STRUCTURE_LABEL).count(),
            1
        );
        assert!(enriched.additional_context.ends_with("src/\n  lib.rs"));
    }

    #[tokio::test]
    async fn test_each_call_enriches_independently() {
        let enricher = enricher("tree");
        let original = ChatContext::new("proj-1", "q");

        let a = enricher.enrich(original.clone()).await.unwrap();
        let b = enricher.enrich(original.clone()).await.unwrap();
        assert_eq!(a.additional_context.matches(STRUCTURE_LABEL).count(), 1);
        assert_eq!(b.additional_context.matches(STRUCTURE_LABEL).count(), 1);

        // Replaying an already-enriched context appends a second block.
        let twice = enricher.enrich(a).await.unwrap();
        assert_eq!(twice.additional_context.matches(STRUCTURE_LABEL).count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces() {
        let enricher = ContextEnricher::new(Arc::new(FailingStructureService));
        let err = enricher
            .enrich(ChatContext::new("proj-1", "q"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::Structure(StructureFetchError::UnknownProject(_))
        ));
    }
}
