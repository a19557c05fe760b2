use serde::{Deserialize, Serialize};

/// A full agent response, or one chunk of a streamed response.
///
/// Concatenating a stream's chunks in order reconstructs the response
/// the blocking path would have produced; [`ChatAgentResponse::concat`]
/// performs that fold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAgentResponse {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

impl ChatAgentResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    /// Fold an ordered chunk sequence into the equivalent full response:
    /// contents concatenated in order, citations appended in order.
    pub fn concat<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = ChatAgentResponse>,
    {
        let mut full = Self::default();
        for chunk in chunks {
            full.content.push_str(&chunk.content);
            full.citations.extend(chunk.citations);
        }
        full
    }
}
