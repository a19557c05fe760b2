pub mod chat;
pub mod completion;
pub mod engine;
pub mod qna;
pub mod router;
pub mod structure;

pub use chat::{AgentError, ChatAgent, ExecutableAgent};
pub use completion::{CompletionProvider, Message, Role};
pub use engine::{EngineError, ExecutionEngine, ResponseStream};
pub use qna::QnaAgent;
pub use router::{Route, RouterAgent, RouterError};
pub use structure::{ContextEnricher, EnrichmentError, StructureFetchError, StructureService};
