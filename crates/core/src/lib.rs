pub mod config;
pub mod context;
pub mod response;

pub use config::{AgentConfig, ConfigurationError, TaskConfig};
pub use context::{ChatContext, ChatTurn, TurnRole};
pub use response::ChatAgentResponse;
