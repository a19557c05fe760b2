use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use quarry_core::{ChatAgentResponse, ChatContext};

use crate::chat::{AgentError, ChatAgent};
use crate::completion::{CompletionProvider, Message};
use crate::engine::{EngineError, ResponseStream};

const CLASSIFIER_TEMPERATURE: f32 = 0.0;
const CLASSIFIER_MAX_TOKENS: u32 = 256;

/// A destination the router can hand an invocation to.
pub struct Route {
    pub description: String,
    pub agent: Arc<dyn ChatAgent>,
}

impl Route {
    pub fn new(description: impl Into<String>, agent: Arc<dyn ChatAgent>) -> Self {
        Self {
            description: description.into(),
            agent,
        }
    }
}

/// Routes each invocation to the best-matching registered agent, based
/// on a model classification of the query.
///
/// Classification is advisory: a provider failure, an unparseable
/// verdict, or an unknown agent id all fall back to the default route
/// rather than failing the invocation. The selected agent then runs its
/// own build/enrich/execute pipeline untouched.
pub struct RouterAgent {
    provider: Arc<dyn CompletionProvider>,
    routes: HashMap<String, Route>,
    default_route: String,
}

/// Verdict the classifier model returns.
#[derive(Debug, Deserialize)]
struct RouteDecision {
    agent_id: String,
    #[serde(default)]
    confidence_score: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("default route '{0}' is not registered")]
    UnknownDefaultRoute(String),
}

#[derive(Debug, thiserror::Error)]
enum ClassificationError {
    #[error("completion failed: {0}")]
    Completion(#[from] EngineError),
    #[error("unparseable verdict: {0}")]
    Verdict(String),
}

impl RouterAgent {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        routes: HashMap<String, Route>,
        default_route: impl Into<String>,
    ) -> Result<Self, RouterError> {
        let default_route = default_route.into();
        if !routes.contains_key(&default_route) {
            return Err(RouterError::UnknownDefaultRoute(default_route));
        }
        Ok(Self {
            provider,
            routes,
            default_route,
        })
    }

    /// Select an agent for this query, then delegate the blocking call.
    pub async fn run(&self, ctx: ChatContext) -> Result<ChatAgentResponse, AgentError> {
        self.select(&ctx).await.agent.run(ctx).await
    }

    /// Select an agent for this query, then delegate the streaming call.
    pub async fn run_stream(&self, ctx: ChatContext) -> Result<ResponseStream, AgentError> {
        self.select(&ctx).await.agent.run_stream(ctx).await
    }

    async fn select(&self, ctx: &ChatContext) -> &Route {
        match self.classify(ctx).await {
            Ok(decision) => match self.routes.get(&decision.agent_id) {
                Some(route) => {
                    info!(
                        route = %decision.agent_id,
                        confidence = decision.confidence_score as f64,
                        "query routed"
                    );
                    route
                }
                None => {
                    warn!(
                        route = %decision.agent_id,
                        "classifier chose an unregistered route, using default"
                    );
                    &self.routes[&self.default_route]
                }
            },
            Err(e) => {
                warn!(error = %e, "classification failed, using default route");
                &self.routes[&self.default_route]
            }
        }
    }

    async fn classify(&self, ctx: &ChatContext) -> Result<RouteDecision, ClassificationError> {
        let prompt = CLASSIFICATION_PROMPT
            .replace("{query}", &ctx.query)
            .replace("{history}", &ctx.history_text())
            .replace("{routes}", &self.route_descriptions());
        let messages = vec![Message::system(CLASSIFIER_SYSTEM), Message::user(prompt)];

        let response = self
            .provider
            .complete(messages, CLASSIFIER_TEMPERATURE, CLASSIFIER_MAX_TOKENS)
            .await?;

        serde_json::from_str(extract_json(&response))
            .map_err(|e| ClassificationError::Verdict(e.to_string()))
    }

    /// Route descriptions rendered in sorted id order, so the
    /// classification prompt is stable across runs.
    fn route_descriptions(&self) -> String {
        let mut ids: Vec<&String> = self.routes.keys().collect();
        ids.sort();
        ids.iter()
            .map(|id| {
                format!(
                    "agent_id: {}\ndescription: {}\n",
                    id, self.routes[*id].description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extract JSON from a model response, handling markdown code fences.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    trimmed
}

const CLASSIFIER_SYSTEM: &str = "\
You classify queries onto the most appropriate agent. Agents have full \
access to the user's code repository.";

const CLASSIFICATION_PROMPT: &str = "\
Select the agent best suited to handle the current query by comparing its
requirements with each agent's specialty.

User query: {query}

Chat history:
{history}
--- end of chat history ---

Available agents:
{routes}

Weigh the query's topics and intent against each description. The history
is context only; the current query alone is being routed. Respond ONLY
with a JSON object of the form
{\"agent_id\": \"<best matching agent_id>\", \"confidence_score\": <0.0-1.0>}";
