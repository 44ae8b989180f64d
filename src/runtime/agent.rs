//! Agent identity, capability advertisement, and the handler contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::AgentResult;
use super::message::Message;
use super::registry::Resolver;

/// Unique identifier of an agent within one registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Advertised skill of an agent. Descriptive metadata only; routing is done
/// by agent id, never by capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Analysis,
    Design,
    ExecutionManagement,
    Finance,
    GeospatialAnalysis,
    HumanInteraction,
    HumanResources,
    Integration,
    Learning,
    Legal,
    NaturalLanguageProcessing,
    Planning,
    PostConstruction,
    PublicRelations,
    RegulatoryCompliance,
    RequirementGathering,
    Sustainability,
    Visualization,
}

/// A message-driven worker hosted by the registry.
///
/// The registry runs each agent on its own task and feeds it messages one at
/// a time, so handlers take `&mut self` and never need interior locking.
///
/// # Lifecycle
///
/// `on_start` runs once before the first message, `on_stop` once after the
/// last. A handler error is logged by the host loop and the agent keeps
/// running; it only affects the message that caused it.
#[async_trait]
pub trait Agent: Send + 'static {
    fn id(&self) -> &AgentId;

    fn capabilities(&self) -> &[Capability];

    async fn on_start(&mut self) {}

    async fn on_message(&mut self, message: Message, ctx: &AgentContext) -> AgentResult<()>;

    async fn on_stop(&mut self) {}
}

/// Handle given to an agent while it is processing a message. Lets the agent
/// address peers by id without holding a reference to the registry itself.
#[derive(Clone)]
pub struct AgentContext {
    agent_id: AgentId,
    resolver: Resolver,
}

impl AgentContext {
    pub(crate) fn new(agent_id: AgentId, resolver: Resolver) -> Self {
        Self { agent_id, resolver }
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Sends a task request to `receiver`. An unknown receiver is logged by
    /// the resolver and the message is dropped.
    pub fn send_task(
        &self,
        receiver: impl Into<AgentId>,
        task: impl Into<String>,
        data: Value,
        original_sender: Option<AgentId>,
    ) {
        let mut message = Message::request(self.agent_id.clone(), receiver, task, data);
        if let Some(id) = original_sender {
            message = message.with_original_sender(id);
        }
        let _ = self.resolver.deliver(message);
    }

    /// Reports a task outcome to `receiver`. Same delivery semantics as
    /// [`send_task`](Self::send_task).
    pub fn send_result(
        &self,
        receiver: impl Into<AgentId>,
        result: Value,
        task_id: Option<String>,
    ) {
        let message = Message::result(self.agent_id.clone(), receiver, result, task_id);
        let _ = self.resolver.deliver(message);
    }
}
