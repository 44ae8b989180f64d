use thiserror::Error;

use super::agent::AgentId;

/// Errors raised by the agent registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Agent id already registered: {0}")]
    DuplicateId(AgentId),

    #[error("No agent registered under id: {0}")]
    UnknownReceiver(AgentId),
}

/// Errors that can occur inside an agent's message handler
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Generative model error: {0}")]
    ModelError(String),

    #[error("Task execution failed: {0}")]
    TaskExecutionFailed(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
