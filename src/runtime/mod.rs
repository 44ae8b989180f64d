// Messaging substrate
//
// This module contains the agent hosting machinery: identity and handler
// contract, message envelope, registry with per-agent dispatch loops, and
// the bridge that hands workflow results back to blocked API callers.

pub mod agent;
pub mod bridge;
pub mod errors;
pub mod message;
pub mod registry;

// Re-export main types
pub use agent::{Agent, AgentContext, AgentId, Capability};
pub use bridge::{BridgeReply, ResponseReader, ResponseWriter};
pub use errors::{AgentError, AgentResult, RegistryError};
pub use message::{Message, MessageKind, Payload};
pub use registry::{AgentRegistry, Resolver};
