// API layer module (adapters for HTTP controllers)

pub mod errors;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use crate::llm::GenerativeModel;
use crate::runtime::{Resolver, ResponseReader};

/// Sender id stamped on envelopes that originate from the HTTP surface
/// rather than from another agent.
pub const CLIENT_INQUIRY_SENDER: &str = "client_inquiry_endpoint";

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Routing handle for addressing agents by id.
    pub resolver: Resolver,
    /// Reader half of the bridge the client engagement agent reports through.
    pub responses: Arc<ResponseReader>,
    /// Generative backend for the direct generation endpoints.
    pub model: Arc<dyn GenerativeModel>,
    /// How long `/client_inquiry` waits for the workflow acknowledgement.
    pub inquiry_timeout: Duration,
}
