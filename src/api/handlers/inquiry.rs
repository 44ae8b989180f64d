use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::agents::{roles, tasks};
use crate::api::errors::ApiError;
use crate::api::{AppState, CLIENT_INQUIRY_SENDER};
use crate::runtime::{BridgeReply, Message};

/// Request body for a new client inquiry
#[derive(Debug, Deserialize, Serialize)]
pub struct ClientInquiryRequest {
    pub project_type: String,
    pub client_name: String,
    pub budget_range: String,
    pub location: String,
    pub desired_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_ideas_url: Option<String>,
}

/// Receive a new client inquiry and hand it to the agent workflow
///
/// POST /client_inquiry
pub async fn client_inquiry(
    State(state): State<AppState>,
    Json(req): Json<ClientInquiryRequest>,
) -> Result<Json<Value>, ApiError> {
    // The workflow cannot start without its entry agent
    if !state.resolver.contains(&roles::CLIENT_ENGAGEMENT.into()) {
        return Err(ApiError::service_unavailable(
            "Agent system not running. Please check backend logs for startup errors.",
        ));
    }

    info!(client = %req.client_name, "Received client inquiry, forwarding to workflow");

    let data = serde_json::to_value(&req)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to encode inquiry: {}", e)))?;

    let message = Message::request(
        CLIENT_INQUIRY_SENDER,
        roles::CLIENT_ENGAGEMENT,
        tasks::INTAKE,
        data,
    );

    state
        .resolver
        .deliver(message)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to reach agent: {}", e)))?;

    // Block for the initial acknowledgement; the rest of the workflow keeps
    // running in the background after we return.
    match state.responses.get(state.inquiry_timeout).await {
        BridgeReply::TimedOut => {
            warn!(client = %req.client_name, "Client inquiry acknowledgement timed out");
            Err(ApiError::gateway_timeout(
                "Agent processing timed out. The request is still being processed in the background.",
            ))
        }
        BridgeReply::Delivered(response) => {
            if response["status"] == "error" {
                error!(client = %req.client_name, details = %response["details"], "Agent reported an error during intake");
                return Err(ApiError::internal_server_error(format!(
                    "Agent error during inquiry processing: {}",
                    response["details"]
                )));
            }
            Ok(Json(response))
        }
    }
}

/// Root welcome endpoint
///
/// GET /
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Construction AI Multi-Agent System API!"
    }))
}
