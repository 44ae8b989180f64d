use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::errors::ApiError;
use crate::api::AppState;

/// Request body for the direct generation endpoints
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Response from direct text generation
#[derive(Debug, Serialize)]
pub struct GenerateTextResponse {
    pub generated_text: String,
}

/// Response from direct image generation
#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub generated_image_base64: String,
}

/// Generate text straight from the model, without the agent workflow
///
/// POST /generate_text
pub async fn generate_text(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateTextResponse>, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::bad_request("Prompt is required to generate text."));
    }

    info!(prompt_len = req.prompt.len(), "Direct text generation request");

    let generated_text = state
        .model
        .generate_text(&req.prompt)
        .await
        .map_err(|e| ApiError::bad_gateway(format!("Text generation failed: {}", e)))?;

    Ok(Json(GenerateTextResponse { generated_text }))
}

/// Generate an image straight from the model, returned base64 encoded
///
/// POST /generate_image
pub async fn generate_image(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateImageResponse>, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Prompt is required to generate an image.",
        ));
    }

    info!(prompt_len = req.prompt.len(), "Direct image generation request");

    let generated_image_base64 = state
        .model
        .generate_image(&req.prompt)
        .await
        .map_err(|e| ApiError::bad_gateway(format!("Image generation failed: {}", e)))?;

    Ok(Json(GenerateImageResponse {
        generated_image_base64,
    }))
}
