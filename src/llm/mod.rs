// Generative model access
//
// Agents and API handlers program against the narrow `GenerativeModel`
// trait; the concrete Gemini client lives behind it.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Errors that can occur when calling the generative backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("Backend response carried no content")]
    EmptyResponse,
}

/// Text and image generation seam.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Free-text completion for `prompt`.
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError>;

    /// Renders `prompt` as an image, returned base64-encoded (PNG).
    async fn generate_image(&self, prompt: &str) -> Result<String, LlmError>;
}
