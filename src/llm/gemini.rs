//! Client for the Google Generative Language REST API.
//!
//! Text goes through `models/{model}:generateContent`, images through the
//! Imagen `models/{model}:predict` surface. One API key covers both.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{GenerativeModel, LlmError};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        })
    }

    async fn post<Req: Serialize, Res: DeserializeOwned>(
        &self,
        model: &str,
        verb: &str,
        body: &Req,
    ) -> Result<Res, LlmError> {
        let url = format!("{}/models/{}:{}", self.base_url, model, verb);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let raw = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorBody>(&raw) {
                Ok(body) => body.error.message,
                Err(_) => raw,
            };
            Err(LlmError::Backend {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let response: GenerateContentResponse =
            self.post(&self.text_model, "generateContent", &body).await?;
        response.into_text().ok_or(LlmError::EmptyResponse)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, LlmError> {
        let body = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters { sample_count: 1 },
        };
        let response: PredictResponse = self.post(&self.image_model, "predict", &body).await?;
        response.into_image().ok_or(LlmError::EmptyResponse)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

impl PredictResponse {
    fn into_image(self) -> Option<String> {
        self.predictions.into_iter().next()?.bytes_base64_encoded
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
