//! HTTP client for the Google generative-AI endpoints.
//!
//! Text and chat go through `models/{model}:generateContent`, images through
//! `models/{model}:predict` (Imagen). The client holds a primary API key and
//! an optional secondary one; quota (429) and internal (500) failures on the
//! primary are retried once with the secondary. Image calls are serialized
//! behind a semaphore with a pacing delay to dodge per-minute quota limits.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::error::AppError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-4.0-fast-generate-001";

const TEXT_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);
/// Delay before each image call; Imagen quota is per-minute.
const IMAGE_PACING: Duration = Duration::from_secs(1);

/// One turn of chat history on the Gemini wire (`user` / `model`).
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: String,
    pub text: String,
}

/// Seam between the orchestration pipeline and the actual provider, so the
/// pipeline can be exercised with a scripted stub in tests.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Single-prompt text generation.
    async fn generate_text(&self, prompt: &str) -> Result<String, AppError>;

    /// Multi-turn chat generation with a system instruction.
    async fn generate_chat(
        &self,
        history: &[ChatTurn],
        system_instruction: &str,
    ) -> Result<String, AppError>;

    /// Image generation. Returns a `data:image/png;base64,...` URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, AppError>;
}

// ============================================================================
// Failure classification
// ============================================================================

/// A failed provider call, keeping the HTTP status for retry decisions.
#[derive(Debug)]
struct ApiFailure {
    status: Option<u16>,
    message: String,
}

impl ApiFailure {
    fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ApiFailure> for AppError {
    fn from(f: ApiFailure) -> Self {
        match f.status {
            Some(code) => AppError::Provider(format!("HTTP {code}: {}", f.message)),
            None => AppError::Provider(f.message),
        }
    }
}

/// Quota and internal errors are worth one retry with the secondary key.
fn is_retryable(failure: &ApiFailure) -> bool {
    if matches!(failure.status, Some(429) | Some(500)) {
        return true;
    }
    let lower = failure.message.to_lowercase();
    lower.contains("429")
        || lower.contains("resource_exhausted")
        || lower.contains("quota exceeded")
        || lower.contains("too many requests")
}

// ============================================================================
// GeminiClient
// ============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    primary_key: String,
    secondary_key: Option<String>,
    imagen_key: Option<String>,
    /// Serializes Imagen calls; quota-driven, not a correctness concern.
    image_gate: Semaphore,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(TEXT_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            primary_key: config.gemini_api_key.clone(),
            secondary_key: config.gemini_api_key_secondary.clone(),
            imagen_key: config.imagen_api_key.clone(),
            image_gate: Semaphore::new(1),
        }
    }

    // --------------------------------------------------------------------
    // Private HTTP helpers
    // --------------------------------------------------------------------

    /// POST a JSON body to `{BASE_URL}/models/{model}:{verb}?key=...` and
    /// parse the JSON response. Non-success statuses and API-level `error`
    /// objects both surface as `ApiFailure`.
    async fn post_model(
        &self,
        model: &str,
        verb: &str,
        key: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, ApiFailure> {
        let url = format!("{BASE_URL}/models/{model}:{verb}?key={key}");

        let response = self
            .http
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiFailure::new(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| ApiFailure::new(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("request failed")
                .to_string();
            return Err(ApiFailure::new(Some(status.as_u16()), message));
        }

        // Some endpoints report failures inside a 200 body.
        if let Some(error) = payload.get("error") {
            let code = error.get("code").and_then(|c| c.as_u64()).map(|c| c as u16);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(ApiFailure::new(code, message));
        }

        Ok(payload)
    }

    /// Run a `generateContent` request, falling back to the secondary key
    /// when the primary hits quota or an internal error.
    async fn generate_content(&self, body: &Value) -> Result<Value, AppError> {
        let first = self
            .post_model(TEXT_MODEL, "generateContent", &self.primary_key, body, TEXT_TIMEOUT)
            .await;

        match first {
            Ok(v) => Ok(v),
            Err(failure) => match (&self.secondary_key, is_retryable(&failure)) {
                (Some(secondary), true) => {
                    tracing::warn!(
                        "Primary Gemini key exhausted or failed ({}); retrying with secondary key",
                        failure.message
                    );
                    self.post_model(TEXT_MODEL, "generateContent", secondary, body, TEXT_TIMEOUT)
                        .await
                        .map_err(Into::into)
                }
                _ => Err(failure.into()),
            },
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, AppError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        let response = self.generate_content(&body).await?;
        extract_text(&response)
            .ok_or_else(|| AppError::Provider("Gemini returned no text candidates".into()))
    }

    async fn generate_chat(
        &self,
        history: &[ChatTurn],
        system_instruction: &str,
    ) -> Result<String, AppError> {
        let contents: Vec<Value> = history
            .iter()
            .map(|turn| json!({ "role": turn.role, "parts": [{ "text": turn.text }] }))
            .collect();
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": contents,
        });
        let response = self.generate_content(&body).await?;
        extract_text(&response)
            .ok_or_else(|| AppError::Provider("Gemini returned no text candidates".into()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, AppError> {
        let _permit = self
            .image_gate
            .acquire()
            .await
            .map_err(|_| AppError::Internal("image gate closed".into()))?;
        tokio::time::sleep(IMAGE_PACING).await;

        // The dedicated Imagen key wins; otherwise reuse the text key.
        let key = self.imagen_key.as_deref().unwrap_or(&self.primary_key);
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 },
        });

        tracing::debug!(model = IMAGE_MODEL, "Generating image");
        let response = self
            .post_model(IMAGE_MODEL, "predict", key, &body, IMAGE_TIMEOUT)
            .await
            .map_err(AppError::from)?;

        extract_image_data_url(&response).ok_or_else(|| {
            tracing::error!("Imagen response had no predictions: {}", response);
            AppError::Provider("No base64 image in Imagen response".into())
        })
    }
}

// ============================================================================
// Response extraction
// ============================================================================

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")?
        .as_array()?;
    let text: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text.join(""))
    }
}

/// Pull the base64 PNG out of an Imagen `predict` response.
fn extract_image_data_url(response: &Value) -> Option<String> {
    let b64 = response
        .pointer("/predictions/0/bytesBase64Encoded")?
        .as_str()?;
    Some(format!("data:image/png;base64,{b64}"))
}
