//! Gemini Provider Implementation
//!
//! Talks to the hosted Gemini `generateContent` API. Structured calls ask the
//! model for `application/json` output constrained by a response schema.
//!
//! # Examples
//!
//! ```no_run
//! use taskwise_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(
//!     "https://generativelanguage.googleapis.com",
//!     "gemini-2.5-flash",
//!     "my-api-key",
//! ).unwrap();
//! ```

use crate::LlmError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskwise_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<OutgoingPart<'a>>,
}

#[derive(Serialize)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

/// Response from the generateContent API
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://generativelanguage.googleapis.com")
    /// - `model`: Model to use (e.g., "gemini-2.5-flash")
    /// - `api_key`: API key sent as `x-goog-api-key`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Gemini provider with an explicit HTTP timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    /// Generate text, optionally constrained to JSON matching `schema`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API key is rejected (`Authentication`)
    /// - The model does not exist (`ModelNotAvailable`)
    /// - The quota is exhausted (`RateLimitExceeded`)
    /// - The HTTP timeout elapses (`Timeout`)
    /// - The response body cannot be decoded (`InvalidResponse`)
    pub async fn generate_async(
        &self,
        prompt: &str,
        schema: Option<&str>,
    ) -> Result<String, LlmError> {
        let generation_config = match schema {
            Some(schema) => {
                let response_schema: serde_json::Value = serde_json::from_str(schema)
                    .map_err(|e| LlmError::Other(format!("Invalid response schema: {}", e)))?;
                Some(GenerationConfig {
                    response_mime_type: "application/json",
                    response_schema,
                    temperature: 0.0,
                })
            }
            None => None,
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![OutgoingPart { text: prompt }],
            }],
            generation_config,
        };

        debug!("Calling Gemini model '{}'", self.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    // The URL names the model, which would skew error classification
                    LlmError::Communication(format!("Request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Gemini returned HTTP {}", status);
            return Err(error_for_status(status, &error_text, &self.model));
        }

        let decoded: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::InvalidResponse(format!("Failed to decode response: {}", e))
            }
        })?;

        first_text(decoded)
    }

    fn block_on_generate(&self, prompt: &str, schema: Option<&str>) -> Result<String, LlmError> {
        // Called from a blocking thread inside the server's runtime, or from
        // plain synchronous code with no runtime at all.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.generate_async(prompt, schema)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.generate_async(prompt, schema)),
        }
    }
}

/// Map a non-success HTTP status to an error
fn error_for_status(status: StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}", status.as_u16()))
        }
        // Gemini answers an invalid key with 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if body.to_lowercase().contains("api key") => {
            LlmError::Authentication("API key not valid".to_string())
        }
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => {
            LlmError::Communication(format!("HTTP {}: upstream timeout", status.as_u16()))
        }
        _ => LlmError::Communication(format!("HTTP {}: {}", status.as_u16(), body.trim())),
    }
}

/// Pull the first text part out of a response
fn first_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no text".to_string()))
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.block_on_generate(prompt, None)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.block_on_generate(prompt, Some(schema))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
