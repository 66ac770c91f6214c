//! Taskwise LLM Provider Layer
//!
//! Pluggable LLM provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `taskwise-domain`.
//! It supports multiple LLM backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Hosted Gemini API with schema-constrained JSON output
//!
//! # Examples
//!
//! ```
//! use taskwise_llm::MockProvider;
//! use taskwise_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskwise_domain::traits::LlmProvider as LlmProviderTrait;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
///
/// The display text of each variant is what upstream error classification
/// reads, so every variant names its failure plainly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// It's useful for testing and development.
///
/// # Examples
///
/// ```
/// use taskwise_llm::MockProvider;
/// use taskwise_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    failure: Arc<Mutex<Option<LlmError>>>,
    delay: Option<Duration>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a MockProvider whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        let provider = Self::default();
        *provider.failure.lock().unwrap() = Some(error);
        provider
    }

    /// Sleep for `delay` before answering (simulates a slow model)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The most recent prompt this provider received
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        // Check if we have a specific response for this prompt
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
