//! Error types for the parser
//!
//! Two layers: [`ParseError`] is what the pipeline returns, [`ErrorCode`] is
//! the machine-readable code and HTTP status class a caller reports.

use std::time::Duration;
use thiserror::Error;

/// Why the sanitizer refused an input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing, not a string, or blank
    #[error("input is empty")]
    EmptyInput,

    /// Fewer than the minimum number of characters
    #[error("input is too short")]
    TooShort,

    /// More than the maximum number of characters
    #[error("input is too long")]
    TooLong,

    /// Noise: whitespace only, one repeated character, or short symbol soup
    #[error("input is not meaningful")]
    Meaningless,
}

impl Rejection {
    /// Machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::EmptyInput => "EMPTY_INPUT",
            Rejection::TooShort => "TOO_SHORT",
            Rejection::TooLong => "TOO_LONG",
            Rejection::Meaningless => "MEANINGLESS",
        }
    }

    /// Message shown to the person who typed the input
    pub fn user_message(&self) -> &'static str {
        match self {
            Rejection::EmptyInput => "Please enter a task.",
            Rejection::TooShort => "The input is too short. Enter at least 2 characters.",
            Rejection::TooLong => "The input is too long. Enter at most 500 characters.",
            Rejection::Meaningless => "Please enter a meaningful task description.",
        }
    }
}

/// Error codes reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Sanitizer rejected the input
    ValidationError,
    /// Required configuration or credentials are missing
    ConfigError,
    /// Request body was not valid JSON
    InvalidJson,
    /// Extractor rejected the credentials
    AuthError,
    /// Model missing or unavailable
    ModelError,
    /// Quota or rate limit exceeded
    RateLimit,
    /// Extractor took too long
    Timeout,
    /// Anything else
    UnknownError,
}

const AUTH_KEYWORDS: &[&str] = &[
    "api key",
    "api_key",
    "authentication",
    "unauthorized",
    "permission denied",
];
const MODEL_KEYWORDS: &[&str] = &["model", "not found", "not available", "404"];
const RATE_LIMIT_KEYWORDS: &[&str] = &["quota", "rate limit", "429", "too many requests"];
const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "timed out"];

impl ErrorCode {
    /// Wire name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::AuthError => "AUTH_ERROR",
            ErrorCode::ModelError => "MODEL_ERROR",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status class
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::ValidationError | ErrorCode::InvalidJson => 400,
            ErrorCode::AuthError => 401,
            ErrorCode::RateLimit => 429,
            ErrorCode::ConfigError | ErrorCode::UnknownError => 500,
            ErrorCode::ModelError => 503,
            ErrorCode::Timeout => 504,
        }
    }

    /// Generic message safe to show an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "The input could not be used. Please check it and try again.",
            ErrorCode::ConfigError => "The AI service is not configured. Please contact the administrator.",
            ErrorCode::InvalidJson => "The request body is not valid JSON.",
            ErrorCode::AuthError => "AI authentication failed. Please try again later.",
            ErrorCode::ModelError => "The AI service is temporarily unavailable. Please try again later.",
            ErrorCode::RateLimit => "Too many AI requests. Please wait a moment and try again.",
            ErrorCode::Timeout => "The AI service took too long to respond. Please try again.",
            ErrorCode::UnknownError => "Something went wrong while creating the task. Please try again.",
        }
    }

    /// Classify an extractor failure by the keywords in its detail text
    ///
    /// Groups are checked in order (auth, model, rate limit, timeout); the
    /// first group with a match wins.
    pub fn classify(detail: &str) -> ErrorCode {
        let detail = detail.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| detail.contains(k));

        if mentions(AUTH_KEYWORDS) {
            ErrorCode::AuthError
        } else if mentions(MODEL_KEYWORDS) {
            ErrorCode::ModelError
        } else if mentions(RATE_LIMIT_KEYWORDS) {
            ErrorCode::RateLimit
        } else if mentions(TIMEOUT_KEYWORDS) {
            ErrorCode::Timeout
        } else {
            ErrorCode::UnknownError
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while parsing a task
#[derive(Error, Debug)]
pub enum ParseError {
    /// Sanitizer rejected the input
    #[error("Validation error: {0}")]
    Validation(#[from] Rejection),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction did not finish within the configured budget
    #[error("Extraction timeout after {0:?}")]
    Timeout(Duration),

    /// The extractor call failed
    #[error("Extractor error: {0}")]
    Extractor(String),

    /// The extractor answered with something that is not a task object
    #[error("Invalid extractor output: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::InvalidFormat(format!("JSON parse error: {}", e))
    }
}

impl ParseError {
    /// Code to report for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Validation(_) => ErrorCode::ValidationError,
            ParseError::Config(_) => ErrorCode::ConfigError,
            ParseError::Timeout(_) => ErrorCode::Timeout,
            ParseError::Extractor(detail) => ErrorCode::classify(detail),
            ParseError::InvalidFormat(_) => ErrorCode::UnknownError,
        }
    }

    /// Message safe to show an end user
    ///
    /// Validation failures explain what to fix; everything else gets the
    /// code's generic message so extractor details never leak.
    pub fn user_message(&self) -> &'static str {
        match self {
            ParseError::Validation(rejection) => rejection.user_message(),
            other => other.code().user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth() {
        assert_eq!(ErrorCode::classify("API key not valid"), ErrorCode::AuthError);
        assert_eq!(
            ErrorCode::classify("Authentication failed: HTTP 401"),
            ErrorCode::AuthError
        );
        assert_eq!(ErrorCode::classify("Unauthorized"), ErrorCode::AuthError);
    }

    #[test]
    fn test_classify_model() {
        assert_eq!(
            ErrorCode::classify("Model not available: gemini-9"),
            ErrorCode::ModelError
        );
        assert_eq!(ErrorCode::classify("HTTP 404"), ErrorCode::ModelError);
    }

    #[test]
    fn test_classify_rate_limit() {
        assert_eq!(ErrorCode::classify("Rate limit exceeded"), ErrorCode::RateLimit);
        assert_eq!(
            ErrorCode::classify("Resource has been exhausted (e.g. check quota)."),
            ErrorCode::RateLimit
        );
        assert_eq!(ErrorCode::classify("HTTP 429"), ErrorCode::RateLimit);
    }

    #[test]
    fn test_classify_timeout() {
        assert_eq!(
            ErrorCode::classify("Request timed out after 30s"),
            ErrorCode::Timeout
        );
        assert_eq!(ErrorCode::classify("upstream timeout"), ErrorCode::Timeout);
    }

    #[test]
    fn test_classify_first_group_wins() {
        // Mentions both an auth and a rate-limit keyword
        assert_eq!(
            ErrorCode::classify("api key quota exceeded"),
            ErrorCode::AuthError
        );
        // Mentions both a model and a timeout keyword
        assert_eq!(
            ErrorCode::classify("model request timed out"),
            ErrorCode::ModelError
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(ErrorCode::classify("connection reset"), ErrorCode::UnknownError);
        assert_eq!(ErrorCode::classify(""), ErrorCode::UnknownError);
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(ErrorCode::ValidationError.status(), 400);
        assert_eq!(ErrorCode::ConfigError.status(), 500);
        assert_eq!(ErrorCode::InvalidJson.status(), 400);
        assert_eq!(ErrorCode::AuthError.status(), 401);
        assert_eq!(ErrorCode::ModelError.status(), 503);
        assert_eq!(ErrorCode::RateLimit.status(), 429);
        assert_eq!(ErrorCode::Timeout.status(), 504);
        assert_eq!(ErrorCode::UnknownError.status(), 500);
    }

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(
            ParseError::Validation(Rejection::TooShort).code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            ParseError::Timeout(Duration::from_secs(1)).code(),
            ErrorCode::Timeout
        );
        assert_eq!(
            ParseError::Extractor("Rate limit exceeded".into()).code(),
            ErrorCode::RateLimit
        );
        assert_eq!(
            ParseError::InvalidFormat("Expected JSON object".into()).code(),
            ErrorCode::UnknownError
        );
        assert_eq!(ParseError::Config("x".into()).code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_user_message_hides_extractor_detail() {
        let error = ParseError::Extractor("Authentication failed: secret-key-123".into());
        assert!(!error.user_message().contains("secret-key-123"));
        assert_eq!(error.user_message(), ErrorCode::AuthError.user_message());

        let rejection = ParseError::Validation(Rejection::TooLong);
        assert_eq!(rejection.user_message(), Rejection::TooLong.user_message());
    }
}
