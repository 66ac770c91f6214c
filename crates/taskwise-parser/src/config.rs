//! Configuration for the parser

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Who decides priority and categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    /// Local keyword rules override whatever the model said
    #[default]
    Local,
    /// Trust the model, only repair invalid values
    Remote,
}

impl ClassificationMode {
    /// Lowercase name, as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::Local => "local",
            ClassificationMode::Remote => "remote",
        }
    }
}

/// Configuration for the parser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum time for a single extractor call (seconds)
    pub extraction_timeout_secs: u64,

    /// Priority/category classification mode
    pub classification: ClassificationMode,

    /// Include worked examples in the prompt
    pub include_examples: bool,
}

impl ParserConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs > 600 {
            return Err("extraction_timeout_secs cannot exceed 600".to_string());
        }
        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 30,
            classification: ClassificationMode::Local,
            include_examples: true,
        }
    }
}
