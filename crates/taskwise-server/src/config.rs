//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, reference-date
//! offset, Gemini credentials and parser tuning.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use taskwise_domain::clock::DEFAULT_UTC_OFFSET_HOURS;
use taskwise_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use taskwise_parser::ParserConfig;
use thiserror::Error;

/// Environment variables checked, in order, when no API key is configured
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Offset from UTC, in hours, used to decide what "today" is
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,

    /// Gemini connection settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Parser tuning
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Gemini connection settings
#[derive(Clone, Deserialize)]
pub struct LlmSettings {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; may be left empty and supplied through the environment
    #[serde(default)]
    pub api_key: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    3000
}

fn default_utc_offset() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_llm_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            utc_offset_hours: default_utc_offset(),
            llm: LlmSettings::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// Does not validate; call [`ServerConfig::validate`] once environment
    /// overrides have been applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Fill a missing API key from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Fill a missing API key using `lookup` to read variables
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.llm.api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
        {
            self.llm.api_key = key;
        }
    }

    /// Check that the server can start with this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "llm.api_key (or set {})",
                API_KEY_ENV_VARS.join(" / ")
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.timeout_secs > self.parser.extraction_timeout_secs {
            return Err(ConfigError::Invalid(format!(
                "llm.timeout_secs ({}) cannot exceed parser.extraction_timeout_secs ({})",
                self.llm.timeout_secs, self.parser.extraction_timeout_secs
            )));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_hours must be between -12 and 14, got {}",
                self.utc_offset_hours
            )));
        }
        self.parser.validate().map_err(ConfigError::Invalid)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            llm: LlmSettings {
                api_key: "test-key-do-not-use-in-production".to_string(),
                ..LlmSettings::default()
            },
            ..ServerConfig::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
