//! Taskwise Parser
//!
//! Converts one line of free text into a structured task using an LLM.
//!
//! # Overview
//!
//! The parser never trusts either end. Input is validated and normalized
//! before anything leaves the process, and whatever the model answers is
//! repaired until every invariant of [`RepairedTask`](taskwise_domain::RepairedTask)
//! holds.
//!
//! # Architecture
//!
//! ```text
//! Text → Sanitizer → PromptBuilder → LLM → Parser → Classifier → Repairer → Task
//! ```
//!
//! # Key Features
//!
//! - **Sanitizer**: Rejects empty, oversized and meaningless input without a model call
//! - **Date-aware prompts**: Relative dates resolved against a caller-supplied reference date
//! - **Keyword classification**: Deterministic priority and category rules
//! - **Repair**: Placeholder titles, truncation, past-date removal, default priority
//! - **Error codes**: Every failure maps to a stable code and HTTP status class
//!
//! # Example Usage
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use taskwise_llm::MockProvider;
//! use taskwise_parser::{ParserConfig, TaskParser};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"title": "Team meeting", "due_date": "2026-01-10"}"#);
//! let parser = TaskParser::new(llm, ParserConfig::default())?;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
//! let outcome = parser.parse("prepare the team meeting tomorrow", today).await?;
//!
//! println!("{} due {:?}", outcome.task.title, outcome.task.due_date);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod repair;
mod sanitizer;
mod types;


pub use classifier::{
    classify_categories, classify_priority, CategoryRule, CATEGORY_RULES,
    HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS, MEDIUM_PRIORITY_KEYWORDS,
};
pub use config::{ClassificationMode, ParserConfig};
pub use error::{ErrorCode, ParseError, Rejection};
pub use parser::parse_llm_response;
pub use pipeline::TaskParser;
pub use prompt::{summary_prompt, PromptBuilder, RESPONSE_SCHEMA};
pub use repair::{repair, MAX_TITLE_LENGTH, PLACEHOLDER_TITLE};
pub use sanitizer::{sanitize, sanitize_value, SanitizedInput, MAX_INPUT_LENGTH, MIN_INPUT_LENGTH};
pub use types::{ExtractionRequest, ParseOutcome};
