//! Request and response types for parsing

use serde::{Deserialize, Serialize};
use taskwise_domain::RepairedTask;

/// Prompt and response schema for one extractor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Full prompt text
    pub prompt: String,

    /// JSON response schema the output must follow
    pub schema: String,
}

/// Result of parsing one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// The repaired task
    pub task: RepairedTask,

    /// The extractor produced a due date that was unusable (past or malformed)
    /// and it was dropped
    pub has_past_date: bool,
}
