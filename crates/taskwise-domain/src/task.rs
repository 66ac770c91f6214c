//! Task module - the record produced from one line of free text

use crate::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task exactly as the language model described it
///
/// Every field is optional because the model's output is untrusted: a field
/// that is missing, `null` or of the wrong JSON type ends up as `None` here
/// and is defaulted later by the repairer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTask {
    /// Short title
    pub title: Option<String>,

    /// Longer free-text description
    pub description: Option<String>,

    /// Due date, expected as `YYYY-MM-DD`
    pub due_date: Option<String>,

    /// Due time, expected as `HH:mm`
    pub due_time: Option<String>,

    /// Raw priority string, not yet checked
    pub priority: Option<String>,

    /// Category labels; `None` when the model sent something other than a list
    pub category: Option<Vec<String>>,
}

/// A task with every invariant enforced
///
/// - `title` is 1 to 80 characters
/// - `due_date` is absent or not before the reference date it was repaired against
/// - `due_time` is absent whenever `due_date` is
/// - `category` holds no duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairedTask {
    /// Short title
    pub title: String,

    /// Description, possibly empty
    pub description: String,

    /// Due date
    pub due_date: Option<NaiveDate>,

    /// Due time as the extractor sent it; only present with a due date
    pub due_time: Option<String>,

    /// Priority
    pub priority: Priority,

    /// Category labels
    pub category: Vec<String>,
}

impl From<RepairedTask> for ExtractedTask {
    fn from(task: RepairedTask) -> Self {
        ExtractedTask {
            title: Some(task.title),
            description: Some(task.description),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            due_time: task.due_time,
            priority: Some(task.priority.as_str().to_string()),
            category: Some(task.category),
        }
    }
}
