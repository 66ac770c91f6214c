//! Todo module - a task as the caller keeps it

use crate::{Priority, RepairedTask};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a todo based on UUIDv7
///
/// UUIDv7 ids sort by creation time, which keeps "newest first" listings
/// stable even when two todos share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(uuid::Uuid);

impl TodoId {
    /// Generate a new UUIDv7-based TodoId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a TodoId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid todo id: {}", e))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A todo owned by a user
///
/// The record kept behind [`TodoStore`](crate::traits::TodoStore) and handed
/// to listing and analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,

    /// Owner
    pub user_id: String,

    /// Short title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Due date
    pub due_date: Option<NaiveDate>,

    /// Due time as `HH:mm`
    pub due_time: Option<String>,

    /// Priority
    pub priority: Priority,

    /// Category labels
    pub category: Vec<String>,

    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Build a new, not yet completed todo from a repaired task
    pub fn from_repaired(
        task: RepairedTask,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let description = if task.description.is_empty() {
            None
        } else {
            Some(task.description)
        };

        Self {
            id: TodoId::new(),
            user_id: user_id.into(),
            title: task.title,
            description,
            created_at,
            due_date: task.due_date,
            due_time: task.due_time,
            priority: task.priority,
            category: task.category,
            completed: false,
        }
    }

    /// Not completed and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Not completed and either undated or due on/after `today`
    pub fn is_in_progress(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_none_or(|due| due >= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repaired(due: Option<NaiveDate>) -> RepairedTask {
        RepairedTask {
            title: "책 읽기".to_string(),
            description: String::new(),
            due_date: due,
            due_time: None,
            priority: Priority::Low,
            category: vec!["학습".to_string()],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
    }

    #[test]
    fn test_todo_id_display_and_parse() {
        let id = TodoId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(TodoId::from_string(&id_str).unwrap(), id);
        assert!(TodoId::from_string("nope").is_err());
    }

    #[test]
    fn test_from_repaired_drops_empty_description() {
        let created = Utc.with_ymd_and_hms(2026, 1, 9, 1, 0, 0).unwrap();
        let todo = Todo::from_repaired(repaired(None), "user-1", created);
        assert_eq!(todo.user_id, "user-1");
        assert_eq!(todo.description, None);
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Low);
    }

    #[test]
    fn test_overdue_and_in_progress() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let yesterday = today().pred_opt();
        let mut todo = Todo::from_repaired(repaired(yesterday), "u", created);
        assert!(todo.is_overdue(today()));
        assert!(!todo.is_in_progress(today()));

        todo.completed = true;
        assert!(!todo.is_overdue(today()));
        assert!(!todo.is_in_progress(today()));

        let undated = Todo::from_repaired(repaired(None), "u", created);
        assert!(undated.is_in_progress(today()));
        assert!(!undated.is_overdue(today()));

        let due_today = Todo::from_repaired(repaired(Some(today())), "u", created);
        assert!(due_today.is_in_progress(today()));
    }
}
