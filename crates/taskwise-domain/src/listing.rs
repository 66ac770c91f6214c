//! In-memory filtering, sorting and counting of todo lists

use crate::{Priority, Todo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Completion-state filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No filtering
    #[default]
    All,
    /// Not completed and not overdue
    InProgress,
    /// Completed
    Completed,
    /// Not completed and past due
    Overdue,
}

/// Sort order for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first
    #[default]
    CreatedDesc,
    /// Most urgent first
    Priority,
    /// Earliest due first, undated last
    DueDate,
    /// Alphabetical by title
    Title,
}

/// Filter and sort criteria for a todo list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoQuery {
    /// Case-insensitive substring of the title; blank means no filter
    #[serde(default)]
    pub search: Option<String>,

    /// Completion-state filter
    #[serde(default)]
    pub status: StatusFilter,

    /// Exact priority
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Exact category label
    #[serde(default)]
    pub category: Option<String>,

    /// Sort order
    #[serde(default)]
    pub sort: SortKey,
}

impl TodoQuery {
    /// Apply the query to a list, returning the matching todos in order
    ///
    /// `today` decides which todos count as overdue.
    pub fn apply(&self, todos: &[Todo], today: NaiveDate) -> Vec<Todo> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<Todo> = todos
            .iter()
            .filter(|todo| match &needle {
                Some(needle) => todo.title.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|todo| match self.status {
                StatusFilter::All => true,
                StatusFilter::InProgress => todo.is_in_progress(today),
                StatusFilter::Completed => todo.completed,
                StatusFilter::Overdue => todo.is_overdue(today),
            })
            .filter(|todo| self.priority.is_none_or(|p| todo.priority == p))
            .filter(|todo| match &self.category {
                Some(category) => todo.category.iter().any(|c| c == category),
                None => true,
            })
            .cloned()
            .collect();

        // Stable sort keeps input order among equal keys
        matched.sort_by(|a, b| compare(self.sort, a, b));
        matched
    }
}

fn compare(key: SortKey, a: &Todo, b: &Todo) -> Ordering {
    match key {
        SortKey::CreatedDesc => b.created_at.cmp(&a.created_at),
        SortKey::Priority => b.priority.cmp(&a.priority),
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Title => a.title.cmp(&b.title),
    }
}

/// Counts shown above a todo list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    /// Total number of todos
    pub all: usize,
    /// Completed todos
    pub completed: usize,
    /// Open todos that are not past due
    pub in_progress: usize,
    /// Open todos past due
    pub overdue: usize,
}

impl TodoStats {
    /// Count todos by state relative to `today`
    pub fn compute(todos: &[Todo], today: NaiveDate) -> Self {
        todos.iter().fold(
            TodoStats {
                all: todos.len(),
                ..Default::default()
            },
            |mut stats, todo| {
                if todo.completed {
                    stats.completed += 1;
                } else if todo.is_overdue(today) {
                    stats.overdue += 1;
                } else {
                    stats.in_progress += 1;
                }
                stats
            },
        )
    }
}

/// Every category label used in the list, sorted and de-duplicated
pub fn unique_categories(todos: &[Todo]) -> Vec<String> {
    todos
        .iter()
        .flat_map(|todo| todo.category.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
