//! Post-processing of extractor output
//!
//! Turns an untrusted [`ExtractedTask`] into a [`RepairedTask`] that satisfies
//! every invariant, whatever the model sent.

use crate::types::ParseOutcome;
use chrono::{DateTime, NaiveDate};
use taskwise_domain::{ExtractedTask, Priority, RepairedTask};
use tracing::debug;

/// Title used when the model sent none
pub const PLACEHOLDER_TITLE: &str = "Untitled task";

/// Longest title kept as-is (characters)
pub const MAX_TITLE_LENGTH: usize = 80;

const ELLIPSIS: &str = "...";

/// Repair an extracted task against a reference date
///
/// Never fails. A due date that cannot be parsed or lies before
/// `reference_date` is dropped together with its time, and the outcome is
/// flagged with `has_past_date`. A kept date keeps the model's time as sent.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taskwise_domain::{ExtractedTask, Priority};
/// use taskwise_parser::repair;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
/// let extracted = ExtractedTask {
///     title: Some("Pay rent".to_string()),
///     due_date: Some("2026-01-08".to_string()),
///     due_time: Some("10:00".to_string()),
///     priority: Some("URGENT".to_string()),
///     ..Default::default()
/// };
///
/// let outcome = repair(extracted, today);
/// assert!(outcome.has_past_date);
/// assert_eq!(outcome.task.due_date, None);
/// assert_eq!(outcome.task.due_time, None);
/// assert_eq!(outcome.task.priority, Priority::Medium);
/// ```
pub fn repair(extracted: ExtractedTask, reference_date: NaiveDate) -> ParseOutcome {
    let title = repair_title(extracted.title);

    let (due_date, due_time, has_past_date) =
        match extracted.due_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_date(raw) {
                Some(date) if date >= reference_date => (Some(date), extracted.due_time, false),
                Some(date) => {
                    debug!("Dropping past due date {} (reference {})", date, reference_date);
                    (None, None, true)
                }
                None => {
                    debug!("Dropping unparseable due date '{}'", raw);
                    (None, None, true)
                }
            },
            _ => (None, None, false),
        };

    let priority = extracted
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .unwrap_or_default();

    let category = dedup_categories(extracted.category.unwrap_or_default());

    ParseOutcome {
        task: RepairedTask {
            title,
            description: extracted.description.unwrap_or_default(),
            due_date,
            due_time,
            priority,
            category,
        },
        has_past_date,
    }
}

fn repair_title(title: Option<String>) -> String {
    let title = title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        let keep = MAX_TITLE_LENGTH - ELLIPSIS.len();
        let mut truncated: String = title.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        title.to_string()
    }
}

/// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn dedup_categories(categories: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(categories.len());
    for label in categories {
        let label = label.trim();
        if !label.is_empty() && !seen.iter().any(|s: &String| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}
