//! Completion analysis over a todo list
//!
//! Everything here is computed locally from the todos and a reference date.
//! A model may later rewrite [`TodoAnalysis::summary`]; the numbers never
//! come from it.

use crate::clock::weekday_name;
use crate::{Priority, Todo};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most urgent and remaining tasks listed
pub const MAX_LISTED_TASKS: usize = 5;

/// A high-priority todo due within this many days counts as urgent
pub const URGENT_WITHIN_DAYS: i64 = 2;

/// Window the analysis describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPeriod {
    /// The reference date only
    Today,
    /// Monday of the reference week through the reference date
    Week,
}

impl AnalysisPeriod {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPeriod::Today => "today",
            AnalysisPeriod::Week => "week",
        }
    }

    /// Parse the exact wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(AnalysisPeriod::Today),
            "week" => Some(AnalysisPeriod::Week),
            _ => None,
        }
    }

    /// First day of the window
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            AnalysisPeriod::Today => today,
            AnalysisPeriod::Week => {
                let back = today.weekday().num_days_from_monday();
                today - Days::new(u64::from(back))
            }
        }
    }
}

/// Todo counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    /// High priority todos
    pub high: usize,
    /// Medium priority todos
    pub medium: usize,
    /// Low priority todos
    pub low: usize,
}

/// Todos with a due time, bucketed by hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlots {
    /// Before 12:00
    pub morning: usize,
    /// 12:00 to 17:59
    pub afternoon: usize,
    /// 18:00 and later
    pub evening: usize,
}

/// An open todo worth listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTask {
    /// Title
    pub title: String,
    /// Priority
    pub priority: Priority,
    /// Due date
    pub due_date: Option<NaiveDate>,
}

/// Completion numbers for one day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    /// Weekday name
    pub day: String,
    /// Calendar date
    pub date: NaiveDate,
    /// Rounded percentage, 0 when the day has no todos
    pub completion_rate: u32,
    /// Todos created or due that day
    pub total_tasks: usize,
    /// Of those, completed
    pub completed_tasks: usize,
}

/// Summary and statistics for a todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoAnalysis {
    /// Window analysed
    pub period: AnalysisPeriod,
    /// One-line summary
    pub summary: String,
    /// Rounded completion percentage
    pub completion_rate: u32,
    /// Number of todos analysed
    pub total_tasks: usize,
    /// Completed todos
    pub completed_tasks: usize,
    /// Counts per priority
    pub priority_distribution: PriorityCounts,
    /// Counts per category label
    pub category_distribution: BTreeMap<String, usize>,
    /// Due-time buckets
    pub time_slots: TimeSlots,
    /// Open todos, most urgent first
    pub remaining_tasks: Vec<RemainingTask>,
    /// Titles of open high-priority todos due soon
    pub urgent_tasks: Vec<String>,
    /// What to work on next
    pub focus_area: String,
    /// Suggestions shown with an empty list
    pub recommendations: Vec<String>,
    /// Per-day numbers, Monday first; weekly analyses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_completion: Option<Vec<DailyCompletion>>,
}

impl TodoAnalysis {
    /// Analyse `todos` as of `today`
    ///
    /// The list is taken as given; callers pick which todos belong to the
    /// period. An empty list yields a canned analysis.
    pub fn compute(todos: &[Todo], today: NaiveDate, period: AnalysisPeriod) -> Self {
        if todos.is_empty() {
            return Self::empty(period);
        }

        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        let completion_rate = percentage(completed, total);

        let mut priority_distribution = PriorityCounts::default();
        let mut category_distribution = BTreeMap::new();
        let mut time_slots = TimeSlots::default();
        for todo in todos {
            match todo.priority {
                Priority::High => priority_distribution.high += 1,
                Priority::Medium => priority_distribution.medium += 1,
                Priority::Low => priority_distribution.low += 1,
            }
            for label in &todo.category {
                *category_distribution.entry(label.clone()).or_insert(0) += 1;
            }
            match todo.due_time.as_deref().and_then(hour_of) {
                Some(hour) if hour < 12 => time_slots.morning += 1,
                Some(hour) if hour < 18 => time_slots.afternoon += 1,
                Some(_) => time_slots.evening += 1,
                None => {}
            }
        }

        let urgent_tasks: Vec<String> = todos
            .iter()
            .filter(|todo| is_urgent(todo, today))
            .take(MAX_LISTED_TASKS)
            .map(|todo| todo.title.clone())
            .collect();

        let mut open: Vec<&Todo> = todos.iter().filter(|t| !t.completed).collect();
        // Stable sort keeps list order among equal priorities
        open.sort_by(|a, b| b.priority.cmp(&a.priority));
        let remaining_tasks: Vec<RemainingTask> = open
            .into_iter()
            .take(MAX_LISTED_TASKS)
            .map(|todo| RemainingTask {
                title: todo.title.clone(),
                priority: todo.priority,
                due_date: todo.due_date,
            })
            .collect();

        let focus_area = if !urgent_tasks.is_empty() {
            format!(
                "Start with the {} urgent high-priority task(s).",
                urgent_tasks.len()
            )
        } else if completed < total {
            format!(
                "Work through the {} open task(s), highest priority first.",
                total - completed
            )
        } else {
            "Everything is done. Plan what comes next.".to_string()
        };

        let daily_completion = match period {
            AnalysisPeriod::Today => None,
            AnalysisPeriod::Week => Some(daily_completion(todos, period.start(today))),
        };

        TodoAnalysis {
            period,
            summary: format!(
                "{} of {} tasks completed ({}%).",
                completed, total, completion_rate
            ),
            completion_rate,
            total_tasks: total,
            completed_tasks: completed,
            priority_distribution,
            category_distribution,
            time_slots,
            remaining_tasks,
            urgent_tasks,
            focus_area,
            recommendations: Vec::new(),
            daily_completion,
        }
    }

    fn empty(period: AnalysisPeriod) -> Self {
        let summary = match period {
            AnalysisPeriod::Today => "No tasks registered today.",
            AnalysisPeriod::Week => "No tasks registered this week.",
        };

        TodoAnalysis {
            period,
            summary: summary.to_string(),
            completion_rate: 0,
            total_tasks: 0,
            completed_tasks: 0,
            priority_distribution: PriorityCounts::default(),
            category_distribution: BTreeMap::new(),
            time_slots: TimeSlots::default(),
            remaining_tasks: Vec::new(),
            urgent_tasks: Vec::new(),
            focus_area: "Add a new task to get started!".to_string(),
            recommendations: vec![
                "Add new tasks to keep your momentum going.".to_string(),
                "Register important deadlines early so you can plan ahead.".to_string(),
            ],
            daily_completion: None,
        }
    }
}

/// `part / whole` as a percentage rounded half up; 0 for an empty whole
fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Open, high priority, and due within [`URGENT_WITHIN_DAYS`] (overdue included)
fn is_urgent(todo: &Todo, today: NaiveDate) -> bool {
    !todo.completed
        && todo.priority == Priority::High
        && todo
            .due_date
            .is_some_and(|due| (due - today).num_days() <= URGENT_WITHIN_DAYS)
}

/// Leading hour of an `HH:mm`-like string
fn hour_of(time: &str) -> Option<u32> {
    let (hour, _) = time.trim().split_once(':')?;
    hour.parse::<u32>().ok().filter(|h| *h < 24)
}

/// Seven days from `monday`; a todo counts on the day it was created (UTC)
/// and on the day it is due
fn daily_completion(todos: &[Todo], monday: NaiveDate) -> Vec<DailyCompletion> {
    monday
        .iter_days()
        .take(7)
        .map(|date| {
            let (total, completed) = todos
                .iter()
                .filter(|todo| {
                    todo.created_at.date_naive() == date || todo.due_date == Some(date)
                })
                .fold((0, 0), |(total, completed), todo| {
                    (total + 1, completed + usize::from(todo.completed))
                });

            DailyCompletion {
                day: weekday_name(date).to_string(),
                date,
                completion_rate: percentage(completed, total),
                total_tasks: total,
                completed_tasks: completed,
            }
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::RepairedTask;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn arb_todo() -> impl Strategy<Value = Todo> {
        (
            prop::sample::select(Priority::ALL.to_vec()),
            prop::option::of(-10i64..10),
            any::<bool>(),
            0u32..7,
        )
            .prop_map(|(priority, due, completed, created_day)| {
                let today = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
                let task = RepairedTask {
                    title: "t".to_string(),
                    description: String::new(),
                    due_date: due.map(|d| today + chrono::Duration::days(d)),
                    due_time: None,
                    priority,
                    category: Vec::new(),
                };
                let created = Utc.with_ymd_and_hms(2026, 1, 5 + created_day, 0, 0, 0).unwrap();
                let mut todo = Todo::from_repaired(task, "user", created);
                todo.completed = completed;
                todo
            })
    }

    proptest! {
        /// Property: counts are consistent and lists respect their caps
        #[test]
        fn test_analysis_bounds(todos in prop::collection::vec(arb_todo(), 0..30)) {
            let today = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
            let analysis = TodoAnalysis::compute(&todos, today, AnalysisPeriod::Week);

            prop_assert_eq!(analysis.total_tasks, todos.len());
            prop_assert!(analysis.completed_tasks <= analysis.total_tasks);
            prop_assert!(analysis.completion_rate <= 100);
            let p = analysis.priority_distribution;
            prop_assert_eq!(p.high + p.medium + p.low, analysis.total_tasks);
            prop_assert!(analysis.urgent_tasks.len() <= MAX_LISTED_TASKS);
            prop_assert!(analysis.remaining_tasks.len() <= MAX_LISTED_TASKS);
            for pair in analysis.remaining_tasks.windows(2) {
                prop_assert!(pair[0].priority >= pair[1].priority);
            }
            if !todos.is_empty() {
                let days = analysis.daily_completion.unwrap();
                prop_assert_eq!(days.len(), 7);
                for day in days {
                    prop_assert!(day.completed_tasks <= day.total_tasks);
                }
            }
        }
    }
}
