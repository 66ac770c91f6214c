//! LLM prompt engineering for task extraction

use crate::classifier::{
    CATEGORY_RULES, HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS, MEDIUM_PRIORITY_KEYWORDS,
};
use crate::sanitizer::SanitizedInput;
use crate::types::ExtractionRequest;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::fmt::Write;
use taskwise_domain::{weekday_name, TodoAnalysis};

/// JSON response schema sent with every structured extraction call
///
/// Uses the OpenAPI subset accepted by the Gemini `responseSchema` field.
pub const RESPONSE_SCHEMA: &str = r#"{
  "type": "OBJECT",
  "properties": {
    "title": { "type": "STRING", "description": "Short task title" },
    "description": { "type": "STRING", "description": "Task description" },
    "due_date": { "type": "STRING", "nullable": true, "description": "Due date as YYYY-MM-DD, or null" },
    "due_time": { "type": "STRING", "nullable": true, "description": "Due time as HH:mm, or null" },
    "priority": { "type": "STRING", "enum": ["high", "medium", "low"] },
    "category": { "type": "ARRAY", "items": { "type": "STRING" } }
  },
  "required": ["title", "description", "due_date", "due_time", "priority", "category"]
}"#;

/// Builds the extraction request for one sanitized input
pub struct PromptBuilder<'a> {
    input: &'a SanitizedInput,
    reference_date: NaiveDate,
    include_examples: bool,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(input: &'a SanitizedInput, reference_date: NaiveDate) -> Self {
        Self {
            input,
            reference_date,
            include_examples: true,
        }
    }

    /// Include or leave out the worked examples
    pub fn with_examples(mut self, include: bool) -> Self {
        self.include_examples = include;
        self
    }

    /// Build the prompt and schema
    pub fn build(&self) -> ExtractionRequest {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        self.push_reference_date(&mut prompt);
        self.push_date_rules(&mut prompt);
        prompt.push_str(TIME_RULES);
        prompt.push_str("\n\n");
        push_keyword_rules(&mut prompt);

        if self.include_examples {
            self.push_examples(&mut prompt);
        }

        prompt.push_str("Text to convert:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.input.as_str());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        ExtractionRequest {
            prompt,
            schema: RESPONSE_SCHEMA.to_string(),
        }
    }

    fn push_reference_date(&self, prompt: &mut String) {
        let today = self.reference_date;
        let _ = writeln!(prompt, "Reference date:");
        let _ = writeln!(prompt, "- Today: {} ({})", iso(today), weekday_name(today));
        let _ = writeln!(prompt, "- Year: {}", today.year());
        let _ = writeln!(prompt, "- Month: {}", today.month());
        let _ = writeln!(prompt, "- Day: {}", today.day());
        let _ = writeln!(prompt, "- Weekday: {}", weekday_name(today));
        prompt.push('\n');
    }

    fn push_date_rules(&self, prompt: &mut String) {
        let today = self.reference_date;
        let _ = writeln!(prompt, "due_date rules (YYYY-MM-DD):");
        let _ = writeln!(prompt, "- \"오늘\" / \"today\" -> {}", iso(today));
        let _ = writeln!(prompt, "- \"내일\" / \"tomorrow\" -> {}", iso(plus_days(today, 1)));
        let _ = writeln!(
            prompt,
            "- \"모레\" / \"the day after tomorrow\" -> {}",
            iso(plus_days(today, 2))
        );
        let _ = writeln!(
            prompt,
            "- \"이번 주 금요일\" / \"this Friday\" -> the nearest Friday on or after today ({})",
            iso(this_weekday(today, Weekday::Fri))
        );
        let _ = writeln!(
            prompt,
            "- \"다음 주 월요일\" / \"next Monday\" -> the Monday of the following week ({}); other weekdays likewise",
            iso(next_week_weekday(today, Weekday::Mon))
        );
        let _ = writeln!(prompt, "- No clear date -> null");
        prompt.push('\n');
    }

    fn push_examples(&self, prompt: &mut String) {
        let today = self.reference_date;
        let next_monday = next_week_weekday(today, Weekday::Mon);

        prompt.push_str("Examples:\n\n");
        push_example(
            prompt,
            "내일 오후 3시까지 중요한 팀 회의 준비하기",
            "팀 회의 준비",
            Some(plus_days(today, 1)),
            Some("15:00"),
            "high",
            &["업무"],
        );
        push_example(
            prompt,
            "다음주 월요일 아침에 프로젝트 보고서 작성",
            "프로젝트 보고서 작성",
            Some(next_monday),
            Some("09:00"),
            "medium",
            &["업무"],
        );
        push_example(
            prompt,
            "여유롭게 책 읽기",
            "책 읽기",
            None,
            None,
            "low",
            &["학습"],
        );
    }
}

fn push_keyword_rules(prompt: &mut String) {
    prompt.push_str("priority rules:\n");
    let _ = writeln!(prompt, "- \"high\" when the text says: {}", quoted(HIGH_PRIORITY_KEYWORDS));
    let _ = writeln!(prompt, "- \"low\" when the text says: {}", quoted(LOW_PRIORITY_KEYWORDS));
    let _ = writeln!(
        prompt,
        "- \"medium\" when the text says: {}, or when no keyword applies",
        quoted(MEDIUM_PRIORITY_KEYWORDS)
    );
    prompt.push('\n');

    prompt.push_str("category rules (use every label that applies, or an empty list):\n");
    for rule in CATEGORY_RULES {
        let _ = writeln!(
            prompt,
            "- \"{}\" ({}): {}",
            rule.label,
            rule.gloss,
            quoted(rule.keywords)
        );
    }
    prompt.push('\n');
}

fn push_example(
    prompt: &mut String,
    input: &str,
    title: &str,
    due_date: Option<NaiveDate>,
    due_time: Option<&str>,
    priority: &str,
    category: &[&str],
) {
    let example = serde_json::json!({
        "title": title,
        "description": input,
        "due_date": due_date.map(iso),
        "due_time": due_time,
        "priority": priority,
        "category": category,
    });
    let _ = writeln!(prompt, "Input: \"{}\"", input);
    let _ = writeln!(prompt, "Output: {}", example);
    prompt.push('\n');
}

fn quoted(keywords: &[&str]) -> String {
    keywords
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ")
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn plus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

/// Nearest `weekday` on or after `date`
fn this_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    plus_days(date, u64::from(ahead))
}

/// `weekday` of the week after the one containing `date` (weeks start Monday)
fn next_week_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = 7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday();
    plus_days(date, u64::from(offset))
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Convert the following natural-language to-do into a single task record.

Fields:
- title: a short, concise title for the task
- description: a one-sentence description (may repeat the input)
- due_date: the due date as YYYY-MM-DD, or null
- due_time: the due time as HH:mm (24-hour), or null
- priority: one of "high", "medium", "low"
- category: a list of category labels, possibly empty

Use the reference date below for every relative date. Never invent a date or
time the text does not mention."#;

const TIME_RULES: &str = r#"due_time rules (HH:mm, 24-hour):
- "아침" / "morning" -> "09:00"
- "점심" / "noon" -> "12:00"
- "오후" / "afternoon" -> "14:00"
- "저녁" / "evening" -> "18:00"
- "밤" / "night" -> "21:00"
- "오전" means 00:00-11:59, "오후" means 12:00-23:59 ("오후 3시" -> "15:00")
- A bare hour such as "3시" or "at 3" is PM ("15:00")
- No time mentioned -> null"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (one JSON object only, no additional text):
{
  "title": "string",
  "description": "string",
  "due_date": "YYYY-MM-DD" or null,
  "due_time": "HH:mm" or null,
  "priority": "high" | "medium" | "low",
  "category": ["string"]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

/// Prompt asking for a short natural-language summary of an analysis
///
/// Only the computed numbers are sent; titles of urgent and remaining tasks
/// are the sole free text included.
pub fn summary_prompt(analysis: &TodoAnalysis, reference_date: NaiveDate) -> String {
    let mut prompt = String::new();
    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt.push_str("\n\n");

    let start = analysis.period.start(reference_date);
    let _ = writeln!(
        prompt,
        "Period: {} ({} to {})",
        analysis.period.as_str(),
        iso(start),
        iso(reference_date)
    );
    let _ = writeln!(
        prompt,
        "Completed: {} of {} ({}%)",
        analysis.completed_tasks, analysis.total_tasks, analysis.completion_rate
    );

    let p = analysis.priority_distribution;
    let _ = writeln!(
        prompt,
        "Priorities: high {}, medium {}, low {}",
        p.high, p.medium, p.low
    );

    if analysis.category_distribution.is_empty() {
        let _ = writeln!(prompt, "Categories: none");
    } else {
        let categories = analysis
            .category_distribution
            .iter()
            .map(|(label, count)| format!("{} {}", label, count))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(prompt, "Categories: {}", categories);
    }

    let t = analysis.time_slots;
    let _ = writeln!(
        prompt,
        "Due times: morning {}, afternoon {}, evening {}",
        t.morning, t.afternoon, t.evening
    );

    if analysis.urgent_tasks.is_empty() {
        let _ = writeln!(prompt, "Urgent: none");
    } else {
        let _ = writeln!(prompt, "Urgent: {}", analysis.urgent_tasks.join("; "));
    }

    let _ = writeln!(prompt, "Remaining:");
    for task in &analysis.remaining_tasks {
        let due = task.due_date.map(iso).unwrap_or_else(|| "no due date".to_string());
        let _ = writeln!(prompt, "- {} ({}, {})", task.title, task.priority, due);
    }

    if let Some(days) = &analysis.daily_completion {
        let _ = writeln!(prompt, "By day:");
        for day in days {
            let _ = writeln!(
                prompt,
                "- {}: {} of {} ({}%)",
                day.day, day.completed_tasks, day.total_tasks, day.completion_rate
            );
        }
    }

    prompt.push('\n');
    prompt.push_str(SUMMARY_FORMAT_REMINDER);
    prompt
}

const SUMMARY_INSTRUCTIONS: &str = r#"Summarize the following to-do statistics for the person who owns the list.
Mention the completion rate and what deserves attention first. Be friendly and
concrete. Do not invent tasks or numbers."#;

const SUMMARY_FORMAT_REMINDER: &str =
    "Answer with one or two plain sentences. No markdown, no lists, no JSON.";
