//! Parse LLM output into an extracted task

use crate::error::ParseError;
use serde_json::{Map, Value};
use taskwise_domain::ExtractedTask;
use tracing::warn;

/// Parse the extractor's JSON response into an [`ExtractedTask`]
///
/// The response must be a single JSON object. Individual fields are read
/// loosely: a field with the wrong JSON type is treated as missing and left
/// for the repairer.
pub fn parse_llm_response(response: &str) -> Result<ExtractedTask, ParseError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| ParseError::InvalidFormat("Expected JSON object".to_string()))?;

    Ok(ExtractedTask {
        title: string_field(obj, "title"),
        description: string_field(obj, "description"),
        due_date: string_field(obj, "due_date"),
        due_time: string_field(obj, "due_time"),
        priority: string_field(obj, "priority"),
        category: category_field(obj),
    })
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ParseError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ParseError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence line and a closing fence if there is one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!("Ignoring '{}' of unexpected type: {}", key, other);
            None
        }
    }
}

/// Only string elements survive; anything but an array is treated as missing
fn category_field(obj: &Map<String, Value>) -> Option<Vec<String>> {
    match obj.get("category") {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        // A lone label is still a usable category
        Some(Value::String(label)) => Some(vec![label.clone()]),
        _ => None,
    }
}
