//! Input validation and normalization
//!
//! Runs before anything is sent to the model. Rules are checked in order and
//! the first failure wins.

use crate::error::Rejection;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Minimum accepted input length (characters)
pub const MIN_INPUT_LENGTH: usize = 2;

/// Maximum accepted input length (characters)
pub const MAX_INPUT_LENGTH: usize = 500;

/// Inputs without any letter shorter than this are treated as noise
const LETTERLESS_MIN_LENGTH: usize = 10;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
static SENTENCE_START: OnceLock<Regex> = OnceLock::new();

/// Text that passed validation and normalization
///
/// Always between [`MIN_INPUT_LENGTH`] and [`MAX_INPUT_LENGTH`] characters
/// and free of ASCII control characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput(String);

impl SanitizedInput {
    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the normalized text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for SanitizedInput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate and normalize a raw input
///
/// # Examples
///
/// ```
/// use taskwise_parser::{sanitize, Rejection};
///
/// let input = sanitize("  buy milk.   then   call mom ").unwrap();
/// assert_eq!(input.as_str(), "Buy milk. Then call mom");
///
/// assert_eq!(sanitize("ㅁㅁㅁ"), Err(Rejection::Meaningless));
/// ```
pub fn sanitize(raw: &str) -> Result<SanitizedInput, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length < MIN_INPUT_LENGTH {
        return Err(Rejection::TooShort);
    }
    if length > MAX_INPUT_LENGTH {
        return Err(Rejection::TooLong);
    }

    // Already covered by the blank check above; kept as an explicit guard
    if raw.chars().all(char::is_whitespace) {
        return Err(Rejection::Meaningless);
    }

    if length >= 3 && is_single_repeated_char(trimmed) {
        return Err(Rejection::Meaningless);
    }

    if length < LETTERLESS_MIN_LENGTH && !trimmed.chars().any(is_latin_or_hangul) {
        return Err(Rejection::Meaningless);
    }

    let normalized = normalize(trimmed);
    if normalized.chars().count() < MIN_INPUT_LENGTH {
        return Err(Rejection::TooShort);
    }

    Ok(SanitizedInput(normalized))
}

/// Validate a JSON field that should hold the raw input
///
/// A missing field or a non-string value is an empty input.
pub fn sanitize_value(value: Option<&Value>) -> Result<SanitizedInput, Rejection> {
    match value {
        Some(Value::String(raw)) => sanitize(raw),
        _ => Err(Rejection::EmptyInput),
    }
}

/// Every non-space character equals the first one
fn is_single_repeated_char(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first || c == ' '),
        None => false,
    }
}

/// Latin letter or precomposed Hangul syllable
fn is_latin_or_hangul(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

fn normalize(text: &str) -> String {
    let whitespace = WHITESPACE_RUN
        .get_or_init(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is valid"));
    let sentence = SENTENCE_START
        .get_or_init(|| Regex::new(r"([.!?]\s+)([a-z])").expect("SENTENCE_START is valid"));

    // Control whitespace (tab, newline) is collapsed below; other control bytes go
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_ascii_control() || c.is_whitespace())
        .collect();
    let collapsed = whitespace.replace_all(&stripped, " ");
    let stripped = collapsed.trim();

    let mut chars = stripped.chars();
    let capitalized = match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut s = String::with_capacity(stripped.len());
            s.push(first.to_ascii_uppercase());
            s.push_str(chars.as_str());
            s
        }
        _ => stripped.to_string(),
    };

    sentence
        .replace_all(&capitalized, |caps: &regex::Captures| {
            format!("{}{}", &caps[1], caps[2].to_ascii_uppercase())
        })
        .into_owned()
}
