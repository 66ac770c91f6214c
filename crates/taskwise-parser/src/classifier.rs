//! Keyword rules for priority and category
//!
//! The same tables are rendered into the prompt, so the model and the local
//! classifier are always told the same thing.

use taskwise_domain::Priority;

/// Keywords that make a task urgent
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "급하게", "중요한", "빨리", "꼭", "반드시",
    "urgent", "urgently", "important", "asap", "must",
];

/// Keywords that mark a task as relaxed
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &[
    "여유롭게", "천천히", "언젠가",
    "leisurely", "slowly", "someday", "eventually",
];

/// Keywords that explicitly ask for the default priority
pub const MEDIUM_PRIORITY_KEYWORDS: &[&str] = &["보통", "적당히", "normal"];

/// One category bucket
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Label written into the task
    pub label: &'static str,
    /// English gloss used in the prompt
    pub gloss: &'static str,
    /// Words that put a task in this bucket
    pub keywords: &'static [&'static str],
}

/// Category buckets, in the order their labels are emitted
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: "업무",
        gloss: "work",
        keywords: &[
            "회의", "보고서", "프로젝트", "업무",
            "meeting", "report", "project", "work",
        ],
    },
    CategoryRule {
        label: "개인",
        gloss: "personal",
        keywords: &[
            "쇼핑", "친구", "가족", "개인",
            "shopping", "friend", "family", "personal",
        ],
    },
    CategoryRule {
        label: "건강",
        gloss: "health",
        keywords: &[
            "운동", "병원", "건강", "요가",
            "exercise", "workout", "hospital", "health", "yoga",
        ],
    },
    CategoryRule {
        label: "학습",
        gloss: "study",
        keywords: &[
            "공부", "책", "강의", "학습",
            "study", "book", "lecture", "course",
        ],
    },
];

/// Priority implied by the text
///
/// Urgency beats leisure when both appear; no keyword means medium.
pub fn classify_priority(text: &str) -> Priority {
    let text = text.to_lowercase();
    if mentions_any(&text, HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else if mentions_any(&text, LOW_PRIORITY_KEYWORDS) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Every category whose keywords appear in the text
pub fn classify_categories(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .filter(|rule| mentions_any(&text, rule.keywords))
        .map(|rule| rule.label.to_string())
        .collect()
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| mentions(text, keyword))
}

/// Hangul keywords match anywhere (particles attach directly to words);
/// Latin keywords must be whole words, optionally plural.
fn mentions(text: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return text.contains(keyword);
    }

    text.match_indices(keyword).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let rest = &text[start + keyword.len()..];
        let rest = rest.strip_prefix('s').unwrap_or(rest);
        let after = rest.chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_priority() {
        assert_eq!(
            classify_priority("내일 오후 3시까지 중요한 팀 회의 준비하기"),
            Priority::High
        );
        assert_eq!(classify_priority("Pay rent ASAP"), Priority::High);
    }

    #[test]
    fn test_low_priority() {
        assert_eq!(classify_priority("여유롭게 책 읽기"), Priority::Low);
        assert_eq!(classify_priority("Someday learn to juggle"), Priority::Low);
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(
            classify_priority("다음주 월요일 아침에 프로젝트 보고서 작성"),
            Priority::Medium
        );
        assert_eq!(classify_priority("보통으로 정리하기"), Priority::Medium);
    }

    #[test]
    fn test_high_beats_low() {
        assert_eq!(classify_priority("천천히 하지만 반드시 끝내기"), Priority::High);
    }

    #[test]
    fn test_latin_keywords_match_whole_words() {
        // "mustard" does not contain the word "must"
        assert_eq!(classify_priority("buy mustard"), Priority::Medium);
        // "workout" is health, not work
        assert_eq!(classify_categories("morning workout"), vec!["건강"]);
        // plural forms match
        assert_eq!(classify_categories("return library books"), vec!["학습"]);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            classify_categories("내일 오후 3시까지 중요한 팀 회의 준비하기"),
            vec!["업무"]
        );
        assert_eq!(classify_categories("여유롭게 책 읽기"), vec!["학습"]);
        assert!(classify_categories("물 마시기").is_empty());
    }

    #[test]
    fn test_multiple_categories_in_table_order() {
        assert_eq!(
            classify_categories("친구랑 요가 끝나고 프로젝트 회의"),
            vec!["업무", "개인", "건강"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_categories("Team MEETING prep"), vec!["업무"]);
    }
}
