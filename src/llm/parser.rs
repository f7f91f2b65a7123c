//! Post-processing of raw model text.
//!
//! * [`extract_json`] — pull a JSON object out of free text.
//! * [`parse_numbered_list`] — collect the items of a `1. …` style list.
//!
//! # Known limitation
//!
//! [`extract_json`] takes the span from the first `{` to the last `}` in the
//! text.  It does not track nesting or string literals, so two separate
//! JSON-like blocks in one response are glued into a single (invalid) span,
//! and a stray closing brace after the object extends the span past it.
//! Such responses fail with a parse error rather than being repaired.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::interview::InterviewError;

/// First `{` to last `}`, spanning newlines.
static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// `<digits>.<whitespace>` at the start of a line.
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").expect("valid regex"));

/// Extract and parse the JSON object embedded in `text`.
///
/// If a brace-delimited block is found, only that block is parsed.  If no
/// block is found, the whole text is parsed.  Either failure is an
/// [`InterviewError::Parse`] carrying `text`.
///
/// ```
/// use interview_coach::llm::extract_json;
///
/// let value = extract_json("Sure! {\"job_title\": \"Engineer\"} Hope this helps.").unwrap();
/// assert_eq!(value["job_title"], "Engineer");
/// ```
pub fn extract_json(text: &str) -> Result<Value, InterviewError> {
    let candidate = JSON_BLOCK
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text);

    serde_json::from_str(candidate).map_err(|e| {
        log::debug!("json extraction failed on: {text}");
        InterviewError::parse(format!("invalid JSON: {e}"), text)
    })
}

/// Collect the numbered items of `text` in order, stripping the `N. ` prefix.
///
/// Lines are trimmed before matching; lines that do not start with
/// `<digits>.<whitespace>` are ignored, as are items that are empty after
/// stripping.  No items at all is an [`InterviewError::Parse`].
///
/// ```
/// use interview_coach::llm::parse_numbered_list;
///
/// let items = parse_numbered_list("1. What is X?\n2. What is Y?\nNote: ignore this").unwrap();
/// assert_eq!(items, ["What is X?", "What is Y?"]);
/// ```
pub fn parse_numbered_list(text: &str) -> Result<Vec<String>, InterviewError> {
    let items: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| LIST_ITEM.is_match(line))
        .map(|line| LIST_ITEM.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(InterviewError::parse("no numbered items found", text));
    }
    Ok(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- extract_json ------------------------------------------------------

    #[test]
    fn bare_object() {
        let value = extract_json(r#"{"job_title": "Engineer"}"#).unwrap();
        assert_eq!(value["job_title"], "Engineer");
    }

    #[test]
    fn object_wrapped_in_prose() {
        let text = "Here is the analysis you asked for:\n\
                    {\"job_title\": \"Engineer\", \"technical_skills\": [\"Go\"]}\n\
                    Let me know if you need anything else.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["job_title"], "Engineer");
        assert_eq!(value["technical_skills"][0], "Go");
    }

    #[test]
    fn object_inside_markdown_fence() {
        let text = "```json\n{\n  \"industry\": \"retail\"\n}\n```";
        assert_eq!(extract_json(text).unwrap()["industry"], "retail");
    }

    #[test]
    fn nested_object_is_kept_whole() {
        let value = extract_json(r#"{"a": {"b": 1}, "c": 2}"#).unwrap();
        assert_eq!(value["a"]["b"], 1);
        assert_eq!(value["c"], 2);
    }

    #[test]
    fn no_braces_is_parse_error() {
        let err = extract_json("I could not analyze that job description.").unwrap_err();
        match err {
            InterviewError::Parse { text, .. } => {
                assert_eq!(text, "I could not analyze that job description.")
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn no_braces_but_valid_json_parses_whole_text() {
        let value = extract_json("[1, 2, 3]").unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn two_blocks_are_not_disambiguated() {
        let text = r#"{"job_title": "A"} and also {"job_title": "B"}"#;
        assert!(matches!(
            extract_json(text),
            Err(InterviewError::Parse { .. })
        ));
    }

    #[test]
    fn trailing_brace_in_prose_breaks_extraction() {
        let text = r#"{"job_title": "A"} (see section }"#;
        assert!(extract_json(text).is_err());
    }

    #[test]
    fn malformed_block_does_not_fall_back_to_whole_text() {
        assert!(extract_json("{job_title: Engineer}").is_err());
    }

    // ---- parse_numbered_list -----------------------------------------------

    #[test]
    fn numbered_lines_in_order() {
        let items =
            parse_numbered_list("1. What is X?\n2. What is Y?\nNote: ignore this").unwrap();
        assert_eq!(items, vec!["What is X?", "What is Y?"]);
    }

    #[test]
    fn indented_and_multi_digit_items() {
        let text = "Questions:\n   9. Ninth\n  10. Tenth\n";
        assert_eq!(parse_numbered_list(text).unwrap(), ["Ninth", "Tenth"]);
    }

    #[test]
    fn requires_whitespace_after_dot() {
        let text = "1.No space\n2) Wrong delimiter\n3. Kept";
        assert_eq!(parse_numbered_list(text).unwrap(), ["Kept"]);
    }

    #[test]
    fn order_follows_text_not_numbers() {
        let text = "2. Second\n1. First";
        assert_eq!(parse_numbered_list(text).unwrap(), ["Second", "First"]);
    }

    #[test]
    fn crlf_line_endings() {
        let text = "1. Alpha\r\n2. Beta\r\n";
        assert_eq!(parse_numbered_list(text).unwrap(), ["Alpha", "Beta"]);
    }

    #[test]
    fn no_numbered_lines_is_parse_error() {
        let err = parse_numbered_list("Here are some questions:\n- bullet").unwrap_err();
        assert!(matches!(err, InterviewError::Parse { .. }));
    }

    #[test]
    fn empty_text_is_parse_error() {
        assert!(parse_numbered_list("").is_err());
    }
}
