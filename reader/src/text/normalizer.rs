//! Canonicalization of raw extracted text.
//!
//! Extraction (plain text, PDF text layers, OCR) leaves line-wrap artifacts and
//! hyphenated line breaks behind. `normalize` turns that into paragraphs
//! separated by a blank line, with single spaces everywhere else.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line feed, optional whitespace, then one or more line feeds: a paragraph break.
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n+").expect("paragraph pattern is valid"));

/// Line feeds left inside a paragraph are wrap artifacts.
static LINE_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("wrap pattern is valid"));

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("space pattern is valid"));

static CAMEL_JOIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel pattern is valid"));

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Normalize raw extracted text.
///
/// Steps, in order:
/// - carriage returns become line feeds
/// - hyphenated line breaks (`-\n`) are joined
/// - blank-line paragraph breaks are kept as exactly one `\n\n`
/// - every other run of line feeds becomes a single space
/// - runs of spaces collapse to one space
/// - leading and trailing whitespace is trimmed
pub fn normalize(raw: &str) -> String {
    let mut text = normalize_once(raw);
    // A hyphen right before a paragraph break survives as `-\n\n`; settle it
    while text.contains("-\n") {
        let next = normalize_once(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn normalize_once(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace('\r', "\n").replace("-\n", "");

    let paragraphs: Vec<String> = PARAGRAPH_BREAK
        .split(&text)
        .map(|paragraph| LINE_WRAP.replace_all(paragraph, " ").into_owned())
        .collect();
    let text = paragraphs.join(PARAGRAPH_SEPARATOR);

    SPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Split words that OCR glued together at a case change (`endStart` -> `end Start`).
pub fn split_camel_case(text: &str) -> String {
    CAMEL_JOIN.replace_all(text, "$1 $2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\r\n  "), "");
    }

    #[test]
    fn test_hyphenation_joined() {
        let normalized = normalize("exam-\nple");
        assert!(normalized.contains("example"));
        assert!(!normalized.contains("-\n"));
    }

    #[test]
    fn test_crlf_after_hyphen_is_not_a_join() {
        // \r\n becomes two line feeds, so only one of them is consumed
        assert_eq!(normalize("hyphen-\r\nated word"), "hyphen ated word");
        assert_eq!(normalize("hyphen-\nated word"), "hyphenated word");
    }

    #[test]
    fn test_paragraph_preserved() {
        assert_eq!(normalize("A.\n\nB."), "A.\n\nB.");
    }

    #[test]
    fn test_blank_line_with_spaces_is_paragraph() {
        assert_eq!(normalize("First.\n   \n\n\nSecond."), "First.\n\nSecond.");
    }

    #[test]
    fn test_line_wraps_become_spaces() {
        let raw = "The quick brown\nfox jumps over\nthe lazy dog.";
        assert_eq!(normalize(raw), "The quick brown fox jumps over the lazy dog.");
    }

    #[test]
    fn test_windows_line_endings() {
        // \r\n\r\n becomes four line feeds, which is one paragraph break
        assert_eq!(normalize("One.\r\n\r\nTwo."), "One.\n\nTwo.");
    }

    #[test]
    fn test_spaces_collapsed_and_trimmed() {
        assert_eq!(normalize("   Too    many   spaces.   "), "Too many spaces.");
    }

    #[test]
    fn test_double_hyphen_before_paragraph() {
        let once = normalize("a--\n\n\nB");
        assert_eq!(once, "a B");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_double_hyphen_single_pass() {
        // The leftover `-\n` is an ordinary line wrap here
        assert_eq!(normalize("a--\n\nB"), "a- B");
        assert_eq!(normalize("a- B"), "a- B");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("endOf the lineStart"), "end Of the line Start");
        assert_eq!(split_camel_case("NASA rocks"), "NASA rocks");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(raw in "[a-zA-Z .!?\\-\\n\\r\\t]{0,80}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_idempotent_any(raw in "\\PC{0,60}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_no_stray_newlines(raw in "[a-z \\-\\n\\r]{0,80}") {
            let normalized = normalize(&raw);
            prop_assert!(!normalized.contains("  "));
            prop_assert!(!normalized.contains("\n\n\n"));
            prop_assert_eq!(normalized.trim(), normalized.as_str());
            // Every line feed is part of a "\n\n" pair
            let singles = normalized.replace("\n\n", "");
            prop_assert!(!singles.contains('\n'));
        }
    }
}
