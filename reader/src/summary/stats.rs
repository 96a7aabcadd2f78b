//! Document statistics shown next to the summary.

use serde::{Deserialize, Serialize};

use crate::text::{count_sentences, count_words};

/// Reading speed baseline used for the time estimate.
pub const WORDS_PER_MINUTE: f64 = 180.0;

/// Basic statistics for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Word tokens in the text
    pub words: usize,
    /// Segmented sentences in the text
    pub sentences: usize,
    /// Estimated reading time, one decimal, never below one minute
    pub reading_minutes: f64,
}

impl DocumentStats {
    /// Compute statistics over the full text.
    pub fn from_text(text: &str) -> Self {
        let words = count_words(text);
        Self {
            words,
            sentences: count_sentences(text),
            reading_minutes: reading_time(words),
        }
    }
}

/// Minutes needed to read `words` words, rounded to one decimal, floored at one minute.
pub fn reading_time(words: usize) -> f64 {
    let minutes = ((words as f64 / WORDS_PER_MINUTE) * 10.0).round() / 10.0;
    minutes.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_text() {
        let stats = DocumentStats::from_text("The cat sat. The cat sat on the mat. Dogs bark loudly at night.");
        assert_eq!(stats.words, 14);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.reading_minutes, 1.0);
    }

    #[test]
    fn test_empty_text() {
        let stats = DocumentStats::from_text("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.reading_minutes, 1.0);
    }

    #[test]
    fn test_terminators_only() {
        let stats = DocumentStats::from_text("...");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.sentences, 0);
    }

    #[test]
    fn test_reading_time_rounding() {
        assert_eq!(reading_time(1), 1.0);
        assert_eq!(reading_time(180), 1.0);
        assert_eq!(reading_time(270), 1.5);
        // 400 / 180 = 2.222...
        assert_eq!(reading_time(400), 2.2);
        assert_eq!(reading_time(1800), 10.0);
    }
}
