//! Extractive summarization.
//!
//! Sentences are scored by the summed document frequency of their
//! non-stopword terms. The highest scoring ones are returned in reading order.

mod stats;

pub use stats::{DocumentStats, WORDS_PER_MINUTE, reading_time};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::text::{Sentence, split_sentences, tokenize};

/// Number of key points the reader asks for.
pub const DEFAULT_KEY_POINTS: usize = 5;

/// Function words that carry no salience.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "to", "of", "a", "in", "is", "it", "that", "for", "on", "with", "as", "are",
    "this", "be", "by", "an", "or", "from", "at", "was", "which",
];

/// Word -> occurrences across the document, stopwords excluded.
pub type TermFrequencies = HashMap<String, usize>;

/// A sentence with its salience score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSentence {
    /// Position in the document
    pub index: usize,
    pub text: String,
    pub score: usize,
}

impl ScoredSentence {
    /// Score a sentence against the document's term frequencies.
    pub fn score(sentence: Sentence, frequencies: &TermFrequencies) -> Self {
        let score = tokenize(&sentence.text)
            .iter()
            .map(|token| frequencies.get(token).copied().unwrap_or(0))
            .sum();

        Self {
            index: sentence.index,
            text: sentence.text,
            score,
        }
    }
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Build the term frequency map for a text.
pub fn term_frequencies(text: &str) -> TermFrequencies {
    let mut frequencies = TermFrequencies::new();
    for token in tokenize(text) {
        if !is_stopword(&token) {
            *frequencies.entry(token).or_insert(0) += 1;
        }
    }
    frequencies
}

/// Pick the `max_sentences` most salient sentences of `text`.
///
/// Ties go to the earlier sentence. The result is in reading order with each
/// sentence's first letter capitalized.
pub fn summarize(text: &str, max_sentences: usize) -> Vec<String> {
    if max_sentences == 0 {
        return Vec::new();
    }

    let text = collapse_whitespace(text);
    let frequencies = term_frequencies(&text);

    let mut scored: Vec<ScoredSentence> = split_sentences(&text)
        .into_iter()
        .map(|sentence| ScoredSentence::score(sentence, &frequencies))
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    scored.truncate(max_sentences);
    scored.sort_by_key(|s| s.index);

    scored
        .into_iter()
        .map(|s| capitalize_first(&s.text))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Key points plus statistics for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub key_points: Vec<String>,
    pub stats: DocumentStats,
}

impl Summary {
    /// Summarize a document and compute its statistics.
    pub fn build(text: &str, max_sentences: usize) -> Self {
        Self {
            key_points: summarize(text, max_sentences),
            stats: DocumentStats::from_text(text),
        }
    }

    /// Check if the summary has any key points
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty()
    }

    /// Spoken description of the document statistics.
    pub fn announcement(&self) -> String {
        format!(
            "Document contains {} words, {} sentences, with an estimated reading time of {} minutes. {} key points identified.",
            self.stats.words,
            self.stats.sentences,
            self.stats.reading_minutes,
            self.key_points.len()
        )
    }

    /// Key points as a numbered list, one per line.
    pub fn numbered(&self) -> String {
        self.key_points
            .iter()
            .enumerate()
            .map(|(i, point)| format!("{}. {}", i + 1, point))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
