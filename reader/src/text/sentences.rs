//! Sentence segmentation and word tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Text up to and including a run of terminators, or a trailing fragment without one.
static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+|[^.!?]+$").expect("sentence pattern is valid"));

/// Word characters and apostrophes between word boundaries.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[\w']+\b").expect("word pattern is valid"));

/// A sentence and its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Order of occurrence, starting at 0
    pub index: usize,
    pub text: String,
}

/// Split text into trimmed, non-empty sentences in reading order.
///
/// Text made only of terminators (`"..."`) has no match and comes back as a
/// single sentence.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences: Vec<Sentence> = SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, s)| Sentence {
            index,
            text: s.to_string(),
        })
        .collect();

    let trimmed = text.trim();
    if sentences.is_empty() && !trimmed.is_empty() && !SENTENCE.is_match(text) {
        sentences.push(Sentence {
            index: 0,
            text: trimmed.to_string(),
        });
    }

    sentences
}

/// Number of sentences the terminator pattern finds.
///
/// Unlike `split_sentences` there is no whole-text fallback, so text made only
/// of terminators counts as zero.
pub fn count_sentences(text: &str) -> usize {
    SENTENCE
        .find_iter(text)
        .filter(|m| !m.as_str().trim().is_empty())
        .count()
}

/// Lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Number of word tokens.
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}
