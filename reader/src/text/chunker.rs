//! Sentence-aligned chunking for speech playback.

use super::TextChunk;
use super::sentences::split_sentences;

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 1400;

/// Split text into speakable chunks made of whole sentences.
///
/// Sentences accumulate into a chunk until the next one would push it past
/// `max_len` characters. A single sentence longer than `max_len` is never cut:
/// it becomes a chunk of its own.
///
/// # Returns
/// Non-empty, trimmed chunks in reading order. Joining them with single
/// spaces gives back the sentence sequence.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.text.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len > max_len {
            // Flush current chunk first
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = sentence.text;
            current_len = sentence_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence.text);
            current_len = joined_len;
        }
    }

    // Don't forget the last chunk
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Process a document's text into a playback queue.
pub fn process_document(text: &str, max_len: usize) -> Vec<TextChunk> {
    chunk_text(text, max_len)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk::new(index, text))
        .collect()
}
