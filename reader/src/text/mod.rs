//! Text processing: normalization, sentence segmentation, and chunking for speech.

pub mod chunker;
mod normalizer;
mod sentences;

pub use chunker::{DEFAULT_MAX_CHUNK_LEN, chunk_text, process_document};
pub use normalizer::{normalize, split_camel_case};
pub use sentences::{Sentence, count_sentences, count_words, split_sentences, tokenize};

/// A chunk of text ready to be spoken as one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Position of this chunk in the playback queue
    pub index: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
