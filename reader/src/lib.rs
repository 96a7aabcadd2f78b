//! Accessible document reader.
//!
//! Cleans extracted text, builds extractive summaries with document
//! statistics, and reads documents aloud through a speech engine one
//! sentence-aligned chunk at a time.

pub mod braille;
pub mod config;
pub mod error;
pub mod playback;
pub mod session;
pub mod summary;
pub mod text;

pub use braille::to_braille;
pub use config::ReaderConfig;
pub use error::{ReaderError, Result};
pub use playback::{Notice, Notices, PlaybackOptions, PlaybackSnapshot, PlaybackState, Sequencer};
pub use session::{Document, ReaderSession};
pub use summary::{DocumentStats, Summary, summarize};
pub use text::{TextChunk, chunk_text, normalize, process_document};
