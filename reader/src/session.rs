//! Reader session: the loaded document, its summary, and playback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use speech_client::SpeechProvider;
use std::sync::Arc;

use crate::config::ReaderConfig;
use crate::playback::{Notices, PlaybackOptions, PlaybackSnapshot, Sequencer};
use crate::summary::{DEFAULT_KEY_POINTS, DocumentStats, Summary};
use crate::text::{normalize, split_camel_case};

/// A loaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Text exactly as supplied
    pub raw: String,
    /// Normalized text used for reading and summarizing
    pub text: String,
    /// When the document was loaded
    pub loaded_at: DateTime<Utc>,
}

impl Document {
    /// Normalize raw text into a document.
    pub fn new(raw: impl Into<String>, repair_ocr_joins: bool) -> Self {
        let raw = raw.into();
        let text = if repair_ocr_joins {
            normalize(&split_camel_case(&raw))
        } else {
            normalize(&raw)
        };
        Self {
            raw,
            text,
            loaded_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One reading context. Sessions share nothing with each other.
pub struct ReaderSession {
    document: Option<Document>,
    summary: Summary,
    key_points: usize,
    repair_ocr_joins: bool,
    sequencer: Sequencer,
}

impl ReaderSession {
    /// Create an empty session speaking through `provider`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<dyn SpeechProvider>, options: PlaybackOptions) -> (Self, Notices) {
        let (sequencer, notices) = Sequencer::spawn(provider, options);
        let session = Self {
            document: None,
            summary: Summary::default(),
            key_points: DEFAULT_KEY_POINTS,
            repair_ocr_joins: false,
            sequencer,
        };
        (session, notices)
    }

    /// Create a session tuned by the reader config.
    pub fn from_config(config: &ReaderConfig, provider: Arc<dyn SpeechProvider>) -> (Self, Notices) {
        let (session, notices) = Self::new(provider, config.playback_options());
        let session = session
            .with_key_points(config.key_points)
            .with_ocr_repair(config.repair_ocr_joins);
        (session, notices)
    }

    /// Set how many sentences a summary keeps.
    pub fn with_key_points(mut self, key_points: usize) -> Self {
        self.key_points = key_points;
        self
    }

    /// Split camel-case joins before normalizing loaded text.
    pub fn with_ocr_repair(mut self, enabled: bool) -> Self {
        self.repair_ocr_joins = enabled;
        self
    }

    /// Replace the current document and recompute its summary.
    pub fn load_text(&mut self, raw: impl Into<String>) -> &Document {
        let document = Document::new(raw, self.repair_ocr_joins);
        log::info!(
            "Loaded document: {} chars raw, {} chars normalized",
            document.raw.chars().count(),
            document.text.chars().count()
        );
        self.summary = Summary::build(&document.text, self.key_points);
        self.document.insert(document)
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Normalized text of the current document, empty if none is loaded.
    pub fn text(&self) -> &str {
        self.document.as_ref().map_or("", |d| d.text.as_str())
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.summary.stats
    }

    /// Read the whole document aloud from the start.
    pub async fn read_aloud(&self) {
        self.sequencer.start(self.text()).await;
    }

    /// Read the statistics and key points aloud.
    pub async fn read_summary(&self) {
        if self.summary.is_empty() {
            self.sequencer.start("").await;
            return;
        }
        let spoken = format!(
            "{} {}",
            self.summary.announcement(),
            self.summary.key_points.join(" ")
        );
        self.sequencer.start(&spoken).await;
    }

    /// Playback controls.
    pub fn playback(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.sequencer.snapshot()
    }
}
