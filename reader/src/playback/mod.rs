//! Spoken playback of a document, one sentence-aligned chunk at a time.

mod notice;
mod sequencer;

pub use notice::Notice;
pub use sequencer::{Notices, Sequencer};

use std::time::Duration;

use crate::text::DEFAULT_MAX_CHUNK_LEN;

/// Step used by the faster/slower controls.
pub const SPEED_STEP: f32 = 0.5;

/// Pause between a chunk finishing and the next one being dispatched.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Where the sequencer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No active queue
    #[default]
    Idle,
    /// A chunk is being spoken or about to be dispatched
    Playing,
    /// Suspended mid-queue
    Paused,
}

/// Point-in-time view of the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    /// Cursor into the queue
    pub index: usize,
    pub queue_len: usize,
    /// Rate the next chunk will be dispatched at
    pub rate: f32,
}

impl PlaybackSnapshot {
    fn idle(rate: f32) -> Self {
        Self {
            state: PlaybackState::Idle,
            index: 0,
            queue_len: 0,
            rate,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlaybackState::Idle
    }

    /// True while a queue is active, paused or not.
    pub fn is_playing(&self) -> bool {
        self.state != PlaybackState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }
}

/// Tuning for a sequencer.
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    /// Maximum chunk size in characters
    pub max_chunk_len: usize,
    /// Delay before dispatching the next chunk
    pub settle_delay: Duration,
    /// Starting speaking rate (0.5-2.0)
    pub initial_rate: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            settle_delay: DEFAULT_SETTLE_DELAY,
            initial_rate: 1.0,
        }
    }
}

impl PlaybackOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum chunk size.
    pub fn with_max_chunk_len(mut self, max_chunk_len: usize) -> Self {
        self.max_chunk_len = max_chunk_len.max(1);
        self
    }

    /// Set the settle delay between chunks.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the starting rate.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.initial_rate = speech_client::clamp_rate(rate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_options_default() {
        let opts = PlaybackOptions::default();
        assert_eq!(opts.max_chunk_len, 1400);
        assert_eq!(opts.settle_delay, Duration::from_millis(50));
        assert_eq!(opts.initial_rate, 1.0);
    }

    #[test]
    fn test_playback_options_clamping() {
        let opts = PlaybackOptions::new()
            .with_rate(9.0)
            .with_max_chunk_len(0);
        assert_eq!(opts.initial_rate, 2.0);
        assert_eq!(opts.max_chunk_len, 1);
    }

    #[test]
    fn test_idle_snapshot() {
        let snapshot = PlaybackSnapshot::idle(1.5);
        assert!(snapshot.is_idle());
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.queue_len, 0);
    }
}
