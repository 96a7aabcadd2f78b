use async_trait::async_trait;

use crate::error::Result;

/// Slowest speaking rate accepted by engines
pub const MIN_RATE: f32 = 0.5;

/// Fastest speaking rate accepted by engines
pub const MAX_RATE: f32 = 2.0;

/// One request to a speech engine
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Speaking rate relative to the engine's normal pace, within `MIN_RATE..=MAX_RATE`
    pub rate: f32,
}

impl Utterance {
    /// Create an utterance, clamping the rate into the supported range
    pub fn new(text: impl Into<String>, rate: f32) -> Self {
        Self {
            text: text.into(),
            rate: clamp_rate(rate),
        }
    }
}

/// Clamp a speaking rate into `MIN_RATE..=MAX_RATE`, mapping NaN to the normal pace
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(MIN_RATE, MAX_RATE)
}

/// Trait for speech engines
///
/// An engine is process-wide: callers cancel any previous utterance before
/// speaking a new one.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Speak an utterance, resolving when the engine reports it finished.
    ///
    /// An `Err` is the engine's error signal for this utterance. Dropping the
    /// returned future abandons the utterance.
    async fn speak(&self, utterance: Utterance) -> Result<()>;

    /// Suspend the utterance currently being spoken
    fn pause(&self) -> Result<()>;

    /// Continue a suspended utterance
    fn resume(&self) -> Result<()>;

    /// Silence the engine. Safe to call when nothing is playing.
    fn cancel(&self);

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if speech is available in this environment
    fn is_available(&self) -> Result<()>;
}
