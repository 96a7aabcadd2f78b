use serde::{Deserialize, Serialize};

/// Normal speaking pace of command-line engines at rate 1.0
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 175;

/// Speech engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Engine identifier (espeak-ng, espeak, say, spd-say). None means auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Voice name passed through to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Words per minute at rate 1.0
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: None,
            voice: None,
            words_per_minute: default_words_per_minute(),
        }
    }
}
