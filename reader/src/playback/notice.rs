//! User-facing playback notices, meant to be shown in a live region or spoken.

use std::fmt;

/// Status notice raised by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Nothing to read
    NoText,
    /// The host has no speech engine
    SpeechUnavailable,
    /// Playback started with this many chunks queued
    Started { chunks: usize },
    Paused,
    Resumed,
    Stopped,
    /// The whole queue was spoken
    Finished,
    /// The engine reported a fatal error mid-queue
    EngineError,
    /// Handing a chunk to the engine failed
    DispatchFailed,
    /// Speaking rate changed
    SpeedChanged(f32),
}

impl Notice {
    /// Whether the notice reports a problem rather than progress.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::NoText | Self::SpeechUnavailable | Self::EngineError | Self::DispatchFailed
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoText => write!(f, "No text available to read."),
            Self::SpeechUnavailable => write!(f, "Speech not supported."),
            Self::Started { .. } => write!(f, "Starting to read."),
            Self::Paused => write!(f, "Reading paused."),
            Self::Resumed => write!(f, "Resumed reading your document."),
            Self::Stopped => write!(f, "Reading stopped."),
            Self::Finished => write!(f, "Finished reading the document."),
            Self::EngineError => write!(f, "Reading stopped due to error."),
            Self::DispatchFailed => write!(f, "Text to speech not available."),
            Self::SpeedChanged(rate) => write!(f, "Speed {}x", rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(Notice::NoText.to_string(), "No text available to read.");
        assert_eq!(Notice::SpeedChanged(1.5).to_string(), "Speed 1.5x");
        assert_eq!(Notice::SpeedChanged(2.0).to_string(), "Speed 2x");
        assert_eq!(Notice::Started { chunks: 3 }.to_string(), "Starting to read.");
    }

    #[test]
    fn test_error_notices() {
        assert!(Notice::EngineError.is_error());
        assert!(Notice::SpeechUnavailable.is_error());
        assert!(!Notice::Finished.is_error());
        assert!(!Notice::Paused.is_error());
    }
}
