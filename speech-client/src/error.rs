use thiserror::Error;

/// Engine error kinds that do not interrupt playback.
const TRANSIENT_KINDS: &[&str] = &["no-speech", "network"];

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech not supported: {0}")]
    Unavailable(String),

    #[error("Speech engine error ({kind}){}", detail_suffix(.message))]
    Engine { kind: String, message: String },

    #[error("Failed to dispatch utterance: {0}")]
    Dispatch(String),

    #[error("Operation not supported by this engine: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SpeechError {
    /// Build an engine error signal of the given kind.
    pub fn engine(kind: &str, message: impl Into<String>) -> Self {
        Self::Engine {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    /// Whether the engine reported a benign signal that playback can ride out.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Engine { kind, .. } => TRANSIENT_KINDS.contains(&kind.as_str()),
            _ => false,
        }
    }
}

fn detail_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

pub type Result<T> = std::result::Result<T, SpeechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(SpeechError::engine("no-speech", "").is_transient());
        assert!(SpeechError::engine("network", "offline").is_transient());
        assert!(!SpeechError::engine("synthesis-failed", "").is_transient());
        assert!(!SpeechError::Dispatch("boom".into()).is_transient());
        assert!(!SpeechError::Unavailable("none".into()).is_transient());
    }

    #[test]
    fn test_engine_error_display() {
        let err = SpeechError::engine("interrupted", "");
        assert_eq!(err.to_string(), "Speech engine error (interrupted)");

        let err = SpeechError::engine("synthesis-failed", "exit status 1");
        assert_eq!(
            err.to_string(),
            "Speech engine error (synthesis-failed): exit status 1"
        );
    }
}
