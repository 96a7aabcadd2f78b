//! Speech provider implementations

mod command;
pub mod mock;

pub use command::CommandProvider;
pub use mock::MockProvider;

use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError};
use crate::provider::SpeechProvider;

/// Supported command-line engines, in auto-detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    EspeakNg,
    Espeak,
    Say,
    SpdSay,
}

impl EngineKind {
    const ALL: [EngineKind; 4] = [Self::EspeakNg, Self::Espeak, Self::Say, Self::SpdSay];

    /// Parse engine kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "espeak-ng" | "espeak_ng" | "espeakng" => Ok(Self::EspeakNg),
            "espeak" => Ok(Self::Espeak),
            "say" => Ok(Self::Say),
            "spd-say" | "spd_say" | "speech-dispatcher" => Ok(Self::SpdSay),
            _ => Err(SpeechError::Config(format!("Unknown speech engine: {}", s))),
        }
    }

    /// Name of the engine binary on PATH
    pub fn binary(&self) -> &'static str {
        match self {
            Self::EspeakNg => "espeak-ng",
            Self::Espeak => "espeak",
            Self::Say => "say",
            Self::SpdSay => "spd-say",
        }
    }
}

/// Create a provider from config, auto-detecting an installed engine when none is set
pub fn get_provider(config: &SpeechConfig) -> Result<Box<dyn SpeechProvider>> {
    let kind = match config.engine.as_deref() {
        Some(name) => EngineKind::from_str(name)?,
        None => detect_engine().ok_or_else(|| {
            SpeechError::Unavailable(
                "no speech engine found on PATH (tried espeak-ng, espeak, say, spd-say)".into(),
            )
        })?,
    };

    log::debug!("Using speech engine {}", kind.binary());
    Ok(Box::new(CommandProvider::new(kind, config)?))
}

/// First engine found on PATH
fn detect_engine() -> Option<EngineKind> {
    EngineKind::ALL
        .into_iter()
        .find(|kind| which::which(kind.binary()).is_ok())
}
