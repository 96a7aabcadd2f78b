//! Shared speech engine client library for the reader workspace
//!
//! Provides a unified interface over text-to-speech engines:
//! - Command-line engines (espeak-ng, espeak, say, spd-say)
//! - A scriptable mock engine for tests

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::SpeechConfig;
pub use error::{Result, SpeechError};
pub use provider::{MAX_RATE, MIN_RATE, SpeechProvider, Utterance, clamp_rate};
pub use providers::mock::MockOutcome;
pub use providers::{CommandProvider, EngineKind, MockProvider, get_provider};
