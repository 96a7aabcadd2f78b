//! Mock speech provider for testing
//!
//! Records every utterance and can simulate an unavailable engine, scripted
//! engine errors, and utterances that only finish when the test says so.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, Utterance};

/// Scripted outcome for one `speak` call
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Finish,
    EngineError(String),
    DispatchError(String),
}

/// A mock provider for testing playback sequencing
pub struct MockProvider {
    /// Utterances in the order they were dispatched
    spoken: Mutex<Vec<Utterance>>,
    /// Outcomes for successive calls; finishes normally once exhausted
    script: Mutex<VecDeque<MockOutcome>>,
    /// When set, each utterance waits for a released permit before finishing
    gate: Option<Semaphore>,
    available: bool,
    pause_count: AtomicUsize,
    resume_count: AtomicUsize,
    cancel_count: AtomicUsize,
}

impl MockProvider {
    /// Create a provider whose utterances finish as soon as they are spoken
    pub fn instant() -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            gate: None,
            available: true,
            pause_count: AtomicUsize::new(0),
            resume_count: AtomicUsize::new(0),
            cancel_count: AtomicUsize::new(0),
        }
    }

    /// Create a provider whose utterances finish only when `release` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::instant()
        }
    }

    /// Create a provider that reports speech as unsupported
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::instant()
        }
    }

    /// Queue outcomes for the next `speak` calls
    pub fn with_script(self, outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        self.script
            .lock()
            .unwrap()
            .extend(outcomes);
        self
    }

    /// Let `n` gated utterances finish
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Utterances dispatched so far
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    /// Text of the utterances dispatched so far
    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }

    pub fn pause_count(&self) -> usize {
        self.pause_count.load(Ordering::SeqCst)
    }

    pub fn resume_count(&self) -> usize {
        self.resume_count.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn speak(&self, utterance: Utterance) -> Result<()> {
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockOutcome::Finish);

        if let MockOutcome::DispatchError(message) = outcome {
            return Err(SpeechError::Dispatch(message));
        }

        self.spoken.lock().unwrap().push(utterance);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| SpeechError::engine("interrupted", e.to_string()))?
                .forget();
        } else {
            tokio::task::yield_now().await;
        }

        match outcome {
            MockOutcome::EngineError(kind) => Err(SpeechError::engine(&kind, "")),
            _ => Ok(()),
        }
    }

    fn pause(&self) -> Result<()> {
        self.pause_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        self.resume_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(SpeechError::Unavailable("mock engine disabled".into()))
        }
    }
}
