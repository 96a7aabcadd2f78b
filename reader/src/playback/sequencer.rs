//! Playback sequencer.
//!
//! A `Sequencer` is a cheap handle; all playback state lives in one driver
//! task. The driver speaks the queue one chunk at a time and, while a chunk is
//! outstanding, races the engine's completion against incoming commands. Stop
//! and restart abandon the outstanding utterance and cancel the engine.

use log::{debug, error, info, warn};
use speech_client::{SpeechError, SpeechProvider, Utterance, clamp_rate};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use super::{Notice, PlaybackOptions, PlaybackSnapshot, PlaybackState, SPEED_STEP};
use crate::text::{TextChunk, process_document};

/// Stream of notices raised by a sequencer.
pub type Notices = mpsc::UnboundedReceiver<Notice>;

#[derive(Debug)]
enum Command {
    Start(String),
    Pause,
    Resume,
    Stop,
    SetSpeed(f32),
    StepSpeed(f32),
}

/// A command plus the channel used to acknowledge it was applied.
struct Request {
    command: Command,
    applied: oneshot::Sender<()>,
}

/// How a dispatched chunk ended.
enum ChunkOutcome {
    Finished,
    Failed(SpeechError),
    /// Stopped or replaced by a new queue before the engine finished
    Interrupted,
}

/// Handle to a playback driver.
pub struct Sequencer {
    requests: mpsc::UnboundedSender<Request>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
}

impl Sequencer {
    /// Spawn a driver for `provider` on the current tokio runtime.
    ///
    /// Dropping the returned handle stops playback and ends the driver.
    pub fn spawn(provider: Arc<dyn SpeechProvider>, options: PlaybackOptions) -> (Self, Notices) {
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        let rate = clamp_rate(options.initial_rate);
        let (snapshot_tx, snapshot_rx) = watch::channel(PlaybackSnapshot::idle(rate));

        let driver = Driver {
            provider,
            options,
            queue: Vec::new(),
            index: 0,
            playing: false,
            paused: false,
            rate,
            generation: 0,
            requests: requests_rx,
            snapshot: snapshot_tx,
            notices: notices_tx,
        };
        tokio::spawn(driver.run());

        (
            Self {
                requests: requests_tx,
                snapshot: snapshot_rx,
            },
            notices_rx,
        )
    }

    /// Start reading `text` from the beginning, replacing any current playback.
    pub async fn start(&self, text: &str) {
        self.send(Command::Start(text.to_string())).await;
    }

    /// Suspend the chunk being spoken. No effect unless playing.
    pub async fn pause(&self) {
        self.send(Command::Pause).await;
    }

    /// Continue after a pause. No effect unless paused.
    pub async fn resume(&self) {
        self.send(Command::Resume).await;
    }

    /// Cancel playback and clear the queue. Safe in any state.
    pub async fn stop(&self) {
        self.send(Command::Stop).await;
    }

    /// Set the rate for chunks dispatched from now on (clamped to 0.5-2.0).
    pub async fn set_speed(&self, rate: f32) {
        self.send(Command::SetSpeed(rate)).await;
    }

    /// Raise the rate by one step.
    pub async fn faster(&self) {
        self.send(Command::StepSpeed(SPEED_STEP)).await;
    }

    /// Lower the rate by one step.
    pub async fn slower(&self) {
        self.send(Command::StepSpeed(-SPEED_STEP)).await;
    }

    /// Current playback state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch playback state changes.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until the sequencer is idle (finished, stopped, or never started).
    pub async fn wait_idle(&self) {
        let mut snapshot = self.subscribe();
        let _ = snapshot.wait_for(PlaybackSnapshot::is_idle).await;
    }

    /// Send a command and wait for the driver to apply it.
    async fn send(&self, command: Command) {
        let (applied, done) = oneshot::channel();
        if self.requests.send(Request { command, applied }).is_err() {
            warn!("Playback driver is gone; command ignored");
            return;
        }
        let _ = done.await;
    }
}

/// Owns the queue, the cursor, and the engine.
struct Driver {
    provider: Arc<dyn SpeechProvider>,
    options: PlaybackOptions,
    queue: Vec<TextChunk>,
    index: usize,
    playing: bool,
    paused: bool,
    rate: f32,
    /// Bumped whenever the current queue is discarded
    generation: u64,
    requests: mpsc::UnboundedReceiver<Request>,
    snapshot: watch::Sender<PlaybackSnapshot>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl Driver {
    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.apply(request);
            self.play().await;
        }
        self.halt();
        debug!("Playback driver exiting");
    }

    /// Speak the queue until it is exhausted, stopped, or aborted.
    async fn play(&mut self) {
        while self.playing {
            if self.paused {
                // A pause that lands between chunks holds the next dispatch
                match self.requests.recv().await {
                    Some(request) => self.apply(request),
                    None => self.halt(),
                }
                continue;
            }

            if self.index >= self.queue.len() {
                self.finish();
                return;
            }

            match self.speak_current().await {
                ChunkOutcome::Finished => self.advance().await,
                ChunkOutcome::Failed(err) if err.is_transient() => {
                    debug!("Ignoring transient engine signal on chunk {}: {}", self.index, err);
                    self.advance().await;
                }
                ChunkOutcome::Failed(SpeechError::Dispatch(message)) => {
                    error!("Failed to dispatch chunk {}: {}", self.index, message);
                    self.abort(Notice::DispatchFailed);
                }
                ChunkOutcome::Failed(err) => {
                    error!("Speech error on chunk {}: {}", self.index, err);
                    self.abort(Notice::EngineError);
                }
                ChunkOutcome::Interrupted => {}
            }
        }
    }

    /// Dispatch the chunk under the cursor and wait for the engine.
    async fn speak_current(&mut self) -> ChunkOutcome {
        let generation = self.generation;
        let chunk = &self.queue[self.index];
        debug!(
            "Speaking chunk {}/{} ({} chars) at {}x",
            chunk.index + 1,
            self.queue.len(),
            chunk.len(),
            self.rate
        );

        let utterance = Utterance::new(chunk.text.clone(), self.rate);
        let provider = Arc::clone(&self.provider);
        let mut speech = provider.speak(utterance);

        loop {
            tokio::select! {
                result = &mut speech => {
                    return match result {
                        Ok(()) => ChunkOutcome::Finished,
                        Err(err) => ChunkOutcome::Failed(err),
                    };
                }
                request = self.requests.recv() => {
                    match request {
                        Some(request) => self.apply(request),
                        None => self.halt(),
                    }
                    if self.generation != generation {
                        return ChunkOutcome::Interrupted;
                    }
                }
            }
        }
    }

    /// Move the cursor past a finished chunk and let the engine settle.
    async fn advance(&mut self) {
        self.index += 1;
        self.publish();

        let generation = self.generation;
        let delay = tokio::time::sleep(self.options.settle_delay);
        tokio::pin!(delay);

        loop {
            tokio::select! {
                _ = &mut delay => return,
                request = self.requests.recv() => {
                    match request {
                        Some(request) => self.apply(request),
                        None => self.halt(),
                    }
                    if self.generation != generation {
                        return;
                    }
                }
            }
        }
    }

    fn apply(&mut self, request: Request) {
        debug!("Playback command: {:?}", request.command);
        match request.command {
            Command::Start(text) => self.start(&text),
            Command::Pause => {
                if self.playing && !self.paused {
                    if let Err(e) = self.provider.pause() {
                        warn!("{} could not pause: {}", self.provider.name(), e);
                    }
                    self.paused = true;
                    self.notify(Notice::Paused);
                }
            }
            Command::Resume => {
                if self.paused {
                    if let Err(e) = self.provider.resume() {
                        warn!("{} could not resume: {}", self.provider.name(), e);
                    }
                    self.paused = false;
                    self.notify(Notice::Resumed);
                }
            }
            Command::Stop => {
                self.reset();
                self.notify(Notice::Stopped);
            }
            Command::SetSpeed(rate) => self.set_rate(rate),
            Command::StepSpeed(step) => self.set_rate(self.rate + step),
        }
        self.publish();
        let _ = request.applied.send(());
    }

    fn start(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.notify(Notice::NoText);
            return;
        }
        if let Err(e) = self.provider.is_available() {
            warn!("Speech unavailable: {}", e);
            self.notify(Notice::SpeechUnavailable);
            return;
        }

        self.reset();
        self.queue = process_document(text, self.options.max_chunk_len);
        if self.queue.is_empty() {
            self.notify(Notice::NoText);
            return;
        }

        self.playing = true;
        self.notify(Notice::Started {
            chunks: self.queue.len(),
        });
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = clamp_rate(rate);
        self.notify(Notice::SpeedChanged(self.rate));
    }

    /// Cancel the engine and drop the queue.
    fn reset(&mut self) {
        self.provider.cancel();
        self.queue.clear();
        self.index = 0;
        self.playing = false;
        self.paused = false;
        self.generation += 1;
    }

    fn finish(&mut self) {
        info!("Finished reading {} chunks", self.queue.len());
        self.queue.clear();
        self.index = 0;
        self.playing = false;
        self.paused = false;
        self.generation += 1;
        self.notify(Notice::Finished);
        self.publish();
    }

    fn abort(&mut self, notice: Notice) {
        self.reset();
        self.notify(notice);
        self.publish();
    }

    /// Every handle is gone: silence the engine without a notice.
    fn halt(&mut self) {
        if self.playing {
            self.reset();
            self.publish();
        }
    }

    fn publish(&self) {
        let state = match (self.playing, self.paused) {
            (false, _) => PlaybackState::Idle,
            (true, true) => PlaybackState::Paused,
            (true, false) => PlaybackState::Playing,
        };
        self.snapshot.send_replace(PlaybackSnapshot {
            state,
            index: self.index,
            queue_len: self.queue.len(),
            rate: self.rate,
        });
    }

    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            warn!("{}", notice);
        } else {
            info!("{}", notice);
        }
        let _ = self.notices.send(notice);
    }
}
