//! Command-line engine provider
//!
//! Speaks each utterance by running an installed TTS binary as a subprocess.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;
use tokio::process::Command;
use tokio::sync::mpsc;

use super::EngineKind;
use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, Utterance};

/// Requests forwarded to the utterance being spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Suspend,
    Continue,
    Kill,
}

/// Provider that runs a local TTS binary (subprocess)
pub struct CommandProvider {
    kind: EngineKind,
    binary: PathBuf,
    voice: Option<String>,
    words_per_minute: u32,
    /// Control channel of the utterance currently being spoken
    active: Mutex<Option<mpsc::UnboundedSender<Control>>>,
}

impl CommandProvider {
    /// Create a new command provider
    ///
    /// Returns an error if the engine binary is not found.
    pub fn new(kind: EngineKind, config: &SpeechConfig) -> Result<Self> {
        let binary = which::which(kind.binary()).map_err(|_| {
            SpeechError::Unavailable(format!("{} not found on PATH", kind.binary()))
        })?;

        Ok(Self {
            kind,
            binary,
            voice: config.voice.clone(),
            words_per_minute: config.words_per_minute,
            active: Mutex::new(None),
        })
    }

    /// Build the engine arguments for one utterance
    fn args(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (self.words_per_minute as f32 * utterance.rate).round() as u32;
        let mut args = Vec::new();

        match self.kind {
            EngineKind::EspeakNg | EngineKind::Espeak => {
                args.extend(["-s".to_string(), wpm.to_string()]);
                if let Some(voice) = &self.voice {
                    args.extend(["-v".to_string(), voice.clone()]);
                }
            }
            EngineKind::Say => {
                args.extend(["-r".to_string(), wpm.to_string()]);
                if let Some(voice) = &self.voice {
                    args.extend(["-v".to_string(), voice.clone()]);
                }
            }
            EngineKind::SpdSay => {
                // spd-say takes a relative rate in -100..=100
                let relative = ((utterance.rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32;
                args.extend(["-w".to_string(), "-r".to_string(), relative.to_string()]);
                if let Some(voice) = &self.voice {
                    args.extend(["-y".to_string(), voice.clone()]);
                }
            }
        }

        // A leading dash would be read as an option
        if utterance.text.starts_with('-') {
            args.push(format!(" {}", utterance.text));
        } else {
            args.push(utterance.text.clone());
        }
        args
    }

    fn set_active(&self, control: Option<mpsc::UnboundedSender<Control>>) {
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = control;
    }

    /// Forward a control to the running utterance, if any
    fn send(&self, control: Control) {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = active.as_ref() {
            let _ = tx.send(control);
        }
    }

    fn is_speaking(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Ask speech-dispatcher to drop whatever it is saying, without waiting
    fn cancel_dispatcher(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No runtime available to cancel {}", self.kind.binary());
            return;
        };
        let binary = self.binary.clone();
        runtime.spawn(async move {
            let status = Command::new(&binary)
                .arg("-C")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            if let Err(e) = status {
                log::warn!("Failed to run {} -C: {}", binary.display(), e);
            }
        });
    }
}

/// Clears the active control channel when the utterance ends or is abandoned
struct ActiveGuard<'a> {
    provider: &'a CommandProvider,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.provider.set_active(None);
    }
}

#[async_trait]
impl SpeechProvider for CommandProvider {
    async fn speak(&self, utterance: Utterance) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            SpeechError::Dispatch(format!("Failed to execute {}: {}", self.kind.binary(), e))
        })?;

        let (tx, mut controls) = mpsc::unbounded_channel();
        self.set_active(Some(tx));
        let _guard = ActiveGuard { provider: self };

        loop {
            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(|e| {
                        SpeechError::engine("synthesis-failed", format!("Failed to wait for engine: {}", e))
                    })?;
                    return self.exit_result(status);
                }
                Some(control) = controls.recv() => match control {
                    Control::Kill => {
                        if let Err(e) = child.start_kill() {
                            log::warn!("Failed to kill {}: {}", self.kind.binary(), e);
                        }
                    }
                    Control::Suspend | Control::Continue => {
                        let name = if control == Control::Suspend { "STOP" } else { "CONT" };
                        if let Some(pid) = child.id() {
                            if let Err(e) = signal(pid, name).await {
                                log::warn!("Failed to send SIG{} to {}: {}", name, self.kind.binary(), e);
                            }
                        }
                    }
                },
            }
        }
    }

    fn pause(&self) -> Result<()> {
        if self.kind == EngineKind::SpdSay {
            return Err(SpeechError::Unsupported(
                "spd-say cannot pause an utterance".into(),
            ));
        }
        pause_supported()?;
        self.send(Control::Suspend);
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        if self.kind == EngineKind::SpdSay {
            return Err(SpeechError::Unsupported(
                "spd-say cannot resume an utterance".into(),
            ));
        }
        pause_supported()?;
        self.send(Control::Continue);
        Ok(())
    }

    fn cancel(&self) {
        // SIGKILL also reaches a suspended process
        self.send(Control::Kill);
        if self.kind == EngineKind::SpdSay && self.is_speaking() {
            self.cancel_dispatcher();
        }
    }

    fn name(&self) -> &'static str {
        self.kind.binary()
    }

    fn is_available(&self) -> Result<()> {
        if self.binary.exists() {
            Ok(())
        } else {
            Err(SpeechError::Unavailable(format!(
                "{} is no longer installed",
                self.binary.display()
            )))
        }
    }
}

impl CommandProvider {
    fn exit_result(&self, status: ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else if status.code().is_none() {
            Err(SpeechError::engine("interrupted", ""))
        } else {
            Err(SpeechError::engine(
                "synthesis-failed",
                format!("{} exited with {}", self.kind.binary(), status),
            ))
        }
    }
}

#[cfg(unix)]
fn pause_supported() -> Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn pause_supported() -> Result<()> {
    Err(SpeechError::Unsupported(
        "suspending an engine process needs Unix signals".into(),
    ))
}

#[cfg(unix)]
async fn signal(pid: u32, name: &str) -> Result<()> {
    let status = Command::new("kill")
        .arg(format!("-{}", name))
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(SpeechError::Dispatch(format!(
            "kill -{} {} failed with {}",
            name, pid, status
        )))
    }
}

#[cfg(not(unix))]
async fn signal(_pid: u32, name: &str) -> Result<()> {
    Err(SpeechError::Unsupported(format!(
        "SIG{} is not available on this platform",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    fn provider(kind: EngineKind, voice: Option<&str>) -> CommandProvider {
        CommandProvider {
            kind,
            binary: PathBuf::from("/usr/bin/true"),
            voice: voice.map(String::from),
            words_per_minute: 175,
            active: Mutex::new(None),
        }
    }

    fn running(binary: PathBuf) -> CommandProvider {
        CommandProvider {
            binary,
            ..provider(EngineKind::Espeak, None)
        }
    }

    #[cfg(unix)]
    fn sleeping_engine(dir: &tempfile::TempDir) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("slow-engine");
        std::fs::write(&path, "#!/bin/sh\nexec sleep 30\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    async fn wait_speaking(provider: &CommandProvider) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !provider.is_speaking() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("engine never started");
    }

    #[test]
    fn test_espeak_args() {
        let p = provider(EngineKind::EspeakNg, Some("en-us"));
        let args = p.args(&Utterance::new("Hello there.", 2.0));
        assert_eq!(args, vec!["-s", "350", "-v", "en-us", "Hello there."]);
    }

    #[test]
    fn test_say_args() {
        let p = provider(EngineKind::Say, None);
        let args = p.args(&Utterance::new("Hi.", 0.5));
        assert_eq!(args, vec!["-r", "88", "Hi."]);
    }

    #[test]
    fn test_spd_say_args() {
        let p = provider(EngineKind::SpdSay, None);
        let args = p.args(&Utterance::new("Hi.", 1.5));
        assert_eq!(args, vec!["-w", "-r", "50", "Hi."]);
    }

    #[test]
    fn test_leading_dash_is_not_an_option() {
        let p = provider(EngineKind::Espeak, None);
        let args = p.args(&Utterance::new("-5 degrees.", 1.0));
        assert_eq!(args.last().map(String::as_str), Some(" -5 degrees."));
    }

    #[test]
    fn test_pause_without_active_utterance() {
        let p = provider(EngineKind::Espeak, None);
        assert!(p.pause().is_ok());
        assert!(p.resume().is_ok());
        p.cancel();
    }

    #[test]
    fn test_spd_say_cannot_pause() {
        let p = provider(EngineKind::SpdSay, None);
        assert!(matches!(p.pause(), Err(SpeechError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_successful_exit() {
        let p = running(which::which("true").unwrap());
        assert!(p.speak(Utterance::new("Hello.", 1.0)).await.is_ok());
        assert!(!p.is_speaking());
    }

    #[tokio::test]
    async fn test_failed_exit_is_synthesis_failure() {
        let p = running(which::which("false").unwrap());
        let err = p.speak(Utterance::new("Hello.", 1.0)).await.unwrap_err();
        assert!(matches!(err, SpeechError::Engine { ref kind, .. } if kind == "synthesis-failed"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_missing_binary_is_dispatch_failure() {
        let p = running(PathBuf::from("/nonexistent/engine"));
        let err = p.speak(Utterance::new("Hello.", 1.0)).await.unwrap_err();
        assert!(matches!(err, SpeechError::Dispatch(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_kills_running_engine() {
        let dir = tempfile::tempdir().unwrap();
        let p = Arc::new(running(sleeping_engine(&dir)));

        let speaking = tokio::spawn({
            let p = p.clone();
            async move { p.speak(Utterance::new("A long sentence.", 1.0)).await }
        });
        wait_speaking(&p).await;
        p.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), speaking)
            .await
            .expect("cancel did not end the utterance")
            .unwrap();
        let err = result.unwrap_err();
        assert!(matches!(err, SpeechError::Engine { ref kind, .. } if kind == "interrupted"));
        assert!(!p.is_speaking());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_reaches_suspended_engine() {
        let dir = tempfile::tempdir().unwrap();
        let p = Arc::new(running(sleeping_engine(&dir)));

        let speaking = tokio::spawn({
            let p = p.clone();
            async move { p.speak(Utterance::new("A long sentence.", 1.0)).await }
        });
        wait_speaking(&p).await;
        p.pause().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!speaking.is_finished());
        p.resume().unwrap();
        p.pause().unwrap();
        p.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), speaking)
            .await
            .expect("cancel did not end the suspended utterance")
            .unwrap();
        assert!(matches!(result, Err(SpeechError::Engine { ref kind, .. }) if kind == "interrupted"));
    }
}
