use crate::audio::AudioRecorder;
use crate::utils::Ticker;
use crate::{ChatError, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Where a recording session is in its lifecycle
///
/// `Idle → Recording → Pending → Idle` (sent or discarded). A new take can
/// only start from `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordingPhase {
    #[default]
    Idle,
    /// The recorder is writing to `path`
    Recording { path: PathBuf },
    /// A finished take waiting to be sent or discarded
    Pending { path: PathBuf },
}

impl std::fmt::Display for RecordingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingPhase::Idle => write!(f, "Idle"),
            RecordingPhase::Recording { .. } => write!(f, "Recording"),
            RecordingPhase::Pending { .. } => write!(f, "Pending"),
        }
    }
}

/// One screen's recording state plus its elapsed-time ticker
#[derive(Debug, Clone)]
pub struct RecordingSession {
    phase: RecordingPhase,
    ticker: Ticker,
    elapsed: Duration,
    dir: PathBuf,
}

impl RecordingSession {
    pub fn new(dir: impl Into<PathBuf>, tick: Duration) -> Self {
        Self {
            phase: RecordingPhase::Idle,
            ticker: Ticker::new(tick),
            elapsed: Duration::ZERO,
            dir: dir.into(),
        }
    }

    pub fn phase(&self) -> &RecordingPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, RecordingPhase::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.phase, RecordingPhase::Recording { .. })
    }

    pub fn pending_path(&self) -> Option<&Path> {
        match &self.phase {
            RecordingPhase::Pending { path } => Some(path),
            _ => None,
        }
    }

    /// Whole seconds counted by the ticker in the current take
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }

    /// Whether the elapsed-time ticker is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.ticker.next_due()
    }

    /// A fresh file path for the next take
    pub fn next_take_path(&self) -> PathBuf {
        let id = Uuid::new_v4().simple().to_string();
        self.dir.join(format!(
            "recording-{}-{}.wav",
            Local::now().format("%Y%m%d-%H%M%S"),
            &id[..8]
        ))
    }

    /// Start a new take
    ///
    /// # Errors
    /// `InvalidState` unless idle; the recorder's error if it fails to start.
    /// On failure the session stays idle.
    pub fn start(&mut self, recorder: &mut dyn AudioRecorder, now: Instant) -> Result<PathBuf> {
        if !self.is_idle() {
            debug!("[CHAT] Start requested while {}, ignoring", self.phase);
            return Err(ChatError::InvalidState(format!(
                "cannot start recording while {}",
                self.phase
            )));
        }

        let path = self.next_take_path();
        if let Err(e) = recorder.start(&path) {
            error!("[AUDIO] Failed to start recording: {}", e);
            return Err(e);
        }

        self.phase = RecordingPhase::Recording { path: path.clone() };
        self.elapsed = Duration::ZERO;
        self.ticker.start(now);
        info!("[AUDIO] Recording to {}", path.display());
        Ok(path)
    }

    /// Finish the current take; on success it becomes the pending file
    ///
    /// The ticker stops either way. A failed stop returns to idle with no
    /// pending file.
    pub fn stop(&mut self, recorder: &mut dyn AudioRecorder) -> Result<PathBuf> {
        if !self.is_recording() {
            debug!("[CHAT] Stop requested while {}, ignoring", self.phase);
            return Err(ChatError::InvalidState(format!(
                "cannot stop recording while {}",
                self.phase
            )));
        }

        self.ticker.cancel();

        match recorder.stop() {
            Ok(path) => {
                info!(
                    "[AUDIO] Recording stopped after {}s: {}",
                    self.elapsed_secs(),
                    path.display()
                );
                self.phase = RecordingPhase::Pending { path: path.clone() };
                Ok(path)
            }
            Err(e) => {
                error!("[AUDIO] Failed to stop recording: {}", e);
                self.phase = RecordingPhase::Idle;
                self.elapsed = Duration::ZERO;
                Err(e)
            }
        }
    }

    /// Drop the pending take and return its path
    pub fn discard(&mut self) -> Result<PathBuf> {
        match std::mem::take(&mut self.phase) {
            RecordingPhase::Pending { path } => {
                self.elapsed = Duration::ZERO;
                info!("[AUDIO] Discarded take {}", path.display());
                Ok(path)
            }
            other => {
                let err = ChatError::InvalidState(format!("nothing to discard while {}", other));
                self.phase = other;
                Err(err)
            }
        }
    }

    /// Hand the pending take over for sending, returning to idle
    pub fn take_pending(&mut self) -> Option<PathBuf> {
        match std::mem::take(&mut self.phase) {
            RecordingPhase::Pending { path } => {
                self.elapsed = Duration::ZERO;
                Some(path)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Advance the elapsed-time counter; returns the ticks delivered
    pub fn tick(&mut self, now: Instant) -> u32 {
        let fired = self.ticker.poll(now);
        if fired > 0 {
            if self.is_recording() {
                self.elapsed += self.ticker.period() * fired;
            } else {
                warn!("[AUDIO] Ticker fired outside a recording, cancelling");
                self.ticker.cancel();
                return 0;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ScriptedRecorder;

    fn session() -> RecordingSession {
        RecordingSession::new("/tmp/voice-chat-tests", Duration::from_secs(1))
    }

    #[test]
    fn test_full_cycle() {
        let mut recorder = ScriptedRecorder::new();
        let mut session = session();
        let now = Instant::now();

        let path = session.start(&mut recorder, now).unwrap();
        assert!(session.is_recording());
        assert_eq!(
            session.phase(),
            &RecordingPhase::Recording { path: path.clone() }
        );
        assert!(session.is_ticking());

        session.tick(now + Duration::from_secs(3));
        assert_eq!(session.elapsed_secs(), 3);

        let stopped = session.stop(&mut recorder).unwrap();
        assert_eq!(stopped, path);
        assert_eq!(session.pending_path(), Some(path.as_path()));
        assert!(!session.is_ticking());

        assert_eq!(session.take_pending(), Some(path));
        assert!(session.is_idle());
    }

    #[test]
    fn test_start_rejected_unless_idle() {
        let mut recorder = ScriptedRecorder::new();
        let mut session = session();
        let now = Instant::now();

        session.start(&mut recorder, now).unwrap();
        assert!(matches!(
            session.start(&mut recorder, now),
            Err(ChatError::InvalidState(_))
        ));

        session.stop(&mut recorder).unwrap();
        assert!(matches!(
            session.start(&mut recorder, now),
            Err(ChatError::InvalidState(_))
        ));
        assert_eq!(recorder.start_calls().len(), 1);
    }

    #[test]
    fn test_failed_start_stays_idle() {
        let mut recorder = ScriptedRecorder::new();
        recorder.fail_next_start("no microphone");
        let mut session = session();

        let result = session.start(&mut recorder, Instant::now());
        assert!(matches!(result, Err(ChatError::RecorderError(_))));
        assert!(session.is_idle());
        assert!(!session.is_ticking());
    }

    #[test]
    fn test_failed_stop_returns_to_idle() {
        let mut recorder = ScriptedRecorder::new();
        let mut session = session();
        session.start(&mut recorder, Instant::now()).unwrap();

        recorder.fail_next_stop("finalize failed");
        assert!(session.stop(&mut recorder).is_err());
        assert!(session.is_idle());
        assert!(session.pending_path().is_none());
        assert!(!session.is_ticking());
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let mut recorder = ScriptedRecorder::new();
        let mut session = session();
        let now = Instant::now();
        session.start(&mut recorder, now).unwrap();
        session.tick(now + Duration::from_secs(2));
        session.stop(&mut recorder).unwrap();

        assert_eq!(session.tick(now + Duration::from_secs(10)), 0);
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn test_discard_only_when_pending() {
        let mut recorder = ScriptedRecorder::new();
        let mut session = session();
        assert!(session.discard().is_err());

        session.start(&mut recorder, Instant::now()).unwrap();
        assert!(session.discard().is_err());
        assert!(session.is_recording());

        session.stop(&mut recorder).unwrap();
        assert!(session.discard().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn test_take_paths_are_unique() {
        let session = session();
        let a = session.next_take_path();
        let b = session.next_take_path();
        assert_ne!(a, b);
        assert!(a.starts_with("/tmp/voice-chat-tests"));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("wav"));
    }
}
