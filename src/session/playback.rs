//! Per-message playback controller
//!
//! An [`AudioMessage`] owns at most one loaded handle. It samples the
//! playback position on a fixed period while playing, notices natural
//! completion, and releases the handle exactly once when it goes away or
//! is pointed at a different file.

use crate::audio::{extract_peaks, AudioBackend, AudioHandle};
use crate::utils::{format_mmss, remaining_secs, Ticker};
use crate::{ChatError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Where the player is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Inline preview of a pending take in the composer
    Preview,
    /// A voice message in the conversation
    Sent,
}

/// Outcome of loading the file at mount
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loaded,
    Failed(ChatError),
}

pub struct AudioMessage {
    path: PathBuf,
    variant: Variant,
    handle: Option<Box<dyn AudioHandle>>,
    load_state: LoadState,
    is_playing: bool,
    position_secs: f64,
    duration_secs: Option<f64>,
    poll: Ticker,
    playback_error: Option<ChatError>,
    waveform: Vec<f32>,
    bars: usize,
}

impl std::fmt::Debug for AudioMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioMessage")
            .field("path", &self.path)
            .field("variant", &self.variant)
            .field("loaded", &self.handle.is_some())
            .field("is_playing", &self.is_playing)
            .field("position_secs", &self.position_secs)
            .field("duration_secs", &self.duration_secs)
            .finish()
    }
}

impl AudioMessage {
    /// Load `path` through `backend` and build a stopped player
    ///
    /// A failed load is not an error here; the player renders the failure
    /// and refuses to play.
    pub fn mount(
        path: impl Into<PathBuf>,
        variant: Variant,
        backend: &dyn AudioBackend,
        poll_period: Duration,
        bars: usize,
    ) -> Self {
        let mut message = Self {
            path: path.into(),
            variant,
            handle: None,
            load_state: LoadState::Loaded,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: None,
            poll: Ticker::new(poll_period),
            playback_error: None,
            waveform: Vec::new(),
            bars,
        };
        message.load(backend);
        message
    }

    fn load(&mut self, backend: &dyn AudioBackend) {
        match backend.load(&self.path) {
            Ok(handle) => {
                let duration = handle.duration();
                debug!(
                    "[PLAYBACK] Mounted {:?} player for {} ({:.1}s)",
                    self.variant,
                    self.path.display(),
                    duration
                );
                self.duration_secs = Some(duration);
                self.handle = Some(handle);
                self.load_state = LoadState::Loaded;
            }
            Err(e) => {
                error!("[PLAYBACK] Failed to load {}: {}", self.path.display(), e);
                self.duration_secs = None;
                self.handle = None;
                self.load_state = LoadState::Failed(e);
            }
        }

        self.waveform = match extract_peaks(&self.path, self.bars) {
            Ok(peaks) => peaks,
            Err(e) => {
                debug!("[PLAYBACK] No waveform for {}: {}", self.path.display(), e);
                Vec::new()
            }
        };
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Last sampled position
    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// Total length, once loaded
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// The most recent play/pause failure, cleared by a successful toggle
    pub fn playback_error(&self) -> Option<&ChatError> {
        self.playback_error.as_ref()
    }

    /// Normalized peaks for the static waveform; empty if unreadable
    pub fn waveform(&self) -> &[f32] {
        &self.waveform
    }

    /// Whether position sampling is running
    pub fn is_polling(&self) -> bool {
        self.poll.is_active()
    }

    pub fn next_poll(&self) -> Option<Instant> {
        self.poll.next_due()
    }

    /// Seconds left, never negative
    pub fn remaining_secs(&self) -> f64 {
        remaining_secs(self.duration_secs.unwrap_or(0.0), self.position_secs)
    }

    /// Remaining time as `mm:ss`
    pub fn countdown(&self) -> String {
        format_mmss(self.remaining_secs())
    }

    /// Fraction of the message already played, for the waveform highlight
    pub fn progress(&self) -> f32 {
        match self.duration_secs {
            Some(duration) if duration > 0.0 => {
                (self.position_secs / duration).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }

    /// Pause if playing, play otherwise
    ///
    /// # Errors
    /// `PlaybackUnavailable` when nothing is loaded, or the handle's error.
    /// Either way the error is also kept for rendering.
    pub fn toggle_play(&mut self, now: Instant) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            warn!("[PLAYBACK] Toggle on {} with nothing loaded", self.path.display());
            self.playback_error = Some(ChatError::PlaybackUnavailable);
            return Err(ChatError::PlaybackUnavailable);
        };

        if self.is_playing {
            if let Err(e) = handle.pause() {
                error!("[PLAYBACK] Pause failed: {}", e);
                self.playback_error = Some(e.clone());
                return Err(e);
            }
            self.is_playing = false;
            self.poll.cancel();
            self.position_secs = handle.current_time();
            info!(
                "[PLAYBACK] Paused {} at {:.1}s",
                self.path.display(),
                self.position_secs
            );
        } else {
            if let Err(e) = handle.play() {
                error!("[PLAYBACK] Play failed: {}", e);
                self.playback_error = Some(e.clone());
                return Err(e);
            }
            self.is_playing = true;
            self.poll.start(now);
            info!("[PLAYBACK] Playing {}", self.path.display());
        }

        self.playback_error = None;
        Ok(())
    }

    /// Check for completion and sample the position when due
    pub fn update(&mut self, now: Instant) {
        if !self.is_playing {
            return;
        }
        let Some(handle) = self.handle.as_ref() else {
            return;
        };

        if handle.is_finished() {
            info!("[PLAYBACK] Finished {}", self.path.display());
            self.is_playing = false;
            self.poll.cancel();
            self.position_secs = 0.0;
            return;
        }

        if self.poll.poll(now) > 0 {
            self.position_secs = handle.current_time();
        }
    }

    /// Point this player at a different file
    ///
    /// The old handle is released before the new file is loaded. Same path
    /// is a no-op.
    pub fn set_path(&mut self, path: impl Into<PathBuf>, backend: &dyn AudioBackend) {
        let path = path.into();
        if path == self.path {
            return;
        }
        self.teardown();
        debug!(
            "[PLAYBACK] Switching {} -> {}",
            self.path.display(),
            path.display()
        );
        self.path = path;
        self.position_secs = 0.0;
        self.playback_error = None;
        self.load(backend);
    }

    /// Stop sampling and release the handle; safe to call repeatedly
    pub fn teardown(&mut self) {
        self.poll.cancel();
        self.is_playing = false;
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            debug!("[PLAYBACK] Released {}", self.path.display());
        }
    }
}

impl Drop for AudioMessage {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ScriptedBackend;

    const CLIP: &str = "/tmp/voice-chat/clip.wav";

    fn mount(backend: &ScriptedBackend) -> AudioMessage {
        AudioMessage::mount(CLIP, Variant::Sent, backend, Duration::from_secs(1), 16)
    }

    #[test]
    fn test_mount_reports_duration() {
        let backend = ScriptedBackend::new();
        backend.add_audio(CLIP, 42.0);
        let message = mount(&backend);

        assert_eq!(message.load_state(), &LoadState::Loaded);
        assert_eq!(message.duration_secs(), Some(42.0));
        assert_eq!(message.countdown(), "00:42");
        assert!(!message.is_playing());
        assert!(!message.is_polling());
    }

    #[test]
    fn test_failed_load_refuses_play() {
        let backend = ScriptedBackend::new();
        backend.fail_load(CLIP);
        let mut message = mount(&backend);

        assert!(matches!(message.load_state(), LoadState::Failed(_)));
        assert_eq!(message.duration_secs(), None);
        assert_eq!(
            message.toggle_play(Instant::now()),
            Err(ChatError::PlaybackUnavailable)
        );
        assert!(!message.is_playing());
        assert_eq!(message.playback_error(), Some(&ChatError::PlaybackUnavailable));
    }

    #[test]
    fn test_pause_samples_position() {
        let backend = ScriptedBackend::new();
        backend.add_audio(CLIP, 20.0);
        let mut message = mount(&backend);
        let now = Instant::now();

        message.toggle_play(now).unwrap();
        backend.set_position(CLIP, 4.5);
        message.toggle_play(now + Duration::from_millis(300)).unwrap();

        assert!(!message.is_playing());
        assert!(!message.is_polling());
        assert_eq!(message.position_secs(), 4.5);
        assert_eq!(backend.pause_calls(CLIP), 1);
    }

    #[test]
    fn test_play_failure_is_kept() {
        let backend = ScriptedBackend::new();
        backend.add_audio(CLIP, 5.0);
        backend.fail_play(CLIP);
        let mut message = mount(&backend);

        assert!(message.toggle_play(Instant::now()).is_err());
        assert!(!message.is_playing());
        assert!(matches!(
            message.playback_error(),
            Some(ChatError::PlaybackError(_))
        ));
    }

    #[test]
    fn test_progress_is_clamped() {
        let backend = ScriptedBackend::new();
        backend.add_audio(CLIP, 10.0);
        let mut message = mount(&backend);
        let now = Instant::now();

        message.toggle_play(now).unwrap();
        backend.set_position(CLIP, 25.0);
        message.update(now + Duration::from_secs(1));

        assert_eq!(message.progress(), 1.0);
        assert_eq!(message.countdown(), "00:00");
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let backend = ScriptedBackend::new();
        backend.add_audio(CLIP, 3.0);
        let mut message = mount(&backend);

        message.teardown();
        message.teardown();
        drop(message);
        assert_eq!(backend.releases(), 1);
    }

    #[test]
    fn test_missing_file_has_no_waveform() {
        let backend = ScriptedBackend::with_default_duration(2.0);
        let message = mount(&backend);
        assert!(message.waveform().is_empty());
    }
}
