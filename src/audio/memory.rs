//! Scripted in-memory recorder and playback backend
//!
//! Both types are cheap `Clone`s over shared state: hand one clone to the
//! chat screen and keep another to script failures, move the playback
//! position, signal completion and inspect what was called.

use super::{AudioBackend, AudioHandle, AudioRecorder};
use crate::{ChatError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct RecorderScript {
    recording: Option<PathBuf>,
    fail_next_start: Option<String>,
    fail_every_start: Option<String>,
    fail_next_stop: Option<String>,
    stop_path_override: Option<PathBuf>,
    start_calls: Vec<PathBuf>,
    stop_calls: usize,
}

/// Recorder that records nothing and returns scripted results
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecorder {
    script: Arc<Mutex<RecorderScript>>,
}

impl ScriptedRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` fail with a recorder error
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        self.script.lock().fail_next_start = Some(reason.into());
    }

    /// Make every `start` fail, for running without a microphone
    pub fn fail_every_start(&self, reason: impl Into<String>) {
        self.script.lock().fail_every_start = Some(reason.into());
    }

    /// Make the next `stop` fail with a recorder error
    pub fn fail_next_stop(&self, reason: impl Into<String>) {
        self.script.lock().fail_next_stop = Some(reason.into());
    }

    /// Return this path from `stop` instead of the one passed to `start`
    pub fn return_path(&self, path: impl Into<PathBuf>) {
        self.script.lock().stop_path_override = Some(path.into());
    }

    pub fn start_calls(&self) -> Vec<PathBuf> {
        self.script.lock().start_calls.clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.script.lock().stop_calls
    }
}

impl AudioRecorder for ScriptedRecorder {
    fn start(&mut self, path: &Path) -> Result<()> {
        let mut script = self.script.lock();
        script.start_calls.push(path.to_path_buf());

        if let Some(reason) = script.fail_next_start.take() {
            return Err(ChatError::RecorderError(reason));
        }
        if let Some(reason) = &script.fail_every_start {
            return Err(ChatError::AudioDeviceError(reason.clone()));
        }
        if script.recording.is_some() {
            return Err(ChatError::RecorderError("Already recording".into()));
        }

        script.recording = Some(path.to_path_buf());
        debug!("[AUDIO] Scripted recording started: {}", path.display());
        Ok(())
    }

    fn stop(&mut self) -> Result<PathBuf> {
        let mut script = self.script.lock();
        script.stop_calls += 1;

        let recorded = script.recording.take();
        if let Some(reason) = script.fail_next_stop.take() {
            return Err(ChatError::RecorderError(reason));
        }

        let recorded =
            recorded.ok_or_else(|| ChatError::RecorderError("Not recording".into()))?;
        Ok(script.stop_path_override.take().unwrap_or(recorded))
    }

    fn is_recording(&self) -> bool {
        self.script.lock().recording.is_some()
    }
}

#[derive(Debug, Default, Clone)]
struct Track {
    position: f64,
    finished: bool,
    playing: bool,
    play_calls: usize,
    pause_calls: usize,
}

#[derive(Debug, Default)]
struct BackendScript {
    durations: HashMap<PathBuf, f64>,
    default_duration: Option<f64>,
    failing: HashSet<PathBuf>,
    failing_every_load: Option<String>,
    failing_play: HashSet<PathBuf>,
    tracks: HashMap<PathBuf, Track>,
    loads: usize,
    releases: usize,
}

/// Playback backend with scripted durations, positions and completion
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<BackendScript>>,
}

impl ScriptedBackend {
    /// A backend where only registered paths load
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend where every path loads with the given duration
    pub fn with_default_duration(seconds: f64) -> Self {
        let backend = Self::default();
        backend.script.lock().default_duration = Some(seconds);
        backend
    }

    /// Register a loadable path
    pub fn add_audio(&self, path: impl Into<PathBuf>, seconds: f64) {
        self.script.lock().durations.insert(path.into(), seconds);
    }

    /// Make loading `path` fail
    pub fn fail_load(&self, path: impl Into<PathBuf>) {
        self.script.lock().failing.insert(path.into());
    }

    /// Make every load fail with a device error, for running without speakers
    pub fn fail_every_load(&self, reason: impl Into<String>) {
        self.script.lock().failing_every_load = Some(reason.into());
    }

    /// Make `play` on `path` fail
    pub fn fail_play(&self, path: impl Into<PathBuf>) {
        self.script.lock().failing_play.insert(path.into());
    }

    /// Move the reported position of `path`
    pub fn set_position(&self, path: impl AsRef<Path>, seconds: f64) {
        let mut script = self.script.lock();
        script
            .tracks
            .entry(path.as_ref().to_path_buf())
            .or_default()
            .position = seconds;
    }

    /// Signal that `path` played to the end
    pub fn finish(&self, path: impl AsRef<Path>) {
        let mut script = self.script.lock();
        let duration = script.durations.get(path.as_ref()).copied();
        let track = script
            .tracks
            .entry(path.as_ref().to_path_buf())
            .or_default();
        if track.playing {
            track.finished = true;
            track.playing = false;
            if let Some(duration) = duration {
                track.position = duration;
            }
        }
    }

    pub fn loads(&self) -> usize {
        self.script.lock().loads
    }

    pub fn releases(&self) -> usize {
        self.script.lock().releases
    }

    /// Handles loaded and not yet released
    pub fn live_handles(&self) -> usize {
        let script = self.script.lock();
        script.loads - script.releases
    }

    pub fn play_calls(&self, path: impl AsRef<Path>) -> usize {
        self.track(path).map_or(0, |t| t.play_calls)
    }

    pub fn pause_calls(&self, path: impl AsRef<Path>) -> usize {
        self.track(path).map_or(0, |t| t.pause_calls)
    }

    pub fn is_playing(&self, path: impl AsRef<Path>) -> bool {
        self.track(path).is_some_and(|t| t.playing)
    }

    fn track(&self, path: impl AsRef<Path>) -> Option<Track> {
        self.script.lock().tracks.get(path.as_ref()).cloned()
    }
}

impl AudioBackend for ScriptedBackend {
    fn load(&self, path: &Path) -> Result<Box<dyn AudioHandle>> {
        let mut script = self.script.lock();
        if let Some(reason) = &script.failing_every_load {
            return Err(ChatError::AudioDeviceError(reason.clone()));
        }
        if script.failing.contains(path) {
            return Err(ChatError::LoadError {
                path: path.display().to_string(),
                reason: "scripted load failure".into(),
            });
        }

        let duration = script
            .durations
            .get(path)
            .copied()
            .or(script.default_duration)
            .ok_or_else(|| ChatError::LoadError {
                path: path.display().to_string(),
                reason: "no such file".into(),
            })?;

        script.loads += 1;
        script.tracks.entry(path.to_path_buf()).or_default();

        Ok(Box::new(ScriptedHandle {
            path: path.to_path_buf(),
            duration,
            script: Arc::clone(&self.script),
            released: false,
        }))
    }
}

struct ScriptedHandle {
    path: PathBuf,
    duration: f64,
    script: Arc<Mutex<BackendScript>>,
    released: bool,
}

impl AudioHandle for ScriptedHandle {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) -> Result<()> {
        let mut script = self.script.lock();
        if script.failing_play.contains(&self.path) {
            return Err(ChatError::PlaybackError("scripted play failure".into()));
        }
        let track = script.tracks.entry(self.path.clone()).or_default();
        track.play_calls += 1;
        if track.finished {
            track.finished = false;
            track.position = 0.0;
        }
        track.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut script = self.script.lock();
        let track = script.tracks.entry(self.path.clone()).or_default();
        track.pause_calls += 1;
        track.playing = false;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.script
            .lock()
            .tracks
            .get(&self.path)
            .map_or(0.0, |t| t.position)
    }

    fn is_finished(&self) -> bool {
        self.script
            .lock()
            .tracks
            .get(&self.path)
            .is_some_and(|t| t.finished)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut script = self.script.lock();
        script.releases += 1;
        if let Some(track) = script.tracks.get_mut(&self.path) {
            track.playing = false;
        }
    }
}
