//! Audio capture and playback seams
//!
//! The chat screen only talks to these traits. Production implementations
//! use cpal + hound for recording and rodio for playback; the scripted
//! implementations in [`memory`] drive tests and headless runs.

pub mod memory;
#[cfg(feature = "audio-io")]
pub mod player;
#[cfg(feature = "audio-io")]
pub mod recorder;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use player::RodioBackend;
#[cfg(feature = "audio-io")]
pub use recorder::CpalRecorder;
pub use memory::{ScriptedBackend, ScriptedRecorder};
pub use wav::{extract_peaks, read_wav, wav_duration, write_wav};

use crate::Result;
use std::path::{Path, PathBuf};

/// Native recorder: writes one take at a time to a file
pub trait AudioRecorder {
    /// Begin writing a new take to `path`
    fn start(&mut self, path: &Path) -> Result<()>;

    /// Finalize the current take and return the path it was written to
    fn stop(&mut self) -> Result<PathBuf>;

    fn is_recording(&self) -> bool;
}

/// Opens audio resources for playback
pub trait AudioBackend {
    fn load(&self, path: &Path) -> Result<Box<dyn AudioHandle>>;
}

/// One loaded audio resource
///
/// A handle is owned by exactly one player and released exactly once.
pub trait AudioHandle {
    /// Total duration in seconds
    fn duration(&self) -> f64;

    /// Start or resume playback. After a natural finish this restarts from the beginning.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// True once playback has run to the end on its own (not after a pause)
    fn is_finished(&self) -> bool;

    /// Free the underlying native resource
    fn release(&mut self);
}
