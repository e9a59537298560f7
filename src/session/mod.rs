//! Recording and playback sessions
//!
//! Both sessions are plain state driven by explicit instants, so the UI
//! loop and the tests advance them the same way.

pub mod playback;
pub mod recording;

pub use playback::{AudioMessage, LoadState, Variant};
pub use recording::{RecordingPhase, RecordingSession};
