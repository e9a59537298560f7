//! Voice message playback through rodio
//!
//! One output stream is shared by the whole screen; every loaded message
//! gets its own paused `Sink`. Position is tracked from wall-clock time
//! around play/pause, clamped to the file's duration.

use super::wav::wav_duration;
use super::{AudioBackend, AudioHandle};
use crate::{ChatError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Playback backend bound to the default output device
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            ChatError::AudioDeviceError(format!("Failed to open output device: {}", e))
        })?;
        info!("[PLAYBACK] Output stream opened");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ChatError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| ChatError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

impl AudioBackend for RodioBackend {
    fn load(&self, path: &Path) -> Result<Box<dyn AudioHandle>> {
        let source = open_source(path)?;

        // WAV headers give an exact length; other containers fall back to the decoder
        let duration = match wav_duration(path) {
            Ok(secs) => secs,
            Err(_) => source
                .total_duration()
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
        };

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| ChatError::PlaybackError(format!("Failed to create sink: {}", e)))?;
        sink.pause();
        sink.append(source);

        debug!("[PLAYBACK] Loaded {} ({:.1}s)", path.display(), duration);

        Ok(Box::new(RodioHandle {
            path: path.to_path_buf(),
            sink: Some(sink),
            duration,
            started_at: None,
            paused_position: Duration::ZERO,
        }))
    }
}

/// A loaded voice message
pub struct RodioHandle {
    path: PathBuf,
    sink: Option<Sink>,
    duration: f64,
    started_at: Option<Instant>,
    paused_position: Duration,
}

impl RodioHandle {
    fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => Instant::now().duration_since(start),
            None => self.paused_position,
        }
    }
}

impl AudioHandle for RodioHandle {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) -> Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| ChatError::PlaybackError("Audio already released".into()))?;

        if sink.empty() {
            // Ran to the end earlier; queue the file again from the start
            sink.append(open_source(&self.path)?);
            self.paused_position = Duration::ZERO;
        }

        sink.play();
        self.started_at = Some(Instant::now() - self.paused_position);
        debug!("[PLAYBACK] Playing {}", self.path.display());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| ChatError::PlaybackError("Audio already released".into()))?;

        sink.pause();
        self.paused_position = self.elapsed();
        self.started_at = None;
        debug!(
            "[PLAYBACK] Paused {} at {:.1}s",
            self.path.display(),
            self.paused_position.as_secs_f64()
        );
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.elapsed().as_secs_f64().min(self.duration)
    }

    fn is_finished(&self) -> bool {
        self.started_at.is_some() && self.sink.as_ref().map_or(true, |s| s.empty())
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("[PLAYBACK] Released {}", self.path.display());
        } else {
            warn!("[PLAYBACK] {} released twice", self.path.display());
        }
        self.started_at = None;
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
