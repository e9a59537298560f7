//! Microphone recording to WAV files
//!
//! The cpal input callback downmixes to mono and hands chunks to a writer
//! thread over a bounded channel. Stopping drops the stream (and with it
//! the channel sender), which lets the writer drain, finalize the file and
//! report the path back.

use super::wav::to_i16;
use super::AudioRecorder;
use crate::{ChatError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{bounded, Sender};
use hound::{WavSpec, WavWriter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Chunks buffered between the audio callback and the writer thread
const CHUNK_QUEUE: usize = 256;

/// Records the default input device into 16-bit mono WAV files
pub struct CpalRecorder {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    sample_rate: u32,
    channels: u16,
    stream: Option<Stream>,
    writer: Option<JoinHandle<Result<PathBuf>>>,
    is_recording: Arc<AtomicBool>,
}

impl CpalRecorder {
    /// Create a recorder on the default input device
    ///
    /// # Errors
    /// Returns an error if no input device is available or configuration fails
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            ChatError::AudioDeviceError("No input device available".into())
        })?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("[AUDIO] Using input device: {}", device_name);

        let supported = device.default_input_config().map_err(|e| {
            ChatError::AudioDeviceError(format!("Failed to get input config: {}", e))
        })?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        info!(
            "[AUDIO] Input config: {}Hz, {} channel(s), {:?}",
            sample_rate, channels, sample_format
        );

        Ok(Self {
            device,
            config,
            sample_format,
            sample_rate,
            channels,
            stream: None,
            writer: None,
            is_recording: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    fn build_stream<T>(&self, chunk_tx: Sender<Vec<f32>>) -> Result<Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = self.channels as usize;
        let is_recording = Arc::clone(&self.is_recording);

        let err_fn = |err| {
            error!("[AUDIO] Input stream error: {}", err);
        };

        self.device
            .build_input_stream(
                &self.config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    if !is_recording.load(Ordering::SeqCst) {
                        return;
                    }

                    let mono: Vec<f32> = data
                        .chunks(channels)
                        .map(|frame| {
                            frame.iter().map(|&s| f32::from_sample(s)).sum::<f32>()
                                / channels as f32
                        })
                        .collect();

                    if let Err(e) = chunk_tx.try_send(mono) {
                        warn!("[AUDIO] Dropped audio chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| ChatError::RecorderError(format!("Failed to build input stream: {}", e)))
    }
}

impl AudioRecorder for CpalRecorder {
    fn start(&mut self, path: &Path) -> Result<()> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(ChatError::RecorderError("Already recording".into()));
        }

        // Rejected before any file or thread exists
        ensure_supported(self.sample_format)?;

        let (chunk_tx, writer_thread) = spawn_wav_writer(path, self.sample_rate)?;

        // Flag first so the very first callback is not skipped
        self.is_recording.store(true, Ordering::SeqCst);

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(chunk_tx),
            SampleFormat::I16 => self.build_stream::<i16>(chunk_tx),
            SampleFormat::U16 => self.build_stream::<u16>(chunk_tx),
            SampleFormat::I32 => self.build_stream::<i32>(chunk_tx),
            other => {
                drop(chunk_tx);
                Err(unsupported(other))
            }
        }
        .and_then(|stream| {
            stream.play().map_err(|e| {
                ChatError::RecorderError(format!("Failed to start input stream: {}", e))
            })?;
            Ok(stream)
        });

        match stream {
            Ok(stream) => {
                self.stream = Some(stream);
                self.writer = Some(writer_thread);
                info!("[AUDIO] Recording started: {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.is_recording.store(false, Ordering::SeqCst);
                // Every sender is dropped by now, so the writer drains and exits
                if writer_thread.join().is_err() {
                    warn!("[AUDIO] Writer thread panicked during aborted start");
                }
                Err(e)
            }
        }
    }

    fn stop(&mut self) -> Result<PathBuf> {
        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(ChatError::RecorderError("Not recording".into()));
        }

        self.is_recording.store(false, Ordering::SeqCst);
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("[AUDIO] Input stream closed");
        }

        let writer = self
            .writer
            .take()
            .ok_or_else(|| ChatError::RecorderError("No take in progress".into()))?;

        writer
            .join()
            .map_err(|_| ChatError::RecorderError("Writer thread panicked".into()))?
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }
}

fn unsupported(format: SampleFormat) -> ChatError {
    ChatError::RecorderError(format!("Unsupported sample format '{}'", format))
}

/// Input formats the recorder can convert
fn ensure_supported(format: SampleFormat) -> Result<()> {
    match format {
        SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16 | SampleFormat::I32 => Ok(()),
        other => Err(unsupported(other)),
    }
}

/// Create the WAV file and a writer thread fed through the returned sender
///
/// The thread finalizes the file and returns its path once every sender
/// is dropped.
fn spawn_wav_writer(
    path: &Path,
    sample_rate: u32,
) -> Result<(Sender<Vec<f32>>, JoinHandle<Result<PathBuf>>)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| ChatError::RecorderError(format!("Failed to create WAV file: {}", e)))?;

    let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(CHUNK_QUEUE);
    let target = path.to_path_buf();

    let handle = std::thread::Builder::new()
        .name("wav-writer".into())
        .spawn(move || -> Result<PathBuf> {
            let mut written = 0usize;
            for chunk in chunk_rx.iter() {
                for sample in chunk {
                    writer.write_sample(to_i16(sample)).map_err(|e| {
                        ChatError::RecorderError(format!("Failed to write sample: {}", e))
                    })?;
                    written += 1;
                }
            }
            writer.finalize().map_err(|e| {
                ChatError::RecorderError(format!("Failed to finalize WAV file: {}", e))
            })?;
            info!(
                "[AUDIO] Wrote {} samples ({:.1}s) to {}",
                written,
                written as f32 / sample_rate as f32,
                target.display()
            );
            Ok(target)
        })?;

    Ok((chunk_tx, handle))
}

impl Drop for CpalRecorder {
    fn drop(&mut self) {
        if self.is_recording() {
            if let Err(e) = self.stop() {
                warn!("[AUDIO] Failed to finalize take on shutdown: {}", e);
            }
        }
    }
}
