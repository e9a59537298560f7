use crate::{ChatError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::{debug, info};

fn io_error(context: &str, e: hound::Error) -> ChatError {
    ChatError::IOError(format!("{}: {}", context, e))
}

/// Write mono or interleaved f32 samples (-1.0..=1.0) as a 16-bit WAV file
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| io_error("Failed to create WAV writer", e))?;

    for &sample in samples {
        writer
            .write_sample(to_i16(sample))
            .map_err(|e| io_error("Failed to write sample", e))?;
    }

    writer
        .finalize()
        .map_err(|e| io_error("Failed to finalize WAV file", e))?;

    info!("Wrote {} samples to WAV file: {:?}", samples.len(), path.as_ref());
    Ok(())
}

/// Convert a float sample to 16-bit PCM
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Read a WAV file as f32 samples
///
/// Returns `(samples, sample_rate, channels)`; samples stay interleaved.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32, u16)> {
    let mut reader = WavReader::open(path.as_ref())
        .map_err(|e| io_error("Failed to open WAV file", e))?;

    let spec = reader.spec();
    debug!(
        "Reading WAV file: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let samples: Result<Vec<f32>> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map_err(|e| io_error("Failed to read sample", e)))
            .collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| {
                s.map(|v| v as f32 / i16::MAX as f32)
                    .map_err(|e| io_error("Failed to read sample", e))
            })
            .collect(),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| {
                s.map(|v| v as f32 / 8_388_608.0)
                    .map_err(|e| io_error("Failed to read sample", e))
            })
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| {
                s.map(|v| v as f32 / i32::MAX as f32)
                    .map_err(|e| io_error("Failed to read sample", e))
            })
            .collect(),
        (_, bits) => {
            return Err(ChatError::IOError(format!(
                "Unsupported bit depth: {}",
                bits
            )))
        }
    };

    Ok((samples?, spec.sample_rate, spec.channels))
}

/// Duration of a WAV file in seconds, from its header
pub fn wav_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
    let reader = WavReader::open(path.as_ref())
        .map_err(|e| io_error("Failed to open WAV file", e))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Ok(0.0);
    }
    // duration() counts frames, i.e. samples per channel
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Bar heights (0.0..=1.0) for a static waveform of the file at `path`
pub fn extract_peaks<P: AsRef<Path>>(path: P, bars: usize) -> Result<Vec<f32>> {
    let (samples, _, channels) = read_wav(path)?;
    let mono: Vec<f32> = if channels > 1 {
        samples
            .chunks(channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    } else {
        samples
    };
    Ok(peaks_from_samples(&mono, bars))
}

/// RMS per bucket, normalized so the loudest bar is 1.0
///
/// Returns fewer than `bars` entries when there are fewer samples than bars.
pub fn peaks_from_samples(samples: &[f32], bars: usize) -> Vec<f32> {
    if samples.is_empty() || bars == 0 {
        return Vec::new();
    }

    let samples_per_bar = (samples.len() / bars).max(1);
    let rms: Vec<f32> = samples
        .chunks(samples_per_bar)
        .take(bars)
        .map(|chunk| {
            let energy = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
            energy.sqrt()
        })
        .collect();

    let loudest = rms.iter().copied().fold(0.0f32, f32::max);
    if loudest <= f32::EPSILON {
        return vec![0.0; rms.len()];
    }
    rms.into_iter().map(|v| v / loudest).collect()
}
