//! WAV file reading and writing for offline renders.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Error type for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Format(#[from] hound::Error),

    /// The input file contained no samples.
    #[error("empty audio file")]
    Empty,
}

/// Read a WAV file as mono f32 samples, returning the sample rate.
///
/// Multi-channel files are mixed down to mono by averaging channels;
/// integer formats are normalized to `[-1, 1]`.
pub fn read_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32), WavError> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if samples.is_empty() {
        return Err(WavError::Empty);
    }

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    tracing::debug!(
        frames = mono.len(),
        sample_rate = spec.sample_rate,
        channels,
        "loaded WAV"
    );
    Ok((mono, spec.sample_rate))
}

/// Write mono f32 samples as a 32-bit float WAV file.
pub fn write_mono<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), WavError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    tracing::debug!(frames = samples.len(), sample_rate, "wrote WAV");
    Ok(())
}
