//! WAV file input and output.
//!
//! Rendered buffers are written as mono 16-bit PCM. Background tracks may be
//! any channel count and sample format that `hound` reads; they are downmixed
//! to mono on load.

use anyhow::{Context, Result};
use isotone_engine::downmix;
use std::path::Path;

/// A mono buffer read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WavAudio {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
    /// Channel count of the source file.
    pub channels: u16,
}

/// Reads a WAV file and downmixes it to mono in `[-1, 1]`.
pub fn read_wav_mono(path: &Path) -> Result<WavAudio> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>(),
    }
    .with_context(|| format!("Failed to decode WAV samples: {}", path.display()))?;

    Ok(WavAudio {
        samples: downmix(&interleaved, spec.channels as usize),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Converts a sample to 16-bit PCM, clamping to full scale.
pub fn to_pcm16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16
}

/// Writes mono samples as 16-bit PCM and returns the BLAKE3 hash of the
/// PCM data.
pub fn write_wav_mono(path: &Path, samples: &[f64], sample_rate: u32) -> Result<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    let mut hasher = blake3::Hasher::new();
    for &sample in samples {
        let pcm = to_pcm16(sample);
        hasher.update(&pcm.to_le_bytes());
        writer
            .write_sample(pcm)
            .context("Failed to write WAV sample")?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    let hash = hasher.finalize().to_hex().to_string();
    tracing::info!(path = %path.display(), samples = samples.len(), "wav export completed");
    Ok(hash)
}

/// BLAKE3 hash of the 16-bit PCM encoding of `samples`.
pub fn pcm_hash(samples: &[f64]) -> String {
    let mut hasher = blake3::Hasher::new();
    for &sample in samples {
        hasher.update(&to_pcm16(sample).to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
