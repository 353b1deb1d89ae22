//! Background mixing and buffer post-processing.

use crate::modulation::linspace;

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f64, |a, b| a.max(b))
}

/// Scales the buffer down so its peak equals `ceiling` when it exceeds it.
/// Never scales up. Returns the gain applied.
pub fn limit_peak(samples: &mut [f64], ceiling: f64) -> f64 {
    let current_peak = peak(samples);
    if current_peak > ceiling {
        let gain = ceiling / current_peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
        gain
    } else {
        1.0
    }
}

/// Fade length for a buffer: `min(round(fade_seconds * sample_rate), len / 10)`.
pub fn fade_length(num_samples: usize, sample_rate: f64, fade_seconds: f64) -> usize {
    let requested = (fade_seconds * sample_rate).round().max(0.0) as usize;
    requested.min(num_samples / 10)
}

/// Applies a linear fade-in over the first `fade_len` samples and a linear
/// fade-out over the last `fade_len` samples.
pub fn apply_fades(samples: &mut [f64], fade_len: usize) {
    let fade_len = fade_len.min(samples.len());
    if fade_len == 0 {
        return;
    }
    for (sample, gain) in samples.iter_mut().zip(linspace(0.0, 1.0, fade_len)) {
        *sample *= gain;
    }
    let tail_start = samples.len() - fade_len;
    for (sample, gain) in samples[tail_start..]
        .iter_mut()
        .zip(linspace(1.0, 0.0, fade_len))
    {
        *sample *= gain;
    }
}

/// Averages interleaved frames down to one channel.
pub fn downmix(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Tiles or truncates `background` to exactly `len` samples. An empty
/// background becomes silence.
pub fn fit_to_length(background: &[f64], len: usize) -> Vec<f64> {
    if background.is_empty() {
        return vec![0.0; len];
    }
    background.iter().cycle().take(len).copied().collect()
}

/// Mixes a background track under the tone.
///
/// The background is looped or trimmed to the tone's length and added at
/// `background_volume`. A mix whose peak exceeds 1.0 is scaled down to 1.0.
pub fn mix_with_background(tone: &[f64], background: &[f64], background_volume: f64) -> Vec<f64> {
    let background = fit_to_length(background, tone.len());
    let mut mixed: Vec<f64> = tone
        .iter()
        .zip(&background)
        .map(|(t, b)| t + b * background_volume)
        .collect();

    let gain = limit_peak(&mut mixed, 1.0);
    if gain < 1.0 {
        tracing::debug!(gain, "background mix scaled to avoid clipping");
    }
    mixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_limit_peak_only_scales_down() {
        let mut loud = vec![0.5, -1.8, 0.9];
        let gain = limit_peak(&mut loud, 0.9);
        assert!((gain - 0.5).abs() < 1e-12);
        assert!((peak(&loud) - 0.9).abs() < 1e-12);

        let mut quiet = vec![0.1, -0.2];
        assert_eq!(limit_peak(&mut quiet, 0.9), 1.0);
        assert_eq!(quiet, vec![0.1, -0.2]);
    }

    #[test]
    fn test_fades() {
        let mut samples = vec![1.0; 100];
        apply_fades(&mut samples, fade_length(100, 1000.0, 0.01));
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[9], 1.0);
        assert_eq!(samples[50], 1.0);
        assert_eq!(samples[90], 1.0);
        assert_eq!(samples[99], 0.0);
    }

    #[test]
    fn test_fade_length_limited_by_buffer() {
        assert_eq!(fade_length(44100, 44100.0, 0.01), 441);
        assert_eq!(fade_length(1000, 44100.0, 0.01), 100);
        assert_eq!(fade_length(5, 44100.0, 0.01), 0);
    }

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
        assert_eq!(downmix(&[0.3, 0.4], 1), vec![0.3, 0.4]);
    }

    #[test]
    fn test_fit_to_length() {
        assert_eq!(fit_to_length(&[1.0, 2.0], 5), vec![1.0, 2.0, 1.0, 2.0, 1.0]);
        assert_eq!(fit_to_length(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
        assert_eq!(fit_to_length(&[], 3), vec![0.0; 3]);
    }

    #[test]
    fn test_mix_normalizes_loud_result() {
        let tone = vec![0.8; 10];
        let mixed = mix_with_background(&tone, &[1.0, -1.0], 0.5);
        assert_eq!(mixed.len(), 10);
        assert!((peak(&mixed) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mix_keeps_quiet_result() {
        let mixed = mix_with_background(&[0.2, 0.2], &[0.5, 0.5, 0.5], 0.5);
        assert_eq!(mixed, vec![0.45, 0.45]);
    }
}
