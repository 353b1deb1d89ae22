//! Carrier waveform generation.

use isotone_spec::CarrierWaveform;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::filter::ZeroPhaseBandpass;
use crate::oscillator::{self, TWO_PI};

/// Number of samples covering `duration` seconds: `round(sample_rate * duration)`.
///
/// Non-positive durations give 0.
pub fn sample_count(duration: f64, sample_rate: f64) -> usize {
    if duration > 0.0 {
        (duration * sample_rate).round() as usize
    } else {
        0
    }
}

/// Value of a periodic carrier at `phase`, in `[-1, 1]`.
///
/// Returns `None` for [`CarrierWaveform::Noise`], which has no phase.
#[inline]
pub fn carrier_at_phase(kind: CarrierWaveform, phase: f64) -> Option<f64> {
    match kind {
        CarrierWaveform::Sine => Some(oscillator::sine(phase)),
        CarrierWaveform::Square => Some(oscillator::square(phase, 0.5)),
        CarrierWaveform::Triangle => Some(oscillator::triangle(phase)),
        CarrierWaveform::Sawtooth => Some(oscillator::sawtooth(phase, 1.0)),
        CarrierWaveform::Noise => None,
    }
}

/// Renders `num_samples` of a constant-frequency carrier scaled to `amplitude`.
///
/// Periodic kinds are evaluated at `2π f t` with `t = i / sample_rate`. Noise
/// is Gaussian white noise band-passed around `frequency` and peak-normalized
/// to `amplitude`.
pub fn carrier_samples<R: Rng + ?Sized>(
    kind: CarrierWaveform,
    frequency: f64,
    num_samples: usize,
    sample_rate: f64,
    amplitude: f64,
    rng: &mut R,
) -> Vec<f64> {
    if kind == CarrierWaveform::Noise {
        return band_noise(frequency, num_samples, sample_rate, amplitude, rng);
    }

    let step = TWO_PI * frequency / sample_rate;
    (0..num_samples)
        .map(|i| amplitude * carrier_at_phase(kind, step * i as f64).unwrap_or(0.0))
        .collect()
}

/// White noise filtered to `[frequency - 20, frequency + 20]` Hz.
pub fn band_noise<R: Rng + ?Sized>(
    frequency: f64,
    num_samples: usize,
    sample_rate: f64,
    amplitude: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut samples = white_noise(num_samples, rng);
    ZeroPhaseBandpass::around(frequency, sample_rate).filtfilt(&mut samples);
    normalize_to(&mut samples, amplitude);
    samples
}

/// Unit-variance Gaussian white noise.
pub fn white_noise<R: Rng + ?Sized>(num_samples: usize, rng: &mut R) -> Vec<f64> {
    (0..num_samples)
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect()
}

/// Scales `samples` so the largest magnitude equals `amplitude`.
pub(crate) fn normalize_to(samples: &mut [f64], amplitude: f64) {
    let peak = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    if peak > 0.0 {
        let gain = amplitude / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_sample_count_rounds() {
        assert_eq!(sample_count(1.0, 44100.0), 44100);
        assert_eq!(sample_count(0.01, 44100.0), 441);
        assert_eq!(sample_count(0.00001, 44100.0), 0);
        assert_eq!(sample_count(0.0, 44100.0), 0);
        assert_eq!(sample_count(-2.0, 44100.0), 0);
    }

    #[test]
    fn test_sine_starts_at_zero() {
        let mut rng = create_rng(0);
        let s = carrier_samples(CarrierWaveform::Sine, 100.0, 441, 44100.0, 1.0, &mut rng);
        assert_eq!(s[0], 0.0);
        // Quarter period of 100 Hz at 44.1 kHz is sample 110.25.
        assert!(s[110] > 0.99);
    }

    #[test]
    fn test_square_takes_two_levels() {
        let mut rng = create_rng(0);
        let s = carrier_samples(CarrierWaveform::Square, 220.0, 4410, 44100.0, 0.7, &mut rng);
        assert!(s.iter().all(|&v| v == 0.7 || v == -0.7));
    }

    #[test]
    fn test_noise_is_peak_normalized_and_seeded() {
        let a = band_noise(200.0, 4410, 44100.0, 0.5, &mut create_rng(9));
        let b = band_noise(200.0, 4410, 44100.0, 0.5, &mut create_rng(9));
        let c = band_noise(200.0, 4410, 44100.0, 0.5, &mut create_rng(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
        let peak = a.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_noise_carrier_has_no_phase_value() {
        assert_eq!(carrier_at_phase(CarrierWaveform::Noise, 1.0), None);
        assert!(carrier_at_phase(CarrierWaveform::Sawtooth, 1.0).is_some());
    }
}
