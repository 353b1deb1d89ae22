//! Biquad filters and the zero-phase band-pass used by the noise carrier.
//!
//! Coefficients follow the Audio EQ Cookbook. A 4th-order Butterworth
//! section is built from two cascaded biquads with Q values
//! `1 / (2 cos(π/8))` and `1 / (2 cos(3π/8))`.

use std::f64::consts::PI;

/// Q values of the two biquads in a 4th-order Butterworth cascade.
const BUTTERWORTH_4_Q: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376_5];

/// Half-width of the noise band around the carrier frequency (Hz).
pub const NOISE_BAND_HALF_WIDTH: f64 = 20.0;

/// Biquad filter coefficients, normalized so that `a0 = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor, 0.707 is Butterworth
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_omega, alpha) = Self::prewarp(cutoff, q, sample_rate);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_omega) / 2.0 / a0,
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Creates highpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_omega, alpha) = Self::prewarp(cutoff, q, sample_rate);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos_omega) / 2.0 / a0,
            b1: -(1.0 + cos_omega) / a0,
            b2: (1.0 + cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn prewarp(freq: f64, q: f64, sample_rate: f64) -> (f64, f64) {
        // Clamp Q to minimum safe value to prevent division by zero
        let q = q.max(0.5);
        let omega = 2.0 * PI * freq / sample_rate;
        (omega.cos(), omega.sin() / (2.0 * q))
    }
}

/// Biquad filter state (direct form I).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Replaces the coefficients, keeping the delay line.
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Processes a buffer of samples in place.
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// 4th-order Butterworth band-pass applied forwards and backwards.
#[derive(Debug, Clone)]
pub struct ZeroPhaseBandpass {
    sections: Vec<BiquadCoeffs>,
}

impl ZeroPhaseBandpass {
    /// Creates a band-pass between `low` and `high` Hz.
    pub fn new(low: f64, high: f64, sample_rate: f64) -> Self {
        let mut sections = Vec::with_capacity(4);
        for q in BUTTERWORTH_4_Q {
            sections.push(BiquadCoeffs::highpass(low, q, sample_rate));
        }
        for q in BUTTERWORTH_4_Q {
            sections.push(BiquadCoeffs::lowpass(high, q, sample_rate));
        }
        Self { sections }
    }

    /// Band-pass centered on `center`, with edges guarded against 0 and Nyquist.
    pub fn around(center: f64, sample_rate: f64) -> Self {
        let (low, high) = band_edges(center, sample_rate);
        Self::new(low, high, sample_rate)
    }

    /// Filters `samples` in place with zero net phase shift.
    pub fn filtfilt(&self, samples: &mut [f64]) {
        self.pass(samples);
        samples.reverse();
        self.pass(samples);
        samples.reverse();
    }

    fn pass(&self, samples: &mut [f64]) {
        for coeffs in &self.sections {
            BiquadFilter::new(*coeffs).process_buffer(samples);
        }
    }
}

/// Causal 4th-order Butterworth band-pass for noise that runs across
/// render chunks.
///
/// Retuning swaps coefficients but keeps every section's delay line, so a
/// new center frequency does not restart the filter.
#[derive(Debug, Clone)]
pub struct StreamingBandpass {
    sample_rate: f64,
    center: Option<f64>,
    sections: Vec<BiquadFilter>,
}

impl StreamingBandpass {
    /// Creates an untuned filter; call [`StreamingBandpass::retune`] first.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            center: None,
            sections: Vec::with_capacity(4),
        }
    }

    /// Centers the pass band on `center` Hz. A repeated center is a no-op.
    pub fn retune(&mut self, center: f64) {
        if self.center == Some(center) {
            return;
        }
        let (low, high) = band_edges(center, self.sample_rate);
        let coeffs = BUTTERWORTH_4_Q
            .iter()
            .map(|&q| BiquadCoeffs::highpass(low, q, self.sample_rate))
            .chain(
                BUTTERWORTH_4_Q
                    .iter()
                    .map(|&q| BiquadCoeffs::lowpass(high, q, self.sample_rate)),
            );

        if self.sections.is_empty() {
            self.sections = coeffs.map(BiquadFilter::new).collect();
        } else {
            for (section, c) in self.sections.iter_mut().zip(coeffs) {
                section.set_coeffs(c);
            }
        }
        self.center = Some(center);
    }

    /// Center frequency of the current tuning.
    pub fn center(&self) -> Option<f64> {
        self.center
    }

    /// Filters one sample. An untuned filter passes input through.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(input, |x, section| section.process(x))
    }
}

/// Pass band `[center - 20, center + 20]` Hz clamped into
/// `[0.01, 0.99] * nyquist`, with `low < high`.
pub fn band_edges(center: f64, sample_rate: f64) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    let low_norm = ((center - NOISE_BAND_HALF_WIDTH) / nyquist).max(0.01);
    let high_norm = ((center + NOISE_BAND_HALF_WIDTH) / nyquist).min(0.99);
    let low_norm = if low_norm >= high_norm {
        high_norm * 0.5
    } else {
        low_norm
    };
    (low_norm * nyquist, high_norm * nyquist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_band_edges_guarded() {
        let (low, high) = band_edges(100.0, 44100.0);
        assert!((low - 60.0).abs() < 1e-9);
        assert!((high - 120.0).abs() < 1e-9);

        let (low, high) = band_edges(10.0, 44100.0);
        assert!(low > 0.0 && low < high);

        let (low, high) = band_edges(30_000.0, 44100.0);
        assert!(high < 22050.0 && low < high);
    }

    #[test]
    fn test_lowpass_attenuates_high_frequency() {
        let sr = 44100.0;
        let mut high = tone(8000.0, sr, 4410);
        BiquadFilter::new(BiquadCoeffs::lowpass(500.0, 0.707, sr)).process_buffer(&mut high);
        assert!(rms(&high[1000..]) < 0.05);
    }

    #[test]
    fn test_bandpass_keeps_center_and_rejects_far_tones() {
        let sr = 8000.0;
        let filter = ZeroPhaseBandpass::new(900.0, 1100.0, sr);

        let mut center = tone(1000.0, sr, 8000);
        filter.filtfilt(&mut center);
        let mut far = tone(200.0, sr, 8000);
        filter.filtfilt(&mut far);

        assert!(rms(&center[2000..6000]) > 0.2);
        assert!(rms(&far[2000..6000]) < 0.01);
    }

    #[test]
    fn test_streaming_bandpass_matches_cascade() {
        let sr = 8000.0;
        let input = tone(130.0, sr, 800);

        let mut streamed = StreamingBandpass::new(sr);
        let mut out = Vec::with_capacity(input.len());
        for chunk in input.chunks(80) {
            streamed.retune(100.0);
            out.extend(chunk.iter().map(|&x| streamed.process(x)));
        }

        let (low, high) = band_edges(100.0, sr);
        let mut expected = input.clone();
        for q in BUTTERWORTH_4_Q {
            BiquadFilter::new(BiquadCoeffs::highpass(low, q, sr)).process_buffer(&mut expected);
        }
        for q in BUTTERWORTH_4_Q {
            BiquadFilter::new(BiquadCoeffs::lowpass(high, q, sr)).process_buffer(&mut expected);
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn test_retune_keeps_filter_running() {
        let sr = 8000.0;
        let input = tone(100.0, sr, 8000);
        let mut filter = StreamingBandpass::new(sr);
        filter.retune(100.0);
        let out: Vec<f64> = input
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if i == 4000 {
                    filter.retune(110.0);
                }
                filter.process(x)
            })
            .collect();

        assert_eq!(filter.center(), Some(110.0));
        assert!(rms(&out[2000..4000]) > 0.4);
        let largest_step = out[3990..4010]
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0, f64::max);
        assert!(largest_step < 0.1);
    }
}
