//! Phase accumulation for time-varying frequencies.
//!
//! Evaluating `sin(2π f(t) t)` with a frequency that changes over time makes
//! the waveform jump whenever `f` changes. Integrating the instantaneous
//! frequency instead,
//!
//! ```text
//! phase[0] = 0
//! phase[i] = phase[i-1] + 2π f[i-1] / sample_rate
//! ```
//!
//! keeps every oscillator and envelope continuous however the frequency moves.

use crate::oscillator::TWO_PI;

/// Running phase of one oscillator.
///
/// The stored phase is wrapped into `[0, 2π)` after every step so that long
/// renders keep full precision.
#[derive(Debug, Clone)]
pub struct PhaseAccumulator {
    phase: f64,
    sample_rate: f64,
}

impl PhaseAccumulator {
    /// Creates an accumulator at phase 0.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Returns the current phase and advances by one sample at `frequency`.
    #[inline]
    pub fn advance(&mut self, frequency: f64) -> f64 {
        let current = self.phase;
        self.phase = (self.phase + TWO_PI * frequency / self.sample_rate).rem_euclid(TWO_PI);
        current
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Resets the phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Integrates a whole frequency trajectory into wrapped phases.
pub fn accumulate(frequencies: &[f64], sample_rate: f64) -> Vec<f64> {
    let mut acc = PhaseAccumulator::new(sample_rate);
    frequencies.iter().map(|&f| acc.advance(f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_phase_is_zero() {
        let phases = accumulate(&[10.0, 10.0, 10.0], 100.0);
        assert_eq!(phases[0], 0.0);
        assert!((phases[1] - TWO_PI * 0.1).abs() < 1e-12);
        assert!((phases[2] - TWO_PI * 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_step_uses_previous_frequency() {
        let phases = accumulate(&[5.0, 20.0, 0.0], 100.0);
        assert!((phases[1] - TWO_PI * 0.05).abs() < 1e-12);
        assert!((phases[2] - TWO_PI * 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_phase_wraps() {
        let mut acc = PhaseAccumulator::new(4.0);
        for _ in 0..10 {
            acc.advance(1.0);
            assert!(acc.phase() >= 0.0 && acc.phase() < TWO_PI);
        }
        acc.reset();
        assert_eq!(acc.phase(), 0.0);
    }

    #[test]
    fn test_continuity_across_frequency_change() {
        let mut freqs = vec![8.0; 500];
        freqs.extend(vec![12.0; 500]);
        let sr = 1000.0;
        let phases = accumulate(&freqs, sr);
        let max_step = TWO_PI * 12.0 / sr + 1e-9;
        for pair in phases.windows(2) {
            let step = (pair[1] - pair[0]).rem_euclid(TWO_PI);
            assert!(step <= max_step);
        }
    }
}
