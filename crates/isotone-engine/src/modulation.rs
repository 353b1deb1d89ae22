//! Modulation envelope generation.
//!
//! Two evaluation paths share the same shapes:
//! - [`envelope_samples`] renders a constant pulse rate over a buffer, building
//!   trapezoid and gaussian pulses period by period in the sample domain.
//! - [`envelope_at_phase`] evaluates the shape from an accumulated phase, for
//!   pulse rates that change over time.
//!
//! Every value produced by either path lies in `[0, 1]`.

use isotone_spec::ModulationShape;

use crate::oscillator::{self, TWO_PI};

/// Renders `num_samples` of an envelope pulsing at a constant `frequency`.
///
/// `duty_cycle` is the "on" fraction for square pulses and the width factor
/// for gaussian pulses; `ramp_percent` is the ramp length of trapezoid pulses
/// as a percentage of the period.
pub fn envelope_samples(
    kind: ModulationShape,
    frequency: f64,
    num_samples: usize,
    sample_rate: f64,
    duty_cycle: f64,
    ramp_percent: f64,
) -> Vec<f64> {
    let step = TWO_PI * frequency / sample_rate;
    match kind {
        ModulationShape::Square => (0..num_samples)
            .map(|i| 0.5 * (1.0 + oscillator::square(step * i as f64, duty_cycle)))
            .collect(),
        ModulationShape::Sine => (0..num_samples)
            .map(|i| 0.5 * (1.0 + oscillator::sine(step * i as f64)))
            .collect(),
        ModulationShape::Trapezoid => {
            let period = period_samples(frequency, sample_rate);
            let ramp = (period as f64 * ramp_percent / 100.0).round() as usize;
            trapezoid_pulses(num_samples, period, ramp)
        }
        ModulationShape::Gaussian => {
            let period = period_samples(frequency, sample_rate);
            gaussian_pulses(num_samples, period, duty_cycle)
        }
    }
}

/// Envelope value at an accumulated modulation phase.
pub fn envelope_at_phase(
    kind: ModulationShape,
    phase: f64,
    duty_cycle: f64,
    ramp_percent: f64,
) -> f64 {
    let u = phase.rem_euclid(TWO_PI) / TWO_PI;
    match kind {
        ModulationShape::Square => {
            if u < duty_cycle {
                1.0
            } else {
                0.0
            }
        }
        ModulationShape::Sine => 0.5 * (1.0 + phase.sin()),
        ModulationShape::Trapezoid => {
            let ramp = ramp_percent / 100.0;
            if 2.0 * ramp >= 1.0 {
                if u < 0.5 {
                    u / 0.5
                } else {
                    (1.0 - u) / 0.5
                }
            } else if u < ramp {
                u / ramp
            } else if u > 1.0 - ramp {
                (1.0 - u) / ramp
            } else {
                1.0
            }
        }
        ModulationShape::Gaussian => {
            let sigma = (duty_cycle / 6.0).max(f64::EPSILON);
            let z = (u - 0.5) / sigma;
            (-0.5 * z * z).exp()
        }
    }
    .clamp(0.0, 1.0)
}

/// Samples per modulation period, at least 1.
fn period_samples(frequency: f64, sample_rate: f64) -> usize {
    ((sample_rate / frequency).round() as usize).max(1)
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| {
        if i + 1 == n && n > 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

/// Ramp up, hold, ramp down in every period. A period too short for two
/// ramps (including a truncated final period) becomes a triangle.
fn trapezoid_pulses(num_samples: usize, period: usize, ramp: usize) -> Vec<f64> {
    let mut envelope = Vec::with_capacity(num_samples);
    let mut start = 0;
    while start < num_samples {
        let len = period.min(num_samples - start);
        if len <= 2 * ramp {
            let half = len / 2;
            envelope.extend(linspace(0.0, 1.0, half));
            envelope.extend(linspace(1.0, 0.0, len - half));
        } else {
            envelope.extend(linspace(0.0, 1.0, ramp));
            envelope.extend(std::iter::repeat(1.0).take(len - 2 * ramp));
            envelope.extend(linspace(1.0, 0.0, ramp));
        }
        start += len;
    }
    envelope
}

/// Bell pulse centered in every period with `sigma = period * duty / 6`.
///
/// Pulses combine by maximum, which for equally spaced bells is the bell of
/// the nearest center. The result is rescaled so its peak is exactly 1.
fn gaussian_pulses(num_samples: usize, period: usize, duty_cycle: f64) -> Vec<f64> {
    let sigma = (period as f64 * duty_cycle / 6.0).max(f64::EPSILON);
    let half = period as f64 / 2.0;

    let mut envelope: Vec<f64> = (0..num_samples)
        .map(|i| {
            let center = (i / period) as f64 * period as f64 + half;
            let z = (i as f64 - center) / sigma;
            (-0.5 * z * z).exp()
        })
        .collect();

    let peak = envelope.iter().fold(0.0f64, |m, &v| m.max(v));
    if peak > 0.0 && peak < 1.0 {
        for v in envelope.iter_mut() {
            *v /= peak;
        }
    }
    envelope
}
