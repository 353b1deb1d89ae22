//! Closed-form frequency sweeps between two endpoints.

use isotone_spec::TransitionKind;

/// Floor applied to both endpoints of an exponential sweep (Hz).
pub const EXPONENTIAL_FLOOR: f64 = 0.1;

/// Floor applied to both endpoints of a logarithmic sweep (Hz).
pub const LOGARITHMIC_FLOOR: f64 = 1.0;

/// Half-width of the logistic input range used by sigmoid sweeps.
const SIGMOID_SPAN: f64 = 6.0;

/// A sweep from `start` to `end` Hz over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyTransition {
    /// Frequency at `t = 0`.
    pub start: f64,
    /// Frequency at `t = duration`.
    pub end: f64,
    /// Sweep length in seconds.
    pub duration: f64,
    /// Interpolation law.
    pub kind: TransitionKind,
}

impl FrequencyTransition {
    /// Creates a sweep.
    pub fn new(start: f64, end: f64, duration: f64, kind: TransitionKind) -> Self {
        Self {
            start,
            end,
            duration,
            kind,
        }
    }

    /// Frequency at `time` seconds into the sweep; held at the endpoints
    /// outside `[0, duration]`.
    pub fn value_at(&self, time: f64) -> f64 {
        let x = if self.duration > 0.0 {
            (time / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.at_fraction(x)
    }

    /// Frequency at fraction `x` in `[0, 1]` of the sweep.
    pub fn at_fraction(&self, x: f64) -> f64 {
        let (s, e) = (self.start, self.end);
        match self.kind {
            TransitionKind::Linear => s + (e - s) * x,
            TransitionKind::Exponential => {
                geometric(s.max(EXPONENTIAL_FLOOR), e.max(EXPONENTIAL_FLOOR), x)
            }
            TransitionKind::Logarithmic => {
                geometric(s.max(LOGARITHMIC_FLOOR), e.max(LOGARITHMIC_FLOOR), x)
            }
            TransitionKind::Quadratic => {
                let shaped = if e >= s {
                    x * x
                } else {
                    1.0 - (1.0 - x) * (1.0 - x)
                };
                s + (e - s) * shaped
            }
            TransitionKind::Sigmoid => {
                let z = -SIGMOID_SPAN + 2.0 * SIGMOID_SPAN * x;
                s + (e - s) / (1.0 + (-z).exp())
            }
        }
    }

    /// Per-sample frequency trajectory of `num_samples` values, spaced evenly
    /// from the first to the last endpoint inclusive.
    pub fn trajectory(&self, num_samples: usize) -> Vec<f64> {
        match num_samples {
            0 => Vec::new(),
            1 => vec![self.at_fraction(0.0)],
            n => {
                let last = (n - 1) as f64;
                (0..n).map(|i| self.at_fraction(i as f64 / last)).collect()
            }
        }
    }
}

/// Linear interpolation in log space.
fn geometric(start: f64, end: f64, x: f64) -> f64 {
    (start.ln() + (end.ln() - start.ln()) * x).exp()
}
