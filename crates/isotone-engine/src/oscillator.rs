//! Periodic waveform primitives evaluated at a phase in radians.

use std::f64::consts::PI;

/// Two pi.
pub const TWO_PI: f64 = 2.0 * PI;

/// Sine wave.
#[inline]
pub fn sine(phase: f64) -> f64 {
    phase.sin()
}

/// Bipolar square wave: `+1` for the first `duty` of each cycle, `-1` after.
#[inline]
pub fn square(phase: f64, duty: f64) -> f64 {
    if phase.rem_euclid(TWO_PI) < duty * TWO_PI {
        1.0
    } else {
        -1.0
    }
}

/// Sawtooth with an adjustable peak position.
///
/// Rises from -1 to 1 over the first `width` of the cycle and falls back to
/// -1 over the rest. `width = 1` is a rising ramp; `width = 0.5` is a
/// symmetric triangle.
#[inline]
pub fn sawtooth(phase: f64, width: f64) -> f64 {
    let width = width.clamp(0.0, 1.0);
    let tmod = phase.rem_euclid(TWO_PI);
    if tmod < width * TWO_PI {
        tmod / (PI * width) - 1.0
    } else {
        (PI * (width + 1.0) - tmod) / (PI * (1.0 - width))
    }
}

/// Symmetric triangle wave starting at -1.
#[inline]
pub fn triangle(phase: f64) -> f64 {
    sawtooth(phase, 0.5)
}
