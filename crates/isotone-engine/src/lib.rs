//! Isotone synthesis engine
//!
//! This crate renders isochronic tones: a carrier waveform whose amplitude is
//! pulsed by a modulation envelope, with carrier frequency, pulse rate and
//! volume driven over a session by automation curves.
//!
//! # Overview
//!
//! - **Carriers** - sine, square, triangle, sawtooth and band-passed noise
//! - **Envelopes** - square, sine, trapezoid and gaussian pulses in `[0, 1]`
//! - **Sweeps** - linear, exponential, logarithmic, quadratic and sigmoid
//!   frequency transitions, integrated through a phase accumulator
//! - **Chunked rendering** - curve presets rendered in short chunks with
//!   continuous phase
//! - **Caching** - constant tone segments memoized in an explicit cache
//! - **Mixing** - background tracks looped under the tone
//!
//! # Determinism
//!
//! Given the same preset, configuration and seed, the output is identical
//! across runs. Noise carriers draw from PCG32 generators whose seeds are
//! derived with BLAKE3.
//!
//! # Example
//!
//! ```
//! use isotone_engine::{ChunkedRenderer, RenderConfig};
//! use isotone_spec::TonePreset;
//!
//! let mut preset = TonePreset::new("Drift");
//! preset.entrainment.add_point(4.0, 6.0).unwrap();
//!
//! let config = RenderConfig {
//!     sample_rate: 8000,
//!     min_duration_seconds: 0.0,
//!     ..RenderConfig::default()
//! };
//! let audio = ChunkedRenderer::new(config).unwrap().render(&preset).unwrap();
//!
//! assert_eq!(audio.samples.len(), 32000);
//! assert!(audio.peak() <= 0.9);
//! ```
//!
//! # Crate Structure
//!
//! - [`generator`] - Tone generator, tone segments and sweeps
//! - [`render`] - Chunked whole-preset renderer
//! - [`waveform`] - Carrier generation
//! - [`modulation`] - Envelope generation
//! - [`transition`] - Frequency sweeps
//! - [`phase`] - Phase accumulation
//! - [`cache`] - Segment cache
//! - [`mixer`] - Background mixing, fades and peak limiting
//! - [`filter`] - Biquad filters
//! - [`oscillator`] - Periodic waveform primitives
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`config`] - Render configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod mixer;
pub mod modulation;
pub mod oscillator;
pub mod phase;
pub mod render;
pub mod rng;
pub mod transition;
pub mod waveform;

pub use cache::{CacheCapacity, SegmentCache, SegmentKey};
pub use config::{ChunkStrategy, RenderConfig};
pub use error::{AudioError, AudioResult};
pub use generator::{isochronic_tone, PulseShape, ToneGenerator, ToneSegment, CARRIER_AMPLITUDE};
pub use mixer::{downmix, fit_to_length, mix_with_background};
pub use phase::PhaseAccumulator;
pub use render::{render_looped, render_preset, render_segments, ChunkedRenderer, RenderedAudio};
pub use transition::FrequencyTransition;
