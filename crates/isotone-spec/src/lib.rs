//! Isotone preset library
//!
//! This crate provides the data model for isochronic tone sessions: the
//! automation curves that drive a session over time, the carrier, modulation
//! and transition kinds, and the two preset layouts that can be saved to disk.
//!
//! # Overview
//!
//! - **Curve presets** ([`TonePreset`]): entrainment frequency, volume and
//!   carrier frequency each follow an [`AutomationCurve`].
//! - **Segment presets** ([`SegmentPreset`]): a list of [`TimelineSegment`]
//!   sweeps played back to back.
//!
//! # Example
//!
//! ```
//! use isotone_spec::{TonePreset, ModulationShape};
//!
//! let mut preset = TonePreset::new("Alpha Drift");
//! preset.entrainment.add_point(0.0, 12.0).unwrap();
//! preset.entrainment.add_point(300.0, 8.0).unwrap();
//! preset.modulation = ModulationShape::Sine;
//!
//! assert_eq!(preset.entrainment.value_at(150.0), 10.0);
//! assert_eq!(preset.duration(), 300.0);
//!
//! let hash = preset.canonical_hash().unwrap();
//! assert_eq!(hash.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`curve`]: Piecewise-linear automation curves
//! - [`kinds`]: Carrier, modulation and transition enums
//! - [`preset`]: Curve-driven presets and their file format
//! - [`segment`]: Segment-list presets
//! - [`hash`]: Canonical JSON hashing
//! - [`error`]: Error types

pub mod curve;
pub mod error;
pub mod hash;
pub mod kinds;
pub mod preset;
pub mod segment;

pub use curve::{AutomationCurve, ControlPoint, POINT_MERGE_TOLERANCE};
pub use error::{CodedError, SpecError};
pub use hash::{canonical_value_hash, canonicalize_json};
pub use kinds::{CarrierWaveform, ModulationShape, TransitionKind};
pub use preset::{
    PresetFile, SubsonicTone, TonePreset, DEFAULT_BASE_FREQ, DEFAULT_ENTRAINMENT_FREQ,
    DEFAULT_VOLUME, MAX_BASE_FREQ, MAX_ENTRAINMENT_FREQ, MIN_BASE_FREQ, MIN_ENTRAINMENT_FREQ,
};
pub use segment::{SegmentPreset, TimelineSegment};
