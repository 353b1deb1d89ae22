//! Curve-driven tone presets and their preset-file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::curve::{AutomationCurve, ControlPoint};
use crate::error::SpecError;
use crate::hash::canonical_value_hash;
use crate::kinds::{CarrierWaveform, ModulationShape};

/// Lowest entrainment frequency an editor may author (Hz).
pub const MIN_ENTRAINMENT_FREQ: f64 = 0.5;
/// Highest entrainment frequency an editor may author (Hz).
pub const MAX_ENTRAINMENT_FREQ: f64 = 40.0;
/// Entrainment frequency of a fresh preset (Hz).
pub const DEFAULT_ENTRAINMENT_FREQ: f64 = 10.0;
/// Lowest carrier frequency (Hz).
pub const MIN_BASE_FREQ: f64 = 20.0;
/// Highest carrier frequency (Hz).
pub const MAX_BASE_FREQ: f64 = 1000.0;
/// Carrier frequency of a fresh preset (Hz).
pub const DEFAULT_BASE_FREQ: f64 = 100.0;
/// Volume of a fresh preset.
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Optional low-frequency sine added on top of the pulsed tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubsonicTone {
    /// Whether the subsonic tone is mixed in.
    pub enabled: bool,
    /// Frequency in Hz.
    pub frequency: f64,
    /// Linear gain.
    pub volume: f64,
}

impl Default for SubsonicTone {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: 7.83,
            volume: 0.3,
        }
    }
}

/// A preset whose entrainment frequency, volume and carrier frequency are
/// each driven by an automation curve.
#[derive(Debug, Clone, PartialEq)]
pub struct TonePreset {
    /// Display name.
    pub name: String,
    /// Pulse rate over time (Hz).
    pub entrainment: AutomationCurve,
    /// Volume over time (0..1).
    pub volume: AutomationCurve,
    /// Carrier frequency over time (Hz).
    pub base_freq: AutomationCurve,
    /// Carrier waveform.
    pub carrier: CarrierWaveform,
    /// Envelope shape.
    pub modulation: ModulationShape,
    /// Fraction of each pulse period that is "on".
    pub duty_cycle: f64,
    /// Ramp length for trapezoid envelopes, in percent of a period.
    pub ramp_percent: f64,
    /// Optional subsonic sine.
    pub subsonic: SubsonicTone,
    /// Master gain applied to the pulsed tone.
    pub tone_volume: f64,
}

impl Default for TonePreset {
    fn default() -> Self {
        Self::new("Default Preset")
    }
}

impl TonePreset {
    /// Sessions shorter than this are padded when rendered (seconds).
    pub const MIN_DURATION: f64 = 180.0;

    /// Creates a preset with flat default curves.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entrainment: Self::entrainment_curve(),
            volume: Self::volume_curve(),
            base_freq: Self::base_freq_curve(),
            carrier: CarrierWaveform::default(),
            modulation: ModulationShape::default(),
            duty_cycle: 0.5,
            ramp_percent: 10.0,
            subsonic: SubsonicTone::default(),
            tone_volume: 0.8,
        }
    }

    fn entrainment_curve() -> AutomationCurve {
        AutomationCurve::new(
            MIN_ENTRAINMENT_FREQ,
            MAX_ENTRAINMENT_FREQ,
            DEFAULT_ENTRAINMENT_FREQ,
        )
    }

    fn volume_curve() -> AutomationCurve {
        AutomationCurve::new(0.0, 1.0, DEFAULT_VOLUME)
    }

    fn base_freq_curve() -> AutomationCurve {
        AutomationCurve::new(MIN_BASE_FREQ, MAX_BASE_FREQ, DEFAULT_BASE_FREQ)
    }

    /// Session length: the longest curve, but at least [`Self::MIN_DURATION`].
    pub fn duration(&self) -> f64 {
        self.duration_with_floor(Self::MIN_DURATION)
    }

    /// Session length with a caller-chosen floor.
    pub fn duration_with_floor(&self, min_duration: f64) -> f64 {
        self.entrainment
            .duration()
            .max(self.volume.duration())
            .max(self.base_freq.duration())
            .max(min_duration)
    }

    /// Moves the end of every curve to `duration`.
    pub fn set_duration(&mut self, duration: f64) -> Result<(), SpecError> {
        self.entrainment.set_duration(duration)?;
        self.volume.set_duration(duration)?;
        self.base_freq.set_duration(duration)?;
        Ok(())
    }

    /// Mean entrainment frequency over the control points.
    pub fn average_entrainment(&self) -> f64 {
        self.entrainment.average_value()
    }

    /// Converts to the on-disk record.
    pub fn to_record(&self) -> PresetFile {
        PresetFile {
            name: self.name.clone(),
            entrainment_points: self.entrainment.points().to_vec(),
            volume_points: self.volume.points().to_vec(),
            base_freq_points: self.base_freq.points().to_vec(),
            carrier_type: self.carrier,
            modulation_type: self.modulation,
            duty_cycle: self.duty_cycle,
            ramp_percent: self.ramp_percent,
            tone_volume: self.tone_volume,
            enable_subsonic: self.subsonic.enabled,
            subsonic_frequency: self.subsonic.frequency,
            subsonic_volume: self.subsonic.volume,
        }
    }

    /// Builds a preset from an on-disk record.
    ///
    /// Each point list replaces the corresponding default curve; points are
    /// clamped into the curve's range. An empty list keeps the default point.
    pub fn from_record(record: PresetFile) -> Result<Self, SpecError> {
        let rebuild = |template: AutomationCurve, points: Vec<ControlPoint>| {
            AutomationCurve::from_points(
                template.min_value(),
                template.max_value(),
                template.default_value(),
                points,
            )
        };

        Ok(Self {
            name: record.name,
            entrainment: rebuild(Self::entrainment_curve(), record.entrainment_points)?,
            volume: rebuild(Self::volume_curve(), record.volume_points)?,
            base_freq: rebuild(Self::base_freq_curve(), record.base_freq_points)?,
            carrier: record.carrier_type,
            modulation: record.modulation_type,
            duty_cycle: record.duty_cycle,
            ramp_percent: record.ramp_percent,
            subsonic: SubsonicTone {
                enabled: record.enable_subsonic,
                frequency: record.subsonic_frequency,
                volume: record.subsonic_volume,
            },
            tone_volume: record.tone_volume,
        })
    }

    /// Parses a preset from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let record: PresetFile = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    /// Serializes the preset as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Loads a preset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes a preset file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SpecError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// BLAKE3 hash of the canonical preset record.
    pub fn canonical_hash(&self) -> Result<String, SpecError> {
        canonical_value_hash(&serde_json::to_value(self.to_record())?)
    }
}

/// On-disk layout of a curve preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetFile {
    /// Display name.
    #[serde(default = "default_preset_name")]
    pub name: String,
    /// Entrainment curve points.
    #[serde(default)]
    pub entrainment_points: Vec<ControlPoint>,
    /// Volume curve points.
    #[serde(default)]
    pub volume_points: Vec<ControlPoint>,
    /// Carrier frequency curve points.
    #[serde(default)]
    pub base_freq_points: Vec<ControlPoint>,
    /// Carrier waveform name.
    #[serde(default)]
    pub carrier_type: CarrierWaveform,
    /// Envelope shape name.
    #[serde(default)]
    pub modulation_type: ModulationShape,
    /// Duty cycle.
    #[serde(default = "default_duty_cycle")]
    pub duty_cycle: f64,
    /// Trapezoid ramp percent.
    #[serde(default = "default_ramp_percent")]
    pub ramp_percent: f64,
    /// Master tone gain.
    #[serde(default = "default_tone_volume")]
    pub tone_volume: f64,
    /// Subsonic enable flag.
    #[serde(default)]
    pub enable_subsonic: bool,
    /// Subsonic frequency.
    #[serde(default = "default_subsonic_frequency")]
    pub subsonic_frequency: f64,
    /// Subsonic gain.
    #[serde(default = "default_subsonic_volume")]
    pub subsonic_volume: f64,
}

fn default_preset_name() -> String {
    "Imported Preset".to_string()
}

fn default_duty_cycle() -> f64 {
    0.5
}

fn default_ramp_percent() -> f64 {
    10.0
}

fn default_tone_volume() -> f64 {
    0.8
}

fn default_subsonic_frequency() -> f64 {
    SubsonicTone::default().frequency
}

fn default_subsonic_volume() -> f64 {
    SubsonicTone::default().volume
}
