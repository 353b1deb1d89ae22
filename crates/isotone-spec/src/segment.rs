//! Segment-list presets: a timeline of independent frequency sweeps.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SpecError;
use crate::hash::canonical_value_hash;
use crate::kinds::{CarrierWaveform, ModulationShape, TransitionKind};

/// One sweep on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    /// Entrainment frequency at the segment start (Hz).
    #[serde(default = "default_entrainment")]
    pub start_freq: f64,
    /// Entrainment frequency at the segment end (Hz).
    #[serde(default = "default_entrainment")]
    pub end_freq: f64,
    /// Carrier frequency (Hz).
    #[serde(default = "default_base_freq")]
    pub base_freq: f64,
    /// Length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Linear gain.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Sweep law from start to end frequency.
    #[serde(default, rename = "transition_type")]
    pub transition: TransitionKind,
}

fn default_entrainment() -> f64 {
    10.0
}

fn default_base_freq() -> f64 {
    100.0
}

fn default_duration() -> f64 {
    60.0
}

fn default_volume() -> f64 {
    0.5
}

impl Default for TimelineSegment {
    fn default() -> Self {
        Self {
            start_freq: default_entrainment(),
            end_freq: default_entrainment(),
            base_freq: default_base_freq(),
            duration: default_duration(),
            volume: default_volume(),
            transition: TransitionKind::default(),
        }
    }
}

impl TimelineSegment {
    /// A constant-frequency segment.
    pub fn constant(entrainment: f64, base_freq: f64, duration: f64, volume: f64) -> Self {
        Self {
            start_freq: entrainment,
            end_freq: entrainment,
            base_freq,
            duration,
            volume,
            transition: TransitionKind::Linear,
        }
    }

    /// A sweeping segment.
    pub fn sweep(
        start_freq: f64,
        end_freq: f64,
        base_freq: f64,
        duration: f64,
        volume: f64,
        transition: TransitionKind,
    ) -> Self {
        Self {
            start_freq,
            end_freq,
            base_freq,
            duration,
            volume,
            transition,
        }
    }

    /// Returns true when the entrainment frequency changes over the segment.
    pub fn is_sweep(&self) -> bool {
        self.start_freq != self.end_freq
    }
}

/// A preset made of consecutive segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPreset {
    /// Display name.
    #[serde(default = "default_segment_preset_name")]
    pub name: String,
    /// Loop the rendered timeline up to the session length. `isotone render`
    /// loops to `min_duration_seconds` unless `--loop-to` is given.
    #[serde(default, rename = "loop")]
    pub loop_playback: bool,
    /// Carrier waveform for every segment.
    #[serde(default, rename = "carrier_type")]
    pub carrier: CarrierWaveform,
    /// Envelope shape for every segment.
    #[serde(default, rename = "modulation_type")]
    pub modulation: ModulationShape,
    /// Ordered segments.
    #[serde(default)]
    pub segments: Vec<TimelineSegment>,
}

fn default_segment_preset_name() -> String {
    "Imported Preset".to_string()
}

impl Default for SegmentPreset {
    fn default() -> Self {
        Self::new("New Preset")
    }
}

impl SegmentPreset {
    /// Creates an empty timeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loop_playback: false,
            carrier: CarrierWaveform::default(),
            modulation: ModulationShape::default(),
            segments: Vec::new(),
        }
    }

    /// Appends a segment.
    pub fn add_segment(&mut self, segment: TimelineSegment) {
        self.segments.push(segment);
    }

    /// Removes the segment at `index`; out-of-range indices are ignored.
    pub fn remove_segment(&mut self, index: usize) -> Option<TimelineSegment> {
        if index < self.segments.len() {
            Some(self.segments.remove(index))
        } else {
            None
        }
    }

    /// Sum of segment durations (seconds).
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Parses a timeline from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the timeline as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a timeline file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes a timeline file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SpecError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// BLAKE3 hash of the canonical timeline JSON.
    pub fn canonical_hash(&self) -> Result<String, SpecError> {
        canonical_value_hash(&serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_total_duration() {
        let mut preset = SegmentPreset::new("Ramp");
        preset.add_segment(TimelineSegment::constant(10.0, 100.0, 30.0, 0.5));
        preset.add_segment(TimelineSegment::sweep(
            10.0,
            4.0,
            100.0,
            90.0,
            0.5,
            TransitionKind::Sigmoid,
        ));
        assert_eq!(preset.total_duration(), 120.0);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut preset = SegmentPreset::new("Empty");
        assert!(preset.remove_segment(0).is_none());
        preset.add_segment(TimelineSegment::default());
        assert!(preset.remove_segment(0).is_some());
        assert!(preset.segments.is_empty());
    }

    #[test]
    fn test_segment_defaults_from_json() {
        let preset = SegmentPreset::from_json(
            r#"{"name": "x", "segments": [{"end_freq": 4.0, "transition_type": "none"}]}"#,
        )
        .unwrap();
        let segment = preset.segments[0];
        assert_eq!(segment.start_freq, 10.0);
        assert_eq!(segment.end_freq, 4.0);
        assert_eq!(segment.duration, 60.0);
        assert_eq!(segment.transition, TransitionKind::Linear);
        assert!(segment.is_sweep());
    }

    #[test]
    fn test_json_round_trip() {
        let mut preset = SegmentPreset::new("Trip");
        preset.loop_playback = true;
        preset.modulation = ModulationShape::Trapezoid;
        preset.add_segment(TimelineSegment::sweep(
            12.0,
            6.5,
            136.1,
            45.0,
            0.4,
            TransitionKind::Exponential,
        ));
        let json = preset.to_json_pretty().unwrap();
        assert!(json.contains("\"loop\": true"));
        assert_eq!(SegmentPreset::from_json(&json).unwrap(), preset);
    }
}
