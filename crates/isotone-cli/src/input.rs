//! Preset file loading.
//!
//! A preset file is either a curve preset (automation points per parameter)
//! or a segment-list preset. The two are told apart by their top-level keys.

use anyhow::{Context, Result};
use isotone_spec::{SegmentPreset, TonePreset};
use std::fs;
use std::path::Path;

/// Which preset format a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    /// Automation-curve preset.
    Curve,
    /// Ordered list of timeline segments.
    Segments,
}

impl PresetKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetKind::Curve => "curve",
            PresetKind::Segments => "segments",
        }
    }

    /// Detects the kind from a parsed JSON document. Anything that is not a
    /// segment list is read as a curve preset.
    pub fn detect(value: &serde_json::Value) -> Self {
        if value.get("segments").is_some_and(|s| s.is_array()) {
            PresetKind::Segments
        } else {
            PresetKind::Curve
        }
    }
}

/// A loaded preset of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Preset {
    Curve(TonePreset),
    Segments(SegmentPreset),
}

impl Preset {
    /// The kind of this preset.
    pub fn kind(&self) -> PresetKind {
        match self {
            Preset::Curve(_) => PresetKind::Curve,
            Preset::Segments(_) => PresetKind::Segments,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Preset::Curve(p) => &p.name,
            Preset::Segments(p) => &p.name,
        }
    }

    /// BLAKE3 hash of the preset's canonical JSON.
    pub fn canonical_hash(&self) -> Result<String> {
        let hash = match self {
            Preset::Curve(p) => p.canonical_hash()?,
            Preset::Segments(p) => p.canonical_hash()?,
        };
        Ok(hash)
    }
}

/// Result of loading a preset file.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed preset.
    pub preset: Preset,
    /// BLAKE3 hash of the raw file bytes.
    pub source_hash: String,
}

/// Loads a preset file, detecting its kind.
pub fn load_preset(path: &Path) -> Result<LoadResult> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset file: {}", path.display()))?;
    let source_hash = blake3::hash(text.as_bytes()).to_hex().to_string();
    let preset = parse_preset(&text)
        .with_context(|| format!("Failed to parse preset file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        kind = preset.kind().as_str(),
        name = preset.name(),
        "preset loaded"
    );
    Ok(LoadResult {
        preset,
        source_hash,
    })
}

/// Parses preset JSON text of either kind.
pub fn parse_preset(text: &str) -> Result<Preset> {
    let value: serde_json::Value = serde_json::from_str(text).context("Invalid JSON")?;
    let preset = match PresetKind::detect(&value) {
        PresetKind::Curve => Preset::Curve(TonePreset::from_json(text)?),
        PresetKind::Segments => Preset::Segments(SegmentPreset::from_json(text)?),
    };
    Ok(preset)
}
