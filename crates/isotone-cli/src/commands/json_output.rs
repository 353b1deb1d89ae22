//! JSON output types for machine-readable CLI output.
//!
//! Every command given `--json` prints exactly one of these documents to
//! stdout. The `success` field is always present.

use isotone_engine::AudioError;
use isotone_spec::{CodedError, SpecError};
use serde::Serialize;

/// Error codes for CLI-level failures.
///
/// Engine and spec errors pass their own codes through.
pub mod error_codes {
    /// Preset, config or background file could not be loaded
    pub const INPUT: &str = "CLI_001";
    /// Rendering or WAV export failed
    pub const RENDER: &str = "CLI_002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "AUDIO_003")
    pub code: String,
    /// "input" or "render"
    pub stage: &'static str,
    /// Human-readable error message, including context
    pub message: String,
}

impl JsonError {
    /// Builds an error record, preferring the code of an engine or spec
    /// error anywhere in the chain.
    pub fn from_anyhow(error: &anyhow::Error, stage: &'static str, fallback: &str) -> Self {
        let code = error
            .chain()
            .find_map(|cause| {
                cause
                    .downcast_ref::<AudioError>()
                    .map(|e| e.code())
                    .or_else(|| cause.downcast_ref::<SpecError>().map(|e| e.code()))
            })
            .unwrap_or(fallback);
        Self {
            code: code.to_string(),
            stage,
            message: format!("{:#}", error),
        }
    }
}

/// Failure document shared by all commands.
#[derive(Debug, Serialize)]
pub struct FailureOutput {
    pub success: bool,
    pub error: JsonError,
}

impl FailureOutput {
    pub fn new(error: JsonError) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Output of `isotone render`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderOutput {
    pub success: bool,
    pub preset: String,
    pub kind: &'static str,
    /// Canonical hash of the preset contents
    pub preset_hash: String,
    /// Hash of the raw preset file
    pub source_hash: String,
    pub output: String,
    pub sample_rate: u32,
    pub samples: usize,
    pub duration_seconds: f64,
    pub peak: f64,
    /// BLAKE3 of the 16-bit PCM data
    pub pcm_hash: String,
    pub elapsed_ms: u64,
}

/// Output of `isotone tone`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToneOutput {
    pub success: bool,
    pub output: String,
    pub sample_rate: u32,
    pub samples: usize,
    pub peak: f64,
    pub pcm_hash: String,
}

/// One segment row in `isotone inspect` output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentSummary {
    pub start_freq: f64,
    pub end_freq: f64,
    pub base_freq: f64,
    pub duration: f64,
    pub volume: f64,
    pub transition: &'static str,
}

/// Output of `isotone inspect`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InspectOutput {
    pub success: bool,
    pub name: String,
    pub kind: &'static str,
    /// Length of the preset content in seconds
    pub duration_seconds: f64,
    pub carrier: &'static str,
    pub modulation: &'static str,
    pub preset_hash: String,
    /// Point counts per curve, for curve presets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_counts: Option<PointCounts>,
    /// Segment list, for segment presets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentSummary>>,
}

/// Control point counts of a curve preset.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PointCounts {
    pub entrainment: usize,
    pub volume: usize,
    pub base_freq: usize,
}
