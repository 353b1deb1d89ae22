//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::cache::CacheCapacity;
use crate::error::{AudioError, AudioResult};

/// How the chunked renderer carries state across chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Curves are sampled once per chunk; carrier and modulation phases run
    /// on across chunks, so parameter changes never introduce clicks.
    #[default]
    PhaseContinuous,
    /// Every chunk is rendered from phase 0 as a cached constant segment.
    Independent,
}

/// Parameters of a whole-preset render. Every field has a default, so a
/// partial JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Curve sampling interval in seconds.
    pub chunk_seconds: f64,
    /// Length of the linear fade at each end, in seconds.
    pub fade_seconds: f64,
    /// Output is scaled down when its peak exceeds this level.
    pub peak_ceiling: f64,
    /// Shortest session length in seconds.
    pub min_duration_seconds: f64,
    /// Seed for the noise carrier.
    pub seed: u32,
    /// Chunk boundary handling.
    pub strategy: ChunkStrategy,
    /// Capacity of the segment cache used by [`ChunkStrategy::Independent`].
    pub cache_capacity: CacheCapacity,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            chunk_seconds: 0.01,
            fade_seconds: 0.01,
            peak_ceiling: 0.9,
            min_duration_seconds: 180.0,
            seed: 0,
            strategy: ChunkStrategy::default(),
            cache_capacity: CacheCapacity::default(),
        }
    }
}

impl RenderConfig {
    /// Checks that every field is usable.
    pub fn validate(&self) -> AudioResult<()> {
        if self.sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        if !(self.chunk_seconds.is_finite() && self.chunk_seconds > 0.0) {
            return Err(AudioError::invalid_param(
                "chunk_seconds",
                format!("must be positive, got {}", self.chunk_seconds),
            ));
        }
        if !(self.fade_seconds.is_finite() && self.fade_seconds >= 0.0) {
            return Err(AudioError::invalid_param(
                "fade_seconds",
                format!("must be zero or positive, got {}", self.fade_seconds),
            ));
        }
        if !(self.peak_ceiling > 0.0 && self.peak_ceiling <= 1.0) {
            return Err(AudioError::invalid_param(
                "peak_ceiling",
                format!("must be in (0, 1], got {}", self.peak_ceiling),
            ));
        }
        if !(self.min_duration_seconds.is_finite() && self.min_duration_seconds >= 0.0) {
            return Err(AudioError::invalid_param(
                "min_duration_seconds",
                format!("must be zero or positive, got {}", self.min_duration_seconds),
            ));
        }
        Ok(())
    }

    /// Samples per chunk, at least 1.
    pub fn chunk_samples(&self) -> usize {
        ((self.chunk_seconds * self.sample_rate as f64).round() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_samples(), 441);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"sample_rate": 48000, "strategy": "independent"}"#).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.strategy, ChunkStrategy::Independent);
        assert_eq!(config.peak_ceiling, 0.9);
        assert_eq!(config.cache_capacity, CacheCapacity::Unbounded);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RenderConfig {
            sample_rate: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));

        config.sample_rate = 44100;
        config.chunk_seconds = 0.0;
        assert!(config.validate().is_err());

        config.chunk_seconds = 0.01;
        config.peak_ceiling = 1.5;
        assert!(config.validate().is_err());

        config.peak_ceiling = 1.0;
        config.fade_seconds = f64::NAN;
        assert!(config.validate().is_err());
    }
}
