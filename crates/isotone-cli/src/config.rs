//! Render configuration: JSON file plus command-line overrides.

use anyhow::{Context, Result};
use isotone_engine::{ChunkStrategy, RenderConfig};
use std::fs;
use std::path::Path;

/// Values given on the command line. `None` keeps the file's (or default)
/// value.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    pub sample_rate: Option<u32>,
    pub seed: Option<u32>,
    pub chunk_ms: Option<f64>,
    pub strategy: Option<ChunkStrategy>,
    pub min_duration: Option<f64>,
}

impl RenderOverrides {
    /// Applies every override that is set.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ms) = self.chunk_ms {
            config.chunk_seconds = ms / 1000.0;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(seconds) = self.min_duration {
            config.min_duration_seconds = seconds;
        }
    }
}

/// Reads a JSON render configuration. Missing fields take their defaults.
pub fn load_config_file(path: &Path) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Builds the effective configuration and validates it.
pub fn resolve(config_path: Option<&Path>, overrides: &RenderOverrides) -> Result<RenderConfig> {
    let mut config = match config_path {
        Some(path) => load_config_file(path)?,
        None => RenderConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("Invalid render configuration")?;
    tracing::debug!(?config, "render configuration resolved");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isotone_engine::CacheCapacity;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sample_rate": 22050, "seed": 3, "cache_capacity": {{"bounded": 16}}}}"#
        )
        .unwrap();

        let overrides = RenderOverrides {
            seed: Some(9),
            chunk_ms: Some(20.0),
            strategy: Some(ChunkStrategy::Independent),
            ..RenderOverrides::default()
        };
        let config = resolve(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.seed, 9);
        assert_eq!(config.chunk_seconds, 0.02);
        assert_eq!(config.strategy, ChunkStrategy::Independent);
        assert_eq!(config.cache_capacity, CacheCapacity::Bounded(16));
        assert_eq!(config.min_duration_seconds, 180.0);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, &RenderOverrides::default()).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = RenderOverrides {
            sample_rate: Some(0),
            ..RenderOverrides::default()
        };
        assert!(resolve(None, &overrides).is_err());
    }
}
