//! Render command implementation
//!
//! Renders a preset file to a mono 16-bit WAV, optionally looped to a target
//! length and mixed over a background track.

use anyhow::Context;
use colored::Colorize;
use isotone_engine::{mix_with_background, render_looped, ChunkedRenderer, RenderedAudio};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::RenderOutput;
use super::{print_json, Failure};
use crate::audio_io::{read_wav_mono, write_wav_mono};
use crate::config::{self, RenderOverrides};
use crate::input::{load_preset, LoadResult, Preset};

/// Default level of a background track under the tone.
pub const DEFAULT_BACKGROUND_VOLUME: f64 = 0.3;

/// Options for `isotone render`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub preset: PathBuf,
    pub out: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: RenderOverrides,
    pub background: Option<PathBuf>,
    pub background_volume: f64,
    /// Loop the rendered audio until it lasts this many seconds. When unset,
    /// a segment preset marked `loop` is looped to the session floor
    /// (`min_duration_seconds`).
    pub loop_to: Option<f64>,
}

impl RenderOptions {
    /// Options with no config file, background or looping.
    pub fn new(preset: impl Into<PathBuf>, out: impl Into<PathBuf>) -> Self {
        Self {
            preset: preset.into(),
            out: out.into(),
            config: None,
            overrides: RenderOverrides::default(),
            background: None,
            background_volume: DEFAULT_BACKGROUND_VOLUME,
            loop_to: None,
        }
    }
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 on success, 1 for unusable input, 2 if rendering or export failed
pub fn run(options: &RenderOptions, json_output: bool) -> anyhow::Result<ExitCode> {
    match render_to_file(options) {
        Ok(output) => {
            if json_output {
                print_json(&output)?;
            } else {
                print_summary(&output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Ok(failure.report(json_output)),
    }
}

/// Loads, renders and writes; the summary describes the written file.
pub fn render_to_file(options: &RenderOptions) -> Result<RenderOutput, Failure> {
    let start = Instant::now();

    let config = config::resolve(options.config.as_deref(), &options.overrides)
        .map_err(Failure::Input)?;
    let LoadResult {
        preset,
        source_hash,
    } = load_preset(&options.preset).map_err(Failure::Input)?;
    let preset_hash = preset.canonical_hash().map_err(Failure::Input)?;
    let background = options
        .background
        .as_deref()
        .map(read_wav_mono)
        .transpose()
        .map_err(Failure::Input)?;
    if !(options.background_volume.is_finite() && options.background_volume >= 0.0) {
        return Err(Failure::Input(anyhow::anyhow!(
            "background volume must be zero or positive, got {}",
            options.background_volume
        )));
    }

    let session_floor = config.min_duration_seconds;
    let mut renderer = ChunkedRenderer::new(config)
        .context("Invalid render configuration")
        .map_err(Failure::Input)?;
    let RenderedAudio {
        mut samples,
        sample_rate,
    } = match &preset {
        Preset::Curve(p) => renderer.render(p),
        Preset::Segments(p) => renderer.render_segments(p),
    }
    .with_context(|| format!("Failed to render preset '{}'", preset.name()))
    .map_err(Failure::Render)?;

    let loop_target = options.loop_to.or(match &preset {
        Preset::Segments(p) if p.loop_playback => Some(session_floor),
        _ => None,
    });
    if let Some(target) = loop_target {
        tracing::debug!(seconds = target, "looping rendered audio");
        samples = render_looped(&samples, sample_rate, target);
    }

    if let Some(background) = background {
        if background.sample_rate != sample_rate {
            tracing::warn!(
                background_rate = background.sample_rate,
                sample_rate,
                "background sample rate differs from render rate; mixing without resampling"
            );
        }
        samples = mix_with_background(&samples, &background.samples, options.background_volume);
    }

    let pcm_hash = write_wav_mono(&options.out, &samples, sample_rate).map_err(Failure::Render)?;
    let audio = RenderedAudio {
        samples,
        sample_rate,
    };

    Ok(RenderOutput {
        success: true,
        preset: preset.name().to_string(),
        kind: preset.kind().as_str(),
        preset_hash,
        source_hash,
        output: options.out.display().to_string(),
        sample_rate,
        samples: audio.samples.len(),
        duration_seconds: audio.duration_seconds(),
        peak: audio.peak(),
        pcm_hash,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

fn print_summary(output: &RenderOutput) {
    println!(
        "{} {} ({})",
        "Rendered:".cyan().bold(),
        output.preset,
        output.kind
    );
    println!("  {} {}", "Output:".dimmed(), output.output);
    println!(
        "  {} {:.2}s, {} samples @ {} Hz",
        "Length:".dimmed(),
        output.duration_seconds,
        output.samples,
        output.sample_rate
    );
    println!("  {} {:.4}", "Peak:".dimmed(), output.peak);
    println!("  {} {}", "Preset hash:".dimmed(), &output.preset_hash[..16]);
    println!("  {} {}", "PCM hash:".dimmed(), &output.pcm_hash[..16]);
    println!(
        "\n{} Rendered in {}ms",
        "SUCCESS".green().bold(),
        output.elapsed_ms
    );
}
