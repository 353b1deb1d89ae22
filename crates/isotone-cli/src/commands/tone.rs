//! Tone command implementation
//!
//! Renders a single constant isochronic segment straight to WAV.

use anyhow::Context;
use colored::Colorize;
use isotone_engine::{mixer::peak, ToneGenerator, ToneSegment};
use isotone_spec::{CarrierWaveform, ModulationShape};
use std::path::PathBuf;
use std::process::ExitCode;

use super::json_output::ToneOutput;
use super::{print_json, Failure};
use crate::audio_io::write_wav_mono;

/// Options for `isotone tone`.
#[derive(Debug, Clone)]
pub struct ToneOptions {
    pub entrainment: f64,
    pub carrier_freq: f64,
    pub duration: f64,
    pub out: PathBuf,
    pub volume: f64,
    pub carrier: CarrierWaveform,
    pub modulation: ModulationShape,
    pub duty_cycle: f64,
    pub sample_rate: u32,
    pub seed: u32,
}

/// Run the tone command
///
/// # Returns
/// Exit code: 0 on success, 2 if generation or export failed
pub fn run(options: &ToneOptions, json_output: bool) -> anyhow::Result<ExitCode> {
    match render_tone(options) {
        Ok(output) => {
            if json_output {
                print_json(&output)?;
            } else {
                println!(
                    "{} {} Hz pulses on a {} Hz {} carrier",
                    "Tone:".cyan().bold(),
                    options.entrainment,
                    options.carrier_freq,
                    options.carrier
                );
                println!("  {} {}", "Output:".dimmed(), output.output);
                println!(
                    "  {} {} samples @ {} Hz, peak {:.4}",
                    "Length:".dimmed(),
                    output.samples,
                    output.sample_rate,
                    output.peak
                );
                println!("\n{} Wrote {}", "SUCCESS".green().bold(), output.output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Ok(failure.report(json_output)),
    }
}

/// Generates the segment and writes it.
pub fn render_tone(options: &ToneOptions) -> Result<ToneOutput, Failure> {
    let segment = ToneSegment::new(
        options.duration,
        options.carrier_freq,
        options.entrainment,
        options.volume,
    )
    .with_sample_rate(options.sample_rate)
    .with_carrier(options.carrier)
    .with_modulation(options.modulation)
    .with_duty_cycle(options.duty_cycle);

    let samples = ToneGenerator::with_seed(options.sample_rate, options.seed)
        .and_then(|mut generator| generator.generate_tone_segment(&segment))
        .context("Failed to generate tone")
        .map_err(Failure::Render)?;

    let pcm_hash =
        write_wav_mono(&options.out, &samples, options.sample_rate).map_err(Failure::Render)?;

    Ok(ToneOutput {
        success: true,
        output: options.out.display().to_string(),
        sample_rate: options.sample_rate,
        samples: samples.len(),
        peak: peak(&samples),
        pcm_hash,
    })
}
