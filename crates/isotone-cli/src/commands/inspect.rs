//! Inspect command implementation
//!
//! Prints what a preset file contains without rendering it.

use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{InspectOutput, PointCounts, SegmentSummary};
use super::{print_json, Failure};
use crate::input::{load_preset, Preset};

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 on success, 1 if the preset cannot be loaded
pub fn run(preset_path: &Path, json_output: bool) -> anyhow::Result<ExitCode> {
    let output = match inspect(preset_path) {
        Ok(output) => output,
        Err(failure) => return Ok(failure.report(json_output)),
    };

    if json_output {
        print_json(&output)?;
    } else {
        print_human(&output);
    }
    Ok(ExitCode::SUCCESS)
}

/// Summarizes a preset file.
pub fn inspect(preset_path: &Path) -> Result<InspectOutput, Failure> {
    let loaded = load_preset(preset_path).map_err(Failure::Input)?;
    let preset_hash = loaded.preset.canonical_hash().map_err(Failure::Input)?;

    let output = match &loaded.preset {
        Preset::Curve(p) => InspectOutput {
            success: true,
            name: p.name.clone(),
            kind: loaded.preset.kind().as_str(),
            duration_seconds: p.duration_with_floor(0.0),
            carrier: p.carrier.name(),
            modulation: p.modulation.name(),
            preset_hash,
            point_counts: Some(PointCounts {
                entrainment: p.entrainment.len(),
                volume: p.volume.len(),
                base_freq: p.base_freq.len(),
            }),
            segments: None,
        },
        Preset::Segments(p) => InspectOutput {
            success: true,
            name: p.name.clone(),
            kind: loaded.preset.kind().as_str(),
            duration_seconds: p.total_duration(),
            carrier: p.carrier.name(),
            modulation: p.modulation.name(),
            preset_hash,
            point_counts: None,
            segments: Some(
                p.segments
                    .iter()
                    .map(|s| SegmentSummary {
                        start_freq: s.start_freq,
                        end_freq: s.end_freq,
                        base_freq: s.base_freq,
                        duration: s.duration,
                        volume: s.volume,
                        transition: s.transition.name(),
                    })
                    .collect(),
            ),
        },
    };
    Ok(output)
}

fn print_human(output: &InspectOutput) {
    println!("{} {}", "Preset:".cyan().bold(), output.name);
    println!("  {} {}", "Kind:".dimmed(), output.kind);
    println!("  {} {:.2}s", "Duration:".dimmed(), output.duration_seconds);
    println!(
        "  {} {} carrier, {} pulses",
        "Shape:".dimmed(),
        output.carrier,
        output.modulation
    );

    if let Some(counts) = output.point_counts {
        println!(
            "  {} entrainment {}, volume {}, base frequency {}",
            "Points:".dimmed(),
            counts.entrainment,
            counts.volume,
            counts.base_freq
        );
    }

    if let Some(segments) = &output.segments {
        println!("  {} {}", "Segments:".dimmed(), segments.len());
        for (i, s) in segments.iter().enumerate() {
            println!(
                "    {:>3}. {:>6.2} -> {:<6.2} Hz  base {:>7.2} Hz  {:>7.2}s  vol {:.2}  {}",
                i + 1,
                s.start_freq,
                s.end_freq,
                s.base_freq,
                s.duration,
                s.volume,
                s.transition
            );
        }
    }

    println!("  {} {}", "Hash:".dimmed(), output.preset_hash);
}
