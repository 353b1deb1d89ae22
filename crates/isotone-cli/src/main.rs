//! Isotone CLI - render isochronic tone presets to audio files
//!
//! This binary provides commands for rendering curve and segment-list
//! presets, generating single tones and inspecting preset files.

mod cli_args;

use clap::Parser;
use isotone_spec::{CarrierWaveform, ModulationShape};
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use isotone_cli::commands::render::RenderOptions;
use isotone_cli::commands::tone::ToneOptions;
use isotone_cli::commands::{self, EXIT_INPUT_ERROR};
use isotone_cli::config::RenderOverrides;
use isotone_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            preset,
            out,
            config,
            sample_rate,
            seed,
            chunk_ms,
            strategy,
            min_duration,
            background,
            background_volume,
            loop_to,
            json,
        } => {
            let options = RenderOptions {
                config,
                overrides: RenderOverrides {
                    sample_rate,
                    seed,
                    chunk_ms,
                    strategy: strategy.map(Into::into),
                    min_duration,
                },
                background,
                background_volume,
                loop_to,
                ..RenderOptions::new(preset, out)
            };
            commands::render::run(&options, json)
        }
        Commands::Tone {
            entrainment,
            carrier,
            duration,
            out,
            volume,
            carrier_wave,
            modulation,
            duty,
            sample_rate,
            seed,
            json,
        } => {
            let options = ToneOptions {
                entrainment,
                carrier_freq: carrier,
                duration,
                out,
                volume,
                carrier: CarrierWaveform::from_name_lenient(&carrier_wave),
                modulation: ModulationShape::from_name_lenient(&modulation),
                duty_cycle: duty,
                sample_rate,
                seed,
            };
            commands::tone::run(&options, json)
        }
        Commands::Inspect { preset, json } => commands::inspect::run(&preset, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(EXIT_INPUT_ERROR)
        }
    }
}
