//! CLI argument definitions for the isotone command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use isotone_cli::commands::render::DEFAULT_BACKGROUND_VOLUME;
use isotone_engine::ChunkStrategy;
use std::path::PathBuf;

/// Isotone - isochronic tone renderer
#[derive(Parser)]
#[command(name = "isotone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Chunk boundary handling, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// Phases run on across chunks
    PhaseContinuous,
    /// Every chunk restarts at phase 0 (cached segments)
    Independent,
}

impl From<StrategyArg> for ChunkStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::PhaseContinuous => ChunkStrategy::PhaseContinuous,
            StrategyArg::Independent => ChunkStrategy::Independent,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render a preset file to WAV
    Render {
        /// Path to the preset file (curve or segment-list JSON)
        #[arg(short, long)]
        preset: PathBuf,

        /// Output WAV path
        #[arg(short, long)]
        out: PathBuf,

        /// Render configuration file (JSON); flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Seed for noise carriers
        #[arg(long)]
        seed: Option<u32>,

        /// Curve sampling interval in milliseconds
        #[arg(long)]
        chunk_ms: Option<f64>,

        /// Chunk boundary handling
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Shortest session length in seconds
        #[arg(long)]
        min_duration: Option<f64>,

        /// Background WAV mixed under the tone
        #[arg(long)]
        background: Option<PathBuf>,

        /// Level of the background track
        #[arg(long, default_value_t = DEFAULT_BACKGROUND_VOLUME)]
        background_volume: f64,

        /// Loop the rendered tone until it lasts this many seconds; segment
        /// presets marked `loop` default to --min-duration
        #[arg(long)]
        loop_to: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render one constant isochronic segment to WAV
    Tone {
        /// Pulse rate in Hz
        #[arg(short, long)]
        entrainment: f64,

        /// Carrier frequency in Hz
        #[arg(short, long, default_value_t = 100.0)]
        carrier: f64,

        /// Length in seconds
        #[arg(short, long)]
        duration: f64,

        /// Output WAV path
        #[arg(short, long)]
        out: PathBuf,

        /// Output level
        #[arg(long, default_value_t = 0.5)]
        volume: f64,

        /// Carrier waveform (sine, square, triangle, sawtooth, noise)
        #[arg(long, default_value = "sine")]
        carrier_wave: String,

        /// Envelope shape (square, sine, trapezoid, gaussian)
        #[arg(long, default_value = "square")]
        modulation: String,

        /// "On" fraction of each pulse
        #[arg(long, default_value_t = 0.5)]
        duty: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Seed for noise carriers
        #[arg(long, default_value_t = 0)]
        seed: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print a summary of a preset file
    Inspect {
        /// Path to the preset file
        #[arg(short, long)]
        preset: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
