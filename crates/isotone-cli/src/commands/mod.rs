//! CLI command implementations

pub mod inspect;
pub mod json_output;
pub mod render;
pub mod tone;

use colored::Colorize;
use std::process::ExitCode;

use json_output::{error_codes, FailureOutput, JsonError};

/// Exit code for a preset, config or background file that cannot be used.
pub const EXIT_INPUT_ERROR: u8 = 1;
/// Exit code for a failed render or WAV export.
pub const EXIT_RENDER_ERROR: u8 = 2;

/// A command failure tagged with the stage it happened in.
#[derive(Debug)]
pub enum Failure {
    Input(anyhow::Error),
    Render(anyhow::Error),
}

impl Failure {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Failure::Input(_) => EXIT_INPUT_ERROR,
            Failure::Render(_) => EXIT_RENDER_ERROR,
        }
    }

    fn parts(&self) -> (&anyhow::Error, &'static str, &'static str) {
        match self {
            Failure::Input(e) => (e, "input", error_codes::INPUT),
            Failure::Render(e) => (e, "render", error_codes::RENDER),
        }
    }

    /// Prints the failure (JSON to stdout, or colored text to stderr) and
    /// returns the matching exit code.
    pub fn report(&self, json: bool) -> ExitCode {
        let (error, stage, fallback) = self.parts();
        if json {
            let output = FailureOutput::new(JsonError::from_anyhow(error, stage, fallback));
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("{}: {}", "error".red(), e),
            }
        } else {
            eprintln!("{} {:#}", format!("{} error:", stage).red().bold(), error);
        }
        ExitCode::from(self.exit_code())
    }
}

/// Prints a serializable document as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{}", text);
    Ok(())
}
