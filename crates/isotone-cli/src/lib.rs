//! Isotone CLI library.
//!
//! This crate provides the core functionality for the `isotone` binary:
//! preset loading, render configuration, WAV input/output and the command
//! implementations.

pub mod audio_io;
pub mod commands;
pub mod config;
pub mod input;
pub mod logging;
