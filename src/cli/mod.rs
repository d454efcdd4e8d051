// src/cli/mod.rs
//! Command-line interface definitions

/// Argument parsing with clap
pub mod commands;

pub use commands::{Action, Commands, ConfigOptions, StartOptions};
