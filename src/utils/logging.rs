// src/utils/logging.rs
//! Logging configuration and utilities
//!
//! Uses `env_logger` under the hood with a compact custom format. Records go
//! to stderr because stdout belongs to the interactive console prompt.

use crate::console::editor::CrlfWriter;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::{self, IsTerminal};

/// Initializes the logging subsystem
///
/// # Configuration
/// - Logs to stderr, with `\r\n` line endings on a terminal so records stay
///   aligned while the console is in raw mode
/// - Default log level: `level` (usually taken from the config file)
/// - Custom timestamp and source location formatting
/// - `RUST_LOG`, when set, takes precedence over `level`
pub fn init_logging(level: LevelFilter) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(level);
    } else {
        builder.parse_env("RUST_LOG");
    }

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = builder.try_init();
}

/// Creates and configures a base logger builder with common settings
///
/// Format: `[<seconds> <LEVEL> <module>:<line>] <message>`
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        });

    if io::stderr().is_terminal() {
        builder.target(Target::Pipe(Box::new(CrlfWriter::new(io::stderr()))));
    } else {
        builder.target(Target::Stderr);
    }

    builder
}
