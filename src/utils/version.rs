// src/utils/version.rs
//! Program identity used by the console and the stats label

use std::env;
use std::path::Path;

/// Version string baked in at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the running executable
///
/// This is the file name of `argv[0]`, so a renamed binary reports its new
/// name to dashboards. Falls back to the package name.
pub fn program_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Identifying label reported as the first stats field: `<program> <version>`
pub fn label() -> String {
    format!("{} {}", program_name(), VERSION)
}

/// Version line printed by the `version` console command
pub fn version_line() -> String {
    format!(
        "Version {} OS:{} ARCH:{} ",
        VERSION,
        env::consts::OS,
        env::consts::ARCH
    )
}
