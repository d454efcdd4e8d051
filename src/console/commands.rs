// src/console/commands.rs
//! Console command parsing

use std::io::{self, Write};

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print usage
    Help,
    /// Print hashrate, shares, pool and uptime
    Status,
    /// `say <text>`; reserved for broadcasting, currently only validated
    Say(String),
    /// Print version and platform
    Version,
    /// `bye`, `exit` or `quit`
    Quit,
    /// Blank line
    Empty,
    /// Anything else; echoed back
    Echo(String),
}

/// Parses one line of console input
///
/// The line is trimmed and its first whitespace-separated token, lower-cased,
/// selects the command. `say` matches as a case-sensitive prefix and the quit
/// words only when they make up the whole line.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let command = line
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if command == "help" {
        Command::Help
    } else if let Some(text) = line.strip_prefix("say") {
        Command::Say(text.trim().to_string())
    } else if command == "version" {
        Command::Version
    } else if command == "status" {
        Command::Status
    } else if matches!(line.to_lowercase().as_str(), "bye" | "exit" | "quit") {
        Command::Quit
    } else if line.is_empty() {
        Command::Empty
    } else {
        Command::Echo(line.to_string())
    }
}

/// Writes the command overview
pub fn usage<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "commands:")?;
    for (name, description) in [
        ("help", "this help"),
        ("status", "Show general information"),
        ("say", "Reserved, takes a message"),
        ("bye", "Quit the miner"),
        ("version", "Show version"),
        ("exit", "Quit the miner"),
        ("quit", "Quit the miner"),
    ] {
        writeln!(w, "\t\x1b[1m{}\x1b[0m\t\t{}", name, description)?;
    }
    Ok(())
}
