// src/console/mod.rs
//! Interactive console
//!
//! The controller reads lines from the terminal and runs a small fixed set of
//! commands. The prompt itself is rewritten by the status monitor.

/// Terminal input events and the prompt seam
pub mod editor;

/// Command parsing and usage text
pub mod commands;

/// The read-eval loop
pub mod controller;

pub use commands::{Command, parse_command};
pub use controller::{ConsoleController, ExitReason};
pub use editor::{LineEditor, Prompt, ReadEvent, TerminalPrompt};
