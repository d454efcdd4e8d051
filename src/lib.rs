//! DERO Miner - live status core of a stratum mining client
//!
//! This crate provides the parts of the miner that report on mining rather
//! than perform it:
//! - A status monitor deriving hashrate and a mining/idle signal from the
//!   engine's work counter, shown in the console prompt
//! - A `miner_getstat1` stats endpoint in the legacy dashboard array format
//! - An interactive console with a small fixed command set
//!
//! The proof-of-work engine and the stratum connection feed
//! [`stats::MiningState`] and are not part of this crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Mining counters, status monitor and stats snapshots
pub mod stats;

/// Stats query endpoint (JSON-RPC over HTTP)
pub mod api;

/// Interactive console
pub mod console;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared handles passed to each component
pub mod context;

/// Shared type definitions
pub mod types;

// Core exports
pub use api::ApiServer;
pub use cli::Commands;
pub use config::Config;
pub use console::{ConsoleController, ExitReason};
pub use context::MinerContext;
pub use stats::{HashrateGauge, MiningState, StatsSnapshot, StatsSource, StatusMonitor};
pub use types::Liveness;
pub use utils::{MinerError, init_logging};
