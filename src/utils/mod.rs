// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Error handling, logging setup, display formatting and program identity.

/// Error types and handling utilities
///
/// Contains the [`MinerError`] enum which defines all possible error conditions
/// for the miner client, along with conversion implementations.
pub mod error;

/// Logging configuration and utilities
pub mod logging;

/// Hashrate and uptime formatting
pub mod format;

/// Program name and version reporting
pub mod version;

// Re-export for easier access
pub use error::MinerError;
pub use logging::init_logging;
