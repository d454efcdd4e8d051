// src/utils/error.rs
use crate::stats::state::ShareResult;
use std::io;
use thiserror::Error;

/// Main error type for the miner client
///
/// Covers everything that can fail outside the status core itself:
/// configuration loading, the stats transport and background task plumbing.
/// The status monitor and console never produce errors.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Stats API server errors (bind failures, serve loop errors)
    #[error("API server error: {0}")]
    ServerError(String),

    /// Thread communication channel errors
    #[error("Thread communication error: {0}")]
    ChannelError(String),

    /// Async task execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

/// Converts crossbeam channel send errors for share results into MinerError
///
/// Happens when the engine reports a share after the listener thread is gone.
impl From<crossbeam_channel::SendError<ShareResult>> for MinerError {
    fn from(e: crossbeam_channel::SendError<ShareResult>) -> Self {
        MinerError::ChannelError(format!("Share result send failed: {}", e))
    }
}

/// Converts crossbeam channel send errors for hash counts into MinerError
impl From<crossbeam_channel::SendError<u64>> for MinerError {
    fn from(e: crossbeam_channel::SendError<u64>) -> Self {
        MinerError::ChannelError(format!("Hash count send failed: {}", e))
    }
}

/// Converts async task join errors into MinerError
///
/// Used when the status monitor or API server task panics or is aborted.
impl From<tokio::task::JoinError> for MinerError {
    fn from(e: tokio::task::JoinError) -> Self {
        MinerError::TaskError(format!("Async task failed: {}", e))
    }
}
