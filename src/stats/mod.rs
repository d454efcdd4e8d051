//! Mining status tracking and reporting
//!
//! This module covers the live-status core of the client:
//! - Shared counters fed by the mining engine ([`MiningState`])
//! - The once-per-second status monitor deriving hashrate and liveness
//! - Snapshots in the legacy `miner_getstat1` layout
//!

/// Engine-facing counters and the hashrate gauge
pub mod state;

/// Background sampling loop driving the console prompt
pub mod monitor;

/// Stats snapshots for the stats endpoint
pub mod snapshot;

// Re-export main components
pub use monitor::StatusMonitor;
pub use snapshot::{MinerStatRes, StatsSnapshot, StatsSource};
pub use state::{HashrateGauge, MiningState, ShareResult};
