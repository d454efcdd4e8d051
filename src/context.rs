// src/context.rs
//! Shared handles passed to each component at construction

use crate::console::editor::Prompt;
use crate::stats::monitor::StatusMonitor;
use crate::stats::snapshot::StatsSource;
use crate::stats::state::{HashrateGauge, MiningState};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Everything the status core shares across its loops
///
/// Cloning is cheap; every field is a handle. Components take only the part
/// they need: the monitor reads `state` and writes `hashrate`, the stats
/// endpoint and console only read.
#[derive(Debug, Clone)]
pub struct MinerContext {
    /// Counters written by the mining engine
    pub state: Arc<MiningState>,
    /// Hashrate published by the status monitor
    pub hashrate: Arc<HashrateGauge>,
    /// Process-wide shutdown signal
    pub cancel: CancellationToken,
    /// When the client started
    pub started: Instant,
}

impl MinerContext {
    /// Creates a fresh context with zeroed counters
    pub fn new(pool_url: impl Into<String>, testnet: bool) -> Self {
        MinerContext {
            state: Arc::new(MiningState::new(pool_url, testnet)),
            hashrate: Arc::new(HashrateGauge::new()),
            cancel: CancellationToken::new(),
            started: Instant::now(),
        }
    }

    /// Builds the status monitor writing to `prompt`
    pub fn status_monitor(&self, prompt: Arc<dyn Prompt>) -> StatusMonitor {
        StatusMonitor::new(Arc::clone(&self.state), Arc::clone(&self.hashrate), prompt)
    }

    /// Builds the read-only source behind the stats endpoint
    pub fn stats_source(&self) -> StatsSource {
        StatsSource::new(Arc::clone(&self.state), Arc::clone(&self.hashrate))
    }
}
