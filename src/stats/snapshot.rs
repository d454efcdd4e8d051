// src/stats/snapshot.rs
//! Point-in-time stats in the legacy `miner_getstat1` array layout
//!
//! Dashboards parse the response by position, so the field count, order and
//! the reserved placeholder values below must never change:
//!
//! | # | content                                 |
//! |---|-----------------------------------------|
//! | 1 | `<program> <version>`                   |
//! | 2 | runtime in seconds                      |
//! | 3 | `<accepted>;<rejected>;0`               |
//! | 4 | hashrate(s), `;`-joined                 |
//! | 5 | `0`                                     |
//! | 6 | `off`                                   |
//! | 7 | `0;0`                                   |
//! | 8 | pool URL                                |
//! | 9 | `0;0;0;0`                               |

use crate::stats::state::{HashrateGauge, MiningState};
use crate::utils::version;
use serde::{Serialize, Serializer};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Number of fields in a stats response
pub const FIELD_COUNT: usize = 9;

/// Transient projection of the mining state, built fresh per query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Identifying label (program name and version)
    pub version: String,
    /// Seconds since the stats endpoint started serving
    pub runtime_seconds: u64,
    /// Accepted shares
    pub accepted: u64,
    /// Rejected shares
    pub rejected: u64,
    /// One hashrate per hash source, in hashes per second
    pub hashrates: Vec<String>,
    /// Pool URL
    pub pool: String,
}

impl StatsSnapshot {
    /// Lays the snapshot out as the 9 positional wire fields
    pub fn to_fields(&self) -> [String; FIELD_COUNT] {
        [
            self.version.clone(),
            self.runtime_seconds.to_string(),
            format!("{};{};0", self.accepted, self.rejected),
            self.hashrates.join(";"),
            "0".to_string(),
            "off".to_string(),
            "0;0".to_string(),
            self.pool.clone(),
            "0;0;0;0".to_string(),
        ]
    }

    /// Wraps the wire fields for serialization
    pub fn res(&self) -> MinerStatRes {
        MinerStatRes(self.to_fields())
    }
}

/// Wire form of a [`StatsSnapshot`]: a JSON array of 9 strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerStatRes(pub [String; FIELD_COUNT]);

impl Serialize for MinerStatRes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

/// Whole seconds between `started` and `now`
///
/// Returns 0 when the start time was never recorded or lies in the future.
pub fn runtime_seconds(started: Option<Instant>, now: Instant) -> u64 {
    started
        .map(|start| now.saturating_duration_since(start).as_secs())
        .unwrap_or(0)
}

/// Read-only view used to answer stats queries
///
/// Never mutates the mining state. Safe to share between concurrent requests.
#[derive(Debug)]
pub struct StatsSource {
    state: Arc<MiningState>,
    hashrate: Arc<HashrateGauge>,
    started: OnceLock<Instant>,
    label: String,
}

impl StatsSource {
    /// Creates a source labelled with the running program's name and version
    pub fn new(state: Arc<MiningState>, hashrate: Arc<HashrateGauge>) -> Self {
        Self::with_label(state, hashrate, version::label())
    }

    /// Creates a source with an explicit identifying label
    pub fn with_label(
        state: Arc<MiningState>,
        hashrate: Arc<HashrateGauge>,
        label: impl Into<String>,
    ) -> Self {
        StatsSource {
            state,
            hashrate,
            started: OnceLock::new(),
            label: label.into(),
        }
    }

    /// Records the start of the runtime clock; later calls are ignored
    pub fn mark_started(&self, at: Instant) {
        let _ = self.started.set(at);
    }

    /// Start instant, if the endpoint has started serving
    pub fn started(&self) -> Option<Instant> {
        self.started.get().copied()
    }

    /// Captures the current stats
    pub fn get_stats(&self) -> StatsSnapshot {
        self.get_stats_at(Instant::now())
    }

    /// Captures the stats as of `now`
    pub fn get_stats_at(&self, now: Instant) -> StatsSnapshot {
        StatsSnapshot {
            version: self.label.clone(),
            runtime_seconds: runtime_seconds(self.started(), now),
            accepted: self.state.accepted_shares(),
            rejected: self.state.rejected_shares(),
            hashrates: vec![self.hashrate.get().to_string()],
            pool: self.state.pool_url(),
        }
    }
}
