// src/stats/state.rs
//! Shared mining counters
//!
//! [`MiningState`] is written by the mining/stratum engine and read by the
//! status monitor, the stats endpoint and the console. Every field is either
//! atomic or behind an [`ArcSwap`], so readers never see torn values.

use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of submitting a share to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResult {
    /// The share was accepted as valid
    Accepted,
    /// The share was rejected by the pool
    Rejected,
}

/// Counters and pool information produced by the mining engine
#[derive(Debug)]
pub struct MiningState {
    /// Monotonic count of work units (hashes) completed
    work_counter: AtomicU64,
    /// Shares accepted by the pool
    accepted: AtomicU64,
    /// Shares rejected by the pool
    rejected: AtomicU64,
    /// Pool currently mined against; swapped on reconnect/failover
    pool_url: ArcSwap<String>,
    /// Fixed at startup
    testnet: bool,
}

impl MiningState {
    /// Creates an empty state with zeroed counters
    ///
    /// # Arguments
    /// * `pool_url` - Initial pool URL (may be empty before the engine connects)
    /// * `testnet` - Whether the client mines on testnet
    pub fn new(pool_url: impl Into<String>, testnet: bool) -> Self {
        MiningState {
            work_counter: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            pool_url: ArcSwap::from_pointee(pool_url.into()),
            testnet,
        }
    }

    /// Adds completed work units to the counter
    pub fn add_hashes(&self, count: u64) {
        self.work_counter.fetch_add(count, Ordering::AcqRel);
    }

    /// Records the pool's verdict on a submitted share
    pub fn record_share(&self, result: ShareResult) {
        match result {
            ShareResult::Accepted => self.accepted.fetch_add(1, Ordering::AcqRel),
            ShareResult::Rejected => self.rejected.fetch_add(1, Ordering::AcqRel),
        };
    }

    /// Replaces the pool URL
    pub fn set_pool_url(&self, url: impl Into<String>) {
        self.pool_url.store(Arc::new(url.into()));
    }

    /// Current value of the work counter
    pub fn work_counter(&self) -> u64 {
        self.work_counter.load(Ordering::Acquire)
    }

    /// Number of accepted shares
    pub fn accepted_shares(&self) -> u64 {
        self.accepted.load(Ordering::Acquire)
    }

    /// Number of rejected shares
    pub fn rejected_shares(&self) -> u64 {
        self.rejected.load(Ordering::Acquire)
    }

    /// Accepted plus rejected shares
    pub fn total_shares(&self) -> u64 {
        self.accepted_shares().saturating_add(self.rejected_shares())
    }

    /// Pool URL currently in use
    pub fn pool_url(&self) -> String {
        self.pool_url.load().as_ref().clone()
    }

    /// Whether the client runs against testnet
    pub fn testnet(&self) -> bool {
        self.testnet
    }

    /// Creates and returns a channel sender for share results
    ///
    /// The returned sender can be used by engines that report over channels.
    /// A background thread folds the results into the counters until every
    /// sender is dropped.
    pub fn share_sender(self: &Arc<Self>) -> Sender<ShareResult> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.start_share_listener(rx);
        tx
    }

    /// Creates and returns a channel sender for hash counts
    ///
    /// Same lifecycle as [`MiningState::share_sender`].
    pub fn hash_sender(self: &Arc<Self>) -> Sender<u64> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.start_hash_listener(rx);
        tx
    }

    fn start_share_listener(self: &Arc<Self>, receiver: Receiver<ShareResult>) {
        let state = Arc::clone(self);

        std::thread::spawn(move || {
            for result in receiver {
                state.record_share(result);
            }
        });
    }

    fn start_hash_listener(self: &Arc<Self>, receiver: Receiver<u64>) {
        let state = Arc::clone(self);

        std::thread::spawn(move || {
            for count in receiver {
                state.add_hashes(count);
            }
        });
    }
}

/// Last hashrate computed by the status monitor, in hashes per second
///
/// Written only by the monitor; the stats endpoint and console read it.
#[derive(Debug, Default)]
pub struct HashrateGauge {
    value: AtomicU64,
}

impl HashrateGauge {
    /// Creates a gauge reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new hashrate
    pub fn set(&self, hashes_per_second: u64) {
        self.value.store(hashes_per_second, Ordering::Release);
    }

    /// Reads the current hashrate
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }
}
