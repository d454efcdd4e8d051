// src/types.rs
use std::fmt;

/// Whether the miner is currently producing work
///
/// Derived by the status monitor from the work counter: the counter advancing
/// means [`Liveness::Mining`]; no advance for more than five seconds means
/// [`Liveness::Idle`]. Before the first sample there is no data, so the
/// default is idle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Liveness {
    /// The work counter advanced recently
    Mining,

    /// No recent progress (or no data yet)
    #[default]
    Idle,
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Liveness::Mining => write!(f, "MINING"),
            Liveness::Idle => write!(f, "NOT MINING"),
        }
    }
}
