// src/api/mod.rs
//! Remote stats query interface
//!
//! Exposes `miner_getstat1` over JSON-RPC so external dashboards and pool
//! tooling can poll the miner.

/// JSON-RPC request dispatch
pub mod rpc;

/// HTTP server hosting the RPC endpoint
pub mod server;

pub use rpc::{RpcError, RpcRegistry};
pub use server::{ApiServer, STATS_METHOD};
