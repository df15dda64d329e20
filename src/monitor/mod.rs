//! Chain monitoring
//!
//! A single sequential task that follows the chain tip:
//! - `provider`: read access to blocks and transactions
//! - `control`: cooperative run/stop signalling
//! - `block_monitor`: the polling loop, scan and dispatch

pub mod block_monitor;
pub mod control;
pub mod provider;

pub use block_monitor::{
    BlockMonitor, MonitorConfig, MonitorError, MonitorStats, DEFAULT_POLL_INTERVAL,
};
pub use control::{MonitorControl, MonitorState};
pub use provider::{ChainFixture, ChainProvider, MemoryChain, ProviderError};
