//! Core chain types
//!
//! The minimal block and transaction model the monitor consumes from a
//! chain provider.

pub mod block;
pub mod transaction;

pub use block::Block;
pub use transaction::{Transaction, TransactionKind};
