//! Mailbox Watch: follows a NEO chain and keeps a registry of mailboxes
//!
//! This crate provides:
//! - A NEO 2 script disassembler and builder
//! - Contract identity recovery from a deployment transaction
//! - Contract call decoding from invocation scripts (method name + arguments)
//! - A mailbox registry unique by address and by name
//! - A polling block monitor tying it together
//!
//! # Example
//!
//! ```rust
//! use mailbox_watch::contract::ScriptBuilder;
//! use mailbox_watch::core::{Block, Transaction};
//! use mailbox_watch::crypto::UInt160;
//! use mailbox_watch::monitor::{BlockMonitor, MemoryChain, MonitorConfig};
//!
//! let bytecode = [0x00, 0xc5, 0x6b, 0x61, 0x66];
//! let mut deploy = ScriptBuilder::new();
//! deploy.deploy(&bytecode, "Mailbox");
//! let deployment = Transaction::invocation(deploy.build());
//!
//! let mut monitor =
//!     BlockMonitor::new(MemoryChain::new(), Some(&deployment), MonitorConfig::default()).unwrap();
//!
//! let mut call = ScriptBuilder::new();
//! call.invoke(
//!     &UInt160::from_script(&bytecode),
//!     "registerMailbox",
//!     &[vec![1; 20], b"alice_box".to_vec()],
//! );
//! let block = Block::new(1, String::new(), vec![Transaction::invocation(call.build())]);
//!
//! let registrations = monitor.process_block(&block);
//! assert_eq!(registrations[0].outcome.to_string(), "OK");
//! assert!(monitor.registry().get_by_name("alice_box").is_some());
//! ```

pub mod contract;
pub mod core;
pub mod crypto;
pub mod mailbox;
pub mod monitor;
pub mod storage;

// Re-export commonly used types
pub use contract::{
    disassemble, CallExtractor, ContractCall, ContractIdentity, Instruction, OpCode,
    ScriptBuilder,
};
pub use core::{Block, Transaction, TransactionKind};
pub use crypto::UInt160;
pub use mailbox::{Mailbox, MailboxRegistry, Registration, RegistrationOutcome};
pub use monitor::{
    BlockMonitor, ChainProvider, MemoryChain, MonitorConfig, MonitorControl, MonitorError,
};
pub use storage::TransactionCache;
