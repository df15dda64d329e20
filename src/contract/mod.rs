//! Contract script analysis
//!
//! Scripts are never executed here. This module decodes them:
//! - `opcodes`: the NEO 2 opcode table and operand layouts
//! - `disassembler`: raw script bytes to an instruction stream
//! - `builder`: script assembly for deployments and invocations
//! - `locator`: the monitored contract's identity from its deployment
//! - `extractor`: `(method, args)` recovery from invocation scripts
//!
//! # Example
//!
//! ```rust
//! use mailbox_watch::contract::{disassemble, locate_contract, CallExtractor, ScriptBuilder};
//!
//! let mut deploy = ScriptBuilder::new();
//! deploy.deploy(&[0x00, 0x6b, 0x66], "Mailbox");
//! let identity = locate_contract(&disassemble(&deploy.build()).unwrap()).unwrap();
//!
//! let mut invoke = ScriptBuilder::new();
//! invoke.invoke(&identity.hash, "registerMailbox", &[vec![7; 20], b"my_box".to_vec()]);
//!
//! let extractor = CallExtractor::new(Some(identity.hash));
//! let calls = extractor.extract(&disassemble(&invoke.build()).unwrap()).unwrap();
//! assert_eq!(calls[0].method, "registerMailbox");
//! assert_eq!(calls[0].args[1], b"my_box".to_vec());
//! ```

pub mod builder;
pub mod disassembler;
pub mod extractor;
pub mod locator;
pub mod opcodes;

pub use builder::{ScriptBuilder, CONTRACT_CREATE_SYSCALL};
pub use disassembler::{
    disassemble, disassemble_to_string, Disassembler, DisassemblyError, Instruction,
    NeoDisassembler,
};
pub use extractor::{CallExtractor, ContractCall, DecodeError};
pub use locator::{locate_contract, ContractIdentity};
pub use opcodes::{OpCode, OperandSize};
