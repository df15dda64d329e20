//! Contract locator
//!
//! Derives the monitored contract's identity from the instruction stream of
//! its deployment transaction.

use crate::contract::builder::CONTRACT_CREATE_SYSCALL;
use crate::contract::disassembler::Instruction;
use crate::contract::opcodes::OpCode;
use crate::crypto::UInt160;
use serde::{Deserialize, Serialize};

/// Bytecode of the monitored contract and the script hash derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractIdentity {
    #[serde(with = "hex::serde")]
    pub bytecode: Vec<u8>,
    pub hash: UInt160,
}

impl ContractIdentity {
    pub fn from_bytecode(bytecode: Vec<u8>) -> Self {
        let hash = UInt160::from_script(&bytecode);
        Self { bytecode, hash }
    }
}

/// Find the contract created by a deployment script.
///
/// Scans from the second instruction for the first `Neo.Contract.Create`
/// SYSCALL and takes the operand of the instruction right before it as the
/// bytecode. Returns `None` when the script creates no contract.
pub fn locate_contract(code: &[Instruction]) -> Option<ContractIdentity> {
    for (i, instruction) in code.iter().enumerate().skip(1) {
        if instruction.opcode != OpCode::SysCall
            || instruction.operand.as_deref() != Some(CONTRACT_CREATE_SYSCALL.as_bytes())
        {
            continue;
        }

        return match &code[i - 1].operand {
            Some(bytecode) => {
                let identity = ContractIdentity::from_bytecode(bytecode.clone());
                log::info!(
                    "Located contract {} ({} bytes of bytecode)",
                    identity.hash,
                    identity.bytecode.len()
                );
                Some(identity)
            }
            None => {
                log::warn!(
                    "Contract creation at offset {} has no bytecode push",
                    instruction.offset
                );
                None
            }
        };
    }

    None
}
