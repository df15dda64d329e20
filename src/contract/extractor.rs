//! Contract call extraction
//!
//! Recovers `(method, args)` pairs from the instruction stream of an
//! invocation script. A call compiled for the NEO VM leaves this shape:
//!
//! ```text
//! i-4-n .. i-4   PUSH argN ... PUSH arg1   arguments, last one first
//! i-3            PUSH<count>
//! i-2            PACK
//! i-1            PUSH "method"
//! i              APPCALL <20-byte script hash>
//! ```
//!
//! Walking back from `i-4` therefore yields the arguments in source order.

use crate::contract::disassembler::Instruction;
use crate::contract::opcodes::OpCode;
use crate::crypto::{UInt160, UINT160_SIZE};
use serde::Serialize;
use thiserror::Error;

/// Distance from the call site back to the argument count push
const ARG_COUNT_OFFSET: usize = 3;

/// Distance from the call site back to the last pushed argument
const FIRST_ARG_OFFSET: usize = 4;

/// Errors that invalidate the whole instruction stream of a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Call at offset {offset} reads before the start of the script (index {index} - {back})")]
    Underflow {
        offset: usize,
        index: usize,
        back: usize,
    },
}

/// A decoded invocation of the monitored contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCall {
    /// Byte offset of the APPCALL in the script
    pub offset: usize,
    pub method: String,
    pub args: Vec<Vec<u8>>,
}

/// Finds calls to one contract in instruction streams
#[derive(Debug, Clone)]
pub struct CallExtractor {
    contract: Option<UInt160>,
}

impl CallExtractor {
    /// Create an extractor for `contract`. With `None`, nothing ever matches.
    pub fn new(contract: Option<UInt160>) -> Self {
        Self { contract }
    }

    /// Script hash of the contract being matched
    pub fn contract(&self) -> Option<&UInt160> {
        self.contract.as_ref()
    }

    /// Extract every call to the contract, in instruction order
    pub fn extract(&self, code: &[Instruction]) -> Result<Vec<ContractCall>, DecodeError> {
        let mut calls = Vec::new();
        let Some(contract) = self.contract else {
            return Ok(calls);
        };

        for (i, instruction) in code.iter().enumerate().skip(1) {
            let Some(target) = call_target(instruction) else {
                continue;
            };
            if target != contract {
                continue;
            }

            if let Some(call) = decode_call(code, i)? {
                calls.push(call);
            }
        }

        Ok(calls)
    }
}

/// The script hash an APPCALL invokes, if `instruction` is one
fn call_target(instruction: &Instruction) -> Option<UInt160> {
    if instruction.opcode != OpCode::AppCall {
        return None;
    }
    match instruction.operand.as_deref() {
        Some(operand) if operand.len() == UINT160_SIZE => UInt160::from_slice(operand).ok(),
        _ => None,
    }
}

/// Decode the call whose APPCALL sits at index `i`.
///
/// `Ok(None)` means the site does not follow the calling convention and is
/// skipped; `Err` means the convention points outside the script.
fn decode_call(code: &[Instruction], i: usize) -> Result<Option<ContractCall>, DecodeError> {
    let offset = code[i].offset;
    let back = |n: usize| {
        i.checked_sub(n).ok_or(DecodeError::Underflow {
            offset,
            index: i,
            back: n,
        })
    };

    let Some(method) = code[i - 1].operand_str() else {
        log::debug!("Skipping call at offset {}: no method name", offset);
        return Ok(None);
    };

    let Some(arg_count) = stack_int(&code[back(ARG_COUNT_OFFSET)?]) else {
        log::debug!("Skipping call to {} at offset {}: no argument count", method, offset);
        return Ok(None);
    };

    let mut args = Vec::with_capacity(arg_count);
    for step in 0..arg_count {
        let index = back(FIRST_ARG_OFFSET + step)?;
        match code[index].push_value() {
            Some(value) => args.push(value),
            None => {
                log::debug!(
                    "Skipping call to {} at offset {}: argument {} is not a push",
                    method,
                    offset,
                    step
                );
                return Ok(None);
            }
        }
    }

    Ok(Some(ContractCall {
        offset,
        method: method.to_string(),
        args,
    }))
}

/// Small non-negative integer pushed by an instruction: PUSH0..PUSH16, or a
/// short little-endian PUSHBYTES for larger counts
fn stack_int(instruction: &Instruction) -> Option<usize> {
    if let Some(n) = instruction.opcode.small_int() {
        return Some(n);
    }
    if !instruction.opcode.is_push_bytes() {
        return None;
    }
    let bytes = instruction.operand.as_deref()?;
    if bytes.len() > 2 || bytes.last().is_some_and(|b| b & 0x80 != 0) {
        return None;
    }
    Some(
        bytes
            .iter()
            .rev()
            .fold(0usize, |acc, byte| (acc << 8) | *byte as usize),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::builder::ScriptBuilder;
    use crate::contract::disassembler::disassemble;

    fn contract() -> UInt160 {
        UInt160::from_script(b"mailbox contract")
    }

    fn push(data: &[u8]) -> Instruction {
        Instruction::new(OpCode::PushBytes1, Some(data.to_vec()))
    }

    #[test]
    fn test_extract_reverses_push_order() {
        let hash = contract();
        let code = vec![
            push(b"push1"),
            push(b"push2"),
            Instruction::new(OpCode::Push2, None),
            Instruction::new(OpCode::Pack, None),
            push(b"registerMailbox"),
            Instruction::new(OpCode::AppCall, Some(hash.as_bytes().to_vec())),
        ];

        let calls = CallExtractor::new(Some(hash)).extract(&code).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "registerMailbox");
        assert_eq!(calls[0].args, vec![b"push2".to_vec(), b"push1".to_vec()]);
    }

    #[test]
    fn test_builder_invocation_round_trips_source_order() {
        let hash = contract();
        let mut builder = ScriptBuilder::new();
        builder.invoke(&hash, "registerMailbox", &[vec![1; 20], b"alice_box".to_vec()]);

        let code = disassemble(&builder.build()).unwrap();
        let calls = CallExtractor::new(Some(hash)).extract(&code).unwrap();
        assert_eq!(calls[0].args, vec![vec![1; 20], b"alice_box".to_vec()]);
    }

    #[test]
    fn test_other_contract_ignored() {
        let mut builder = ScriptBuilder::new();
        builder.invoke(&UInt160::new([0xee; 20]), "transfer", &[vec![1], vec![2]]);

        let code = disassemble(&builder.build()).unwrap();
        let calls = CallExtractor::new(Some(contract())).extract(&code).unwrap();
        assert!(calls.is_empty());
    }

    #[test]
    fn test_unknown_contract_matches_nothing() {
        let hash = contract();
        let mut builder = ScriptBuilder::new();
        builder.invoke(&hash, "registerMailbox", &[vec![1; 20], b"alice_box".to_vec()]);

        let code = disassemble(&builder.build()).unwrap();
        assert!(CallExtractor::new(None).extract(&code).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_calls_in_order() {
        let hash = contract();
        let mut builder = ScriptBuilder::new();
        builder
            .invoke(&hash, "first", &[])
            .invoke(&UInt160::new([1; 20]), "elsewhere", &[])
            .invoke(&hash, "second", &[b"x".to_vec()]);

        let code = disassemble(&builder.build()).unwrap();
        let calls = CallExtractor::new(Some(hash)).extract(&code).unwrap();
        let methods: Vec<&str> = calls.iter().map(|c| c.method.as_str()).collect();
        assert_eq!(methods, vec!["first", "second"]);
        assert!(calls[0].args.is_empty());
    }

    #[test]
    fn test_short_operand_is_not_a_call_site() {
        let code = vec![
            push(b"m"),
            Instruction::new(OpCode::AppCall, Some(vec![0; 19])),
        ];
        assert!(CallExtractor::new(Some(contract()))
            .extract(&code)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_method_name_skipped() {
        let hash = contract();
        let code = vec![
            Instruction::new(OpCode::Push0, None),
            Instruction::new(OpCode::Pack, None),
            Instruction::new(OpCode::Nop, None),
            Instruction::new(OpCode::AppCall, Some(hash.as_bytes().to_vec())),
        ];
        assert!(CallExtractor::new(Some(hash)).extract(&code).unwrap().is_empty());
    }

    #[test]
    fn test_underflow_is_decode_error() {
        let hash = contract();
        let code = vec![
            push(b"registerMailbox"),
            Instruction::new(OpCode::AppCall, Some(hash.as_bytes().to_vec())),
        ];
        assert_eq!(
            CallExtractor::new(Some(hash)).extract(&code),
            Err(DecodeError::Underflow {
                offset: 0,
                index: 1,
                back: 3
            })
        );
    }

    #[test]
    fn test_argument_walk_underflow() {
        let hash = contract();
        // Claims three arguments but only one is on the stack
        let code = vec![
            push(b"only"),
            Instruction::new(OpCode::Push3, None),
            Instruction::new(OpCode::Pack, None),
            push(b"registerMailbox"),
            Instruction::new(OpCode::AppCall, Some(hash.as_bytes().to_vec())),
        ];
        assert!(matches!(
            CallExtractor::new(Some(hash)).extract(&code),
            Err(DecodeError::Underflow { back: 5, .. })
        ));
    }

    #[test]
    fn test_large_argument_count() {
        let hash = contract();
        let args: Vec<Vec<u8>> = (0..20u8).map(|n| vec![n + 0x20]).collect();
        let mut builder = ScriptBuilder::new();
        builder.invoke(&hash, "many", &args);

        let code = disassemble(&builder.build()).unwrap();
        let calls = CallExtractor::new(Some(hash)).extract(&code).unwrap();
        assert_eq!(calls[0].args, args);
    }
}
