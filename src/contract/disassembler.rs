//! Script disassembler
//!
//! Turns raw script bytes into an ordered list of [`Instruction`]s. The call
//! extractor and the contract locator only ever see this decoded form.

use crate::contract::opcodes::{OpCode, OperandSize};
use std::fmt::Write as _;
use thiserror::Error;

/// Disassembly errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisassemblyError {
    #[error("Unknown opcode 0x{opcode:02x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("Truncated operand for {name} at offset {offset}: need {needed} bytes, {available} left")]
    TruncatedOperand {
        name: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// One decoded (opcode, operand) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Byte offset of the opcode within the script
    pub offset: usize,
    pub opcode: OpCode,
    /// Operand bytes, without any length prefix
    pub operand: Option<Vec<u8>>,
}

impl Instruction {
    pub fn new(opcode: OpCode, operand: Option<Vec<u8>>) -> Self {
        Self {
            offset: 0,
            opcode,
            operand,
        }
    }

    /// Operand bytes as a string, when they are valid UTF-8
    pub fn operand_str(&self) -> Option<&str> {
        self.operand
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// The byte string this instruction leaves on the evaluation stack.
    ///
    /// Data pushes yield their operand; PUSH0..PUSH16 and PUSHM1 yield the
    /// minimal little-endian integer encoding. Anything else is not a push.
    pub fn push_value(&self) -> Option<Vec<u8>> {
        if let Some(operand) = &self.operand {
            return self.opcode.is_push().then(|| operand.clone());
        }
        match self.opcode {
            OpCode::PushM1 => Some(vec![0xff]),
            op => op
                .small_int()
                .map(|n| if n == 0 { Vec::new() } else { vec![n as u8] }),
        }
    }
}

/// Anything that can decode a raw script into instructions
pub trait Disassembler {
    fn disassemble(&self, script: &[u8]) -> Result<Vec<Instruction>, DisassemblyError>;
}

/// Disassembler for NEO 2 scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct NeoDisassembler;

impl Disassembler for NeoDisassembler {
    fn disassemble(&self, script: &[u8]) -> Result<Vec<Instruction>, DisassemblyError> {
        disassemble(script)
    }
}

/// Decode a script into instructions
pub fn disassemble(script: &[u8]) -> Result<Vec<Instruction>, DisassemblyError> {
    let mut instructions = Vec::new();
    let mut pc = 0;

    while pc < script.len() {
        let offset = pc;
        let opcode = OpCode::from_byte(script[pc]).ok_or(DisassemblyError::UnknownOpcode {
            opcode: script[pc],
            offset,
        })?;
        pc += 1;

        let operand = match opcode.operand_size() {
            OperandSize::None => None,
            OperandSize::Fixed(size) => Some(take(script, &mut pc, size, opcode, offset)?),
            OperandSize::Prefixed(prefix) => {
                let raw = take(script, &mut pc, prefix, opcode, offset)?;
                let len = raw
                    .iter()
                    .rev()
                    .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
                Some(take(script, &mut pc, len, opcode, offset)?)
            }
        };

        instructions.push(Instruction {
            offset,
            opcode,
            operand,
        });
    }

    Ok(instructions)
}

fn take(
    script: &[u8],
    pc: &mut usize,
    size: usize,
    opcode: OpCode,
    offset: usize,
) -> Result<Vec<u8>, DisassemblyError> {
    let available = script.len() - *pc;
    if size > available {
        return Err(DisassemblyError::TruncatedOperand {
            name: opcode.name(),
            offset,
            needed: size,
            available,
        });
    }
    let bytes = script[*pc..*pc + size].to_vec();
    *pc += size;
    Ok(bytes)
}

/// Disassemble a script to readable format
pub fn disassemble_to_string(script: &[u8]) -> String {
    let mut output = String::new();

    let instructions = match disassemble(script) {
        Ok(instructions) => instructions,
        Err(e) => return format!("<invalid script: {}>\n", e),
    };

    for instruction in instructions {
        let _ = write!(
            output,
            "{:04x}: {}",
            instruction.offset,
            instruction.opcode.name()
        );
        match (&instruction.operand, instruction.opcode) {
            (Some(bytes), OpCode::SysCall) => {
                let _ = write!(output, " {}", String::from_utf8_lossy(bytes));
            }
            (Some(bytes), _) if !bytes.is_empty() => {
                let _ = write!(output, " {}", hex::encode(bytes));
            }
            _ => {}
        }
        output.push('\n');
    }

    output
}
