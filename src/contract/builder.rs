//! Script builder
//!
//! Emits NEO scripts instruction by instruction. Used to assemble deployment
//! and invocation transactions for fixtures and tests.

use crate::contract::opcodes::OpCode;
use crate::crypto::UInt160;

/// Interop service a deployment transaction calls to create a contract
pub const CONTRACT_CREATE_SYSCALL: &str = "Neo.Contract.Create";

/// Incrementally builds script bytecode
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    code: Vec<u8>,
}

impl ScriptBuilder {
    /// Create a new, empty builder
    pub fn new() -> Self {
        Self { code: Vec::new() }
    }

    /// Emit an opcode that carries no operand
    pub fn emit(&mut self, opcode: OpCode) -> &mut Self {
        self.code.push(opcode as u8);
        self
    }

    /// Push a byte string using the shortest PUSHBYTES/PUSHDATA form
    pub fn push_bytes(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len == 0 {
            return self.emit(OpCode::Push0);
        }

        if len <= OpCode::PushBytes75 as usize {
            self.code.push(len as u8);
        } else if len <= u8::MAX as usize {
            self.code.push(OpCode::PushData1 as u8);
            self.code.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.code.push(OpCode::PushData2 as u8);
            self.code.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.code.push(OpCode::PushData4 as u8);
            self.code.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.code.extend_from_slice(data);
        self
    }

    /// Push a UTF-8 string
    pub fn push_str(&mut self, s: &str) -> &mut Self {
        self.push_bytes(s.as_bytes())
    }

    /// Push a non-negative integer, using PUSH0..PUSH16 when it fits
    pub fn push_int(&mut self, value: u64) -> &mut Self {
        if value <= 16 {
            if let Some(op) = OpCode::for_small_int(value as usize) {
                return self.emit(op);
            }
        }

        let mut bytes = value.to_le_bytes().to_vec();
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        // Keep the sign bit clear
        if bytes.last().is_some_and(|b| b & 0x80 != 0) {
            bytes.push(0);
        }
        self.push_bytes(&bytes)
    }

    /// Call an interop service by name
    pub fn syscall(&mut self, api: &str) -> &mut Self {
        self.code.push(OpCode::SysCall as u8);
        self.code.push(api.len() as u8);
        self.code.extend_from_slice(api.as_bytes());
        self
    }

    /// Call another contract by script hash
    pub fn app_call(&mut self, contract: &UInt160) -> &mut Self {
        self.code.push(OpCode::AppCall as u8);
        self.code.extend_from_slice(contract.as_bytes());
        self
    }

    /// Emit a contract invocation following the compiler calling convention:
    /// arguments pushed last-to-first, the count, PACK, the method name, then
    /// APPCALL.
    pub fn invoke(&mut self, contract: &UInt160, method: &str, args: &[Vec<u8>]) -> &mut Self {
        for arg in args.iter().rev() {
            self.push_bytes(arg);
        }
        self.push_int(args.len() as u64);
        self.emit(OpCode::Pack);
        self.push_str(method);
        self.app_call(contract)
    }

    /// Emit a deployment of `bytecode` through `Neo.Contract.Create`.
    ///
    /// The creation parameters are pushed in reverse so the bytecode sits
    /// immediately before the SYSCALL.
    pub fn deploy(&mut self, bytecode: &[u8], name: &str) -> &mut Self {
        self.push_str("")
            .push_str("")
            .push_str("")
            .push_str("1.0")
            .push_str(name)
            .push_int(1)
            .push_bytes(&[0x05])
            .push_bytes(&[0x07, 0x10])
            .push_bytes(bytecode)
            .syscall(CONTRACT_CREATE_SYSCALL)
    }

    /// Current script length
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Finish and return the bytecode
    pub fn build(&self) -> Vec<u8> {
        self.code.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::disassembler::disassemble;

    #[test]
    fn test_push_bytes_forms() {
        let mut builder = ScriptBuilder::new();
        builder
            .push_bytes(&[])
            .push_bytes(&[1; 20])
            .push_bytes(&[2; 100])
            .push_bytes(&[3; 300]);

        let code = disassemble(&builder.build()).unwrap();
        let opcodes: Vec<OpCode> = code.iter().map(|i| i.opcode).collect();
        assert_eq!(
            opcodes,
            vec![
                OpCode::Push0,
                OpCode::PushBytes20,
                OpCode::PushData1,
                OpCode::PushData2
            ]
        );
        assert_eq!(code[3].operand.as_ref().map(Vec::len), Some(300));
    }

    #[test]
    fn test_push_int() {
        let mut builder = ScriptBuilder::new();
        builder.push_int(0).push_int(16).push_int(17).push_int(128);

        let code = disassemble(&builder.build()).unwrap();
        assert_eq!(code[0].opcode, OpCode::Push0);
        assert_eq!(code[1].opcode, OpCode::Push16);
        assert_eq!(code[2].operand, Some(vec![17]));
        assert_eq!(code[3].operand, Some(vec![0x80, 0x00]));
    }

    #[test]
    fn test_invoke_layout() {
        let contract = UInt160::new([4; 20]);
        let mut builder = ScriptBuilder::new();
        builder.invoke(&contract, "doIt", &[b"first".to_vec(), b"second".to_vec()]);

        let code = disassemble(&builder.build()).unwrap();
        assert_eq!(code.len(), 6);
        assert_eq!(code[0].operand_str(), Some("second"));
        assert_eq!(code[1].operand_str(), Some("first"));
        assert_eq!(code[2].opcode, OpCode::Push2);
        assert_eq!(code[3].opcode, OpCode::Pack);
        assert_eq!(code[4].operand_str(), Some("doIt"));
        assert_eq!(code[5].opcode, OpCode::AppCall);
    }

    #[test]
    fn test_deploy_ends_with_create() {
        let mut builder = ScriptBuilder::new();
        builder.deploy(&[0x51, 0x66], "Mailbox");

        let code = disassemble(&builder.build()).unwrap();
        let last = code.last().unwrap();
        assert_eq!(last.opcode, OpCode::SysCall);
        assert_eq!(last.operand_str(), Some(CONTRACT_CREATE_SYSCALL));
        assert_eq!(code[code.len() - 2].operand, Some(vec![0x51, 0x66]));
    }
}
