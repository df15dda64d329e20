//! NEO virtual machine opcodes
//!
//! The byte table of the stack-based VM whose scripts are scanned for
//! contract calls. Only the shape of each instruction matters here (how many
//! operand bytes follow the opcode); nothing in this crate executes them.

use serde::{Deserialize, Serialize};

/// How the operand of an opcode is laid out in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSize {
    /// No operand bytes follow the opcode
    None,
    /// Exactly this many bytes follow the opcode
    Fixed(usize),
    /// A little-endian length prefix of this many bytes, then the data
    Prefixed(usize),
}

macro_rules! define_opcodes {
    ($($variant:ident = $byte:literal, $name:literal;)*) => {
        /// Opcodes for the NEO 2 virtual machine
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum OpCode {
            $($variant = $byte,)*
        }

        impl OpCode {
            /// Convert byte to opcode
            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($byte => Some(OpCode::$variant),)*
                    _ => None,
                }
            }

            /// Get opcode name for disassembly
            pub fn name(&self) -> &'static str {
                match self {
                    $(OpCode::$variant => $name,)*
                }
            }
        }
    };
}

define_opcodes! {
    // Constants (0x00 - 0x60)
    Push0 = 0x00, "PUSH0";
    PushBytes1 = 0x01, "PUSHBYTES1";
    PushBytes2 = 0x02, "PUSHBYTES2";
    PushBytes3 = 0x03, "PUSHBYTES3";
    PushBytes4 = 0x04, "PUSHBYTES4";
    PushBytes5 = 0x05, "PUSHBYTES5";
    PushBytes6 = 0x06, "PUSHBYTES6";
    PushBytes7 = 0x07, "PUSHBYTES7";
    PushBytes8 = 0x08, "PUSHBYTES8";
    PushBytes9 = 0x09, "PUSHBYTES9";
    PushBytes10 = 0x0A, "PUSHBYTES10";
    PushBytes11 = 0x0B, "PUSHBYTES11";
    PushBytes12 = 0x0C, "PUSHBYTES12";
    PushBytes13 = 0x0D, "PUSHBYTES13";
    PushBytes14 = 0x0E, "PUSHBYTES14";
    PushBytes15 = 0x0F, "PUSHBYTES15";
    PushBytes16 = 0x10, "PUSHBYTES16";
    PushBytes17 = 0x11, "PUSHBYTES17";
    PushBytes18 = 0x12, "PUSHBYTES18";
    PushBytes19 = 0x13, "PUSHBYTES19";
    PushBytes20 = 0x14, "PUSHBYTES20";
    PushBytes21 = 0x15, "PUSHBYTES21";
    PushBytes22 = 0x16, "PUSHBYTES22";
    PushBytes23 = 0x17, "PUSHBYTES23";
    PushBytes24 = 0x18, "PUSHBYTES24";
    PushBytes25 = 0x19, "PUSHBYTES25";
    PushBytes26 = 0x1A, "PUSHBYTES26";
    PushBytes27 = 0x1B, "PUSHBYTES27";
    PushBytes28 = 0x1C, "PUSHBYTES28";
    PushBytes29 = 0x1D, "PUSHBYTES29";
    PushBytes30 = 0x1E, "PUSHBYTES30";
    PushBytes31 = 0x1F, "PUSHBYTES31";
    PushBytes32 = 0x20, "PUSHBYTES32";
    PushBytes33 = 0x21, "PUSHBYTES33";
    PushBytes34 = 0x22, "PUSHBYTES34";
    PushBytes35 = 0x23, "PUSHBYTES35";
    PushBytes36 = 0x24, "PUSHBYTES36";
    PushBytes37 = 0x25, "PUSHBYTES37";
    PushBytes38 = 0x26, "PUSHBYTES38";
    PushBytes39 = 0x27, "PUSHBYTES39";
    PushBytes40 = 0x28, "PUSHBYTES40";
    PushBytes41 = 0x29, "PUSHBYTES41";
    PushBytes42 = 0x2A, "PUSHBYTES42";
    PushBytes43 = 0x2B, "PUSHBYTES43";
    PushBytes44 = 0x2C, "PUSHBYTES44";
    PushBytes45 = 0x2D, "PUSHBYTES45";
    PushBytes46 = 0x2E, "PUSHBYTES46";
    PushBytes47 = 0x2F, "PUSHBYTES47";
    PushBytes48 = 0x30, "PUSHBYTES48";
    PushBytes49 = 0x31, "PUSHBYTES49";
    PushBytes50 = 0x32, "PUSHBYTES50";
    PushBytes51 = 0x33, "PUSHBYTES51";
    PushBytes52 = 0x34, "PUSHBYTES52";
    PushBytes53 = 0x35, "PUSHBYTES53";
    PushBytes54 = 0x36, "PUSHBYTES54";
    PushBytes55 = 0x37, "PUSHBYTES55";
    PushBytes56 = 0x38, "PUSHBYTES56";
    PushBytes57 = 0x39, "PUSHBYTES57";
    PushBytes58 = 0x3A, "PUSHBYTES58";
    PushBytes59 = 0x3B, "PUSHBYTES59";
    PushBytes60 = 0x3C, "PUSHBYTES60";
    PushBytes61 = 0x3D, "PUSHBYTES61";
    PushBytes62 = 0x3E, "PUSHBYTES62";
    PushBytes63 = 0x3F, "PUSHBYTES63";
    PushBytes64 = 0x40, "PUSHBYTES64";
    PushBytes65 = 0x41, "PUSHBYTES65";
    PushBytes66 = 0x42, "PUSHBYTES66";
    PushBytes67 = 0x43, "PUSHBYTES67";
    PushBytes68 = 0x44, "PUSHBYTES68";
    PushBytes69 = 0x45, "PUSHBYTES69";
    PushBytes70 = 0x46, "PUSHBYTES70";
    PushBytes71 = 0x47, "PUSHBYTES71";
    PushBytes72 = 0x48, "PUSHBYTES72";
    PushBytes73 = 0x49, "PUSHBYTES73";
    PushBytes74 = 0x4A, "PUSHBYTES74";
    PushBytes75 = 0x4B, "PUSHBYTES75";
    PushData1 = 0x4C, "PUSHDATA1";
    PushData2 = 0x4D, "PUSHDATA2";
    PushData4 = 0x4E, "PUSHDATA4";
    PushM1 = 0x4F, "PUSHM1";
    Push1 = 0x51, "PUSH1";
    Push2 = 0x52, "PUSH2";
    Push3 = 0x53, "PUSH3";
    Push4 = 0x54, "PUSH4";
    Push5 = 0x55, "PUSH5";
    Push6 = 0x56, "PUSH6";
    Push7 = 0x57, "PUSH7";
    Push8 = 0x58, "PUSH8";
    Push9 = 0x59, "PUSH9";
    Push10 = 0x5A, "PUSH10";
    Push11 = 0x5B, "PUSH11";
    Push12 = 0x5C, "PUSH12";
    Push13 = 0x5D, "PUSH13";
    Push14 = 0x5E, "PUSH14";
    Push15 = 0x5F, "PUSH15";
    Push16 = 0x60, "PUSH16";

    // Flow control (0x61 - 0x69)
    Nop = 0x61, "NOP";
    Jmp = 0x62, "JMP";
    JmpIf = 0x63, "JMPIF";
    JmpIfNot = 0x64, "JMPIFNOT";
    Call = 0x65, "CALL";
    Ret = 0x66, "RET";
    AppCall = 0x67, "APPCALL";
    SysCall = 0x68, "SYSCALL";
    TailCall = 0x69, "TAILCALL";

    // Stack (0x6A - 0x7D)
    DupFromAltStack = 0x6A, "DUPFROMALTSTACK";
    ToAltStack = 0x6B, "TOALTSTACK";
    FromAltStack = 0x6C, "FROMALTSTACK";
    XDrop = 0x6D, "XDROP";
    XSwap = 0x72, "XSWAP";
    XTuck = 0x73, "XTUCK";
    Depth = 0x74, "DEPTH";
    Drop = 0x75, "DROP";
    Dup = 0x76, "DUP";
    Nip = 0x77, "NIP";
    Over = 0x78, "OVER";
    Pick = 0x79, "PICK";
    Roll = 0x7A, "ROLL";
    Rot = 0x7B, "ROT";
    Swap = 0x7C, "SWAP";
    Tuck = 0x7D, "TUCK";

    // Splice (0x7E - 0x82)
    Cat = 0x7E, "CAT";
    SubStr = 0x7F, "SUBSTR";
    Left = 0x80, "LEFT";
    Right = 0x81, "RIGHT";
    Size = 0x82, "SIZE";

    // Bitwise logic (0x83 - 0x87)
    Invert = 0x83, "INVERT";
    And = 0x84, "AND";
    Or = 0x85, "OR";
    Xor = 0x86, "XOR";
    Equal = 0x87, "EQUAL";

    // Arithmetic (0x8B - 0xA5)
    Inc = 0x8B, "INC";
    Dec = 0x8C, "DEC";
    Sign = 0x8D, "SIGN";
    Negate = 0x8F, "NEGATE";
    Abs = 0x90, "ABS";
    Not = 0x91, "NOT";
    Nz = 0x92, "NZ";
    Add = 0x93, "ADD";
    Sub = 0x94, "SUB";
    Mul = 0x95, "MUL";
    Div = 0x96, "DIV";
    Mod = 0x97, "MOD";
    Shl = 0x98, "SHL";
    Shr = 0x99, "SHR";
    BoolAnd = 0x9A, "BOOLAND";
    BoolOr = 0x9B, "BOOLOR";
    NumEqual = 0x9C, "NUMEQUAL";
    NumNotEqual = 0x9E, "NUMNOTEQUAL";
    Lt = 0x9F, "LT";
    Gt = 0xA0, "GT";
    Lte = 0xA1, "LTE";
    Gte = 0xA2, "GTE";
    Min = 0xA3, "MIN";
    Max = 0xA4, "MAX";
    Within = 0xA5, "WITHIN";

    // Crypto (0xA7 - 0xAE)
    Sha1 = 0xA7, "SHA1";
    Sha256 = 0xA8, "SHA256";
    Hash160 = 0xA9, "HASH160";
    Hash256 = 0xAA, "HASH256";
    CheckSig = 0xAC, "CHECKSIG";
    Verify = 0xAD, "VERIFY";
    CheckMultiSig = 0xAE, "CHECKMULTISIG";

    // Arrays and maps (0xC0 - 0xCD)
    ArraySize = 0xC0, "ARRAYSIZE";
    Pack = 0xC1, "PACK";
    Unpack = 0xC2, "UNPACK";
    PickItem = 0xC3, "PICKITEM";
    SetItem = 0xC4, "SETITEM";
    NewArray = 0xC5, "NEWARRAY";
    NewStruct = 0xC6, "NEWSTRUCT";
    NewMap = 0xC7, "NEWMAP";
    Append = 0xC8, "APPEND";
    Reverse = 0xC9, "REVERSE";
    Remove = 0xCA, "REMOVE";
    HasKey = 0xCB, "HASKEY";
    Keys = 0xCC, "KEYS";
    Values = 0xCD, "VALUES";

    // Stack isolation (0xE0 - 0xE4)
    CallI = 0xE0, "CALL_I";
    CallE = 0xE1, "CALL_E";
    CallEd = 0xE2, "CALL_ED";
    CallEt = 0xE3, "CALL_ET";
    CallEdt = 0xE4, "CALL_EDT";

    // Exceptions (0xF0 - 0xF1)
    Throw = 0xF0, "THROW";
    ThrowIfNot = 0xF1, "THROWIFNOT";
}

impl OpCode {
    /// Layout of the operand that follows this opcode
    pub fn operand_size(&self) -> OperandSize {
        match self {
            OpCode::PushData1 => OperandSize::Prefixed(1),
            OpCode::PushData2 => OperandSize::Prefixed(2),
            OpCode::PushData4 => OperandSize::Prefixed(4),
            OpCode::Jmp | OpCode::JmpIf | OpCode::JmpIfNot | OpCode::Call => OperandSize::Fixed(2),
            OpCode::AppCall | OpCode::TailCall => OperandSize::Fixed(20),
            // SYSCALL names are var-bytes capped at 252, so the prefix is one byte
            OpCode::SysCall => OperandSize::Prefixed(1),
            OpCode::CallI => OperandSize::Fixed(4),
            OpCode::CallE | OpCode::CallEt => OperandSize::Fixed(22),
            OpCode::CallEd | OpCode::CallEdt => OperandSize::Fixed(2),
            op if op.is_push_bytes() => OperandSize::Fixed(*op as usize),
            _ => OperandSize::None,
        }
    }

    /// PUSHBYTES1 through PUSHBYTES75
    pub fn is_push_bytes(&self) -> bool {
        (OpCode::PushBytes1 as u8..=OpCode::PushBytes75 as u8).contains(&(*self as u8))
    }

    /// Whether this opcode only pushes a constant onto the evaluation stack
    pub fn is_push(&self) -> bool {
        (*self as u8) <= OpCode::Push16 as u8
    }

    /// The integer pushed by PUSH0 and PUSH1..PUSH16
    pub fn small_int(&self) -> Option<usize> {
        match self {
            OpCode::Push0 => Some(0),
            op if (OpCode::Push1 as u8..=OpCode::Push16 as u8).contains(&(*op as u8)) => {
                Some((*op as u8 - OpCode::Push1 as u8) as usize + 1)
            }
            _ => None,
        }
    }

    /// The opcode that pushes `value` when it fits in PUSH0..PUSH16
    pub fn for_small_int(value: usize) -> Option<Self> {
        match value {
            0 => Some(OpCode::Push0),
            1..=16 => OpCode::from_byte(OpCode::Push1 as u8 + (value as u8 - 1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        let opcodes = [
            OpCode::Push0,
            OpCode::PushBytes20,
            OpCode::PushData2,
            OpCode::Push16,
            OpCode::AppCall,
            OpCode::SysCall,
            OpCode::Pack,
            OpCode::ThrowIfNot,
        ];

        for op in opcodes {
            let byte = op as u8;
            let decoded = OpCode::from_byte(byte).unwrap();
            assert_eq!(op, decoded);
        }
    }

    #[test]
    fn test_unassigned_bytes() {
        assert_eq!(OpCode::from_byte(0x50), None);
        assert_eq!(OpCode::from_byte(0xFF), None);
    }

    #[test]
    fn test_push_bytes_operand_size() {
        assert_eq!(OpCode::PushBytes1.operand_size(), OperandSize::Fixed(1));
        assert_eq!(OpCode::PushBytes75.operand_size(), OperandSize::Fixed(75));
        assert_eq!(OpCode::AppCall.operand_size(), OperandSize::Fixed(20));
        assert_eq!(OpCode::Push5.operand_size(), OperandSize::None);
    }

    #[test]
    fn test_small_int() {
        assert_eq!(OpCode::Push0.small_int(), Some(0));
        assert_eq!(OpCode::Push1.small_int(), Some(1));
        assert_eq!(OpCode::Push16.small_int(), Some(16));
        assert_eq!(OpCode::PushM1.small_int(), None);
        assert_eq!(OpCode::Pack.small_int(), None);

        for n in 0..=16 {
            assert_eq!(OpCode::for_small_int(n).and_then(|op| op.small_int()), Some(n));
        }
        assert_eq!(OpCode::for_small_int(17), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(OpCode::PushBytes33.name(), "PUSHBYTES33");
        assert_eq!(OpCode::AppCall.name(), "APPCALL");
        assert_eq!(OpCode::Push2.name(), "PUSH2");
    }
}
