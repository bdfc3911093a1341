//! Opcode names and single-instruction decoding
//!
//! States in a trace carry the instruction the VM just evaluated as raw hex.
//! This module turns those bytes into something printable. Names follow the
//! Bitcoin Cash instruction set, including the 2022 introspection opcodes.

use super::stack_item::StackItem;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;

/// A single opcode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    /// Push opcodes carry a payload after the opcode byte
    pub fn is_push(self) -> bool {
        (0x01..=OP_PUSHDATA4).contains(&self.0)
    }

    /// Opcodes that open, switch or close a conditional block
    pub fn is_flow_control(self) -> bool {
        matches!(self.0, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF | 0x65 | 0x66)
    }

    pub fn name(self) -> Cow<'static, str> {
        let name = match self.0 {
            OP_0 => "OP_0",
            n @ 0x01..=0x4b => return Cow::Owned(format!("OP_PUSHBYTES_{}", n)),
            OP_PUSHDATA1 => "OP_PUSHDATA1",
            OP_PUSHDATA2 => "OP_PUSHDATA2",
            OP_PUSHDATA4 => "OP_PUSHDATA4",
            OP_1NEGATE => "OP_1NEGATE",
            0x50 => "OP_RESERVED",
            n @ OP_1..=OP_16 => return Cow::Owned(format!("OP_{}", n - 0x50)),
            0x61 => "OP_NOP",
            0x62 => "OP_VER",
            OP_IF => "OP_IF",
            OP_NOTIF => "OP_NOTIF",
            0x65 => "OP_VERIF",
            0x66 => "OP_VERNOTIF",
            OP_ELSE => "OP_ELSE",
            OP_ENDIF => "OP_ENDIF",
            0x69 => "OP_VERIFY",
            0x6a => "OP_RETURN",
            0x6b => "OP_TOALTSTACK",
            0x6c => "OP_FROMALTSTACK",
            0x6d => "OP_2DROP",
            0x6e => "OP_2DUP",
            0x6f => "OP_3DUP",
            0x70 => "OP_2OVER",
            0x71 => "OP_2ROT",
            0x72 => "OP_2SWAP",
            0x73 => "OP_IFDUP",
            0x74 => "OP_DEPTH",
            0x75 => "OP_DROP",
            0x76 => "OP_DUP",
            0x77 => "OP_NIP",
            0x78 => "OP_OVER",
            0x79 => "OP_PICK",
            0x7a => "OP_ROLL",
            0x7b => "OP_ROT",
            0x7c => "OP_SWAP",
            0x7d => "OP_TUCK",
            0x7e => "OP_CAT",
            0x7f => "OP_SPLIT",
            0x80 => "OP_NUM2BIN",
            0x81 => "OP_BIN2NUM",
            0x82 => "OP_SIZE",
            0x83 => "OP_INVERT",
            0x84 => "OP_AND",
            0x85 => "OP_OR",
            0x86 => "OP_XOR",
            0x87 => "OP_EQUAL",
            0x88 => "OP_EQUALVERIFY",
            0x89 => "OP_RESERVED1",
            0x8a => "OP_RESERVED2",
            0x8b => "OP_1ADD",
            0x8c => "OP_1SUB",
            0x8d => "OP_2MUL",
            0x8e => "OP_2DIV",
            0x8f => "OP_NEGATE",
            0x90 => "OP_ABS",
            0x91 => "OP_NOT",
            0x92 => "OP_0NOTEQUAL",
            0x93 => "OP_ADD",
            0x94 => "OP_SUB",
            0x95 => "OP_MUL",
            0x96 => "OP_DIV",
            0x97 => "OP_MOD",
            0x98 => "OP_LSHIFT",
            0x99 => "OP_RSHIFT",
            0x9a => "OP_BOOLAND",
            0x9b => "OP_BOOLOR",
            0x9c => "OP_NUMEQUAL",
            0x9d => "OP_NUMEQUALVERIFY",
            0x9e => "OP_NUMNOTEQUAL",
            0x9f => "OP_LESSTHAN",
            0xa0 => "OP_GREATERTHAN",
            0xa1 => "OP_LESSTHANOREQUAL",
            0xa2 => "OP_GREATERTHANOREQUAL",
            0xa3 => "OP_MIN",
            0xa4 => "OP_MAX",
            0xa5 => "OP_WITHIN",
            0xa6 => "OP_RIPEMD160",
            0xa7 => "OP_SHA1",
            0xa8 => "OP_SHA256",
            0xa9 => "OP_HASH160",
            0xaa => "OP_HASH256",
            0xab => "OP_CODESEPARATOR",
            0xac => "OP_CHECKSIG",
            0xad => "OP_CHECKSIGVERIFY",
            0xae => "OP_CHECKMULTISIG",
            0xaf => "OP_CHECKMULTISIGVERIFY",
            0xb0 => "OP_NOP1",
            0xb1 => "OP_CHECKLOCKTIMEVERIFY",
            0xb2 => "OP_CHECKSEQUENCEVERIFY",
            n @ 0xb3..=0xb9 => return Cow::Owned(format!("OP_NOP{}", n - 0xaf)),
            0xba => "OP_CHECKDATASIG",
            0xbb => "OP_CHECKDATASIGVERIFY",
            0xbc => "OP_REVERSEBYTES",
            0xc0 => "OP_INPUTINDEX",
            0xc1 => "OP_ACTIVEBYTECODE",
            0xc2 => "OP_TXVERSION",
            0xc3 => "OP_TXINPUTCOUNT",
            0xc4 => "OP_TXOUTPUTCOUNT",
            0xc5 => "OP_TXLOCKTIME",
            0xc6 => "OP_UTXOVALUE",
            0xc7 => "OP_UTXOBYTECODE",
            0xc8 => "OP_OUTPOINTTXHASH",
            0xc9 => "OP_OUTPOINTINDEX",
            0xca => "OP_INPUTBYTECODE",
            0xcb => "OP_INPUTSEQUENCENUMBER",
            0xcc => "OP_OUTPUTVALUE",
            0xcd => "OP_OUTPUTBYTECODE",
            other => return Cow::Owned(format!("OP_UNKNOWN{}", other)),
        };
        Cow::Borrowed(name)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// The instruction evaluated to reach a program state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instruction {
    pub opcode: Opcode,
    /// Pushed bytes, for push opcodes
    pub data: Option<StackItem>,
    encoded: Vec<u8>,
}

impl Instruction {
    /// Decode one instruction.
    ///
    /// Payloads shorter than their declared length are kept as-is; the VM
    /// would have failed on them and the trace already records that error.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&first, rest) = bytes.split_first()?;
        let opcode = Opcode(first);

        let prefix = match first {
            OP_PUSHDATA1 => 1,
            OP_PUSHDATA2 => 2,
            OP_PUSHDATA4 => 4,
            _ => 0,
        };
        let data = if opcode.is_push() {
            Some(StackItem::new(rest.get(prefix.min(rest.len())..).unwrap_or(&[])))
        } else {
            None
        };

        Some(Instruction {
            opcode,
            data,
            encoded: bytes.to_vec(),
        })
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

impl TryFrom<String> for Instruction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let bytes = hex::decode(value.trim_start_matches("0x"))
            .map_err(|e| format!("invalid instruction hex '{}': {}", value, e))?;
        Instruction::decode(&bytes).ok_or_else(|| "empty instruction".to_string())
    }
}

impl From<Instruction> for String {
    fn from(instruction: Instruction) -> Self {
        hex::encode(instruction.encoded)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) if !data.is_empty() => write!(f, "{} {}", self.opcode, data),
            _ => write!(f, "{}", self.opcode),
        }
    }
}
