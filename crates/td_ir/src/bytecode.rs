//! Bytecode instruction set and module.
//!
//! Instructions are a 1-byte opcode followed by little-endian operands: `u32` constant
//! pool indices (names are string constants) or one `i32` jump offset relative to the
//! byte after the offset field.

use crate::Literal;

/// Sort key operand meaning "compare whole elements".
pub const NO_KEY: u32 = 0xFFFF_FFFF;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    PushConst = 0x01,
    GetCtx = 0x02,
    SetCtx = 0x03,
    GetMember = 0x04,
    Add = 0x10,
    Sub = 0x11,
    Mul = 0x12,
    Div = 0x13,
    Eq = 0x20,
    Ge = 0x21,
    Le = 0x22,
    Gt = 0x23,
    Lt = 0x24,
    JumpIfFalse = 0x30,
    Sort = 0x40,
    EmitPreferred = 0x50,
    EmitPop = 0x51,
    End = 0xFF,
}

impl Opcode {
    pub fn from_u8(b: u8) -> Option<Self> {
        Some(match b {
            0x01 => Opcode::PushConst,
            0x02 => Opcode::GetCtx,
            0x03 => Opcode::SetCtx,
            0x04 => Opcode::GetMember,
            0x10 => Opcode::Add,
            0x11 => Opcode::Sub,
            0x12 => Opcode::Mul,
            0x13 => Opcode::Div,
            0x20 => Opcode::Eq,
            0x21 => Opcode::Ge,
            0x22 => Opcode::Le,
            0x23 => Opcode::Gt,
            0x24 => Opcode::Lt,
            0x30 => Opcode::JumpIfFalse,
            0x40 => Opcode::Sort,
            0x50 => Opcode::EmitPreferred,
            0x51 => Opcode::EmitPop,
            0xFF => Opcode::End,
            _ => return None,
        })
    }

    /// Bytes of operands following the opcode.
    pub fn operand_len(self) -> usize {
        match self {
            Opcode::PushConst
            | Opcode::GetCtx
            | Opcode::SetCtx
            | Opcode::GetMember
            | Opcode::JumpIfFalse
            | Opcode::EmitPreferred
            | Opcode::EmitPop => 4,
            Opcode::Sort => 8,
            _ => 0,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::PushConst => "PUSH_CONST",
            Opcode::GetCtx => "GET_CTX",
            Opcode::SetCtx => "SET_CTX",
            Opcode::GetMember => "GET_MEMBER",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Eq => "EQ",
            Opcode::Ge => "GE",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Lt => "LT",
            Opcode::JumpIfFalse => "JUMP_IF_FALSE",
            Opcode::Sort => "SORT",
            Opcode::EmitPreferred => "EMIT_PREFERRED",
            Opcode::EmitPop => "EMIT_POP",
            Opcode::End => "END",
        }
    }
}

/// Decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    PushConst(u32),
    GetCtx(u32),
    SetCtx(u32),
    GetMember(u32),
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
    JumpIfFalse(i32),
    Sort { algorithm: u32, key: u32 },
    EmitPreferred(u32),
    EmitPop(u32),
    End,
}

impl Instr {
    pub fn opcode(self) -> Opcode {
        match self {
            Instr::PushConst(_) => Opcode::PushConst,
            Instr::GetCtx(_) => Opcode::GetCtx,
            Instr::SetCtx(_) => Opcode::SetCtx,
            Instr::GetMember(_) => Opcode::GetMember,
            Instr::Add => Opcode::Add,
            Instr::Sub => Opcode::Sub,
            Instr::Mul => Opcode::Mul,
            Instr::Div => Opcode::Div,
            Instr::Eq => Opcode::Eq,
            Instr::Ge => Opcode::Ge,
            Instr::Le => Opcode::Le,
            Instr::Gt => Opcode::Gt,
            Instr::Lt => Opcode::Lt,
            Instr::JumpIfFalse(_) => Opcode::JumpIfFalse,
            Instr::Sort { .. } => Opcode::Sort,
            Instr::EmitPreferred(_) => Opcode::EmitPreferred,
            Instr::EmitPop(_) => Opcode::EmitPop,
            Instr::End => Opcode::End,
        }
    }

    pub fn encode(self, out: &mut Vec<u8>) {
        out.push(self.opcode() as u8);
        match self {
            Instr::PushConst(i)
            | Instr::GetCtx(i)
            | Instr::SetCtx(i)
            | Instr::GetMember(i)
            | Instr::EmitPreferred(i)
            | Instr::EmitPop(i) => out.extend_from_slice(&i.to_le_bytes()),
            Instr::JumpIfFalse(off) => out.extend_from_slice(&off.to_le_bytes()),
            Instr::Sort { algorithm, key } => {
                out.extend_from_slice(&algorithm.to_le_bytes());
                out.extend_from_slice(&key.to_le_bytes());
            }
            _ => {}
        }
    }
}

/// Result of reading the instruction at some position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fetch {
    /// A decoded instruction and the position of the next one.
    Instr(Instr, usize),
    /// An opcode this version does not know.
    Unknown(u8),
    /// Position is at or past the end of the stream.
    Eof,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("instruction at byte {ip} runs past the end of the code")]
pub struct TruncatedInstr {
    pub ip: usize,
}

pub fn fetch(code: &[u8], ip: usize) -> Result<Fetch, TruncatedInstr> {
    let Some(&byte) = code.get(ip) else {
        return Ok(Fetch::Eof);
    };
    let Some(op) = Opcode::from_u8(byte) else {
        return Ok(Fetch::Unknown(byte));
    };
    let start = ip + 1;
    let end = start + op.operand_len();
    let operands = code.get(start..end).ok_or(TruncatedInstr { ip })?;
    let word = |i: usize| {
        let mut b = [0u8; 4];
        b.copy_from_slice(&operands[i * 4..i * 4 + 4]);
        b
    };
    let instr = match op {
        Opcode::PushConst => Instr::PushConst(u32::from_le_bytes(word(0))),
        Opcode::GetCtx => Instr::GetCtx(u32::from_le_bytes(word(0))),
        Opcode::SetCtx => Instr::SetCtx(u32::from_le_bytes(word(0))),
        Opcode::GetMember => Instr::GetMember(u32::from_le_bytes(word(0))),
        Opcode::Add => Instr::Add,
        Opcode::Sub => Instr::Sub,
        Opcode::Mul => Instr::Mul,
        Opcode::Div => Instr::Div,
        Opcode::Eq => Instr::Eq,
        Opcode::Ge => Instr::Ge,
        Opcode::Le => Instr::Le,
        Opcode::Gt => Instr::Gt,
        Opcode::Lt => Instr::Lt,
        Opcode::JumpIfFalse => Instr::JumpIfFalse(i32::from_le_bytes(word(0))),
        Opcode::Sort => Instr::Sort {
            algorithm: u32::from_le_bytes(word(0)),
            key: u32::from_le_bytes(word(1)),
        },
        Opcode::EmitPreferred => Instr::EmitPreferred(u32::from_le_bytes(word(0))),
        Opcode::EmitPop => Instr::EmitPop(u32::from_le_bytes(word(0))),
        Opcode::End => Instr::End,
    };
    Ok(Fetch::Instr(instr, end))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Constant {
    pub const TAG_NULL: u8 = 0;
    pub const TAG_BOOL: u8 = 1;
    pub const TAG_NUMBER: u8 = 2;
    pub const TAG_STR: u8 = 3;

    pub fn tag(&self) -> u8 {
        match self {
            Constant::Null => Self::TAG_NULL,
            Constant::Bool(_) => Self::TAG_BOOL,
            Constant::Number(_) => Self::TAG_NUMBER,
            Constant::Str(_) => Self::TAG_STR,
        }
    }

    pub fn to_value(&self) -> td_core::Value {
        match self {
            Constant::Null => td_core::Value::Null,
            Constant::Bool(b) => td_core::Value::Bool(*b),
            Constant::Number(n) => td_core::Value::Number(*n),
            Constant::Str(s) => td_core::Value::Str(s.clone()),
        }
    }

    /// Deduplication key: runtime type plus serialized value. Numbers key on their bit
    /// pattern, so `1` and `1.0` share a slot while `0` and `-0` do not.
    pub fn dedup_key(&self) -> (u8, String) {
        let text = match self {
            Constant::Null => String::new(),
            Constant::Bool(b) => b.to_string(),
            Constant::Number(n) => n.to_bits().to_string(),
            Constant::Str(s) => s.clone(),
        };
        (self.tag(), text)
    }
}

impl From<&Literal> for Constant {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Null => Constant::Null,
            Literal::Bool(b) => Constant::Bool(*b),
            Literal::Number(n) => Constant::Number(*n),
            Literal::Str(s) => Constant::Str(s.clone()),
        }
    }
}

/// Constant pool plus linear instruction bytes. Immutable once built; the VM only borrows it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BytecodeModule {
    pub constants: Vec<Constant>,
    pub code: Vec<u8>,
}

impl BytecodeModule {
    pub fn constant(&self, idx: u32) -> Option<&Constant> {
        self.constants.get(idx as usize)
    }
}
