use std::fmt::Write;

use crate::{BytecodeModule, Constant, Fetch, Instr, NO_KEY, fetch};

fn constant_text(c: &Constant) -> String {
    match c {
        Constant::Null => "null".to_string(),
        Constant::Bool(b) => b.to_string(),
        Constant::Number(n) => td_core::number::format_number(*n),
        Constant::Str(s) => format!("{s:?}"),
    }
}

fn operand(module: &BytecodeModule, idx: u32) -> String {
    match module.constant(idx) {
        Some(c) => format!("#{idx} {}", constant_text(c)),
        None => format!("#{idx} <out of range>"),
    }
}

/// Human-readable listing: the constant pool, then one instruction per line.
pub fn disassemble(module: &BytecodeModule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "constants ({}):", module.constants.len());
    for (i, c) in module.constants.iter().enumerate() {
        let _ = writeln!(out, "  #{i:<4} {}", constant_text(c));
    }
    let _ = writeln!(out, "code ({} bytes):", module.code.len());
    let mut ip = 0;
    loop {
        let (instr, next) = match fetch(&module.code, ip) {
            Ok(Fetch::Instr(instr, next)) => (instr, next),
            Ok(Fetch::Unknown(byte)) => {
                let _ = writeln!(out, "  {ip:04}  .byte 0x{byte:02x}");
                break;
            }
            Ok(Fetch::Eof) => break,
            Err(_) => {
                let _ = writeln!(out, "  {ip:04}  <truncated>");
                break;
            }
        };
        let mnemonic = instr.opcode().mnemonic();
        let operands = match instr {
            Instr::PushConst(i)
            | Instr::GetCtx(i)
            | Instr::SetCtx(i)
            | Instr::GetMember(i)
            | Instr::EmitPreferred(i)
            | Instr::EmitPop(i) => operand(module, i),
            Instr::JumpIfFalse(off) => format!("-> {:04}", next as i64 + i64::from(off)),
            Instr::Sort { algorithm, key } => {
                let key = if key == NO_KEY {
                    "-".to_string()
                } else {
                    operand(module, key)
                };
                format!("{} key={key}", operand(module, algorithm))
            }
            _ => String::new(),
        };
        if operands.is_empty() {
            let _ = writeln!(out, "  {ip:04}  {mnemonic}");
        } else {
            let _ = writeln!(out, "  {ip:04}  {mnemonic:<15} {operands}");
        }
        if instr == Instr::End {
            break;
        }
        ip = next;
    }
    out
}
