//! Intermediate representations shared by the parser, the compiler and the runtime:
//! the parsed `Program` and the binary `BytecodeModule`.
mod ast;
mod bytecode;
mod codec;
mod disasm;
mod program;

pub use ast::*;
pub use bytecode::*;
pub use codec::{DecodeError, MAGIC, VERSION};
pub use disasm::disassemble;
pub use program::*;
