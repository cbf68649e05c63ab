//! Front end: normalize, parse, compile, and hand programs to the runtime.
mod bytecode_compiler;
mod error;
mod frontend;

pub use bytecode_compiler::compile;
pub use error::Error;
pub use frontend::{Driver, ParsedFile};
