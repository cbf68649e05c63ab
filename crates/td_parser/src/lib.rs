//! Task-file parser.
//!
//! `parse` turns normalized source text into a `Program`, failing on the first malformed
//! line. Let-binding right-hand sides go through the token-based expression parser in
//! `expr`; every other statement is matched line by line.
mod error;
mod expr;
mod parser;
mod scalar;
mod stmt;

pub use error::SyntaxError;
pub use expr::parse_expr;
pub use parser::{Parser, parse};
pub use scalar::parse_scalar;
pub use td_ir::*;
