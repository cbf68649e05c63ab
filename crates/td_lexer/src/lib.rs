//! td_lexer: source normalization and the expression tokenizer.
//!
//! Entry points: `normalize_source` for whole task files and
//! `Lexer::new(expr, base).lex()` for let-binding right-hand sides.
mod keywords;
mod lexer;
mod normalize;

pub use lexer::{LexResult, Lexer};
pub use normalize::normalize_source;
