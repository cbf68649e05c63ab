//! Tree-walking executor.
//!
//! Statements run once each, in source order, against the runtime's context.

mod expr;
mod stmt;
