//! Task runtime.
//!
//! Two independent interpreters over the same value model: `Runtime::execute` walks a
//! parsed `Program`, `VM::run` executes a compiled `BytecodeModule`. For programs without
//! a `tool` model both produce the same outputs.
mod ast_exec;
mod config;
pub mod errors;
mod models;
mod runtime;
pub mod vm;

pub use config::RuntimeConfig;
pub use errors::RuntimeError;
pub use runtime::{ExecResult, Runtime};
pub use td_core::{Context, Outputs, Value};
pub use vm::VM;
