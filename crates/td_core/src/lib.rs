//! Core value types shared by both task interpreters.
//!
//! - `Value` - JSON-like runtime value with an explicit `Undefined`
//! - `ops` - JavaScript-compatible coercions used by conditions, expressions and sorting
//! - `Context` / `Outputs` - the per-execution name stores
//! - `number` - JavaScript number formatting

pub mod context;
pub mod keys;
pub mod number;
pub mod ops;
pub mod value;

pub use context::{Context, Outputs};
pub use value::{Map, Value};
