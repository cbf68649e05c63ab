//! Source-level building blocks shared by every stage of the task toolchain:
//! spans, line-indexed source text, diagnostics and their rendering, quoting helpers
//! and identifier predicates.
mod diagnostic;
mod kind;
mod render;
mod source;
mod span;
mod str_util;
mod token;
mod util;

pub use diagnostic::{Diagnostic, codes};
pub use kind::{DiagnosticKind, DiagnosticsFormatter};
pub use render::render_diagnostic;
pub use source::{SourceFile, SourceId, SourceText};
pub use span::{ByteIndex, Span};
pub use str_util::{is_quoted, unescape, unquote};
pub use token::{Token, TokenKind};
pub use util::{
    find_best_match, is_ident, is_ident_continue, is_ident_start, is_task_id, levenshtein_distance,
};
