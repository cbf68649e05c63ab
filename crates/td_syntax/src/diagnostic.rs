//! Diagnostics reported by the parser and rendered by front ends.

use crate::{DiagnosticKind, DiagnosticsFormatter, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub code: Option<&'static str>,
    pub suggestion: Option<String>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error_kind(kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self {
            message: DiagnosticsFormatter::format(&kind),
            code: None,
            suggestion: None,
            span,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

pub mod codes {
    pub const MISSING_TASK_HEADER: &str = "E0001";
    pub const UNKNOWN_STATEMENT: &str = "E0002";
    pub const MALFORMED_STATEMENT: &str = "E0003";
    pub const INVALID_INPUT_PAYLOAD: &str = "E0004";
    pub const DUPLICATE_DECLARATION: &str = "E0005";
    pub const INVALID_EXPRESSION: &str = "E0006";
}
