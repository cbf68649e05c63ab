use td_syntax::{Diagnostic, DiagnosticKind, codes};

/// First malformed line of a task file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {}\n    {text}", .diagnostic.message)]
pub struct SyntaxError {
    /// 1-based.
    pub line: usize,
    pub text: String,
    pub diagnostic: Diagnostic,
}

impl SyntaxError {
    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }

    pub fn code(&self) -> Option<&'static str> {
        self.diagnostic.code
    }
}

impl From<SyntaxError> for Diagnostic {
    fn from(err: SyntaxError) -> Self {
        err.diagnostic
    }
}

/// Diagnostic for `kind` with its error code and no span yet.
pub(crate) fn diag(kind: DiagnosticKind) -> Diagnostic {
    let code = code_for(&kind);
    Diagnostic::error_kind(kind, None).with_code(code)
}

fn code_for(kind: &DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::MissingTaskHeader | DiagnosticKind::InvalidTaskHeader => {
            codes::MISSING_TASK_HEADER
        }
        DiagnosticKind::UnknownStatement(_) => codes::UNKNOWN_STATEMENT,
        DiagnosticKind::EmptyInputPayload | DiagnosticKind::InvalidInputPayload(_) => {
            codes::INVALID_INPUT_PAYLOAD
        }
        DiagnosticKind::DuplicateDeclaration(_) => codes::DUPLICATE_DECLARATION,
        DiagnosticKind::UnterminatedString
        | DiagnosticKind::UnexpectedChar(_)
        | DiagnosticKind::MalformedNumber(_)
        | DiagnosticKind::ExpectedToken(_)
        | DiagnosticKind::ExpectedExpression
        | DiagnosticKind::TrailingExpressionTokens(_) => codes::INVALID_EXPRESSION,
        DiagnosticKind::MalformedStatement { .. } => codes::MALFORMED_STATEMENT,
    }
}
