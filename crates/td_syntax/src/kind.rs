#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    // Lexer
    UnterminatedString,
    UnexpectedChar(char),
    MalformedNumber(String),

    // Statements
    MissingTaskHeader,
    InvalidTaskHeader,
    UnknownStatement(String),
    MalformedStatement {
        what: &'static str,
        shape: &'static str,
    },
    EmptyInputPayload,
    InvalidInputPayload(String),
    DuplicateDeclaration(&'static str),

    // Expressions
    ExpectedToken(String),
    ExpectedExpression,
    TrailingExpressionTokens(String),
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    pub fn format(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::UnterminatedString => "Unterminated string literal".into(),
            DiagnosticKind::UnexpectedChar(c) => format!("Unexpected character: {}", c),
            DiagnosticKind::MalformedNumber(s) => format!("Malformed number: {}", s),

            DiagnosticKind::MissingTaskHeader => {
                "Expected task declaration `@id:` before any statement".into()
            }
            DiagnosticKind::InvalidTaskHeader => {
                "Invalid task declaration; expected `@id:` with id matching [A-Za-z_][\\w-]*"
                    .into()
            }
            DiagnosticKind::UnknownStatement(line) => format!("Unknown statement: {}", line),
            DiagnosticKind::MalformedStatement { what, shape } => {
                format!("Invalid {}; expected `{}`", what, shape)
            }
            DiagnosticKind::EmptyInputPayload => "Input block `%in:` has no payload".into(),
            DiagnosticKind::InvalidInputPayload(e) => {
                format!("Input block is not valid JSON: {}", e)
            }
            DiagnosticKind::DuplicateDeclaration(what) => {
                format!("Duplicate {} declaration", what)
            }

            DiagnosticKind::ExpectedToken(s) => format!("Expected {}", s),
            DiagnosticKind::ExpectedExpression => "Expected expression".into(),
            DiagnosticKind::TrailingExpressionTokens(rest) => {
                format!("Unexpected trailing input in expression: {}", rest)
            }
        }
    }
}
