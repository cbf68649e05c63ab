//! Line scanner.
//!
//! The header must come first; after it every significant line is dispatched on its
//! prefix. `%in:` is the only statement that can span lines: its payload runs until the
//! next line that opens a statement.
use td_core::Value;
use td_ir::{Program, ProgramBuilder, Stmt, StmtKind};
use td_syntax::{Diagnostic, DiagnosticKind, Span, find_best_match, is_task_id};

use crate::SyntaxError;
use crate::error::diag;
use crate::stmt::{Directive, parse_line};

const DIRECTIVES: [&str; 3] = ["%in", "%model", "%out"];

/// Parse a whole task file.
pub fn parse(src: &str) -> Result<Program, SyntaxError> {
    Parser::new(src).parse()
}

#[derive(Clone, Copy, Debug)]
struct Line<'a> {
    start: u32,
    text: &'a str,
}

impl<'a> Line<'a> {
    fn span(self) -> Span {
        Span::new(self.start, self.start + self.text.len() as u32)
    }

    /// Text without leading whitespace and its absolute offset.
    fn body(self) -> (&'a str, u32) {
        let body = self.text.trim_start();
        (body, self.start + (self.text.len() - body.len()) as u32)
    }

    fn is_trivia(self) -> bool {
        let t = self.text.trim();
        t.is_empty() || t.starts_with('#') || t.starts_with("//")
    }
}

pub struct Parser<'a> {
    lines: Vec<Line<'a>>,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut lines = Vec::with_capacity(src.len() / 24 + 1);
        let mut start = 0u32;
        for piece in src.split('\n') {
            lines.push(Line {
                start,
                text: piece.strip_suffix('\r').unwrap_or(piece),
            });
            start += piece.len() as u32 + 1;
        }
        Self { lines, i: 0 }
    }

    pub fn parse(mut self) -> Result<Program, SyntaxError> {
        let task_id = self.parse_header()?;
        let mut builder = ProgramBuilder::new(task_id);
        while let Some(idx) = self.next_significant() {
            let line = self.lines[idx];
            let (body, base) = line.body();
            let Some(dir) = Directive::classify(body) else {
                return Err(self.error(idx, unknown_statement(body)));
            };
            let (kind, span) = match dir {
                Directive::Input => self.parse_input(idx, body)?,
                _ => {
                    let kind = parse_line(dir, body, base).map_err(|d| self.error(idx, d))?;
                    (kind, line.span())
                }
            };
            builder.push(Stmt { kind, span }).map_err(|dup| {
                self.error(idx, diag(DiagnosticKind::DuplicateDeclaration(dup.directive())))
            })?;
        }
        Ok(builder.finish())
    }

    /// Index of the next non-blank, non-comment line, consuming everything up to it.
    fn next_significant(&mut self) -> Option<usize> {
        while self.i < self.lines.len() {
            let idx = self.i;
            self.i += 1;
            if !self.lines[idx].is_trivia() {
                return Some(idx);
            }
        }
        None
    }

    fn parse_header(&mut self) -> Result<String, SyntaxError> {
        let Some(idx) = self.next_significant() else {
            return Err(self.error(0, diag(DiagnosticKind::MissingTaskHeader)));
        };
        let (body, _) = self.lines[idx].body();
        let Some(rest) = body.strip_prefix("@id:") else {
            return Err(self.error(idx, diag(DiagnosticKind::MissingTaskHeader)));
        };
        let id = rest.trim();
        if !is_task_id(id) {
            return Err(self.error(idx, diag(DiagnosticKind::InvalidTaskHeader)));
        }
        Ok(id.to_string())
    }

    fn parse_input(&mut self, idx: usize, body: &str) -> Result<(StmtKind, Span), SyntaxError> {
        let mut payload = body["%in:".len()..].to_string();
        let mut span = self.lines[idx].span();
        while let Some(&next) = self.lines.get(self.i) {
            if Directive::classify(next.text.trim_start()).is_some() {
                break;
            }
            self.i += 1;
            if next.is_trivia() && !next.text.trim().is_empty() {
                continue;
            }
            payload.push('\n');
            payload.push_str(next.text);
            span = span.merge(next.span());
        }
        if payload.trim().is_empty() {
            return Err(self.error(idx, diag(DiagnosticKind::EmptyInputPayload)));
        }
        let json: serde_json::Value = serde_json::from_str(&payload).map_err(|e| {
            self.error(idx, diag(DiagnosticKind::InvalidInputPayload(e.to_string())))
        })?;
        Ok((StmtKind::Input(Value::from_json(json)), span))
    }

    fn error(&self, idx: usize, mut diagnostic: Diagnostic) -> SyntaxError {
        let line = self.lines.get(idx).copied().unwrap_or(Line { start: 0, text: "" });
        if diagnostic.span.is_none() {
            diagnostic.span = Some(line.span());
        }
        SyntaxError {
            line: idx + 1,
            text: line.text.to_string(),
            diagnostic,
        }
    }
}

fn unknown_statement(body: &str) -> Diagnostic {
    let d = diag(DiagnosticKind::UnknownStatement(body.trim_end().to_string()));
    if !body.starts_with('%') {
        return d;
    }
    let word = body.split(':').next().unwrap_or(body).trim_end();
    match find_best_match(word, DIRECTIVES.into_iter()) {
        Some(m) => d.with_suggestion(format!("did you mean `{m}:`?")),
        None => d,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_ir::{Action, CompareOp, Literal};

    #[test]
    fn header_then_statements_in_source_order() {
        let src = "# leading comment\n\n@id: rank-docs\n%in: [3, 1, 2]\n%model: sort{algorithm=bubble}\n// note\n%out: result\n";
        let program = parse(src).unwrap();
        assert_eq!(program.task_id, "rank-docs");
        assert_eq!(program.input(), Some(&Value::from_json(serde_json::json!([3, 1, 2]))));
        assert_eq!(program.model().map(|m| m.ty.as_str()), Some("sort"));
        assert_eq!(program.out(), Some("result"));
        assert_eq!(program.source_order().len(), 3);
    }

    #[test]
    fn multiline_input_block_ends_at_next_statement() {
        let src = "@id: t\n%in: {\n  \"confidence\": 0.92,\n  # comment inside\n  \"list\": [2, 1]\n}\n!if confidence >= 0.8 then emit high\n";
        let program = parse(src).unwrap();
        let input = program.input().and_then(Value::as_object).unwrap();
        assert_eq!(input.keys().collect::<Vec<_>>(), ["confidence", "list"]);
        let action = program.actions().next().unwrap();
        assert_eq!(
            action.cond.compare,
            Some((CompareOp::Ge, Literal::Number(0.8)))
        );
        assert_eq!(action.action, Action::Emit("high".into()));
    }

    #[test]
    fn header_errors() {
        let err = parse("%out: x\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.code(), Some(td_syntax::codes::MISSING_TASK_HEADER));
        assert!(parse("").is_err());
        let err = parse("\n@id: 9lives\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message().starts_with("Invalid task declaration"));
    }

    #[test]
    fn unknown_statement_reports_line_and_suggestion() {
        let err = parse("@id: t\n\n%mdoel: sort\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.text, "%mdoel: sort");
        assert_eq!(err.code(), Some(td_syntax::codes::UNKNOWN_STATEMENT));
        assert_eq!(
            err.diagnostic.suggestion.as_deref(),
            Some("did you mean `%model:`?")
        );
        assert_eq!(err.diagnostic.span, Some(Span::new(8, 20)));
    }

    #[test]
    fn input_payload_errors() {
        let err = parse("@id: t\n%in:\n%out: x\n").unwrap_err();
        assert_eq!(err.message(), "Input block `%in:` has no payload");
        let err = parse("@id: t\n%in: {bad json}\n").unwrap_err();
        assert_eq!(err.code(), Some(td_syntax::codes::INVALID_INPUT_PAYLOAD));
    }

    #[test]
    fn duplicates_are_rejected() {
        for (src, line) in [
            ("@id: t\n%out: a\n%out: b\n", 3),
            ("@id: t\n%model: sort\n%out: a\n%model: tool\n", 4),
            ("@id: t\n%in: 1\n%in: 2\n", 3),
        ] {
            let err = parse(src).unwrap_err();
            assert_eq!(err.line, line, "{src}");
            assert_eq!(err.code(), Some(td_syntax::codes::DUPLICATE_DECLARATION));
        }
    }

    #[test]
    fn let_errors_point_into_the_expression() {
        let err = parse("@id: t\nlet z = x +\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.code(), Some(td_syntax::codes::INVALID_EXPRESSION));
        assert_eq!(err.diagnostic.span, Some(Span::new(18, 18)));
    }
}
