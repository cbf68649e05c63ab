//! Let-binding expressions.
//!
//! Pratt parser over `td_lexer` tokens: `+ -` bind looser than `* /`, both
//! left-associative. Primaries are literals or an identifier with `.property` suffixes.
use td_ir::{BinaryOp, Expr, Literal};
use td_lexer::Lexer;
use td_syntax::{Diagnostic, DiagnosticKind, Span, Token, TokenKind, codes, unquote};

/// Parse `input` as one complete expression. `base` is its byte offset in the source file.
pub fn parse_expr(input: &str, base: u32) -> Result<Expr, Diagnostic> {
    let lexed = Lexer::new(input, base).lex();
    if let Some(diag) = lexed.diagnostics.into_iter().next() {
        return Err(diag.with_code(codes::INVALID_EXPRESSION));
    }
    let mut p = ExprParser {
        input,
        base,
        tokens: &lexed.tokens,
        i: 0,
    };
    let expr = p.parse_binary(0)?;
    let tok = p.peek();
    if tok.kind != TokenKind::Eof {
        let rest = p.text(Span::new(tok.span.start.0, base + input.len() as u32));
        return Err(p.error(
            DiagnosticKind::TrailingExpressionTokens(rest.trim().to_string()),
            tok.span,
        ));
    }
    Ok(expr)
}

fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Add | BinaryOp::Sub => (1, 2),
        BinaryOp::Mul | BinaryOp::Div => (3, 4),
    }
}

struct ExprParser<'a> {
    input: &'a str,
    base: u32,
    tokens: &'a [Token],
    i: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Token {
        // The lexer always terminates the stream with `Eof`.
        self.tokens[self.i.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let t = self.peek();
        if self.i < self.tokens.len() - 1 {
            self.i += 1;
        }
        t
    }

    fn text(&self, span: Span) -> &'a str {
        let start = (span.start.0 - self.base) as usize;
        let end = (span.end.0 - self.base) as usize;
        &self.input[start..end]
    }

    fn error(&self, kind: DiagnosticKind, span: Span) -> Diagnostic {
        Diagnostic::error_kind(kind, Some(span)).with_code(codes::INVALID_EXPRESSION)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_postfix()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_primary()?;
        // Member access only follows a name.
        while matches!(expr, Expr::Ident(_) | Expr::Member { .. })
            && self.peek().kind == TokenKind::Dot
        {
            self.bump();
            let t = self.bump();
            if t.kind != TokenKind::Ident && !t.kind.is_keyword() {
                return Err(self.error(
                    DiagnosticKind::ExpectedToken("property name after `.`".into()),
                    t.span,
                ));
            }
            expr = Expr::Member {
                object: Box::new(expr),
                property: self.text(t.span).to_string(),
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let t = self.bump();
        let lit = match t.kind {
            TokenKind::Ident => return Ok(Expr::Ident(self.text(t.span).to_string())),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,
            TokenKind::Str => Literal::Str(unquote(self.text(t.span))),
            TokenKind::Number => {
                let text = self.text(t.span);
                let n = text.parse::<f64>().map_err(|_| {
                    self.error(DiagnosticKind::MalformedNumber(text.to_string()), t.span)
                })?;
                Literal::Number(n)
            }
            _ => return Err(self.error(DiagnosticKind::ExpectedExpression, t.span)),
        };
        Ok(Expr::Literal(lit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Box<Expr> {
        Box::new(Expr::Ident(s.into()))
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Number(n)))
    }

    #[test]
    fn precedence_and_members() {
        let e = parse_expr("x * 2 + obj.y", 0).unwrap();
        assert_eq!(
            e,
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: ident("x"),
                    right: num(2.0),
                }),
                right: Box::new(Expr::Member {
                    object: ident("obj"),
                    property: "y".into(),
                }),
            }
        );
    }

    #[test]
    fn left_associative() {
        let e = parse_expr("a - b - c", 0).unwrap();
        let Expr::Binary { op: BinaryOp::Sub, left, right } = e else {
            panic!("expected subtraction");
        };
        assert_eq!(*right, Expr::Ident("c".into()));
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn signed_literals() {
        assert_eq!(
            parse_expr("x * -2", 0).unwrap(),
            Expr::Binary {
                op: BinaryOp::Mul,
                left: ident("x"),
                right: num(-2.0),
            }
        );
        assert_eq!(*num(2.5), parse_expr("+2.5", 0).unwrap());
    }

    #[test]
    fn rejects_malformed_input() {
        for src in ["1.", "1.2.3", "--1", "x +", "a b", "(x)", "x.", "", "!x", "x == 1"] {
            let err = parse_expr(src, 0).unwrap_err();
            assert_eq!(err.code, Some(codes::INVALID_EXPRESSION), "{src}");
        }
    }

    #[test]
    fn member_access_needs_a_name() {
        for src in ["true.x", "\"s\".length", "null.a", "obj.y + false.z"] {
            let err = parse_expr(src, 0).unwrap_err();
            assert_eq!(err.code, Some(codes::INVALID_EXPRESSION), "{src}");
        }
        assert!(matches!(
            parse_expr("obj.z.w", 0).unwrap(),
            Expr::Member { ref property, .. } if property == "w"
        ));
    }

    #[test]
    fn trailing_input_is_reported_with_offset_span() {
        let err = parse_expr("a b", 10).unwrap_err();
        assert_eq!(err.message, "Unexpected trailing input in expression: b");
        assert_eq!(err.span, Some(Span::new(12, 13)));
    }
}
