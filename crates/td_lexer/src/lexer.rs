//! Expression lexer.
//!
//! Scans a let-binding right-hand side into tokens in a single linear pass. A `+` or `-`
//! that directly precedes a digit is folded into the number when no operand precedes it,
//! which is how signed literals such as `x * -2` are recognized.
use crate::keywords::KEYWORDS;
use td_syntax::{Diagnostic, DiagnosticKind, Span, Token, TokenKind, is_ident_continue, is_ident_start};

/// Lexing result.
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    i: usize,
    base: u32,
    diagnostics: Vec<Diagnostic>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// `base` is the byte offset of `input` inside the whole source, so spans point into
    /// the original file.
    pub fn new(input: &'a str, base: u32) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            i: 0,
            base,
            diagnostics: Vec::new(),
            tokens: Vec::with_capacity(input.len() / 2 + 1),
        }
    }

    pub fn lex(mut self) -> LexResult {
        while self.i < self.bytes.len() {
            let start = self.i;
            let Some(c) = self.peek_char() else { break };
            match c {
                ' ' | '\t' | '\n' => self.i += 1,
                '+' | '-' if self.sign_allowed() && self.peek_digit_at(self.i + 1) => {
                    self.i += 1;
                    self.lex_number(start);
                }
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                '.' => self.single(TokenKind::Dot),
                '"' | '\'' => self.lex_string(c),
                c if c.is_ascii_digit() => self.lex_number(start),
                c if is_ident_start(c) => self.lex_ident(),
                other => {
                    self.i += other.len_utf8();
                    self.error(DiagnosticKind::UnexpectedChar(other), start, self.i);
                }
            }
            if !self.diagnostics.is_empty() {
                break;
            }
        }
        let end = self.bytes.len();
        self.push(TokenKind::Eof, end, end);
        LexResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.i..].chars().next()
    }

    fn peek_digit_at(&self, idx: usize) -> bool {
        self.bytes.get(idx).is_some_and(|b| b.is_ascii_digit())
    }

    /// A sign starts a literal unless it follows something that can be a left operand.
    fn sign_allowed(&self) -> bool {
        !matches!(
            self.tokens.last().map(|t| t.kind),
            Some(
                TokenKind::Ident
                    | TokenKind::Number
                    | TokenKind::Str
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Null
            )
        )
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.i;
        self.i += 1;
        self.push(kind, start, self.i);
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start as u32, end as u32).offset(self.base),
        });
    }

    fn error(&mut self, kind: DiagnosticKind, start: usize, end: usize) {
        let span = Span::new(start as u32, end as u32).offset(self.base);
        self.diagnostics.push(Diagnostic::error_kind(kind, Some(span)));
    }

    fn eat_digits(&mut self) -> usize {
        let from = self.i;
        while self.peek_digit_at(self.i) {
            self.i += 1;
        }
        self.i - from
    }

    /// `digits(.digits)?`, the optional sign already consumed.
    fn lex_number(&mut self, start: usize) {
        self.eat_digits();
        let mut malformed = false;
        if self.bytes.get(self.i) == Some(&b'.') {
            self.i += 1;
            if self.eat_digits() == 0 {
                malformed = true;
            }
        }
        // `1.2.3`, `12abc` and friends run into the next character without a separator.
        while let Some(c) = self.peek_char() {
            if c == '.' || is_ident_continue(c) {
                malformed = true;
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if malformed {
            let text = self.input[start..self.i].to_string();
            self.error(DiagnosticKind::MalformedNumber(text), start, self.i);
            return;
        }
        self.push(TokenKind::Number, start, self.i);
    }

    fn lex_ident(&mut self) {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if !is_ident_continue(c) {
                break;
            }
            self.i += c.len_utf8();
        }
        let text = &self.input[start..self.i];
        let kind = KEYWORDS.get(text).copied().unwrap_or(TokenKind::Ident);
        self.push(kind, start, self.i);
    }

    fn lex_string(&mut self, quote: char) {
        let start = self.i;
        self.i += 1;
        while let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
            if c == '\\' {
                if let Some(next) = self.peek_char() {
                    self.i += next.len_utf8();
                }
            } else if c == quote {
                self.push(TokenKind::Str, start, self.i);
                return;
            }
        }
        self.error(DiagnosticKind::UnterminatedString, start, self.i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let res = Lexer::new(src, 0).lex();
        assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
        res.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn signs_fold_into_literals_only_in_operand_position() {
        use TokenKind::*;
        assert_eq!(kinds("x -3"), vec![Ident, Minus, Number, Eof]);
        assert_eq!(kinds("x * -2"), vec![Ident, Star, Number, Eof]);
        assert_eq!(kinds("-2.5"), vec![Number, Eof]);
        assert_eq!(kinds("+4"), vec![Number, Eof]);
    }

    #[test]
    fn member_chains_and_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("a.b.c + null"),
            vec![Ident, Dot, Ident, Dot, Ident, Plus, Null, Eof]
        );
        assert_eq!(kinds("'s' \"t\" true false"), vec![Str, Str, True, False, Eof]);
    }

    #[test]
    fn malformed_numbers_are_reported() {
        for src in ["1.", "1.2.3", "12abc", "3.x"] {
            let res = Lexer::new(src, 0).lex();
            assert_eq!(res.diagnostics.len(), 1, "{src}");
        }
    }

    #[test]
    fn spans_are_offset_by_base() {
        let res = Lexer::new("ab", 10).lex();
        assert_eq!(res.tokens[0].span, Span::new(10, 12));
    }

    #[test]
    fn unterminated_string() {
        let res = Lexer::new("\"abc", 0).lex();
        assert_eq!(res.diagnostics[0].message, "Unterminated string literal");
    }
}
