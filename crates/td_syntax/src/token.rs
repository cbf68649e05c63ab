//! Tokens of the let-binding expression language.
use crate::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier.
    Ident,
    /// Numeric literal, sign included when it directly prefixes the digits.
    Number,
    /// Single- or double-quoted string literal.
    Str,

    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `.`
    Dot,

    /// End of input.
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::True | TokenKind::False | TokenKind::Null)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
