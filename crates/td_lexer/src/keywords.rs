use td_syntax::TokenKind;

pub(crate) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "null" => TokenKind::Null,
};
