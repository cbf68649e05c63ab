use std::sync::LazyLock;

use regex::Regex;
use td_ir::Literal;
use td_syntax::{is_quoted, unquote};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[+-]?[0-9]+(\.[0-9]+)?$"));

pub(crate) fn pattern(src: &'static str) -> Regex {
    Regex::new(src).expect("pattern literal should compile")
}

/// Literal for a model argument, condition operand or `set` value. Anything that is not a
/// keyword, a quoted string or a plain decimal number is kept as a bare symbol.
pub fn parse_scalar(text: &str) -> Literal {
    let text = text.trim();
    match text {
        "true" => return Literal::Bool(true),
        "false" => return Literal::Bool(false),
        "null" => return Literal::Null,
        _ => {}
    }
    if is_quoted(text) {
        return Literal::Str(unquote(text));
    }
    if NUMBER.is_match(text) {
        if let Ok(n) = text.parse::<f64>() {
            return Literal::Number(n);
        }
    }
    Literal::Str(text.to_string())
}
