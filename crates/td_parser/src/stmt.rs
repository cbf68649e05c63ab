//! Single-line statement forms.
//!
//! Each parser receives one line with leading whitespace removed plus the byte offset of
//! that line in the source, and returns either the statement or a diagnostic. Diagnostics
//! without a span are later pinned to the whole line.
use std::sync::LazyLock;

use regex::Regex;
use td_ir::{
    Action, CompareOp, CondAction, Condition, EdgeDecl, LetBinding, Literal, ModelDecl, NodeDecl,
    StmtKind,
};
use td_syntax::{Diagnostic, DiagnosticKind, is_ident, is_quoted, unquote};

use crate::error::diag;
use crate::expr::parse_expr;
use crate::scalar::{parse_scalar, pattern};

static OUT: LazyLock<Regex> = LazyLock::new(|| pattern(r"^%out:\s*([A-Za-z_][A-Za-z0-9_]*)\s*$"));
static MODEL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^%model:\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\{(.*)\})?\s*$")
});
static NODE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^\+\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\[(.*)\])?\s*$")
});
static EDGE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^->\s*([A-Za-z_][A-Za-z0-9_]*)\s*=>\s*([A-Za-z_][A-Za-z0-9_]*)\s*$")
});
static CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(?:(==|>=|<=|=|>|<)\s*([^=<>\s].*?))?\s*$")
});
static IF: LazyLock<Regex> = LazyLock::new(|| pattern(r"^!if\s+(.*)$"));
static EMIT: LazyLock<Regex> = LazyLock::new(|| pattern(r"^emit\s+([A-Za-z_][A-Za-z0-9_]*)\s*$"));
static LOG: LazyLock<Regex> = LazyLock::new(|| pattern(r"^log\s+(.+?)\s*$"));
static SET: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^set\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(\S.*?)\s*$")
});
static LET: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^let\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(\S.*?)\s*$")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Directive {
    Input,
    Model,
    Out,
    Node,
    Edge,
    Cond,
    Action,
    Let,
}

impl Directive {
    /// Recognize the statement kind from its prefix. `line` has no leading whitespace.
    pub(crate) fn classify(line: &str) -> Option<Self> {
        let keyword = |kw: &str| {
            line.strip_prefix(kw)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        };
        if line.starts_with("%in:") {
            Some(Directive::Input)
        } else if line.starts_with("%model:") {
            Some(Directive::Model)
        } else if line.starts_with("%out:") {
            Some(Directive::Out)
        } else if line.starts_with("->") {
            Some(Directive::Edge)
        } else if line.starts_with('+') {
            Some(Directive::Node)
        } else if line.starts_with('?') {
            Some(Directive::Cond)
        } else if keyword("!if") {
            Some(Directive::Action)
        } else if keyword("let") {
            Some(Directive::Let)
        } else {
            None
        }
    }
}

fn malformed(what: &'static str, shape: &'static str) -> Diagnostic {
    diag(DiagnosticKind::MalformedStatement { what, shape })
}

/// Every directive except `%in:`, whose payload may span lines and is read by the scanner.
pub(crate) fn parse_line(dir: Directive, line: &str, base: u32) -> Result<StmtKind, Diagnostic> {
    match dir {
        Directive::Input => Err(malformed("input block", "%in: <json>")),
        Directive::Model => parse_model(line).map(StmtKind::Model),
        Directive::Out => {
            let caps = OUT
                .captures(line)
                .ok_or_else(|| malformed("output declaration", "%out: name"))?;
            Ok(StmtKind::Out(caps[1].to_string()))
        }
        Directive::Node => {
            let caps = NODE
                .captures(line)
                .ok_or_else(|| malformed("graph node", "+name:type[range]"))?;
            Ok(StmtKind::Node(NodeDecl {
                name: caps[1].to_string(),
                ty: caps[2].to_string(),
                range: caps.get(3).map(|m| m.as_str().trim().to_string()),
            }))
        }
        Directive::Edge => {
            let caps = EDGE
                .captures(line)
                .ok_or_else(|| malformed("graph edge", "->from=>to"))?;
            Ok(StmtKind::Edge(EdgeDecl {
                from: caps[1].to_string(),
                to: caps[2].to_string(),
            }))
        }
        Directive::Cond => parse_condition(line[1..].trim()).map(StmtKind::Cond),
        Directive::Action => parse_cond_action(line).map(StmtKind::Action),
        Directive::Let => {
            let caps = LET
                .captures(line)
                .ok_or_else(|| malformed("let binding", "let name = expr"))?;
            let rhs = caps.get(2).map_or((0, ""), |m| (m.start(), m.as_str()));
            let expr = parse_expr(rhs.1, base + rhs.0 as u32)?;
            Ok(StmtKind::Let(LetBinding {
                name: caps[1].to_string(),
                expr,
            }))
        }
    }
}

fn parse_model(line: &str) -> Result<ModelDecl, Diagnostic> {
    let caps = MODEL
        .captures(line)
        .ok_or_else(|| malformed("model declaration", "%model: type{key=value, ...}"))?;
    let mut args: Vec<(String, Literal)> = Vec::new();
    if let Some(body) = caps.get(2) {
        for segment in split_top_level(body.as_str()) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, v)| is_ident(k) && !v.is_empty())
                .ok_or_else(|| malformed("model argument", "key=value"))?;
            let value = parse_scalar(value);
            match args.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value,
                None => args.push((key.to_string(), value)),
            }
        }
    }
    Ok(ModelDecl {
        ty: caps[1].to_string(),
        args,
    })
}

/// Split on commas outside brackets and quotes.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_condition(text: &str) -> Result<Condition, Diagnostic> {
    let caps = CONDITION
        .captures(text)
        .ok_or_else(|| malformed("condition", "name [op value]"))?;
    let compare = match (caps.get(2), caps.get(3)) {
        (Some(op), Some(rhs)) => {
            let op = match op.as_str() {
                "=" | "==" => CompareOp::Eq,
                ">=" => CompareOp::Ge,
                "<=" => CompareOp::Le,
                ">" => CompareOp::Gt,
                _ => CompareOp::Lt,
            };
            Some((op, parse_scalar(rhs.as_str())))
        }
        _ => None,
    };
    Ok(Condition {
        name: caps[1].to_string(),
        compare,
    })
}

fn parse_cond_action(line: &str) -> Result<CondAction, Diagnostic> {
    const SHAPE: &str = "!if condition then action";
    let rest = IF
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| malformed("conditional action", SHAPE))?;
    let (cond, action) =
        split_then(rest).ok_or_else(|| malformed("conditional action", SHAPE))?;
    Ok(CondAction {
        cond: parse_condition(cond)?,
        action: parse_action(action)?,
    })
}

/// Split at the first whitespace-delimited `then` outside quotes.
fn split_then(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => {
                i += 2;
                continue;
            }
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None => {
                let delimited = i > 0
                    && bytes[i - 1].is_ascii_whitespace()
                    && bytes.get(i + 4).is_none_or(|c| c.is_ascii_whitespace());
                if delimited && bytes[i..].starts_with(b"then") {
                    return Some((s[..i].trim(), s[i + 4..].trim()));
                }
            }
        }
        i += 1;
    }
    None
}

fn parse_action(text: &str) -> Result<Action, Diagnostic> {
    if let Some(caps) = EMIT.captures(text) {
        return Ok(Action::Emit(caps[1].to_string()));
    }
    if let Some(caps) = SET.captures(text) {
        return Ok(Action::Set {
            name: caps[1].to_string(),
            value: parse_scalar(&caps[2]),
        });
    }
    if let Some(caps) = LOG.captures(text) {
        if is_quoted(&caps[1]) {
            return Ok(Action::Log(unquote(&caps[1])));
        }
    }
    Err(malformed(
        "action",
        "emit name | log \"message\" | set name=value",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(src: &str) -> Result<StmtKind, Diagnostic> {
        let dir = Directive::classify(src).expect("recognized directive");
        parse_line(dir, src, 0)
    }

    #[test]
    fn classify_prefixes() {
        assert_eq!(Directive::classify("%in: {}"), Some(Directive::Input));
        assert_eq!(Directive::classify("->a=>b"), Some(Directive::Edge));
        assert_eq!(Directive::classify("+n:t"), Some(Directive::Node));
        assert_eq!(Directive::classify("!if x then emit x"), Some(Directive::Action));
        assert_eq!(Directive::classify("let x = 1"), Some(Directive::Let));
        assert_eq!(Directive::classify("letx = 1"), None);
        assert_eq!(Directive::classify("!iffy"), None);
        assert_eq!(Directive::classify("emit x"), None);
    }

    #[test]
    fn model_arguments_split_at_depth_zero() {
        let Ok(StmtKind::Model(m)) = line("%model: tool{name=search, q=\"a,b\", opts=[1,2], }") else {
            panic!("expected model");
        };
        assert_eq!(m.ty, "tool");
        assert_eq!(
            m.args,
            vec![
                ("name".to_string(), Literal::Str("search".into())),
                ("q".to_string(), Literal::Str("a,b".into())),
                ("opts".to_string(), Literal::Str("[1,2]".into())),
            ]
        );
    }

    #[test]
    fn model_without_braces_and_bad_segments() {
        let Ok(StmtKind::Model(m)) = line("%model:sort") else {
            panic!("expected model");
        };
        assert!(m.args.is_empty());
        assert!(line("%model: sort{algorithm}").is_err());
        assert!(line("%model: sort{1x=2}").is_err());
        assert!(line("%model: {a=1}").is_err());
    }

    #[test]
    fn conditions_and_actions() {
        let Ok(StmtKind::Action(ca)) = line("!if confidence >= 0.8 then emit high") else {
            panic!("expected action");
        };
        assert_eq!(ca.cond.name, "confidence");
        assert_eq!(ca.cond.compare, Some((CompareOp::Ge, Literal::Number(0.8))));
        assert_eq!(ca.action, Action::Emit("high".into()));

        let Ok(StmtKind::Action(ca)) = line("!if mode = \"a then b\" then set flag = true") else {
            panic!("expected action");
        };
        assert_eq!(
            ca.cond.compare,
            Some((CompareOp::Eq, Literal::Str("a then b".into())))
        );
        assert_eq!(
            ca.action,
            Action::Set {
                name: "flag".into(),
                value: Literal::Bool(true)
            }
        );

        let Ok(StmtKind::Action(ca)) = line("!if ready then log 'go now'") else {
            panic!("expected action");
        };
        assert_eq!(ca.cond.compare, None);
        assert_eq!(ca.action, Action::Log("go now".into()));
    }

    #[test]
    fn malformed_actions() {
        assert!(line("!if x emit y").is_err());
        assert!(line("!if x then").is_err());
        assert!(line("!if x then log unquoted").is_err());
        assert!(line("!if x >= then emit y").is_err());
        assert!(line("!if then emit y").is_err());
        assert!(line("!if x == then emit y").is_err());
    }

    #[test]
    fn comparison_needs_a_value() {
        for src in ["?x ==", "?x <=", "?x >=", "?x =", "?x <", "?x => 1"] {
            assert!(line(src).is_err(), "{src} should be rejected");
        }
        let Ok(StmtKind::Cond(c)) = line("?x<=3") else {
            panic!("expected condition");
        };
        assert_eq!(c.compare, Some((CompareOp::Le, Literal::Number(3.0))));
    }

    #[test]
    fn graph_statements() {
        assert_eq!(
            line("+ scorer : ranker [0, 1]").ok(),
            Some(StmtKind::Node(NodeDecl {
                name: "scorer".into(),
                ty: "ranker".into(),
                range: Some("0, 1".into())
            }))
        );
        assert_eq!(
            line("-> a => b").ok(),
            Some(StmtKind::Edge(EdgeDecl {
                from: "a".into(),
                to: "b".into()
            }))
        );
        assert!(line("+badnode").is_err());
        assert!(line("->a").is_err());
    }
}
