//! JavaScript-compatible coercions.
//!
//! Both interpreters go through these functions so that conditions, expressions and
//! sort comparisons agree bit for bit.

use std::cmp::Ordering;

use crate::number::format_number;
use crate::value::Value;

/// `false`, `0`, `NaN`, `""`, `null` and `undefined` are falsy.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Str(s) => !s.is_empty(),
        Value::List(_) | Value::Object(_) => true,
    }
}

/// Lists join their elements with `,`; objects become `[object Object]`.
pub fn to_primitive(v: &Value) -> Value {
    match v {
        Value::List(_) | Value::Object(_) => Value::Str(to_js_string(v)),
        other => other.clone(),
    }
}

pub fn to_js_string(v: &Value) -> String {
    match v {
        Value::Undefined => "undefined".into(),
        Value::Null => "null".into(),
        Value::Bool(b) => if *b { "true" } else { "false" }.into(),
        Value::Number(n) => format_number(*n),
        Value::Str(s) => s.clone(),
        Value::List(items) => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if !item.is_nullish() {
                    out.push_str(&to_js_string(item));
                }
            }
            out
        }
        Value::Object(_) => "[object Object]".into(),
    }
}

pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::Str(s) => string_to_number(s),
        Value::List(_) | Value::Object(_) => to_number(&to_primitive(v)),
    }
}

fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }
    // Rust accepts "inf"/"nan" spellings that JavaScript does not.
    if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Abstract equality (`==`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Bool(x), Bool(y)) => x == y,
        (Number(x), Number(y)) => x == y,
        (Str(x), Str(y)) => x == y,
        (Number(x), Str(s)) | (Str(s), Number(x)) => *x == string_to_number(s),
        (Bool(x), other) | (other, Bool(x)) => {
            loose_eq(&Number(f64::from(u8::from(*x))), other)
        }
        (List(_) | Object(_), List(_) | Object(_)) => a == b,
        (List(_) | Object(_), _) => loose_eq(&to_primitive(a), b),
        (_, List(_) | Object(_)) => loose_eq(a, &to_primitive(b)),
    }
}

/// Relational ordering as used by `<`, `>`, `<=`, `>=`; `None` when either side is `NaN`
/// after coercion.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    let pa = to_primitive(a);
    let pb = to_primitive(b);
    if let (Value::Str(x), Value::Str(y)) = (&pa, &pb) {
        return Some(x.encode_utf16().cmp(y.encode_utf16()));
    }
    to_number(&pa).partial_cmp(&to_number(&pb))
}

pub fn lt(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Less))
}

pub fn gt(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater))
}

pub fn le(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

pub fn ge(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

pub fn add(a: &Value, b: &Value) -> Value {
    let pa = to_primitive(a);
    let pb = to_primitive(b);
    if matches!(pa, Value::Str(_)) || matches!(pb, Value::Str(_)) {
        let mut s = to_js_string(&pa);
        s.push_str(&to_js_string(&pb));
        return Value::Str(s);
    }
    Value::Number(to_number(&pa) + to_number(&pb))
}

pub fn sub(a: &Value, b: &Value) -> Value {
    Value::Number(to_number(a) - to_number(b))
}

pub fn mul(a: &Value, b: &Value) -> Value {
    Value::Number(to_number(a) * to_number(b))
}

pub fn div(a: &Value, b: &Value) -> Value {
    Value::Number(to_number(a) / to_number(b))
}

/// Property read `obj.prop`; never fails.
pub fn get_member(obj: &Value, prop: &str) -> Value {
    match obj {
        Value::Object(map) => map.get(prop).cloned().unwrap_or(Value::Undefined),
        Value::List(items) => {
            if prop == "length" {
                return Value::Number(items.len() as f64);
            }
            match prop.parse::<usize>() {
                Ok(idx) if canonical_index(prop) => {
                    items.get(idx).cloned().unwrap_or(Value::Undefined)
                }
                _ => Value::Undefined,
            }
        }
        Value::Str(s) => {
            if prop == "length" {
                Value::Number(s.encode_utf16().count() as f64)
            } else {
                Value::Undefined
            }
        }
        _ => Value::Undefined,
    }
}

fn canonical_index(prop: &str) -> bool {
    prop == "0" || !prop.starts_with('0')
}
