//! JavaScript `Number#toString` formatting.

/// Format `n` exactly as JavaScript's `String(n)` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n == 0.0 {
        return "0".into();
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        let mut buf = itoa::Buffer::new();
        return buf.format(n as i64).to_string();
    }

    let mut buf = ryu::Buffer::new();
    let shortest = buf.format_finite(n.abs());
    let (digits, exp) = decimal_digits(shortest);
    let mut out = String::with_capacity(digits.len() + 8);
    if n < 0.0 {
        out.push('-');
    }
    let k = digits.len() as i32;
    if k <= exp && exp <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (exp - k) as usize));
    } else if 0 < exp && exp <= 21 {
        out.push_str(&digits[..exp as usize]);
        out.push('.');
        out.push_str(&digits[exp as usize..]);
    } else if -6 < exp && exp <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-exp) as usize));
        out.push_str(&digits);
    } else {
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        let e = exp - 1;
        if e >= 0 {
            out.push('+');
        }
        let mut ibuf = itoa::Buffer::new();
        out.push_str(ibuf.format(e));
    }
    out
}

/// Split a positive shortest decimal rendering into significant digits `d` and exponent
/// `n` such that the value equals `0.d × 10^n`.
fn decimal_digits(s: &str) -> (String, i32) {
    let (mantissa, e) = match s.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (s, 0),
    };
    let point = mantissa.find('.').unwrap_or(mantissa.len()) as i32;
    let raw: String = mantissa.chars().filter(|c| *c != '.').collect();
    let leading = raw.len() - raw.trim_start_matches('0').len();
    let digits = raw.trim_start_matches('0').trim_end_matches('0').to_string();
    let exp = point + e - leading as i32;
    if digits.is_empty() {
        ("0".into(), 1)
    } else {
        (digits, exp)
    }
}
