/// True when `s` is wrapped in a matching pair of single or double quotes.
pub fn is_quoted(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
}

/// Strip one pair of matching quotes and decode escapes; other input is returned as is.
pub fn unquote(s: &str) -> String {
    if is_quoted(s) {
        unescape(&s[1..s.len() - 1])
    } else {
        s.to_string()
    }
}

pub fn unescape(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => res.push('\n'),
                Some('r') => res.push('\r'),
                Some('t') => res.push('\t'),
                Some('\\') => res.push('\\'),
                Some('"') => res.push('"'),
                Some('\'') => res.push('\''),
                Some(next) => {
                    res.push('\\');
                    res.push(next);
                }
                None => res.push('\\'),
            }
        } else {
            res.push(c);
        }
    }
    res
}
