/// Strip a leading byte order mark and fold `\r\n` / `\r` line endings into `\n`.
pub fn normalize_source(input: &str) -> String {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize_source;

    #[test]
    fn folds_line_endings_and_bom() {
        assert_eq!(normalize_source("\u{feff}@id: a\r\nlet x = 1\rlet y = 2"), "@id: a\nlet x = 1\nlet y = 2");
        assert_eq!(normalize_source("plain\n"), "plain\n");
    }
}
