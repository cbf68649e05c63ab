pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut cur = vec![0; b_len + 1];
    for i in 1..=a_len {
        cur[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b_len]
}

pub fn find_best_match<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    let mut best_match = None;
    let mut min_distance = (name.chars().count() / 2).max(1);

    for candidate in candidates {
        let distance = levenshtein_distance(name, candidate);
        if distance <= min_distance {
            min_distance = distance;
            best_match = Some(candidate);
        }
    }

    best_match
}

pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

/// Task ids additionally allow `-` after the first character.
pub fn is_task_id(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(|c| is_ident_continue(c) || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_directive() {
        let known = ["%in", "%model", "%out"];
        assert_eq!(find_best_match("%mdoel", known.into_iter()), Some("%model"));
        assert_eq!(find_best_match("%zzzzzz", known.into_iter()), None);
    }

    #[test]
    fn identifiers_and_task_ids() {
        assert!(is_ident("_x1"));
        assert!(!is_ident("1x"));
        assert!(!is_ident("a-b"));
        assert!(is_task_id("sort-demo_2"));
        assert!(!is_task_id("-sort"));
        assert!(!is_task_id(""));
    }
}
