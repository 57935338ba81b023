/// Removes one pair of matching single or double quotes around `s`.
#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let first = b[0];
        let last = b[b.len() - 1];
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Cuts a trailing `%` comment from a data row. A `%` inside quotes is data.
pub fn strip_trailing_comment(line: &str) -> &str {
    let mut in_quotes: Option<char> = None;
    for (i, ch) in line.char_indices() {
        match in_quotes {
            Some(q) if ch == q => in_quotes = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => in_quotes = Some(ch),
            None if ch == '%' => return line[..i].trim_end(),
            None => {}
        }
    }
    line
}

/// Splits a comma separated row into trimmed fields, keeping quoted commas.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes: Option<char> = None;

    for ch in line.chars() {
        match in_quotes {
            Some(q) => {
                if ch == q {
                    in_quotes = None;
                }
                cur.push(ch);
            }
            None => {
                if ch == '"' || ch == '\'' {
                    in_quotes = Some(ch);
                    cur.push(ch);
                } else if ch == ',' {
                    out.push(cur.trim().to_string());
                    cur.clear();
                } else {
                    cur.push(ch);
                }
            }
        }
    }
    if !cur.trim().is_empty() {
        out.push(cur.trim().to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes_only_when_matching() {
        assert_eq!(strip_surrounding_quotes("'a,b'"), "a,b");
        assert_eq!(strip_surrounding_quotes(r#""x""#), "x");
        assert_eq!(strip_surrounding_quotes("'x\""), "'x\"");
        assert_eq!(strip_surrounding_quotes("nq"), "nq");
    }

    #[test]
    fn test_trailing_comment_is_removed() {
        assert_eq!(strip_trailing_comment("1.5,2.0,1 % positive"), "1.5,2.0,1");
        assert_eq!(strip_trailing_comment("'50%',1"), "'50%',1");
        assert_eq!(strip_trailing_comment("3,4"), "3,4");
    }

    #[test]
    fn test_split_keeps_quoted_commas() {
        let line = r#"'a,b',85,"85",1"#;
        let p = split_csv_preserving_quotes(line);
        assert_eq!(p, vec!["'a,b'", "85", "\"85\"", "1"]);
    }

    #[test]
    fn test_split_ignores_trailing_whitespace_field() {
        let p = split_csv_preserving_quotes("1, 2 ,3   ");
        assert_eq!(p, vec!["1", "2", "3"]);
    }
}
