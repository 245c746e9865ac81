//! Delimiter balance checking for `()`, `[]` and `{}`
use crate::{Error, Result};

/// Whether scanned text closes every delimiter it opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Every opening delimiter is closed
    Complete,
    /// At least one opening delimiter awaits a later line
    Incomplete,
}

/// Scan `code` for delimiter pairs.
///
/// Text inside `"` or `'` quotes is skipped. Strings never span lines, so an unterminated
/// quote ends at the next newline. An unexpected closing delimiter is an error.
pub fn check(code: &str) -> Result<Balance> {
    let mut stack = vec![];
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in code.chars() {
        if let Some(q) = quote {
            match c {
                '\n' => {
                    quote = None;
                    escaped = false;
                }
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => match stack.last() {
                Some(open) if closing(*open) == c => {
                    stack.pop();
                }
                _ => return Err(Error::DelimiterMismatch(c)),
            },
            _ => {}
        }
    }

    if stack.is_empty() {
        Ok(Balance::Complete)
    } else {
        Ok(Balance::Incomplete)
    }
}

/// Closing delimiter for an opening one
fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn balanced() {
        assert_eq!(check("").unwrap(), Balance::Complete);
        assert_eq!(check("x := 1;").unwrap(), Balance::Complete);
        assert_eq!(check("f({1, 2}, [3]);").unwrap(), Balance::Complete);
        assert_eq!(check("((([{}])))").unwrap(), Balance::Complete);
    }

    #[test]
    fn unclosed() {
        assert_eq!(check("s := {1, 2").unwrap(), Balance::Incomplete);
        assert_eq!(check("f(g(x)").unwrap(), Balance::Incomplete);
        assert_eq!(check("[").unwrap(), Balance::Incomplete);
    }

    #[test]
    fn unexpected_close() {
        assert_matches!(check("x)"), Err(Error::DelimiterMismatch(')')));
        assert_matches!(check("(]"), Err(Error::DelimiterMismatch(']')));
        assert_matches!(check("{1, 2)}"), Err(Error::DelimiterMismatch(')')));
    }

    #[test]
    fn quoted_delimiters_ignored() {
        assert_eq!(check(r#"print("(");"#).unwrap(), Balance::Complete);
        assert_eq!(check("print(')');").unwrap(), Balance::Complete);
        assert_eq!(check(r#"print("\")(");"#).unwrap(), Balance::Complete);
        assert_eq!(check(r#"f("}", "#).unwrap(), Balance::Incomplete);
    }

    #[test]
    fn strings_end_at_newline() {
        // Unterminated string on the first line does not swallow the second
        assert_eq!(check("f(\"abc\n)").unwrap(), Balance::Complete);
    }

    #[test]
    fn continuation_lines() {
        let buf = "proc f(x);\n  return {x,";
        assert_eq!(check(buf).unwrap(), Balance::Incomplete);
        assert_eq!(check(&format!("{buf}\n 1}};")).unwrap(), Balance::Complete);
    }
}
