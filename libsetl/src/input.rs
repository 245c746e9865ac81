//! Classification of raw input lines
use crate::delim::{self, Balance};
use crate::{Directive, Result, DIRECTIVE_MARKER, STATEMENT_SEPARATOR};

/// What a line of input turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line or bare separators
    Noop,
    /// REPL directive
    Directive(Directive),
    /// `token!` - documentation lookup for `token`
    Lookup(String),
    /// Code with unclosed delimiters, more lines required
    Incomplete,
    /// Complete code terminated by a statement separator
    Ready(String),
}

/// Classify a fresh line of input
pub fn classify(line: &str) -> Result<Input> {
    let line = line.trim();
    if line
        .chars()
        .all(|c| c.is_whitespace() || c == STATEMENT_SEPARATOR)
    {
        return Ok(Input::Noop);
    }
    if line.starts_with(DIRECTIVE_MARKER) {
        return Directive::parse(line).map(Input::Directive);
    }
    if let Some(token) = line.strip_suffix(DIRECTIVE_MARKER) {
        return Ok(Input::Lookup(token.to_string()));
    }
    finish(line)
}

/// Check code for completeness, terminating it with a separator when complete.
///
/// Used directly for accumulated continuation buffers, which skip the no-op, directive and
/// lookup checks of [`classify`].
pub fn finish(code: &str) -> Result<Input> {
    match delim::check(code)? {
        Balance::Incomplete => Ok(Input::Incomplete),
        Balance::Complete if code.ends_with(STATEMENT_SEPARATOR) => {
            Ok(Input::Ready(code.to_string()))
        }
        Balance::Complete => Ok(Input::Ready(format!("{code}{STATEMENT_SEPARATOR}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;

    #[test]
    fn noop() {
        assert_eq!(classify("").unwrap(), Input::Noop);
        assert_eq!(classify("   ").unwrap(), Input::Noop);
        assert_eq!(classify(";").unwrap(), Input::Noop);
        assert_eq!(classify(" ; ;;\t").unwrap(), Input::Noop);
    }

    #[test]
    fn directive() {
        assert_eq!(
            classify("!cache").unwrap(),
            Input::Directive(Directive::ListHistory)
        );
        assert_eq!(classify("!quit").unwrap(), Input::Directive(Directive::Quit));
        assert_matches!(classify("!what"), Err(Error::UnknownDirective(_)));
    }

    #[test]
    fn lookup() {
        assert_eq!(
            classify("domain!").unwrap(),
            Input::Lookup("domain".to_string())
        );
    }

    #[test]
    fn lone_marker_is_directive() {
        assert_matches!(classify("!"), Err(Error::UnknownDirective(_)));
    }

    #[test]
    fn appends_separator() {
        assert_eq!(
            classify("x := 1").unwrap(),
            Input::Ready("x := 1;".to_string())
        );
        assert_eq!(
            classify("  x := 1;  ").unwrap(),
            Input::Ready("x := 1;".to_string())
        );
    }

    #[test]
    fn incomplete() {
        assert_eq!(classify("s := {1,").unwrap(), Input::Incomplete);
    }

    #[test]
    fn mismatch() {
        assert_matches!(classify("f(x]"), Err(Error::DelimiterMismatch(']')));
    }

    #[test]
    fn finish_skips_directive_checks() {
        // A buffer that happens to end with the marker is still code
        assert_eq!(
            finish("print(\"hi\"\n)").unwrap(),
            Input::Ready("print(\"hi\"\n);".to_string())
        );
        assert_eq!(
            finish("f(1,\n2)!").unwrap(),
            Input::Ready("f(1,\n2)!;".to_string())
        );
    }
}
