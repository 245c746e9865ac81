//! REPL directives, typed at the prompt behind the directive marker
use regex::Regex;
use std::sync::OnceLock;

use crate::{Error, Result};

/// A command handled by the REPL itself, never sent to the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `!cache` - list history with indices
    ListHistory,
    /// `!cache N` - evaluate entry N again and move it to the end of history
    Resubmit(usize),
    /// `!quit`
    Quit,
    /// `!help`
    Help,
}

impl Directive {
    /// Parse a directive line, including its leading marker
    pub fn parse(line: &str) -> Result<Self> {
        static CACHE: OnceLock<Regex> = OnceLock::new();
        let cache = CACHE.get_or_init(|| {
            Regex::new(r"^!cache(?:\s+(?P<idx>\d+))?\s*$").expect("valid cache directive regex")
        });

        if let Some(caps) = cache.captures(line) {
            return match caps.name("idx") {
                Some(idx) => idx
                    .as_str()
                    .parse()
                    .map(Directive::Resubmit)
                    .map_err(|_| Error::UnknownDirective(line.to_string())),
                None => Ok(Directive::ListHistory),
            };
        }
        if line.starts_with("!quit") {
            Ok(Directive::Quit)
        } else if line.starts_with("!help") {
            Ok(Directive::Help)
        } else {
            Err(Error::UnknownDirective(line.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn cache() {
        assert_eq!(Directive::parse("!cache").unwrap(), Directive::ListHistory);
        assert_eq!(Directive::parse("!cache 2").unwrap(), Directive::Resubmit(2));
        assert_eq!(Directive::parse("!cache   10").unwrap(), Directive::Resubmit(10));
    }

    #[test]
    fn cache_with_junk() {
        assert_matches!(Directive::parse("!cachex"), Err(Error::UnknownDirective(_)));
        assert_matches!(Directive::parse("!cache -1"), Err(Error::UnknownDirective(_)));
        assert_matches!(Directive::parse("!cache 1 2"), Err(Error::UnknownDirective(_)));
        assert_matches!(
            Directive::parse("!cache 99999999999999999999999"),
            Err(Error::UnknownDirective(_))
        );
    }

    #[test]
    fn quit_and_help_by_prefix() {
        assert_eq!(Directive::parse("!quit").unwrap(), Directive::Quit);
        assert_eq!(Directive::parse("!quitnow").unwrap(), Directive::Quit);
        assert_eq!(Directive::parse("!help").unwrap(), Directive::Help);
        assert_eq!(Directive::parse("!help me").unwrap(), Directive::Help);
    }

    #[test]
    fn unknown() {
        assert_matches!(
            Directive::parse("!frobnicate"),
            Err(Error::UnknownDirective(d)) if d == "!frobnicate"
        );
        assert_matches!(Directive::parse("!"), Err(Error::UnknownDirective(_)));
    }
}
