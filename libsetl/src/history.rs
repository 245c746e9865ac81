//! Statements accepted during the session, resent ahead of every evaluation
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::{Error, Result};

/// Ordered log of accepted statements
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code` unless it is a print statement.
    /// Returns whether `code` was recorded.
    pub fn append(&mut self, code: String) -> bool {
        if is_print(&code) {
            debug!("history skips print statement {code:?}");
            return false;
        }
        debug!("history[{}] = {code:?}", self.entries.len());
        self.entries.push(code);
        true
    }

    /// Remove and return the entry at `index`
    pub fn take(&mut self, index: usize) -> Result<String> {
        if index >= self.entries.len() {
            return Err(Error::OutOfBounds(index));
        }
        Ok(self.entries.remove(index))
    }

    /// Push an entry to the end, bypassing the print check
    pub(crate) fn push(&mut self, code: String) {
        self.entries.push(code);
    }

    /// Current entries with their indices
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    /// Entries in order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full program text: every entry followed by `code`, one per line
    pub fn program(&self, code: &str) -> String {
        let mut prog = String::new();
        for entry in &self.entries {
            prog.push_str(entry);
            prog.push('\n');
        }
        prog.push_str(code);
        prog
    }
}

/// Whether `code` is a print statement, which only produces output
fn is_print(code: &str) -> bool {
    static PRINT: OnceLock<Regex> = OnceLock::new();
    PRINT
        .get_or_init(|| Regex::new(r"(?i)^print\b").expect("valid print regex"))
        .is_match(code.trim_start())
}
