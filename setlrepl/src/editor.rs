//! Line editor for setlrepl

use rustyline::{
    highlight::MatchingBracketHighlighter, history::DefaultHistory, Completer, Helper,
    Highlighter, Hinter, Result, Validator,
};

/// Custom rustyline::Editor
pub(crate) type Editor = rustyline::Editor<ReplEditor, DefaultHistory>;

/// Create a line editor
pub fn editor() -> Result<Editor> {
    let editor = ReplEditor {
        highlighter: MatchingBracketHighlighter::new(),
    };
    let mut rl = rustyline::Editor::new()?;
    rl.set_helper(Some(editor));
    Ok(rl)
}

/// Editor for setlrepl repl.
/// Lines are accepted as typed, continuation of open delimiters is left to the session.
#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
pub struct ReplEditor {
    #[rustyline(Highlighter)]
    highlighter: MatchingBracketHighlighter,
}
