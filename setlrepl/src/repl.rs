//! REPL for setlrepl
use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use setl::{Error, Evaluator, ProcessEvaluator, Reply, Session};
use std::io::{self, Write};
use tracing::{debug, error, warn};

use crate::editor;

/// Documentation for SETL intrinsics
pub(crate) const DOC_URL: &str = "http://www.setl.org/setl/doc/setl-lib.html";

const PROMPT: &str = "setl> ";
const CONTINUATION_PROMPT: &str = "----> ";

const HELP: &str = "
!cache
!cache Index -- print history as:
                0 statement
                1 statement
                ...
                n-1 statement
                If Index is supplied evaluate that statement again and move it
                to the end of history.
!quit -- exit
!help -- this

Append a ! to an intrinsic to view its documentation in a browser.
setl> exp!
";

/// Print startup banner with the evaluator's version
pub(crate) async fn banner(evaluator: &ProcessEvaluator) {
    println!("\n^D or !quit to exit or try !help\n");
    println!("setlrepl using {} --version", evaluator.program().display());
    match evaluator.version().await {
        Ok(version) => println!("{version}"),
        Err(e) => warn!("Failed to query evaluator version - {e}"),
    }
    println!();
}

/// Run a single fragment of code
pub(crate) async fn run_cmd<E: Evaluator>(
    mut session: Session<E>,
    code: &str,
    doc_url: &str,
) -> Result<()> {
    match session.feed(code).await? {
        Reply::Continue => bail!("Incomplete input - unclosed delimiters in {code:?}"),
        reply => show(reply, doc_url),
    }
    Ok(())
}

/// Entrypoint for running REPL.
/// Returns Err if REPL terminated with error
pub(crate) async fn run<E: Evaluator>(mut session: Session<E>, doc_url: &str) -> Result<()> {
    let mut rl = editor::editor()?;

    while !session.is_done() {
        let prompt = if session.is_pending() {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        };
        let line = match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                line
            }
            Err(ReadlineError::Interrupted) => {
                session.reset();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                error!("Failed to read line - {err}");
                return Err(err.into());
            }
        };

        // Dropping an in-flight evaluation kills the evaluator process
        let reply = tokio::select! {
            reply = session.feed(&line) => Some(reply),
            _ = tokio::signal::ctrl_c() => None,
        };
        match reply {
            Some(Ok(reply)) => show(reply, doc_url),
            Some(Err(e)) => report(&e),
            None => {
                debug!("Evaluation interrupted");
                eprintln!("^C");
                session.reset();
            }
        }
    }

    Ok(())
}

/// Present a reply to the user
fn show(reply: Reply, doc_url: &str) {
    match reply {
        Reply::Silent | Reply::Continue | Reply::Quit => {}
        Reply::Output(output) => {
            print!("{output}");
            let _ = io::stdout().flush();
        }
        Reply::Listing(entries) => {
            for (i, code) in entries {
                println!("{i:4}  {code}");
            }
        }
        Reply::Lookup(token) => lookup(doc_url, &token),
        Reply::Help => println!("{HELP}"),
    }
}

/// Report a failed line on stderr. The session carries on.
fn report(e: &Error) {
    match e {
        Error::Evaluation(text) => eprintln!("{}", text.trim_end()),
        e => eprintln!("{e}"),
    }
}

/// Open documentation for `token` in a browser
fn lookup(doc_url: &str, token: &str) {
    let url = format!("{doc_url}#{token}");
    debug!("Opening {url}");
    if let Err(e) = open::that(&url) {
        eprintln!("Failed to open {url} - {e}");
    }
}
