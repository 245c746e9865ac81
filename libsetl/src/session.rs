//! Statement-or-expression agnostic REPL session over a statement-only evaluator
use tracing::debug;

use crate::input::{self, Input};
use crate::{Directive, Error, Evaluator, History, Result, STATEMENT_SEPARATOR};

/// Outcome of feeding a line to a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to show
    Silent,
    /// Delimiters are still open, more lines are needed
    Continue,
    /// Evaluator output, verbatim
    Output(String),
    /// Indexed history entries at the time of the request
    Listing(Vec<(usize, String)>),
    /// Documentation requested for a token
    Lookup(String),
    /// Usage text requested
    Help,
    /// Session is over
    Quit,
}

/// Where the session is between lines.
///
/// `Evaluating` and `Retrying` only live while [`Session::feed`] runs. Each state is taken
/// out of the session before the evaluator is awaited, so a dropped evaluation leaves the
/// session `Fresh`.
#[derive(Debug)]
enum State {
    Fresh,
    AwaitingMore(String),
    Evaluating(String),
    Retrying(Retry),
    Done,
}

/// First failed attempt of a line, kept while its print-wrapped form is tried
#[derive(Debug)]
struct Retry {
    code: String,
    wrapped: String,
    error: String,
}

/// Interactive session owning the statement history
#[derive(Debug)]
pub struct Session<E> {
    evaluator: E,
    history: History,
    state: State,
}

impl<E: Evaluator> Session<E> {
    /// Start a session with empty history
    pub fn new(evaluator: E) -> Self {
        Self::with_history(evaluator, History::new())
    }

    /// Start a session on top of existing history
    pub fn with_history(evaluator: E, history: History) -> Self {
        Self {
            evaluator,
            history,
            state: State::Fresh,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Whether an incomplete statement is waiting for more lines
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::AwaitingMore(_))
    }

    /// Whether the session was ended with a quit directive
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Drop any pending input and return to a fresh prompt
    pub fn reset(&mut self) {
        if !self.is_done() {
            self.state = State::Fresh;
        }
    }

    /// Handle one line of user input
    pub async fn feed(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        let input = match std::mem::replace(&mut self.state, State::Fresh) {
            State::AwaitingMore(mut pending) => {
                pending.push('\n');
                pending.push_str(line);
                match input::finish(&pending)? {
                    Input::Incomplete => {
                        self.state = State::AwaitingMore(pending);
                        return Ok(Reply::Continue);
                    }
                    input => input,
                }
            }
            State::Done => {
                self.state = State::Done;
                return Ok(Reply::Quit);
            }
            State::Fresh | State::Evaluating(_) | State::Retrying(_) => input::classify(line)?,
        };

        match input {
            Input::Noop => Ok(Reply::Silent),
            Input::Incomplete => {
                debug!("awaiting more input after {line:?}");
                self.state = State::AwaitingMore(line.to_string());
                Ok(Reply::Continue)
            }
            Input::Lookup(token) => Ok(Reply::Lookup(token)),
            Input::Directive(directive) => self.directive(directive).await,
            Input::Ready(code) => {
                self.state = State::Evaluating(code);
                self.drive().await
            }
        }
    }

    /// Evaluate history entry `index` again, moving it to the end of history.
    ///
    /// The entry moves even when the evaluator rejects it.
    pub async fn resubmit(&mut self, index: usize) -> Result<Reply> {
        let code = self.history.take(index)?;
        let program = self.history.program(&code);
        self.history.push(code);
        debug!("resubmitted history[{index}], now history[{}]", self.history.len() - 1);
        let output = self.evaluator.evaluate(&program).await?;
        Ok(Reply::Output(output))
    }

    async fn directive(&mut self, directive: Directive) -> Result<Reply> {
        match directive {
            Directive::ListHistory => Ok(Reply::Listing(
                self.history
                    .list()
                    .map(|(i, code)| (i, code.to_string()))
                    .collect(),
            )),
            Directive::Resubmit(index) => self.resubmit(index).await,
            Directive::Quit => {
                self.state = State::Done;
                Ok(Reply::Quit)
            }
            Directive::Help => Ok(Reply::Help),
        }
    }

    /// Run the evaluate and retry cycle until the session is back to rest
    async fn drive(&mut self) -> Result<Reply> {
        loop {
            match std::mem::replace(&mut self.state, State::Fresh) {
                State::Evaluating(code) => match self.submit(&code).await {
                    Ok(output) => {
                        self.history.append(code);
                        return Ok(Reply::Output(output));
                    }
                    Err(Error::Evaluation(error)) => {
                        let wrapped = print_wrapped(&code);
                        debug!("{code:?} rejected, retrying as {wrapped:?}");
                        self.state = State::Retrying(Retry {
                            code,
                            wrapped,
                            error,
                        });
                    }
                    Err(e) => return Err(e),
                },
                State::Retrying(retry) => match self.submit(&retry.wrapped).await {
                    Ok(output) => {
                        self.history.append(retry.wrapped);
                        return Ok(Reply::Output(output));
                    }
                    Err(Error::Evaluation(_)) => {
                        debug!("{:?} rejected as print too", retry.code);
                        return Err(Error::Evaluation(retry.error));
                    }
                    Err(e) => return Err(e),
                },
                state => {
                    self.state = state;
                    return Ok(Reply::Silent);
                }
            }
        }
    }

    /// Evaluate `code` after every history entry
    async fn submit(&self, code: &str) -> Result<String> {
        self.evaluator
            .evaluate(&self.history.program(code))
            .await
    }
}

/// `code` as an expression inside a print statement
fn print_wrapped(code: &str) -> String {
    let expr = code.trim_end_matches(|c: char| c == STATEMENT_SEPARATOR || c.is_whitespace());
    format!("print({expr}){STATEMENT_SEPARATOR}")
}
