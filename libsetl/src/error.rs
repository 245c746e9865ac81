/// Errors surfaced while handling a line of REPL input
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to start evaluator - {0}")]
    Launch(String),

    /// Evaluator wrote to its error stream. Carries the error text verbatim.
    #[error("{0}")]
    Evaluation(String),

    #[error("mismatched {0}")]
    DelimiterMismatch(char),

    #[error("{0} out of bounds")]
    OutOfBounds(usize),

    #[error("Unknown command: {0}")]
    UnknownDirective(String),

    #[error("IO Error - {0}")]
    Io(#[from] std::io::Error),
}
