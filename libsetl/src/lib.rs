//! Front-end plumbing for an interactive GNU SETL session.
//!
//! The evaluator only accepts whole programs made of statements. [`Session`] keeps the
//! statements accepted so far, resends them with each new fragment, and retries bare
//! expressions wrapped in `print(..)` so they produce output.

pub mod delim;
pub mod directive;
pub mod evaluator;
pub mod history;
pub mod input;
pub mod session;

mod error;

pub use delim::Balance;
pub use directive::Directive;
pub use error::Error;
pub use evaluator::{Evaluator, ProcessEvaluator, Transport};
pub use history::History;
pub use input::Input;
pub use session::{Reply, Session};

pub type Result<T> = std::result::Result<T, Error>;

/// Marker introducing REPL directives and trailing documentation lookups
pub const DIRECTIVE_MARKER: char = '!';

/// Terminates a complete statement
pub const STATEMENT_SEPARATOR: char = ';';
