use std::path::PathBuf;

use dessa_interpreter::object::EvaluationError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error("found {0} syntax error(s)")]
    Syntax(usize),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl RunnerError {
    /// Syntax and evaluation errors are printed where they happen; the rest
    /// are left for `main` to report.
    pub fn is_reported(&self) -> bool {
        matches!(self, RunnerError::Syntax(_) | RunnerError::Evaluation(_))
    }
}
