use std::path::Path;

use dessa_core::parser;
use tracing::debug;

use crate::error::RunnerError;
use crate::repl::evaluator::{AstEvaluator, Evaluator, InterpreterEvaluator};
use crate::repl::printer::{print_syntax_errors, AstPrinter, InterpreterPrinter, Printer};
use crate::Mode;

pub fn run_file(path: &Path, mode: Mode) -> Result<(), RunnerError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "running file");
    execute(&source, mode)
}

/// Runs a whole source text in a fresh environment. Fails after reporting
/// when the text has syntax errors or evaluation ends in an error.
#[tracing::instrument(level = "debug", skip(source))]
pub fn execute(source: &str, mode: Mode) -> Result<(), RunnerError> {
    let program = match parser::parse(source) {
        Ok(program) => program,
        Err(errors) => {
            print_syntax_errors(&errors);
            return Err(RunnerError::Syntax(errors.len()));
        }
    };

    match mode {
        Mode::Ast => AstPrinter.print(AstEvaluator.evaluate(program)),
        Mode::Evaluate => {
            let result = InterpreterEvaluator::new().evaluate(program);
            let failure = result.as_ref().err().cloned();
            InterpreterPrinter.print(result);
            if let Some(err) = failure {
                return Err(err.into());
            }
        }
    }
    Ok(())
}
