pub(crate) mod evaluator;
pub(crate) mod printer;
mod reader;

use rustyline::DefaultEditor;

use evaluator::{AstEvaluator, Evaluator, InterpreterEvaluator};
use printer::{AstPrinter, InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

use crate::error::RunnerError;
use crate::Mode;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> Result<(), RunnerError> {
        loop {
            let input = self.reader.read()?;
            match input {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(program);
                    self.printer.print(result)
                }
            }
        }
        Ok(())
    }
}

/// Runs the read-evaluate-print loop until end of input. Bindings persist
/// from one line to the next.
pub fn start(mode: Mode) -> Result<(), RunnerError> {
    let rl = DefaultEditor::new()?;

    match mode {
        Mode::Evaluate => Repl {
            reader: Reader::new(rl),
            evaluator: InterpreterEvaluator::new(),
            printer: InterpreterPrinter,
        }
        .run(),
        Mode::Ast => Repl {
            reader: Reader::new(rl),
            evaluator: AstEvaluator,
            printer: AstPrinter,
        }
        .run(),
    }
}
