use dessa_core::ast::Program;
use dessa_core::parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::printer::print_syntax_errors;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Value(Program),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new(rl: DefaultEditor) -> Self {
        Self { rl }
    }

    /// Reads and parses one line. Syntax errors are reported here and the
    /// line is dropped.
    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::Clear);
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::Exit);
            }
            Err(err) => return Err(err),
            Ok(line) => {
                self.rl.add_history_entry(line.as_str())?;
                line
            }
        };

        match parser::parse(&line) {
            Ok(program) => Ok(ReadOutput::Value(program)),
            Err(errors) => {
                print_syntax_errors(&errors);
                Ok(ReadOutput::Clear)
            }
        }
    }
}
