use std::rc::Rc;

use dessa_core::parser::ParseError;
use dessa_interpreter::object::{EvaluationError, Object};

pub trait Printer {
    type Object;

    /// The text shown for `object`, if any.
    fn render(&self, object: Self::Object) -> Option<String>;

    fn print(&mut self, object: Self::Object) {
        if let Some(text) = self.render(object) {
            println!("{}", text);
        }
    }
}

pub struct InterpreterPrinter;

impl Printer for InterpreterPrinter {
    type Object = Result<Option<Rc<Object>>, EvaluationError>;

    fn render(&self, object: Self::Object) -> Option<String> {
        match object {
            Ok(value) => value.map(|value| value.to_string()),
            Err(err) => Some(format!("Error: {}", err)),
        }
    }
}

pub struct AstPrinter;

impl Printer for AstPrinter {
    type Object = String;

    fn render(&self, object: Self::Object) -> Option<String> {
        Some(object).filter(|rendered| !rendered.is_empty())
    }
}

pub fn print_syntax_errors(errors: &[ParseError]) {
    for error in errors {
        eprintln!("\t{}", error);
    }
}
