use std::rc::Rc;

use dessa_core::ast::Program;
use dessa_interpreter::environment::Environment;
use dessa_interpreter::evaluator;
use dessa_interpreter::object::{EvaluationError, Object};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, program: Program) -> Self::Object;
}

/// Evaluates each program against one long-lived top-level environment.
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Option<Rc<Object>>, EvaluationError>;

    fn evaluate(&mut self, program: Program) -> Self::Object {
        evaluator::eval_program(&program, &mut self.environment)
    }
}

pub struct AstEvaluator;

impl Evaluator for AstEvaluator {
    type Object = String;

    fn evaluate(&mut self, program: Program) -> Self::Object {
        program.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dessa_core::parser::parse;

    #[test]
    fn test_bindings_persist_between_inputs() {
        let mut evaluator = InterpreterEvaluator::new();

        assert_eq!(evaluator.evaluate(parse("let a = 2;").unwrap()), Ok(None));
        assert_eq!(
            evaluator.evaluate(parse("let double = fn(x) { x * 2 };").unwrap()),
            Ok(None)
        );
        assert_eq!(
            evaluator.evaluate(parse("double(a)").unwrap()),
            Ok(Some(Object::integer(4)))
        );
        assert!(evaluator.evaluate(parse("b").unwrap()).is_err());
        assert_eq!(
            evaluator.evaluate(parse("a").unwrap()),
            Ok(Some(Object::integer(2)))
        );
    }

    #[test]
    fn test_ast_evaluator() {
        let rendered = AstEvaluator.evaluate(parse("let x = 1 + 2 * 3; -x").unwrap());

        assert_eq!(rendered, "let x = (1 + (2 * 3)); (-x)");
    }
}
