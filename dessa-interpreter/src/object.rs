use std::fmt::Display;
use std::rc::Rc;

use crate::environment::{Environment, WeakEnvironment};
use dessa_core::ast;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Function(Function),
    Null,
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: &Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            env: env.downgrade(),
            captured_environments: Vec::new(),
        }))
    }

    /// Name of the value's type as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Function(_) => "FUNCTION",
            Object::Null => "NULL",
        }
    }

    /// `null` and `false` are falsy, every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Function(function) => write!(f, "{}", function),
            Object::Null => write!(f, "null"),
        }
    }
}

/// A closure: the function literal together with the environment it was
/// evaluated in. The environment is shared, so later bindings in that frame
/// are visible to the body.
///
/// `env` does not own the frame, so a frame that binds its own closures is
/// not kept alive by them. A closure that leaves the call which created its
/// frame owns that frame, and the frames it hangs off, through
/// `captured_environments`.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: WeakEnvironment,
    pub captured_environments: Vec<Environment>,
}

impl Function {
    pub fn clone_with_captured_environments<'e>(
        &self,
        environments: impl IntoIterator<Item = &'e Environment>,
    ) -> Self {
        let mut captured_environments = self.captured_environments.clone();
        for environment in environments {
            if !captured_environments.contains(environment) {
                captured_environments.push(environment.clone());
            }
        }
        Function {
            captured_environments,
            ..self.clone()
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters.len())
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fn({}) {{\n{}\n}}",
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(", "),
            self.body
        )
    }
}

/// Non-local exits travelling up the `Err` side of the evaluator.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Rc<Object>),
    Error(EvaluationError),
}

impl QuickReturn {
    pub fn type_name(&self) -> &'static str {
        match self {
            QuickReturn::Return(_) => "RETURN_VALUE",
            QuickReturn::Error(_) => "ERROR",
        }
    }
}

impl From<EvaluationError> for QuickReturn {
    fn from(error: EvaluationError) -> Self {
        QuickReturn::Error(error)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: ast::PrefixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("not a function: {0}")]
    CallNonFunction(&'static str),
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("division by zero")]
    DivisionByZero,
    /// Carries the rendered operation, e.g. `9223372036854775807 + 1`.
    #[error("integer overflow: {0}")]
    IntegerOverflow(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inspect() {
        let tests = vec![
            (Object::integer(-12), "-12"),
            (Object::boolean(true), "true"),
            (Object::boolean(false), "false"),
            (Object::null(), "null"),
        ];

        for (object, expected) in tests {
            assert_eq!(object.to_string(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(Object::integer(0).is_truthy());
        assert!(Object::boolean(true).is_truthy());
        assert!(!Object::boolean(false).is_truthy());
        assert!(!Object::null().is_truthy());
    }

    #[test]
    fn test_shared_instances() {
        assert!(Rc::ptr_eq(&Object::null(), &Object::null()));
        assert!(Rc::ptr_eq(&Object::boolean(true), &Object::boolean(true)));
        assert_eq!(*Object::boolean(false), Object::Boolean(false));
    }

    #[test]
    fn test_error_messages() {
        let tests = vec![
            (
                EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    operator: ast::InfixOperationKind::Plus,
                    right: "BOOLEAN",
                },
                "type mismatch: INTEGER + BOOLEAN",
            ),
            (
                EvaluationError::UnknownPrefixOperator {
                    operator: ast::PrefixOperationKind::Minus,
                    right: "BOOLEAN",
                },
                "unknown operator: -BOOLEAN",
            ),
            (
                EvaluationError::UnknownIdentifier("foobar".into()),
                "identifier not found: foobar",
            ),
            (
                EvaluationError::CallNonFunction("INTEGER"),
                "not a function: INTEGER",
            ),
            (
                EvaluationError::WrongArgumentCount {
                    expected: 2,
                    actual: 1,
                },
                "wrong number of arguments: expected 2, got 1",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.to_string(), expected);
        }
    }
}
