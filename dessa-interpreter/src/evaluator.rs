use std::rc::Rc;

use tracing::{debug, trace};

use crate::environment::Environment;
use crate::object::{EvaluationError, Function, Object, QuickReturn};
use dessa_core::ast;
use dessa_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

/// Evaluates every statement of `program` in `environment`.
///
/// Returns the value of the last statement, or `None` when it produced no
/// value (a `let`, or an empty program). A `return` at any depth ends the
/// program with its value.
#[tracing::instrument(level = "debug", skip_all)]
pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Option<Rc<Object>>, EvaluationError> {
    let mut output = None;
    for statement in &program.statements {
        let result = eval_statement(statement, environment);

        match result {
            Err(QuickReturn::Return(value)) => return Ok(Some(value)),
            Err(QuickReturn::Error(error)) => return Err(error),
            Ok(object) => output = object,
        };
    }
    Ok(output)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &mut Environment,
) -> Result<Option<Rc<Object>>, QuickReturn> {
    match statement {
        ast::Statement::Expression(statement) => {
            eval_expression(&statement.expression, environment).map(Some)
        }
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &mut Environment,
) -> Result<Option<Rc<Object>>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value);
    Ok(None)
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> Result<Option<Rc<Object>>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    Err(QuickReturn::Return(value))
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral { value, .. } => Ok(Object::integer(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(Object::boolean(*value)),
        Expression::Identifier(identifier) => environment.get(&identifier.name).ok_or_else(|| {
            QuickReturn::Error(EvaluationError::UnknownIdentifier(identifier.name.clone()))
        }),
        Expression::PrefixOperation {
            operator, right, ..
        } => {
            let right = eval_expression(right, environment)?;
            Ok(eval_prefix_operation(*operator, right)?)
        }
        Expression::InfixOperation {
            operator,
            left,
            right,
            ..
        } => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_infix_operation(*operator, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, environment)?;
            let branch = if condition.is_truthy() {
                Some(consequence)
            } else {
                alternative.as_ref()
            };
            match branch {
                Some(block) => {
                    Ok(eval_block_statement(block, environment)?.unwrap_or_else(Object::null))
                }
                None => Ok(Object::null()),
            }
        }
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment,
        )),
        Expression::CallExpression {
            function,
            arguments,
            ..
        } => {
            let function = eval_expression(function, environment)?;
            match function.as_ref() {
                Object::Function(function) => {
                    let arguments = eval_expressions(arguments, environment)?;
                    Ok(apply_function(function, arguments)?)
                }
                other => Err(QuickReturn::Error(EvaluationError::CallNonFunction(
                    other.type_name(),
                ))),
            }
        }
    }
}

fn eval_expressions(
    arguments: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(arguments.len());
    for argument in arguments {
        result.push(eval_expression(argument, environment)?);
    }
    Ok(result)
}

/// Runs the body in a fresh frame enclosed by the function's own
/// environment. A `return` inside the body stops at this boundary.
///
/// A closure returned from the call takes ownership of the call frame and of
/// every frame the called function owned, since nothing else keeps them alive
/// once the call is over.
fn apply_function(
    function: &Function,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, EvaluationError> {
    if function.parameters.len() != arguments.len() {
        return Err(EvaluationError::WrongArgumentCount {
            expected: function.parameters.len(),
            actual: arguments.len(),
        });
    }
    debug!(arguments = arguments.len(), "applying function");

    let mut new_environment = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        new_environment.set(parameter.name.clone(), argument);
    }
    let return_value = match eval_block_statement(&function.body, &mut new_environment) {
        Ok(object) => object.unwrap_or_else(Object::null),
        Err(QuickReturn::Return(value)) => value,
        Err(QuickReturn::Error(err)) => return Err(err),
    };

    match return_value.as_ref() {
        Object::Function(returned) => Ok(Rc::new(Object::Function(
            returned.clone_with_captured_environments(
                function
                    .captured_environments
                    .iter()
                    .chain([&new_environment]),
            ),
        ))),
        _ => Ok(return_value),
    }
}

fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Result<Option<Rc<Object>>, QuickReturn> {
    let mut result = None;
    for statement in &block.statements {
        result = eval_statement(statement, environment).inspect_err(|control| {
            trace!(kind = control.type_name(), "leaving block early");
        })?;
    }
    Ok(result)
}

fn eval_prefix_operation(
    operator: PrefixOperationKind,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (operator, right.as_ref()) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => value
            .checked_neg()
            .map(Object::integer)
            .ok_or_else(|| EvaluationError::IntegerOverflow(format!("-{}", value))),
        (PrefixOperationKind::Minus, _) => Err(EvaluationError::UnknownPrefixOperator {
            operator,
            right: right.type_name(),
        }),
    }
}

fn eval_infix_operation(
    operator: InfixOperationKind,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(operator, *left, *right)
        }
        (l, r) if l.type_name() != r.type_name() => Err(EvaluationError::TypeMismatch {
            left: l.type_name(),
            operator,
            right: r.type_name(),
        }),
        (Object::Boolean(l), Object::Boolean(r)) => match operator {
            InfixOperationKind::Equal => Ok(Object::boolean(l == r)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(l != r)),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
        (Object::Null, Object::Null) => match operator {
            InfixOperationKind::Equal => Ok(Object::boolean(true)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(false)),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
        // functions are equal only to themselves
        (Object::Function(_), Object::Function(_)) => match operator {
            InfixOperationKind::Equal => Ok(Object::boolean(Rc::ptr_eq(&left, &right))),
            InfixOperationKind::NotEqual => Ok(Object::boolean(!Rc::ptr_eq(&left, &right))),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
        _ => Err(unknown_infix_operator(operator, &left, &right)),
    }
}

fn unknown_infix_operator(
    operator: InfixOperationKind,
    left: &Object,
    right: &Object,
) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.type_name(),
        operator,
        right: right.type_name(),
    }
}

fn eval_integer_infix_operation(
    operator: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Rc<Object>, EvaluationError> {
    let arithmetic = match operator {
        InfixOperationKind::Plus => left.checked_add(right),
        InfixOperationKind::Minus => left.checked_sub(right),
        InfixOperationKind::Multiply => left.checked_mul(right),
        InfixOperationKind::Divide => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            floor_div(left, right)
        }
        InfixOperationKind::LessThan => return Ok(Object::boolean(left < right)),
        InfixOperationKind::GreaterThan => return Ok(Object::boolean(left > right)),
        InfixOperationKind::Equal => return Ok(Object::boolean(left == right)),
        InfixOperationKind::NotEqual => return Ok(Object::boolean(left != right)),
    };

    arithmetic.map(Object::integer).ok_or_else(|| {
        EvaluationError::IntegerOverflow(format!("{} {} {}", left, operator, right))
    })
}

/// Integer division rounding toward negative infinity. `None` on overflow.
fn floor_div(left: i64, right: i64) -> Option<i64> {
    let quotient = left.checked_div(right)?;
    if left % right != 0 && (left < 0) != (right < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}
