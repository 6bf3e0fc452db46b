use std::fmt::Display;
use std::rc::Rc;

use crate::lexer::Token;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

#[derive(Debug, PartialEq, Clone)]
pub struct LetStatement {
    pub token: Token,
    pub identifier: Identifier,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    PrefixOperation {
        token: Token,
        operator: PrefixOperationKind,
        right: Box<Expression>,
    },
    InfixOperation {
        token: Token,
        operator: InfixOperationKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IfExpression {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    CallExpression {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperationKind {
    Plus,
    Minus,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    Multiply,
    Divide,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperationKind {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

/// Access to the token a node was parsed from, for diagnostics.
pub trait Node {
    fn token(&self) -> Option<&Token>;

    fn token_literal(&self) -> &str {
        self.token().map_or("", |token| token.literal.as_ref())
    }
}

impl Node for Program {
    fn token(&self) -> Option<&Token> {
        self.statements.first().and_then(Node::token)
    }
}

impl Node for Statement {
    fn token(&self) -> Option<&Token> {
        match self {
            Statement::Let(statement) => Some(&statement.token),
            Statement::Return(statement) => Some(&statement.token),
            Statement::Expression(statement) => Some(&statement.token),
        }
    }
}

impl Node for BlockStatement {
    fn token(&self) -> Option<&Token> {
        Some(&self.token)
    }
}

impl Node for Identifier {
    fn token(&self) -> Option<&Token> {
        Some(&self.token)
    }
}

impl Node for Expression {
    fn token(&self) -> Option<&Token> {
        use Expression::*;
        match self {
            Identifier(ident) => Some(&ident.token),
            IntegerLiteral { token, .. }
            | BooleanLiteral { token, .. }
            | PrefixOperation { token, .. }
            | InfixOperation { token, .. }
            | IfExpression { token, .. }
            | FunctionLiteral { token, .. }
            | CallExpression { token, .. } => Some(token),
        }
    }
}

/// Writes statements separated by a space. An expression statement that is
/// followed by another statement gets a `;` so the output parses back to the
/// same sequence.
fn write_statements(f: &mut std::fmt::Formatter<'_>, statements: &[Statement]) -> std::fmt::Result {
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", statement)?;
        if matches!(statement, Statement::Expression(_)) && i + 1 < statements.len() {
            write!(f, ";")?;
        }
    }
    Ok(())
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {};", self.identifier.name, self.value)
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl BlockStatement {
    fn fmt_braced(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            write!(f, "{{ }}")
        } else {
            write!(f, "{{ {} }}", self)
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(ident) => write!(f, "{}", ident),
            IntegerLiteral { value, .. } => write!(f, "{}", value),
            BooleanLiteral { value, .. } => write!(f, "{}", value),
            PrefixOperation {
                operator, right, ..
            } => write!(f, "({}{})", operator.to_str(), right),
            InfixOperation {
                operator,
                left,
                right,
                ..
            } => {
                write!(f, "({} {} {})", left, operator.to_str(), right)
            }
            IfExpression {
                condition,
                consequence,
                alternative,
                ..
            } => {
                match condition.as_ref() {
                    // already wrapped in parentheses
                    PrefixOperation { .. } | InfixOperation { .. } => {
                        write!(f, "if {} ", condition)?
                    }
                    _ => write!(f, "if ({}) ", condition)?,
                }
                consequence.fmt_braced(f)?;
                if let Some(alternative) = alternative {
                    write!(f, " else ")?;
                    alternative.fmt_braced(f)?;
                }
                Ok(())
            }
            FunctionLiteral {
                parameters, body, ..
            } => {
                write!(
                    f,
                    "fn({}) ",
                    parameters
                        .iter()
                        .map(|id| id.name.as_ref())
                        .collect::<Box<[&str]>>()
                        .join(", "),
                )?;
                body.fmt_braced(f)
            }
            CallExpression {
                function,
                arguments,
                ..
            } => {
                write!(
                    f,
                    "{}({})",
                    function,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Let(statement) => write!(f, "{}", statement),
            Return(statement) => write!(f, "{}", statement),
            Expression(statement) => write!(f, "{}", statement),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl PrefixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use PrefixOperationKind::*;
        match self {
            Minus => "-",
            Bang => "!",
        }
    }
}

impl InfixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use InfixOperationKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
            Multiply => "*",
            Divide => "/",
        }
    }
}

impl Display for PrefixOperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl Display for InfixOperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}
