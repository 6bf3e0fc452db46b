use tracing::trace;

use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Parses an expression whose operators all bind tighter than `precedence`.
///
/// Operators of equal precedence stop the loop, which is what makes every
/// binary operator left-associative.
pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let mut left_expression = prefix_parsing(parser)?;

    loop {
        let next_kind = parser.peek().kind;
        if next_kind == TokenKind::SemiColon || precedence >= precedence_of(next_kind) {
            break;
        }

        let Some(infix_parse_function) = infix_parsing_function(next_kind) else {
            break;
        };
        let token = parser.next_token();
        left_expression = infix_parse_function(parser, token, left_expression)?;
    }

    Ok(left_expression)
}

fn parse_identifier(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    Ok(Expression::Identifier(Identifier {
        name: token.literal.clone(),
        token,
    }))
}

fn parse_integer_literal(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    match token.literal.parse() {
        Ok(value) => Ok(Expression::IntegerLiteral { token, value }),
        Err(_) => Err(ParseError::InvalidInteger(token)),
    }
}

fn parse_boolean_literal(_parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    let value = token.kind == TokenKind::True;
    Ok(Expression::BooleanLiteral { token, value })
}

fn prefix_operation(
    parser: &mut Parser,
    token: Token,
    operator: PrefixOperationKind,
) -> Result<Expression, ParseError> {
    Ok(Expression::PrefixOperation {
        token,
        operator,
        right: Box::new(parse_expression(parser, Precedence::Prefix)?),
    })
}

fn parse_grouped_expression(parser: &mut Parser, _token: Token) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (, element)* terminator`, or just `terminator`.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    if parser.next_if(terminator).is_some() {
        return Ok(elements);
    }

    loop {
        elements.push(parse_element(parser)?);
        if parser.next_if(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect_token(terminator)?;

    Ok(elements)
}

fn parse_if_expression(parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.next_if(TokenKind::Else).is_some() {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        token,
        condition,
        consequence,
        alternative,
    })
}

fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let token = parser.expect_token(TokenKind::LBrace)?;
    parser.open_blocks += 1;
    let mut statements = Vec::new();

    loop {
        match parser.peek().kind {
            TokenKind::RBrace => {
                parser.next_token();
                parser.open_blocks -= 1;
                return Ok(BlockStatement { token, statements });
            }
            TokenKind::Eof => {
                return Err(ParseError::unexpected_token(
                    TokenKind::RBrace,
                    parser.peek(),
                ))
            }
            _ => statements.push(parse_statement(parser)?),
        }
    }
}

fn parse_function_literal(parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(parser, |parser| parser.parse_ident(), TokenKind::RParen)?;

    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        token,
        parameters,
        body,
    })
}

type PrefixFunction = fn(&mut Parser, Token) -> Result<Expression, ParseError>;

/// Runs the prefix behaviour registered for the next token. A token without
/// one is reported and left in place for statement-level recovery.
pub fn prefix_parsing(parser: &mut Parser) -> Result<Expression, ParseError> {
    let prefix_parse_function: PrefixFunction = match parser.peek().kind {
        TokenKind::Ident => parse_identifier,
        TokenKind::Int => parse_integer_literal,
        TokenKind::True | TokenKind::False => parse_boolean_literal,
        TokenKind::Bang => |parser, token| prefix_operation(parser, token, PrefixOperationKind::Bang),
        TokenKind::Minus => {
            |parser, token| prefix_operation(parser, token, PrefixOperationKind::Minus)
        }
        TokenKind::LParen => parse_grouped_expression,
        TokenKind::If => parse_if_expression,
        TokenKind::Function => parse_function_literal,
        _ => {
            trace!(token = ?parser.peek(), "no prefix parse function");
            return Err(ParseError::NoPrefixFunction(parser.peek().clone()));
        }
    };

    let token = parser.next_token();
    prefix_parse_function(parser, token)
}

type InfixFunction = fn(&mut Parser, Token, Expression) -> Result<Expression, ParseError>;

fn infix_operation(
    parser: &mut Parser,
    token: Token,
    left: Expression,
    operator: InfixOperationKind,
) -> Result<Expression, ParseError> {
    let new_precedence = precedence_of(token.kind);
    let right = parse_expression(parser, new_precedence)?;

    Ok(Expression::InfixOperation {
        token,
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn parse_call_expression(
    parser: &mut Parser,
    token: Token,
    left: Expression,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        token,
        function: Box::new(left),
        arguments,
    })
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixFunction> {
    use InfixOperationKind as InfixKind;

    let function: InfixFunction = match token {
        TokenKind::Plus => |parser, token, left| infix_operation(parser, token, left, InfixKind::Plus),
        TokenKind::Minus => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::Minus)
        }
        TokenKind::LessThan => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::LessThan)
        }
        TokenKind::GreaterThan => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::GreaterThan)
        }
        TokenKind::Equal => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::Equal)
        }
        TokenKind::NotEqual => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::NotEqual)
        }
        TokenKind::Asterisk => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::Multiply)
        }
        TokenKind::Slash => {
            |parser, token, left| infix_operation(parser, token, left, InfixKind::Divide)
        }
        TokenKind::LParen => parse_call_expression,
        _ => return None,
    };

    Some(function)
}
