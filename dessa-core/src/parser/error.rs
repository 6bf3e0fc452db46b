use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {} instead", .got.kind)]
    UnexpectedToken { expected: TokenKind, got: Token },
    #[error("no prefix parse function for {} found", .0.kind)]
    NoPrefixFunction(Token),
    #[error("could not parse {} as integer", .0.literal)]
    InvalidInteger(Token),
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            got: got.clone(),
        }
    }

    /// The token the error was reported at.
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { got, .. } => got,
            ParseError::NoPrefixFunction(token) | ParseError::InvalidInteger(token) => token,
        }
    }
}
