use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    Ident,
    Int,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    pub fn to_str(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Ident => "IDENT",
            Int => "INT",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Function => "FUNCTION",
            Let => "LET",
            True => "TRUE",
            False => "FALSE",
            If => "IF",
            Else => "ELSE",
            Return => "RETURN",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A lexical token. `line` and `column` are 1-based and point at the first
/// character of the token; the column counts characters, not bytes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Rc<str>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: &str, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let (idx, ch) = self.iter.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((idx, ch))
    }

    fn bump_if(&mut self, func: impl FnOnce(char) -> bool) -> bool {
        match self.iter.peek() {
            Some(&(_, ch)) if func(ch) => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn read_while(&mut self, start: usize, func: impl Fn(char) -> bool) -> &'a str {
        while self.bump_if(&func) {}

        let input = self.input;
        &input[start..self.next_idx()]
    }

    /// Returns the next token, or `Eof` for every call once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        while self.bump_if(char::is_whitespace) {}

        let (line, column) = (self.line, self.column);
        let Some((idx, ch)) = self.bump() else {
            return Token::new(TokenKind::Eof, "", line, column);
        };

        let input = self.input;
        let single = |kind: TokenKind| (kind, &input[idx..idx + ch.len_utf8()]);
        let (kind, literal) = match ch {
            '=' if self.bump_if(|ch| ch == '=') => (TokenKind::Equal, "=="),
            '!' if self.bump_if(|ch| ch == '=') => (TokenKind::NotEqual, "!="),
            '=' => single(TokenKind::Assign),
            '!' => single(TokenKind::Bang),
            '+' => single(TokenKind::Plus),
            '-' => single(TokenKind::Minus),
            '*' => single(TokenKind::Asterisk),
            '/' => single(TokenKind::Slash),
            '<' => single(TokenKind::LessThan),
            '>' => single(TokenKind::GreaterThan),
            ',' => single(TokenKind::Comma),
            ';' => single(TokenKind::SemiColon),
            '(' => single(TokenKind::LParen),
            ')' => single(TokenKind::RParen),
            '{' => single(TokenKind::LBrace),
            '}' => single(TokenKind::RBrace),
            c if Tokenizer::is_letter(c) => {
                let ident = self.read_while(idx, Tokenizer::is_letter);
                (keywords(ident).unwrap_or(TokenKind::Ident), ident)
            }
            c if c.is_ascii_digit() => {
                let number = self.read_while(idx, |ch| ch.is_ascii_digit());
                (TokenKind::Int, number)
            }
            _ => single(TokenKind::Illegal),
        };

        Token::new(kind, literal, line, column)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    /// Yields every token of the input followed by exactly one `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}
