pub mod error;
pub mod expressions;
pub mod statements;

use tracing::{debug, trace};

use crate::ast::{Identifier, Program};
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::ParseError;
use statements::parse_statement;

/// Cursor over the token stream. `peeked` is the single token of lookahead;
/// every parse function decides on it before consuming anything.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    peeked: Token,
    /// Blocks entered and not yet closed. Non-zero only while a statement
    /// is being parsed, or right after one failed inside a block.
    pub(crate) open_blocks: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
        let peeked = tokenizer.next_token();
        Self {
            tokenizer,
            peeked,
            open_blocks: 0,
        }
    }

    pub fn peek(&self) -> &Token {
        &self.peeked
    }

    /// Consumes the lookahead token. At the end of input this keeps
    /// returning `Eof`.
    pub(crate) fn next_token(&mut self) -> Token {
        let next = self.tokenizer.next_token();
        let token = std::mem::replace(&mut self.peeked, next);
        trace!(kind = %token.kind, literal = %token.literal, "consumed token");
        token
    }

    pub(crate) fn next_if(&mut self, token_kind: TokenKind) -> Option<Token> {
        if self.peeked.kind == token_kind {
            Some(self.next_token())
        } else {
            None
        }
    }

    /// Consumes the lookahead if it has the given kind. Otherwise reports it
    /// without consuming it.
    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        self.next_if(token_kind)
            .ok_or_else(|| ParseError::unexpected_token(token_kind, &self.peeked))
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect_token(TokenKind::Ident)?;
        Ok(Identifier {
            name: token.literal.clone(),
            token,
        })
    }

    /// Skips the rest of a failed top-level statement: first out of any
    /// block the error was found in, then past the next `;`. Stops early in
    /// front of `let` or `return`, which start a new statement.
    fn synchronize(&mut self) {
        let mut depth = std::mem::take(&mut self.open_blocks);
        loop {
            match self.peeked.kind {
                TokenKind::Eof => return,
                TokenKind::Let | TokenKind::Return if depth == 0 => return,
                TokenKind::SemiColon if depth == 0 => {
                    self.next_token();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
    }

    /// Parses the whole input. A malformed statement does not stop parsing:
    /// its error is recorded and the parser resumes with the next top-level
    /// statement, so the syntax errors of the input are reported together.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();

        let mut errors = Vec::new();

        while self.peeked.kind != TokenKind::Eof {
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                }
                Err(err) => {
                    trace!(%err, "recovering from syntax error");
                    errors.push(err);
                    self.synchronize();
                }
            }
        }
        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            debug!(count = errors.len(), "parsing failed");
            Err(errors)
        }
    }
}

/// Parses `input` from scratch.
pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    Parser::new(Tokenizer::new(input)).parse_program()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{Expression, InfixOperationKind, Node, PrefixOperationKind, Statement};
    use crate::lexer::TokenKind;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = super::parse(input).unwrap();

            assert_eq!(program.to_string(), expected, "input: {input}")
        }
    }

    fn test_errors(tests: Vec<(&str, Vec<&str>)>) {
        for (input, expected) in tests {
            let errors = super::parse(input).unwrap_err();

            assert_eq!(
                errors.iter().map(|err| err.to_string()).collect::<Vec<_>>(),
                expected,
                "input: {input}"
            )
        }
    }

    fn single_expression(input: &str) -> Expression {
        let mut program = super::parse(input).unwrap();
        assert_eq!(program.statements.len(), 1, "input: {input}");
        match program.statements.remove(0) {
            Statement::Expression(statement) => statement.expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_let_statements() {
        let program = super::parse(
            "
        let x = 5;
        let y = 10;
        let foobar = 838383;
        ",
        )
        .unwrap();

        let names = program
            .statements
            .iter()
            .map(|statement| {
                assert_eq!(statement.token_literal(), "let");
                statement
            })
            .map(|statement| match statement {
                Statement::Let(statement) => statement.identifier.name.to_string(),
                other => panic!("expected a let statement, got {other:?}"),
            })
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["x", "y", "foobar"]);
    }

    #[test]
    fn test_statements() {
        test_parsing(vec![
            ("let x = 5 + 5;", "let x = (5 + 5);"),
            ("return 5;", "return 5;"),
            ("return 5 + 5", "return (5 + 5);"),
            ("let x = 1 let y = x", "let x = 1; let y = x;"),
            ("5;", "5"),
            ("", ""),
        ]);
    }

    #[test]
    fn test_literals() {
        match single_expression("5;") {
            Expression::IntegerLiteral { token, value } => {
                assert_eq!(value, 5);
                assert_eq!(token.literal.as_ref(), "5");
            }
            other => panic!("expected an integer literal, got {other:?}"),
        }
        match single_expression("foobar;") {
            Expression::Identifier(ident) => assert_eq!(ident.name.as_ref(), "foobar"),
            other => panic!("expected an identifier, got {other:?}"),
        }
        match single_expression("false") {
            Expression::BooleanLiteral { value, .. } => assert!(!value),
            other => panic!("expected a boolean literal, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_and_infix_operators() {
        let prefix_tests = vec![
            ("!5;", PrefixOperationKind::Bang),
            ("-15;", PrefixOperationKind::Minus),
        ];
        for (input, expected) in prefix_tests {
            match single_expression(input) {
                Expression::PrefixOperation { operator, .. } => assert_eq!(operator, expected),
                other => panic!("expected a prefix operation, got {other:?}"),
            }
        }

        let infix_tests = vec![
            ("5 + 5;", InfixOperationKind::Plus),
            ("5 - 5;", InfixOperationKind::Minus),
            ("5 * 5;", InfixOperationKind::Multiply),
            ("5 / 5;", InfixOperationKind::Divide),
            ("5 > 5;", InfixOperationKind::GreaterThan),
            ("5 < 5;", InfixOperationKind::LessThan),
            ("5 == 5;", InfixOperationKind::Equal),
            ("5 != 5;", InfixOperationKind::NotEqual),
        ];
        for (input, expected) in infix_tests {
            match single_expression(input) {
                Expression::InfixOperation {
                    operator,
                    left,
                    right,
                    ..
                } => {
                    assert_eq!(operator, expected);
                    assert_eq!(left.to_string(), "5");
                    assert_eq!(right.to_string(), "5");
                }
                other => panic!("expected an infix operation, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_expression_1() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4); ((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("false", "false"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("-a(b)", "(-a(b))"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            ("add(1, 2 * 3, 4 + 5);", "add(1, (2 * 3), (4 + 5))"),
            ("f()()", "f()()"),
            ("fn(x) { x }(5)", "fn(x) { x }(5)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) { x }"),
            ("if (x < y) { x } else { y }", "if (x < y) { x } else { y }"),
            ("if (x) { } else { y; z }", "if (x) { } else { y; z }"),
            (
                "if (f(x)) { let a = 1; return a; }",
                "if (f(x)) { let a = 1; return a; }",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_if_structure() {
        match single_expression("if (x < y) { x } else { y }") {
            Expression::IfExpression {
                condition,
                consequence,
                alternative,
                ..
            } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(consequence.to_string(), "x");
                assert_eq!(alternative.map(|block| block.to_string()), Some("y".to_owned()));
            }
            other => panic!("expected an if expression, got {other:?}"),
        }
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn(x, y) { x + y; }", "fn(x, y) { (x + y) }"),
            ("fn() {}", "fn() { }"),
            (
                "let add = fn(a, b) { return a + b; };",
                "let add = fn(a, b) { return (a + b); };",
            ),
        ];

        test_parsing(tests);

        match single_expression("fn(x, y) { x + y; }") {
            Expression::FunctionLiteral {
                parameters, body, ..
            } => {
                let names = parameters.iter().map(|p| p.to_string()).collect::<Vec<_>>();
                assert_eq!(names, vec!["x", "y"]);
                assert_eq!(body.to_string(), "(x + y)");
            }
            other => panic!("expected a function literal, got {other:?}"),
        }
    }

    #[test]
    fn test_rendering_is_stable() {
        let inputs = vec![
            "a + b * c + d / e - f",
            "-(5 + 5) * !x",
            "if (a) { b } else { if (c < d) { e } }",
            "fn(x) { fn(y) { x + y } }(1)(2)",
            "let f = fn(a, b) { let c = a; c * b; a }; f(1, 2); return f",
        ];

        for input in inputs {
            let rendered = super::parse(input).unwrap().to_string();
            let reparsed = super::parse(&rendered).unwrap().to_string();

            assert_eq!(reparsed, rendered, "input: {input}");
        }
    }

    #[test]
    fn test_syntax_errors() {
        test_errors(vec![
            ("let = 5;", vec!["expected next token to be IDENT, got = instead"]),
            ("let x 5;", vec!["expected next token to be =, got INT instead"]),
            ("let 838383;", vec!["expected next token to be IDENT, got INT instead"]),
            ("let x = ;", vec!["no prefix parse function for ; found"]),
            (
                "let = 1; let y 2; let z = 3;",
                vec![
                    "expected next token to be IDENT, got = instead",
                    "expected next token to be =, got INT instead",
                ],
            ),
            ("if x { 1 }", vec!["expected next token to be (, got IDENT instead"]),
            ("if (x) 1", vec!["expected next token to be {, got INT instead"]),
            ("fn(x, 1) { x }", vec!["expected next token to be IDENT, got INT instead"]),
            ("fn(x y) { x }", vec!["expected next token to be ), got IDENT instead"]),
            ("add(1, 2", vec!["expected next token to be ), got EOF instead"]),
            ("fn() { 1", vec!["expected next token to be }, got EOF instead"]),
            ("(1 + 2", vec!["expected next token to be ), got EOF instead"]),
            ("5 + }", vec!["no prefix parse function for } found"]),
            ("@", vec!["no prefix parse function for ILLEGAL found"]),
            (
                "let x 5 let y = ;",
                vec![
                    "expected next token to be =, got INT instead",
                    "no prefix parse function for ; found",
                ],
            ),
            (
                "99999999999999999999",
                vec!["could not parse 99999999999999999999 as integer"],
            ),
        ]);
    }

    #[test]
    fn test_error_positions() {
        let errors = super::parse("let a = 1;\nlet b 2;").unwrap_err();

        assert_eq!(errors.len(), 1);
        let token = errors[0].token();
        assert_eq!(token.kind, TokenKind::Int);
        assert_eq!((token.line, token.column), (2, 7));
    }

    #[test]
    fn test_recovery_leaves_the_failed_block() {
        test_errors(vec![
            (
                "if (x) { let = 1; 2 }",
                vec!["expected next token to be IDENT, got = instead"],
            ),
            (
                "let f = fn(x) { let y 1; x }; f(1)",
                vec!["expected next token to be =, got INT instead"],
            ),
            (
                "if (x) { if (y) { 1 + ; } 2 } else { 3 }",
                vec!["no prefix parse function for ; found"],
            ),
            (
                "if (x) { let = 1; } else { 2 } let y 3;",
                vec![
                    "expected next token to be IDENT, got = instead",
                    "expected next token to be =, got INT instead",
                ],
            ),
        ]);

        let errors = super::parse("fn() { let = 1; }; let a = 1; a").unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parsing_continues_after_errors() {
        let errors = super::parse("let = 1; 5 + 5; let b = ;").unwrap_err();

        assert_eq!(errors.len(), 2);
    }
}
