//! Recursive descent parser for statement lines
//!
//! The first two tokens decide the statement kind:
//!
//! | Tokens        | Statement            |
//! |---------------|----------------------|
//! | `types`       | type declaration     |
//! | `name .`      | method call          |
//! | `name =`      | assignment           |
//! | `name ::`     | method declaration   |
//! | `name name`   | object declaration   |

use crate::ast::{Arg, Call, Name, Rhs, Statement};
use crate::error::{FrontendError, Result};
use crate::lexer::Lexer;
use crate::token::{Span, Token};

/// Parse one statement line.
pub fn parse_statement(source: &str) -> Result<Statement> {
    Parser::new(source)?.parse()
}

/// Parser state for one line.
pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

impl Parser {
    /// Tokenize `source` and create a parser over it.
    pub fn new(source: &str) -> Result<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Parse the whole line as one statement.
    pub fn parse(mut self) -> Result<Statement> {
        let statement = match (self.peek(), self.peek_nth(1)) {
            (Token::Types, _) => self.parse_types()?,
            (Token::Identifier(_), Token::Dot) => Statement::Call(self.parse_call()?),
            (Token::Identifier(_), Token::Equal) => self.parse_assign()?,
            (Token::Identifier(_), Token::PathSep) => self.parse_method()?,
            (Token::Identifier(_), Token::Identifier(_)) => self.parse_object()?,
            (Token::Identifier(_), _) => {
                self.advance();
                return Err(self.unexpected("'.', '=', '::' or an object name"));
            }
            _ => return Err(self.unexpected("a statement")),
        };
        self.expect(Token::Eol, "end of line")?;
        Ok(statement)
    }

    // ── Statements ──────────────────────────────────────────────────────

    fn parse_types(&mut self) -> Result<Statement> {
        let keyword = self.current_span();
        self.advance();
        if self.check(&Token::Eol) {
            return Err(FrontendError::EmptyTypeDeclaration { span: keyword });
        }

        let mut chains = Vec::new();
        loop {
            let mut chain = vec![self.expect_name("a type name")?];
            while self.eat(&Token::Less) {
                chain.push(self.expect_name("a type name")?);
            }
            chains.push(chain);

            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(Statement::Types { chains })
    }

    fn parse_method(&mut self) -> Result<Statement> {
        let declaring = self.expect_name("a type name")?;
        self.expect(Token::PathSep, "'::'")?;
        let name = self.expect_name("a method name")?;
        self.expect(Token::LeftParen, "'('")?;

        let mut params = Vec::new();
        if !self.eat(&Token::RightParen) {
            loop {
                params.push(self.expect_name("a parameter type")?);
                if self.eat(&Token::RightParen) {
                    break;
                }
                self.expect(Token::Comma, "',' or ')'")?;
            }
        }

        let return_type = if self.eat(&Token::Return) {
            Some(self.expect_name("a return type")?)
        } else {
            None
        };

        Ok(Statement::Method {
            declaring,
            name,
            params,
            return_type,
        })
    }

    fn parse_object(&mut self) -> Result<Statement> {
        let ty = self.expect_name("a type name")?;
        let name = self.expect_name("an object name")?;
        let value = if self.eat(&Token::Equal) {
            Some(self.parse_rhs()?)
        } else {
            None
        };
        Ok(Statement::Object { ty, name, value })
    }

    fn parse_assign(&mut self) -> Result<Statement> {
        let target = self.expect_name("an object name")?;
        self.expect(Token::Equal, "'='")?;
        let value = self.parse_rhs()?;
        Ok(Statement::Assign { target, value })
    }

    // ── Expressions ─────────────────────────────────────────────────────

    fn parse_rhs(&mut self) -> Result<Rhs> {
        if self.eat(&Token::LeftParen) {
            let (ty, object) = self.parse_cast_tail()?;
            return Ok(Rhs::Cast { ty, object });
        }

        match self.peek_nth(1) {
            Token::LeftParen => {
                let ty = self.expect_name("a type name")?;
                self.expect(Token::LeftParen, "'('")?;
                self.expect(Token::RightParen, "')'")?;
                Ok(Rhs::New(ty))
            }
            Token::Dot => Ok(Rhs::Call(self.parse_call()?)),
            _ => Ok(Rhs::Object(self.expect_name("an object, cast, constructor or call")?)),
        }
    }

    fn parse_call(&mut self) -> Result<Call> {
        let caller = self.expect_name("an object name")?;
        self.expect(Token::Dot, "'.'")?;
        let method = self.expect_name("a method name")?;
        self.expect(Token::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(&Token::RightParen) {
            loop {
                args.push(self.parse_arg()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        let close = self.current_span();
        self.expect(Token::RightParen, "',' or ')'")?;

        let span = caller.span.merge(&close);
        Ok(Call {
            caller,
            method,
            args,
            span,
        })
    }

    fn parse_arg(&mut self) -> Result<Arg> {
        if self.eat(&Token::LeftParen) {
            let (ty, object) = self.parse_cast_tail()?;
            Ok(Arg::Cast { ty, object })
        } else {
            Ok(Arg::Object(self.expect_name("an argument")?))
        }
    }

    /// `T)obj`, after the opening parenthesis.
    fn parse_cast_tail(&mut self) -> Result<(Name, Name)> {
        let ty = self.expect_name("a cast type")?;
        self.expect(Token::RightParen, "')'")?;
        let object = self.expect_name("an object name")?;
        Ok((ty, object))
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
            .map(|(token, _)| token)
            .unwrap_or(&Token::Eol)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, span)| *span)
            .unwrap_or_default()
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<()> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<Name> {
        match self.peek() {
            Token::Identifier(text) => {
                let name = Name::new(text.clone(), self.current_span());
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> FrontendError {
        FrontendError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek().describe(),
            span: self.current_span(),
        }
    }
}
