//! Lexer for statement lines, built on logos.

use crate::error::{FrontendError, Result};
use crate::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum, converted to [`Token`] after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum LogosToken {
    // Keywords (must come before identifiers)
    #[token("types")]
    Types,

    #[token("return")]
    Return,

    #[token("::")]
    PathSep,

    #[token(":")]
    Colon,

    #[token("=")]
    Equal,

    #[token("<")]
    Less,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[regex(r"[^ \t\r\n\f:=<,.()\x00]+", |lex| lex.slice().to_string())]
    Identifier(String),
}

/// Lexer over one statement line.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Split the line into tokens, ending with [`Token::Eol`].
    pub fn tokenize(self) -> Result<Vec<(Token, Span)>> {
        let mut lexer = LogosToken::lexer(self.source);
        let mut tokens = Vec::new();

        while let Some(result) = lexer.next() {
            let span = Span::from(lexer.span());
            match result {
                Ok(token) => tokens.push((convert_token(token), span)),
                Err(()) => {
                    let ch = span.slice(self.source).chars().next().unwrap_or('\0');
                    return Err(FrontendError::UnexpectedCharacter { ch, span });
                }
            }
        }

        let end = self.source.len();
        tokens.push((Token::Eol, Span::new(end, end)));
        Ok(tokens)
    }
}

fn convert_token(token: LogosToken) -> Token {
    match token {
        LogosToken::Types => Token::Types,
        LogosToken::Return => Token::Return,
        LogosToken::PathSep => Token::PathSep,
        LogosToken::Colon => Token::Colon,
        LogosToken::Equal => Token::Equal,
        LogosToken::Less => Token::Less,
        LogosToken::Comma => Token::Comma,
        LogosToken::Dot => Token::Dot,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::Identifier(name) => Token::Identifier(name),
    }
}
