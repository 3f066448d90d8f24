//! Tokens of the statement language

use std::fmt;
use std::ops::Range;

/// Token of one statement line.
///
/// Identifiers are any run of characters that are neither whitespace nor
/// punctuation, so type and object names may contain digits, `$`, `[]` or
/// non-ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `types`
    Types,

    /// `return`
    Return,

    /// `::`
    PathSep,

    /// `:`
    Colon,

    /// `=`
    Equal,

    /// `<`
    Less,

    /// `,`
    Comma,

    /// `.`
    Dot,

    /// `(`
    LeftParen,

    /// `)`
    RightParen,

    /// Type, object or method name
    Identifier(String),

    /// End of line
    Eol,
}

impl Token {
    /// Short description used in "expected ..." messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Eol => "end of line".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Types => write!(f, "types"),
            Token::Return => write!(f, "return"),
            Token::PathSep => write!(f, "::"),
            Token::Colon => write!(f, ":"),
            Token::Equal => write!(f, "="),
            Token::Less => write!(f, "<"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Eol => Ok(()),
        }
    }
}

/// Byte range of a token within its line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte
    pub start: usize,
    /// One past the last byte
    pub end: usize,
}

impl Span {
    /// Create a span over `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Smallest span covering both spans.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}
