//! Javatype frontend
//!
//! A line-oriented statement language over [`javatype_core::Session`]: a logos
//! lexer, a recursive descent parser, the line interpreter used by the REPL and
//! script runner, and codespan-based diagnostics.

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod token;

pub use diagnostic::Diagnostic;
pub use error::{FrontendError, Result};
pub use interp::{Interpreter, Outcome, OutputFormat};
pub use parser::parse_statement;
pub use token::{Span, Token};
