//! Frontend errors

use crate::token::Span;
use javatype_core::TypeSystemError;
use thiserror::Error;

/// Error produced while lexing, parsing or executing a statement.
///
/// Every variant carries the span of the offending part of the line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrontendError {
    /// A character that cannot start any token
    #[error("unexpected character {ch:?}")]
    UnexpectedCharacter {
        /// The character
        ch: char,
        /// Location
        span: Span,
    },

    /// A token that does not fit the statement
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the parser was looking for
        expected: String,
        /// Description of the token found instead
        found: String,
        /// Location
        span: Span,
    },

    /// `types` with nothing after it
    #[error("empty type declaration")]
    EmptyTypeDeclaration {
        /// Location
        span: Span,
    },

    /// A type named twice in one `types` statement
    #[error("type {name} appears twice in this declaration")]
    RepeatedType {
        /// Name of the type
        name: String,
        /// Location of the second occurrence
        span: Span,
    },

    /// A method without a return type used as a value
    #[error("{name} returns void and has no value")]
    VoidValue {
        /// Rendered method that runs
        name: String,
        /// Location
        span: Span,
    },

    /// A `?` command that does not exist
    #[error("unknown command {command}")]
    UnknownCommand {
        /// The command as written
        command: String,
        /// Location
        span: Span,
    },

    /// A type system operation failed
    #[error("{source}")]
    TypeSystem {
        /// The underlying error
        source: TypeSystemError,
        /// Location
        span: Span,
    },
}

impl FrontendError {
    /// Attach a location to a type system error.
    pub fn at(source: TypeSystemError, span: Span) -> Self {
        FrontendError::TypeSystem { source, span }
    }

    /// Location of the error within its line.
    pub fn span(&self) -> Span {
        match self {
            FrontendError::UnexpectedCharacter { span, .. }
            | FrontendError::UnexpectedToken { span, .. }
            | FrontendError::EmptyTypeDeclaration { span }
            | FrontendError::RepeatedType { span, .. }
            | FrontendError::VoidValue { span, .. }
            | FrontendError::UnknownCommand { span, .. }
            | FrontendError::TypeSystem { span, .. } => *span,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        use TypeSystemError::*;

        match self {
            FrontendError::UnexpectedCharacter { .. } => "E1001",
            FrontendError::UnexpectedToken { .. } => "E1002",
            FrontendError::EmptyTypeDeclaration { .. } => "E1003",
            FrontendError::RepeatedType { .. } => "E1004",
            FrontendError::UnknownCommand { .. } => "E1005",
            FrontendError::VoidValue { .. } => "E2001",
            FrontendError::TypeSystem { source, .. } => match source {
                DuplicateType { .. } => "E3001",
                UnknownParent { .. } => "E3002",
                InvalidName { .. } => "E3003",
                DuplicateObject { .. } => "E3004",
                UndefinedType { .. } => "E3005",
                UndefinedObject { .. } => "E3006",
                UninitializedObject { .. } => "E3007",
                DuplicateSignature { .. } => "E3008",
                InvalidOverrideReturnType { .. } => "E3009",
                NotASubtype { .. } => "E3010",
                NoMatchingSignature { .. } => "E3011",
                AmbiguousSignature { .. } => "E3012",
                NoRuntimeOverride { .. } => "E3013",
            },
        }
    }

    /// Check if this is a syntax error rather than a semantic one.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            FrontendError::UnexpectedCharacter { .. }
                | FrontendError::UnexpectedToken { .. }
                | FrontendError::EmptyTypeDeclaration { .. }
        )
    }
}

/// Result type for frontend operations
pub type Result<T> = std::result::Result<T, FrontendError>;
