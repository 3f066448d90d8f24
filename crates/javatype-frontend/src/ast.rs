//! Syntax tree of one statement

use crate::token::Span;
use javatype_core::Argument;

/// A name together with where it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// The identifier
    pub text: String,
    /// Location
    pub span: Span,
}

impl Name {
    /// Create a name.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `types A < B < C, D`
    ///
    /// Each chain lists types from the most derived one upwards; the last
    /// type of a chain extends `Object`.
    Types {
        /// The comma-separated chains
        chains: Vec<Vec<Name>>,
    },

    /// `T::m(P1, P2) [return R]`
    Method {
        /// Declaring type
        declaring: Name,
        /// Method name
        name: Name,
        /// Parameter types
        params: Vec<Name>,
        /// Return type, `None` for void
        return_type: Option<Name>,
    },

    /// `T x` or `T x = rhs`
    Object {
        /// Declared type
        ty: Name,
        /// Object name
        name: Name,
        /// Initial value
        value: Option<Rhs>,
    },

    /// `x = rhs`
    Assign {
        /// Object being reassigned
        target: Name,
        /// New value
        value: Rhs,
    },

    /// `x.m(args)`
    Call(Call),
}

/// A simulated method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Calling object
    pub caller: Name,
    /// Method name
    pub method: Name,
    /// Arguments
    pub args: Vec<Arg>,
    /// The whole call expression
    pub span: Span,
}

/// Call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// `obj`
    Object(Name),
    /// `(T)obj`
    Cast {
        /// Cast type
        ty: Name,
        /// Object
        object: Name,
    },
}

impl Arg {
    /// Location of the whole argument.
    pub fn span(&self) -> Span {
        match self {
            Arg::Object(name) => name.span,
            Arg::Cast { ty, object } => ty.span.merge(&object.span),
        }
    }

    /// Convert to a session argument.
    pub fn to_argument(&self) -> Argument {
        match self {
            Arg::Object(name) => Argument::Object(name.text.clone()),
            Arg::Cast { ty, object } => Argument::Cast {
                ty: ty.text.clone(),
                object: object.text.clone(),
            },
        }
    }
}

/// Right-hand side of a declaration or assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rhs {
    /// `obj`
    Object(Name),
    /// `(T)obj`
    Cast {
        /// Cast type
        ty: Name,
        /// Object
        object: Name,
    },
    /// `T()`
    New(Name),
    /// `x.m(args)`
    Call(Call),
}

impl Rhs {
    /// Location of the whole expression.
    pub fn span(&self) -> Span {
        match self {
            Rhs::Object(name) | Rhs::New(name) => name.span,
            Rhs::Cast { ty, object } => ty.span.merge(&object.span),
            Rhs::Call(call) => call.span,
        }
    }
}
