//! Type system errors

use thiserror::Error;

/// Errors reported by declarations and call resolution.
///
/// None of them are fatal: a failed operation leaves the session unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeSystemError {
    /// A type with this name already exists
    #[error("type {name} is already defined")]
    DuplicateType {
        /// Name of the type
        name: String,
    },

    /// The requested parent type does not exist
    #[error("undefined parent type {parent} for {name}")]
    UnknownParent {
        /// Name of the type being declared
        name: String,
        /// Name of the missing parent
        parent: String,
    },

    /// A name that cannot be stored as a key
    #[error("invalid name {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// An object with this name already exists
    #[error("object {name} already exists")]
    DuplicateObject {
        /// Name of the object
        name: String,
    },

    /// Reference to a type that was never declared
    #[error("undefined type {name}")]
    UndefinedType {
        /// Name that was not found
        name: String,
    },

    /// Reference to an object that was never declared
    #[error("undefined object {name}")]
    UndefinedObject {
        /// Name that was not found
        name: String,
    },

    /// An object without an actual type was used as a value
    #[error("object {name} is uninitialised")]
    UninitializedObject {
        /// Name of the object
        name: String,
    },

    /// The declaring type already has a method with this name and signature
    #[error("method {declaring}::{name}({signature}) already exists")]
    DuplicateSignature {
        /// Declaring type
        declaring: String,
        /// Method name
        name: String,
        /// Rendered parameter list
        signature: String,
    },

    /// An override's return type is not a subtype of the overridden one
    #[error(
        "return type {actual} of {declaring}::{name} is not a subtype of {expected} \
         returned by {overridden}::{name}"
    )]
    InvalidOverrideReturnType {
        /// Type declaring the override
        declaring: String,
        /// Method name
        name: String,
        /// Nearest ancestor declaring the same signature
        overridden: String,
        /// Return type of the override (`void` when absent)
        actual: String,
        /// Return type of the overridden method (`void` when absent)
        expected: String,
    },

    /// A cast or assignment would break `actual <: declared`
    #[error("{sub} is not a subtype of {sup}")]
    NotASubtype {
        /// The would-be subtype (`nil` when absent)
        sub: String,
        /// The required supertype
        sup: String,
    },

    /// No type on the declared type's chain has an applicable signature
    #[error("no matching signature for {name}({arguments}) on {caller}")]
    NoMatchingSignature {
        /// Declared type of the caller
        caller: String,
        /// Method name
        name: String,
        /// Rendered argument types
        arguments: String,
    },

    /// Several applicable signatures and none more specific than the others
    #[error("multiple matching signatures for {name}({arguments}) on {level}: {candidates}")]
    AmbiguousSignature {
        /// Type at which the candidates were found
        level: String,
        /// Method name
        name: String,
        /// Rendered argument types
        arguments: String,
        /// Rendered applicable signatures
        candidates: String,
    },

    /// The actual type's chain left the bound type without finding an override
    #[error("could not find runtime overload of {bound}::{name}({signature}) from {actual}")]
    NoRuntimeOverride {
        /// Actual type the search started from
        actual: String,
        /// Type chosen by compile-time resolution
        bound: String,
        /// Method name
        name: String,
        /// Rendered bound signature
        signature: String,
    },
}

/// Result alias for type system operations
pub type Result<T> = std::result::Result<T, TypeSystemError>;
