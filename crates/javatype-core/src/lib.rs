//! Javatype core
//!
//! A nominal type hierarchy with single inheritance, overloaded and
//! overridden methods, and Java-style two-phase resolution of virtual calls.

#![warn(missing_docs)]

pub mod error;
pub mod methods;
pub mod objects;
pub mod report;
pub mod resolve;
pub mod session;
pub mod store;
pub mod types;

pub use error::{Result, TypeSystemError};
pub use methods::{Method, MethodTable, Signature};
pub use objects::{ObjectInfo, ObjectRegistry};
pub use report::{CallResolution, MethodEntry, ObjectEntry, TypeEntry};
pub use resolve::{DynamicBinding, Resolver, StaticBinding};
pub use session::{Argument, Session};
pub use store::Store;
pub use types::{TypeGraph, TypeId, TypeInfo};
