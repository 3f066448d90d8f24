//! Two-phase call resolution
//!
//! A call `x.m(args)` is resolved in two passes, the way Java binds virtual
//! calls:
//!
//! 1. **Compile time**: starting at the declared type of `x`, walk up one type
//!    at a time until some type declares an overload of `m` applicable to the
//!    argument types. The most specific applicable overload at that level is
//!    the bound signature. Candidates at different levels are never compared.
//! 2. **Run time**: starting at the actual type of `x`, walk up until a type
//!    declares `m` with exactly the bound signature. That method runs.

use crate::error::{Result, TypeSystemError};
use crate::methods::{Method, MethodTable, Signature};
use crate::types::{TypeGraph, TypeId};

/// Outcome of compile-time resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBinding {
    /// Type at which an applicable overload was found
    pub ty: TypeId,
    /// The most specific applicable signature at that type
    pub signature: Signature,
}

/// Outcome of run-time resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicBinding<'a> {
    /// Type declaring the selected override
    pub ty: TypeId,
    /// The selected method
    pub method: &'a Method,
}

/// Resolves calls against a type graph and a method table
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    graph: &'a TypeGraph,
    methods: &'a MethodTable,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `graph` and `methods`.
    pub fn new(graph: &'a TypeGraph, methods: &'a MethodTable) -> Self {
        Resolver { graph, methods }
    }

    /// Check if `a` is more specific than `b`.
    ///
    /// Both must have the same arity and each parameter of `a` must be a
    /// subtype of the matching parameter of `b`. Two empty signatures are
    /// each more specific than the other.
    pub fn more_specific(&self, a: &Signature, b: &Signature) -> bool {
        a.len() == b.len()
            && a.params()
                .iter()
                .zip(b.params())
                .all(|(&pa, &pb)| self.graph.is_subtype(pa, pb))
    }

    /// Check if a candidate accepts `arguments`.
    pub fn is_applicable(&self, candidate: &Signature, arguments: &Signature) -> bool {
        self.more_specific(arguments, candidate)
    }

    /// Compile-time resolution of `name(arguments)` on declared type `caller`.
    pub fn resolve_static(
        &self,
        caller: TypeId,
        name: &str,
        arguments: &Signature,
    ) -> Result<StaticBinding> {
        for level in self.graph.ancestors(caller) {
            let applicable: Vec<&Signature> = self
                .methods
                .overloads(level, name)
                .map(|method| &method.signature)
                .filter(|candidate| self.is_applicable(candidate, arguments))
                .collect();

            let Some((&first, rest)) = applicable.split_first() else {
                continue;
            };

            let best = rest.iter().fold(first, |best, &candidate| {
                if self.more_specific(candidate, best) {
                    candidate
                } else {
                    best
                }
            });

            if applicable
                .iter()
                .any(|&candidate| !self.more_specific(best, candidate))
            {
                return Err(TypeSystemError::AmbiguousSignature {
                    level: self.graph.name(level).to_string(),
                    name: name.to_string(),
                    arguments: arguments.render(self.graph),
                    candidates: applicable
                        .iter()
                        .map(|candidate| format!("({})", candidate.render(self.graph)))
                        .collect::<Vec<_>>()
                        .join(" "),
                });
            }

            log::debug!(
                "{}({}) on {} binds to {}::{}({})",
                name,
                arguments.render(self.graph),
                self.graph.name(caller),
                self.graph.name(level),
                name,
                best.render(self.graph)
            );
            return Ok(StaticBinding {
                ty: level,
                signature: best.clone(),
            });
        }

        Err(TypeSystemError::NoMatchingSignature {
            caller: self.graph.name(caller).to_string(),
            name: name.to_string(),
            arguments: arguments.render(self.graph),
        })
    }

    /// Run-time resolution of a bound call on actual type `caller`.
    ///
    /// The search never leaves the subtypes of `bound.ty`.
    pub fn resolve_dynamic(
        &self,
        caller: TypeId,
        name: &str,
        bound: &StaticBinding,
    ) -> Result<DynamicBinding<'a>> {
        for level in self.graph.ancestors(caller) {
            if !self.graph.is_subtype(level, bound.ty) {
                break;
            }
            if let Some(method) = self.methods.lookup(level, name, &bound.signature) {
                log::debug!(
                    "{} on {} dispatches to {}",
                    name,
                    self.graph.name(caller),
                    method.render(self.graph)
                );
                return Ok(DynamicBinding { ty: level, method });
            }
        }

        Err(TypeSystemError::NoRuntimeOverride {
            actual: self.graph.name(caller).to_string(),
            bound: self.graph.name(bound.ty).to_string(),
            name: name.to_string(),
            signature: bound.signature.render(self.graph),
        })
    }
}
