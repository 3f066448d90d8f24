//! Method declarations
//!
//! Methods live in a three-level table: declaring type → method name →
//! parameter signature. The innermost level is keyed by the signature itself,
//! encoded as a terminated sequence of [`TypeId`]s.

use crate::error::{Result, TypeSystemError};
use crate::store::{name_key, Store, NAME_WIDTH};
use crate::types::{validate_name, TypeGraph, TypeId, TYPE_WIDTH};

/// Ordered parameter types of one overload
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature(Vec<TypeId>);

impl Signature {
    /// Create a signature from parameter types.
    pub fn new(params: Vec<TypeId>) -> Self {
        Signature(params)
    }

    /// The empty parameter list.
    pub fn empty() -> Self {
        Signature(Vec::new())
    }

    /// Parameter types in order.
    pub fn params(&self) -> &[TypeId] {
        &self.0
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the signature has no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as a store key terminated by one all-zero element.
    pub fn to_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity((self.0.len() + 1) * TYPE_WIDTH);
        for ty in &self.0 {
            key.extend_from_slice(&ty.to_element());
        }
        key.extend_from_slice(&[0; TYPE_WIDTH]);
        key
    }

    /// Decode a signature key, stopping at the terminator.
    pub fn from_key(key: &[u8]) -> Self {
        key.chunks_exact(TYPE_WIDTH)
            .map_while(TypeId::from_element)
            .collect()
    }

    /// Render as comma-separated type names.
    pub fn render(&self, graph: &TypeGraph) -> String {
        self.0
            .iter()
            .map(|&ty| graph.name(ty))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<TypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = TypeId>>(iter: I) -> Self {
        Signature(iter.into_iter().collect())
    }
}

impl From<Vec<TypeId>> for Signature {
    fn from(params: Vec<TypeId>) -> Self {
        Signature(params)
    }
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Type declaring the method
    pub declaring: TypeId,
    /// Method name
    pub name: String,
    /// Parameter types
    pub signature: Signature,
    /// Return type, `None` for void
    pub return_type: Option<TypeId>,
}

impl Method {
    /// Render as `Type::name(P1,P2)`.
    pub fn render(&self, graph: &TypeGraph) -> String {
        format!(
            "{}::{}({})",
            graph.name(self.declaring),
            self.name,
            self.signature.render(graph)
        )
    }
}

/// signature key → method
type SignatureTable = Store<Method>;

/// method name → signatures
type VTable = Store<SignatureTable>;

/// All methods of a session, indexed by declaring type, name and signature.
#[derive(Debug, Clone)]
pub struct MethodTable {
    vtables: Store<VTable>,
    len: usize,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        MethodTable {
            vtables: Store::new(TYPE_WIDTH),
            len: 0,
        }
    }

    /// Declare `declaring::name(signature)` returning `return_type`.
    ///
    /// Fails if the declaring type already has this signature, or if the
    /// nearest ancestor declaring the same signature returns a type the new
    /// return type is not a subtype of. Nothing is written on failure.
    pub fn define(
        &mut self,
        graph: &TypeGraph,
        declaring: TypeId,
        name: &str,
        signature: Signature,
        return_type: Option<TypeId>,
    ) -> Result<Method> {
        validate_name(name)?;
        if self.lookup(declaring, name, &signature).is_some() {
            return Err(TypeSystemError::DuplicateSignature {
                declaring: graph.name(declaring).to_string(),
                name: name.to_string(),
                signature: signature.render(graph),
            });
        }

        if let Some(overridden) = self.nearest_inherited(graph, declaring, name, &signature) {
            let covariant = match (return_type, overridden.return_type) {
                (None, None) => true,
                (Some(actual), Some(expected)) => graph.is_subtype(actual, expected),
                _ => false,
            };
            if !covariant {
                return Err(TypeSystemError::InvalidOverrideReturnType {
                    declaring: graph.name(declaring).to_string(),
                    name: name.to_string(),
                    overridden: graph.name(overridden.declaring).to_string(),
                    actual: render_return(graph, return_type),
                    expected: render_return(graph, overridden.return_type),
                });
            }
            log::debug!(
                "{}::{} overrides {}",
                graph.name(declaring),
                name,
                overridden.render(graph)
            );
        }

        let method = Method {
            declaring,
            name: name.to_string(),
            signature,
            return_type,
        };
        log::debug!("defined method {}", method.render(graph));

        let key = method.signature.to_key();
        self.vtables
            .get_or_insert_with(&declaring.to_key(), || Store::new(NAME_WIDTH))
            .get_or_insert_with(&name_key(name), || Store::new(TYPE_WIDTH))
            .insert(&key, method.clone());
        self.len += 1;
        Ok(method)
    }

    /// Nearest method with this name and signature strictly above `declaring`.
    fn nearest_inherited(
        &self,
        graph: &TypeGraph,
        declaring: TypeId,
        name: &str,
        signature: &Signature,
    ) -> Option<&Method> {
        graph
            .ancestors(declaring)
            .skip(1)
            .find_map(|ancestor| self.lookup(ancestor, name, signature))
    }

    /// Exact lookup of `declaring::name(signature)`.
    pub fn lookup(&self, declaring: TypeId, name: &str, signature: &Signature) -> Option<&Method> {
        self.signatures_of(declaring, name)?
            .find(&signature.to_key())
    }

    /// Signatures declared for `name` on exactly `declaring`.
    pub fn all_signatures(&self, declaring: TypeId, name: &str) -> Vec<Signature> {
        self.overloads(declaring, name)
            .map(|method| method.signature.clone())
            .collect()
    }

    /// Methods declared for `name` on exactly `declaring`, in table order.
    pub fn overloads(&self, declaring: TypeId, name: &str) -> impl Iterator<Item = &Method> {
        self.signatures_of(declaring, name)
            .into_iter()
            .flat_map(|table| table.values())
    }

    /// Every method, grouped by declaring type and name.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.vtables
            .values()
            .flat_map(|vtable| vtable.values())
            .flat_map(|table| table.values())
    }

    /// Number of declared methods.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no method has been declared.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn signatures_of(&self, declaring: TypeId, name: &str) -> Option<&SignatureTable> {
        if name.contains('\0') {
            return None;
        }
        self.vtables
            .find(&declaring.to_key())?
            .find(&name_key(name))
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an optional return type, `void` when absent.
pub fn render_return(graph: &TypeGraph, return_type: Option<TypeId>) -> String {
    match return_type {
        Some(ty) => graph.name(ty).to_string(),
        None => "void".to_string(),
    }
}
