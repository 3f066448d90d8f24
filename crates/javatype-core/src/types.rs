//! Nominal type hierarchy
//!
//! Types form a tree through single parent links. The tree hangs off a sentinel
//! root that has no name in the registry; `Object` is its only child and every
//! declared type descends from `Object`.

use std::fmt;
use std::num::NonZeroU32;

use crate::error::{Result, TypeSystemError};
use crate::store::{name_key, Store, NAME_WIDTH};

/// Name of the sentinel root type.
pub const ROOT_NAME: &str = "_Root";

/// Name of the top of the user-visible hierarchy.
pub const OBJECT_NAME: &str = "Object";

/// Primitive-like types declared beside `Object`, directly under the root.
pub const BUILTIN_TYPES: &[&str] = &["int", "char", "float", "double", "boolean"];

/// Width of one encoded [`TypeId`] key element.
pub const TYPE_WIDTH: usize = std::mem::size_of::<u32>();

/// Identifier of a type within its [`TypeGraph`]
///
/// Never zero, so an all-zero key element can terminate a sequence of ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(NonZeroU32);

impl TypeId {
    fn from_index(index: usize) -> Self {
        TypeId(NonZeroU32::MIN.saturating_add(index as u32))
    }

    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Raw non-zero value of the id.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Encode as one key element.
    pub fn to_element(self) -> [u8; TYPE_WIDTH] {
        self.0.get().to_le_bytes()
    }

    /// Decode one key element; `None` for the all-zero terminator.
    pub fn from_element(element: &[u8]) -> Option<Self> {
        let bytes: [u8; TYPE_WIDTH] = element.try_into().ok()?;
        NonZeroU32::new(u32::from_le_bytes(bytes)).map(TypeId)
    }

    /// Encode as a terminated single-element key.
    pub fn to_key(self) -> [u8; 2 * TYPE_WIDTH] {
        let mut key = [0; 2 * TYPE_WIDTH];
        key[..TYPE_WIDTH].copy_from_slice(&self.to_element());
        key
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Identity of the type
    pub id: TypeId,
    /// Unique name
    pub name: String,
    /// Parent type, `None` only for the sentinel root
    pub parent: Option<TypeId>,
}

/// Registry of all types of a session.
///
/// Owns every type record; other tables refer to types by [`TypeId`].
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: Vec<TypeInfo>,
    by_name: Store<TypeId>,
}

impl TypeGraph {
    /// Create a graph holding the root, `Object` and the builtin types.
    pub fn new() -> Self {
        let mut graph = TypeGraph {
            types: Vec::new(),
            by_name: Store::new(NAME_WIDTH),
        };

        graph.types.push(TypeInfo {
            id: TypeId::from_index(0),
            name: ROOT_NAME.to_string(),
            parent: None,
        });
        graph.push(OBJECT_NAME, graph.root());
        for name in BUILTIN_TYPES {
            graph.push(name, graph.root());
        }
        graph
    }

    /// The sentinel root.
    pub fn root(&self) -> TypeId {
        TypeId::from_index(0)
    }

    /// The `Object` type.
    pub fn object(&self) -> TypeId {
        TypeId::from_index(1)
    }

    /// Declare `name` as a child of the type called `parent`.
    pub fn define(&mut self, name: &str, parent: &str) -> Result<TypeId> {
        let parent_id = self.lookup(parent).ok_or_else(|| TypeSystemError::UnknownParent {
            name: name.to_string(),
            parent: parent.to_string(),
        })?;
        self.define_child(name, parent_id)
    }

    /// Declare `name` as a child of `parent`.
    pub fn define_child(&mut self, name: &str, parent: TypeId) -> Result<TypeId> {
        validate_name(name)?;
        if self.by_name.contains(&name_key(name)) {
            return Err(TypeSystemError::DuplicateType {
                name: name.to_string(),
            });
        }

        let id = self.push(name, parent);
        log::debug!("defined type {} <: {}", name, self.name(parent));
        Ok(id)
    }

    fn push(&mut self, name: &str, parent: TypeId) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        self.types.push(TypeInfo {
            id,
            name: name.to_string(),
            parent: Some(parent),
        });
        self.by_name.insert(&name_key(name), id);
        id
    }

    /// Find a type by name. The root is not reachable by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        if name.contains('\0') {
            return None;
        }
        self.by_name.find(&name_key(name)).copied()
    }

    /// Get a type record.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this graph.
    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    /// Name of a type.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this graph.
    pub fn name(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    /// Parent of a type, `None` for the root.
    pub fn parent(&self, id: TypeId) -> Option<TypeId> {
        self.get(id).parent
    }

    /// Walk from `id` up to the root, starting with `id` itself.
    pub fn ancestors(&self, id: TypeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup).
    ///
    /// True iff `sup` lies on the parent chain of `sub`, `sub` included.
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.ancestors(sub).any(|ancestor| ancestor == sup)
    }

    /// Subtype check where either side may be absent; absent is never related.
    pub fn is_subtype_opt(&self, sub: Option<TypeId>, sup: Option<TypeId>) -> bool {
        match (sub, sup) {
            (Some(sub), Some(sup)) => self.is_subtype(sub, sup),
            _ => false,
        }
    }

    /// Named types in slot order of the name table.
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.by_name.values().map(|&id| self.get(id))
    }

    /// Number of named types (the root excluded).
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Always false: `Object` and the builtins are always present.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a type and its ancestors
pub struct Ancestors<'a> {
    graph: &'a TypeGraph,
    next: Option<TypeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

/// Reject names that cannot round-trip through a NUL-terminated key.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(TypeSystemError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
