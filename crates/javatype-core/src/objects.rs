//! Named object bindings

use crate::error::{Result, TypeSystemError};
use crate::store::{name_key, Store, NAME_WIDTH};
use crate::types::{validate_name, TypeId};

/// A named binding with a declared and an actual type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Binding name
    pub name: String,
    /// Declared type (ctt), fixed at creation
    pub declared: TypeId,
    /// Actual type (rtt), `None` until initialised
    pub actual: Option<TypeId>,
}

/// Registry of object bindings.
///
/// Does not check `actual <: declared`; the session validates before writing.
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    objects: Store<ObjectInfo>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ObjectRegistry {
            objects: Store::new(NAME_WIDTH),
        }
    }

    /// Bind `name` with declared type `declared` and optional actual type.
    pub fn define(
        &mut self,
        name: &str,
        declared: TypeId,
        actual: Option<TypeId>,
    ) -> Result<&ObjectInfo> {
        validate_name(name)?;
        let key = name_key(name);
        if self.objects.contains(&key) {
            return Err(TypeSystemError::DuplicateObject {
                name: name.to_string(),
            });
        }

        log::debug!("defined object {}", name);
        let object = self.objects.insert(
            &key,
            ObjectInfo {
                name: name.to_string(),
                declared,
                actual,
            },
        );
        Ok(&*object)
    }

    /// Find an object by name.
    pub fn lookup(&self, name: &str) -> Option<&ObjectInfo> {
        if name.contains('\0') {
            return None;
        }
        self.objects.find(&name_key(name))
    }

    /// Replace the actual type of `name`.
    pub fn reassign(&mut self, name: &str, actual: TypeId) -> Result<()> {
        let object = self
            .objects
            .find_mut(&name_key(name))
            .filter(|_| !name.contains('\0'))
            .ok_or_else(|| TypeSystemError::UndefinedObject {
                name: name.to_string(),
            })?;
        object.actual = Some(actual);
        log::debug!("reassigned object {}", name);
        Ok(())
    }

    /// Objects in slot order of the name table.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectInfo> {
        self.objects.values()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if no object has been declared.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
