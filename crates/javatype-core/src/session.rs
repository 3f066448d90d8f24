//! Session: the context object owning all tables
//!
//! Every operation takes and returns names so a frontend never handles raw
//! [`TypeId`]s unless it wants to. All operations validate before writing, so
//! a failed call leaves the session untouched.

use crate::error::{Result, TypeSystemError};
use crate::methods::{Method, MethodTable, Signature};
use crate::objects::{ObjectInfo, ObjectRegistry};
use crate::report::{CallResolution, MethodEntry, ObjectEntry, TypeEntry};
use crate::resolve::Resolver;
use crate::types::{TypeGraph, TypeId};

/// One argument of a simulated call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// `obj`, typed by the object's declared type
    Object(String),
    /// `(Type)obj`, typed by the cast type
    Cast {
        /// Cast type name
        ty: String,
        /// Object name
        object: String,
    },
}

/// An interactive modelling session
#[derive(Debug, Clone, Default)]
pub struct Session {
    types: TypeGraph,
    objects: ObjectRegistry,
    methods: MethodTable,
}

impl Session {
    /// Create a session with only the builtin types.
    pub fn new() -> Self {
        Self::default()
    }

    /// The type graph.
    pub fn graph(&self) -> &TypeGraph {
        &self.types
    }

    /// The object registry.
    pub fn object_registry(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// The method table.
    pub fn method_table(&self) -> &MethodTable {
        &self.methods
    }

    /// Resolver over this session's types and methods.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.types, &self.methods)
    }

    // ── Types ───────────────────────────────────────────────────────────

    /// Declare type `name` with parent `parent`.
    pub fn define_type(&mut self, name: &str, parent: &str) -> Result<TypeId> {
        self.types.define(name, parent)
    }

    /// Find a type by name.
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.types
            .lookup(name)
            .ok_or_else(|| TypeSystemError::UndefinedType {
                name: name.to_string(),
            })
    }

    /// Check if type `sub` is a subtype of type `sup`.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> Result<bool> {
        let sub = self.type_id(sub)?;
        let sup = self.type_id(sup)?;
        Ok(self.types.is_subtype(sub, sup))
    }

    // ── Objects ─────────────────────────────────────────────────────────

    /// Find an object by name.
    pub fn object(&self, name: &str) -> Result<&ObjectInfo> {
        self.objects
            .lookup(name)
            .ok_or_else(|| TypeSystemError::UndefinedObject {
                name: name.to_string(),
            })
    }

    /// Declare object `name` of type `declared`, optionally initialised to
    /// actual type `actual`.
    pub fn define_object(
        &mut self,
        name: &str,
        declared: &str,
        actual: Option<&str>,
    ) -> Result<ObjectEntry> {
        let declared = self.type_id(declared)?;
        let actual = actual.map(|ty| self.type_id(ty)).transpose()?;
        self.bind_object(name, declared, actual)
    }

    /// Declare object `name` from type ids.
    pub fn bind_object(
        &mut self,
        name: &str,
        declared: TypeId,
        actual: Option<TypeId>,
    ) -> Result<ObjectEntry> {
        if let Some(actual) = actual {
            self.check_subtype(actual, declared)?;
        }
        let object = self.objects.define(name, declared, actual)?.clone();
        Ok(self.object_entry(&object))
    }

    /// Set the actual type of object `name` to type `actual`.
    pub fn reassign_object(&mut self, name: &str, actual: &str) -> Result<ObjectEntry> {
        let actual = self.type_id(actual)?;
        self.assign_object(name, actual)
    }

    /// Set the actual type of object `name` from a type id.
    pub fn assign_object(&mut self, name: &str, actual: TypeId) -> Result<ObjectEntry> {
        let declared = self.object(name)?.declared;
        self.check_subtype(actual, declared)?;
        self.objects.reassign(name, actual)?;
        let object = self.object(name)?.clone();
        Ok(self.object_entry(&object))
    }

    /// Actual type of an initialised object.
    pub fn object_value(&self, name: &str) -> Result<TypeId> {
        self.object(name)?
            .actual
            .ok_or_else(|| TypeSystemError::UninitializedObject {
                name: name.to_string(),
            })
    }

    /// Type of `(ty)object`.
    ///
    /// The cast type must lie between the object's actual and declared types.
    pub fn cast_type(&self, object: &str, ty: &str) -> Result<TypeId> {
        let cast = self.type_id(ty)?;
        let info = self.object(object)?;
        if !self.types.is_subtype_opt(info.actual, Some(cast)) {
            return Err(TypeSystemError::NotASubtype {
                sub: self.render_type(info.actual),
                sup: ty.to_string(),
            });
        }
        self.check_subtype(cast, info.declared)?;
        Ok(cast)
    }

    /// Static type of a call argument.
    pub fn argument_type(&self, argument: &Argument) -> Result<TypeId> {
        match argument {
            Argument::Object(name) => Ok(self.object(name)?.declared),
            Argument::Cast { ty, object } => self.cast_type(object, ty),
        }
    }

    // ── Methods ─────────────────────────────────────────────────────────

    /// Declare `declaring::name(params)` with an optional return type.
    pub fn define_method(
        &mut self,
        declaring: &str,
        name: &str,
        params: &[&str],
        return_type: Option<&str>,
    ) -> Result<MethodEntry> {
        let declaring = self.type_id(declaring)?;
        let signature = params
            .iter()
            .map(|param| self.type_id(param))
            .collect::<Result<Signature>>()?;
        let return_type = return_type.map(|ty| self.type_id(ty)).transpose()?;

        let method = self
            .methods
            .define(&self.types, declaring, name, signature, return_type)?;
        Ok(self.method_entry(&method))
    }

    /// Resolve `caller.name(arguments)` in both phases.
    pub fn resolve_call(
        &self,
        caller: &str,
        name: &str,
        arguments: &[Argument],
    ) -> Result<CallResolution> {
        let arguments = arguments
            .iter()
            .map(|argument| self.argument_type(argument))
            .collect::<Result<Signature>>()?;
        self.resolve_call_with(caller, name, &arguments)
    }

    /// Resolve `caller.name(..)` for already-typed arguments.
    pub fn resolve_call_with(
        &self,
        caller: &str,
        name: &str,
        arguments: &Signature,
    ) -> Result<CallResolution> {
        let object = self.object(caller)?;
        let actual = object
            .actual
            .ok_or_else(|| TypeSystemError::UninitializedObject {
                name: caller.to_string(),
            })?;

        let resolver = self.resolver();
        let bound = resolver.resolve_static(object.declared, name, arguments)?;
        let hit = resolver.resolve_dynamic(actual, name, &bound)?;

        Ok(CallResolution {
            caller: caller.to_string(),
            method: name.to_string(),
            arguments: self.type_names(arguments),
            static_type: self.types.name(bound.ty).to_string(),
            signature: self.type_names(&bound.signature),
            dynamic_type: self.types.name(hit.ty).to_string(),
            return_type: hit.method.return_type.map(|ty| self.types.name(ty).to_string()),
        })
    }

    // ── Enumeration ─────────────────────────────────────────────────────

    /// All named types, in name table order. `Object` is reported without a
    /// parent.
    pub fn types(&self) -> Vec<TypeEntry> {
        let root = self.types.root();
        self.types
            .iter()
            .map(|info| TypeEntry {
                name: info.name.clone(),
                parent: info
                    .parent
                    .filter(|&parent| parent != root)
                    .map(|parent| self.types.name(parent).to_string()),
            })
            .collect()
    }

    /// All objects, in name table order.
    pub fn objects(&self) -> Vec<ObjectEntry> {
        self.objects
            .iter()
            .map(|object| self.object_entry(object))
            .collect()
    }

    /// All methods, in table order.
    pub fn methods(&self) -> Vec<MethodEntry> {
        self.methods
            .iter()
            .map(|method| self.method_entry(method))
            .collect()
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn check_subtype(&self, sub: TypeId, sup: TypeId) -> Result<()> {
        if self.types.is_subtype(sub, sup) {
            Ok(())
        } else {
            Err(TypeSystemError::NotASubtype {
                sub: self.types.name(sub).to_string(),
                sup: self.types.name(sup).to_string(),
            })
        }
    }

    fn render_type(&self, ty: Option<TypeId>) -> String {
        match ty {
            Some(ty) => self.types.name(ty).to_string(),
            None => "nil".to_string(),
        }
    }

    fn type_names(&self, signature: &Signature) -> Vec<String> {
        signature
            .params()
            .iter()
            .map(|&ty| self.types.name(ty).to_string())
            .collect()
    }

    fn object_entry(&self, object: &ObjectInfo) -> ObjectEntry {
        ObjectEntry {
            name: object.name.clone(),
            declared: self.types.name(object.declared).to_string(),
            actual: object.actual.map(|ty| self.types.name(ty).to_string()),
        }
    }

    fn method_entry(&self, method: &Method) -> MethodEntry {
        MethodEntry {
            declaring: self.types.name(method.declaring).to_string(),
            name: method.name.clone(),
            params: self.type_names(&method.signature),
            return_type: method.return_type.map(|ty| self.types.name(ty).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoo() -> Session {
        let mut session = Session::new();
        session.define_type("Animal", "Object").unwrap();
        session.define_type("Dog", "Animal").unwrap();
        session.define_type("Cat", "Animal").unwrap();
        session
    }

    #[test]
    fn test_define_object_checks_subtype() {
        let mut session = zoo();
        let entry = session.define_object("a", "Animal", Some("Dog")).unwrap();
        assert_eq!(entry.to_string(), "a : Animal (rtt=Dog)");

        let err = session.define_object("d", "Dog", Some("Animal")).unwrap_err();
        assert!(matches!(err, TypeSystemError::NotASubtype { .. }));
        assert!(session.object("d").is_err());
    }

    #[test]
    fn test_define_object_unknown_type() {
        let mut session = zoo();
        let err = session.define_object("b", "Bird", None).unwrap_err();
        assert_eq!(
            err,
            TypeSystemError::UndefinedType {
                name: "Bird".to_string()
            }
        );
    }

    #[test]
    fn test_reassign_keeps_invariant() {
        let mut session = zoo();
        session.define_object("a", "Animal", None).unwrap();
        session.reassign_object("a", "Cat").unwrap();
        assert!(session.reassign_object("a", "Object").is_err());
        assert_eq!(session.object("a").unwrap().actual, session.graph().lookup("Cat"));
    }

    #[test]
    fn test_cast_type() {
        let mut session = zoo();
        session.define_object("o", "Object", Some("Dog")).unwrap();
        session.define_object("u", "Object", None).unwrap();

        let animal = session.type_id("Animal").unwrap();
        assert_eq!(session.cast_type("o", "Animal").unwrap(), animal);
        // Actual type is not a subtype of the cast type
        assert!(matches!(
            session.cast_type("o", "Cat"),
            Err(TypeSystemError::NotASubtype { .. })
        ));
        // Uninitialised objects cannot be cast
        assert!(matches!(
            session.cast_type("u", "Animal"),
            Err(TypeSystemError::NotASubtype { ref sub, .. }) if sub == "nil"
        ));
    }

    #[test]
    fn test_cast_above_declared_type() {
        let mut session = zoo();
        session.define_object("a", "Animal", Some("Dog")).unwrap();
        assert!(matches!(
            session.cast_type("a", "Object"),
            Err(TypeSystemError::NotASubtype { .. })
        ));
    }

    #[test]
    fn test_resolve_call_uses_both_types() {
        let mut session = zoo();
        session
            .define_method("Animal", "speak", &[], Some("Object"))
            .unwrap();
        session.define_method("Dog", "speak", &[], Some("Dog")).unwrap();
        session.define_object("a", "Animal", Some("Dog")).unwrap();

        let call = session.resolve_call("a", "speak", &[]).unwrap();
        assert_eq!(call.static_type, "Animal");
        assert_eq!(call.dynamic_type, "Dog");
        assert_eq!(call.return_type.as_deref(), Some("Dog"));
    }

    #[test]
    fn test_resolve_call_with_cast_argument() {
        let mut session = zoo();
        session.define_method("Animal", "meet", &["Animal"], None).unwrap();
        session.define_method("Animal", "meet", &["Dog"], None).unwrap();
        session.define_object("a", "Animal", Some("Animal")).unwrap();
        session.define_object("x", "Animal", Some("Dog")).unwrap();

        let plain = session
            .resolve_call("a", "meet", &[Argument::Object("x".to_string())])
            .unwrap();
        assert_eq!(plain.signature, vec!["Animal".to_string()]);

        let cast = session
            .resolve_call(
                "a",
                "meet",
                &[Argument::Cast {
                    ty: "Dog".to_string(),
                    object: "x".to_string(),
                }],
            )
            .unwrap();
        assert_eq!(cast.arguments, vec!["Dog".to_string()]);
        assert_eq!(cast.signature, vec!["Dog".to_string()]);
    }

    #[test]
    fn test_resolve_call_uninitialised_caller() {
        let mut session = zoo();
        session.define_method("Animal", "speak", &[], None).unwrap();
        session.define_object("a", "Animal", None).unwrap();
        assert!(matches!(
            session.resolve_call("a", "speak", &[]),
            Err(TypeSystemError::UninitializedObject { .. })
        ));
    }

    #[test]
    fn test_define_method_rejects_unknown_types() {
        let mut session = zoo();
        assert!(session.define_method("Bird", "fly", &[], None).is_err());
        assert!(session.define_method("Dog", "fetch", &["Ball"], None).is_err());
        assert!(session
            .define_method("Dog", "fetch", &[], Some("Ball"))
            .is_err());
        assert!(session.methods().is_empty());
    }

    #[test]
    fn test_is_subtype_by_name() {
        let session = zoo();
        assert!(session.is_subtype("Dog", "Animal").unwrap());
        assert!(!session.is_subtype("Animal", "Dog").unwrap());
        assert!(session.is_subtype("Dog", "Bird").is_err());
    }

    #[test]
    fn test_enumerations() {
        let mut session = zoo();
        session.define_object("a", "Animal", None).unwrap();
        session.define_method("Dog", "speak", &[], None).unwrap();

        let types = session.types();
        assert!(types.contains(&TypeEntry {
            name: "Dog".to_string(),
            parent: Some("Animal".to_string()),
        }));
        assert_eq!(types.len(), 6 + 3);
        assert_eq!(session.objects().len(), 1);
        assert_eq!(session.methods()[0].to_string(), "Dog::speak()");
    }
}
