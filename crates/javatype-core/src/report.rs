//! Name-based views of session state, for printing and serialization

use std::fmt;

use serde::Serialize;

/// A named type and its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeEntry {
    /// Type name
    pub name: String,
    /// Parent name, `None` for the root
    pub parent: Option<String>,
}

impl fmt::Display for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} <: {}", self.name, parent),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An object binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    /// Object name
    pub name: String,
    /// Declared type
    pub declared: String,
    /// Actual type, `None` while uninitialised
    pub actual: Option<String>,
}

impl fmt::Display for ObjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} (rtt={})",
            self.name,
            self.declared,
            self.actual.as_deref().unwrap_or("nil")
        )
    }
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    /// Declaring type
    pub declaring: String,
    /// Method name
    pub name: String,
    /// Parameter type names
    pub params: Vec<String>,
    /// Return type name, `None` for void
    pub return_type: Option<String>,
}

impl fmt::Display for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.declaring, self.name, self.params.join(","))?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// Both phases of a resolved call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallResolution {
    /// Calling object
    pub caller: String,
    /// Method name
    pub method: String,
    /// Static types of the arguments
    pub arguments: Vec<String>,
    /// Type chosen by compile-time resolution
    pub static_type: String,
    /// Signature chosen by compile-time resolution
    pub signature: Vec<String>,
    /// Type declaring the method that runs
    pub dynamic_type: String,
    /// Return type of the method that runs, `None` for void
    pub return_type: Option<String>,
}

impl fmt::Display for CallResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signature = self.signature.join(",");
        write!(
            f,
            "{}.{}({}) -> {}::{}({}) (ctt) -> {}::{}({}) (rtt)",
            self.caller,
            self.method,
            self.arguments.join(","),
            self.static_type,
            self.method,
            signature,
            self.dynamic_type,
            self.method,
            signature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_entry_display() {
        let entry = TypeEntry {
            name: "Dog".to_string(),
            parent: Some("Animal".to_string()),
        };
        assert_eq!(entry.to_string(), "Dog <: Animal");
    }

    #[test]
    fn test_object_entry_display() {
        let mut entry = ObjectEntry {
            name: "a".to_string(),
            declared: "Animal".to_string(),
            actual: None,
        };
        assert_eq!(entry.to_string(), "a : Animal (rtt=nil)");
        entry.actual = Some("Dog".to_string());
        assert_eq!(entry.to_string(), "a : Animal (rtt=Dog)");
    }

    #[test]
    fn test_method_entry_display() {
        let entry = MethodEntry {
            declaring: "Dog".to_string(),
            name: "meet".to_string(),
            params: vec!["Animal".to_string(), "int".to_string()],
            return_type: Some("Dog".to_string()),
        };
        assert_eq!(entry.to_string(), "Dog::meet(Animal,int) -> Dog");
    }

    #[test]
    fn test_call_resolution_display() {
        let call = CallResolution {
            caller: "a".to_string(),
            method: "meet".to_string(),
            arguments: vec!["Dog".to_string()],
            static_type: "Animal".to_string(),
            signature: vec!["Animal".to_string()],
            dynamic_type: "Dog".to_string(),
            return_type: None,
        };
        assert_eq!(
            call.to_string(),
            "a.meet(Dog) -> Animal::meet(Animal) (ctt) -> Dog::meet(Animal) (rtt)"
        );
    }

    #[test]
    fn test_serializes_optional_fields() {
        let entry = ObjectEntry {
            name: "a".to_string(),
            declared: "Animal".to_string(),
            actual: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"name":"a","declared":"Animal","actual":null}"#);
    }
}
