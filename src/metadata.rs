//! Class metadata collaborator.
//!
//! The registry never loads class files itself. An injected
//! `ClassMetadataProvider` answers "what does class X look like" with a
//! `ClassMetadata` snapshot: canonical internal name, every declared and
//! inherited method (name + parameter descriptors, duplicates allowed for
//! covariant overrides and bridge methods), and field names.

use std::collections::HashSet;

/// Lookup failure: the named class does not exist in the symbol universe.
#[derive(Debug, Clone, thiserror::Error)]
#[error("class not found: {0}")]
pub struct ClassNotFound(pub String);

/// One method of a resolved class. The return type is deliberately not
/// carried: signatures match on name and parameter types only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub name: String,
    /// JVM parameter-type descriptors, in declaration order.
    pub params: Vec<String>,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Structural snapshot of one class, including inherited members.
#[derive(Debug, Clone, Default)]
pub struct ClassMetadata {
    /// Canonical internal (slash-separated) name; registry keys use this
    /// spelling regardless of how the signature file spelled the class.
    pub internal_name: String,
    pub methods: Vec<MethodSig>,
    pub fields: HashSet<String>,
}

impl ClassMetadata {
    pub fn new(internal_name: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            methods: Vec::new(),
            fields: HashSet::new(),
        }
    }

    pub fn with_method(mut self, name: &str, params: &[&str]) -> Self {
        self.methods.push(MethodSig::new(
            name,
            params.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    pub fn with_field(mut self, name: &str) -> Self {
        self.fields.insert(name.to_string());
        self
    }
}

/// Symbol-metadata collaborator (spec'd as an injectable capability so the
/// core stays free of ambient I/O and is testable with fixed fixtures).
pub trait ClassMetadataProvider {
    /// Resolves a class name as written in a signature file (dotted or
    /// slash-separated) to its metadata.
    fn resolve_class(&self, class_name: &str) -> Result<ClassMetadata, ClassNotFound>;
}
