//! The capability interface the engine needs from a host type system.
//!
//! The engine never inspects types directly. It asks a [`TypeSystem`] three
//! questions about an opaque [`TypeRef`]: what kind of type it is, what its
//! qualified name is, and which fields it declares. [`StaticTypeSystem`] is an
//! explicit in-memory registry; the source-backed implementation lives in
//! [`crate::source_types`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque handle identifying a type in the host type system.
///
/// Used only as a lookup key. Two refs are the same type reference when their
/// canonical strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::new(value)
    }
}

/// A named, typed slot: a record field or an endpoint argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Name as it appears on the wire
    pub name: String,
    /// Type of the value
    pub type_ref: TypeRef,
    /// Whether the value must be present
    pub required: bool,
    /// Free-text description, if the declaration carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    /// Create a required field without documentation
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            required: true,
            doc: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// One-line structural signature used when reporting conflicts
    pub fn signature(&self) -> String {
        if self.required {
            format!("{}: {}", self.name, self.type_ref)
        } else {
            format!("{}?: {}", self.name, self.type_ref)
        }
    }
}

/// The kind of a type as reported by the host type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A primitive; the string is the host's kind name (`i32`, `String`, ...)
    Primitive(String),
    /// Homogeneous ordered collection of the element type
    Array(TypeRef),
    /// Mapping from key type to value type
    Dict(TypeRef, TypeRef),
    /// Closed set of named values
    Enumeration(Vec<String>),
    /// Named record with fields
    Composite,
}

/// Introspection interface over a host type system.
pub trait TypeSystem {
    /// Report the kind of a type, or `None` if the reference is unknown.
    fn kind_of(&self, type_ref: &TypeRef) -> Option<TypeKind>;

    /// Qualified name of a composite or enumeration type.
    fn qualified_name_of(&self, type_ref: &TypeRef) -> Option<String>;

    /// Declared fields of a composite type, in declaration order.
    fn fields_of(&self, type_ref: &TypeRef) -> Option<Vec<Field>>;

    /// Why `kind_of` does not know a reference, when there is more to say
    /// than "unknown".
    fn unknown_reason(&self, _type_ref: &TypeRef) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
struct StaticEntry {
    kind: TypeKind,
    name: Option<String>,
    fields: Vec<Field>,
}

/// In-memory type registry keyed by explicit references.
///
/// Useful when the host already knows its types (an embedding application) and
/// as a fixture for exercising the engine.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeSystem {
    entries: HashMap<TypeRef, StaticEntry>,
}

impl StaticTypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a primitive of the given host kind under `type_ref`
    pub fn primitive(&mut self, type_ref: impl Into<TypeRef>, kind: &str) -> &mut Self {
        self.insert(type_ref.into(), TypeKind::Primitive(kind.to_string()), None, Vec::new())
    }

    pub fn array(&mut self, type_ref: impl Into<TypeRef>, element: impl Into<TypeRef>) -> &mut Self {
        self.insert(type_ref.into(), TypeKind::Array(element.into()), None, Vec::new())
    }

    pub fn dict(
        &mut self,
        type_ref: impl Into<TypeRef>,
        key: impl Into<TypeRef>,
        value: impl Into<TypeRef>,
    ) -> &mut Self {
        self.insert(
            type_ref.into(),
            TypeKind::Dict(key.into(), value.into()),
            None,
            Vec::new(),
        )
    }

    pub fn enumeration(
        &mut self,
        type_ref: impl Into<TypeRef>,
        name: &str,
        values: &[&str],
    ) -> &mut Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.insert(
            type_ref.into(),
            TypeKind::Enumeration(values),
            Some(name.to_string()),
            Vec::new(),
        )
    }

    /// Register a composite record with its fields in declaration order
    pub fn composite(
        &mut self,
        type_ref: impl Into<TypeRef>,
        name: &str,
        fields: Vec<Field>,
    ) -> &mut Self {
        self.insert(
            type_ref.into(),
            TypeKind::Composite,
            Some(name.to_string()),
            fields,
        )
    }

    fn insert(
        &mut self,
        type_ref: TypeRef,
        kind: TypeKind,
        name: Option<String>,
        fields: Vec<Field>,
    ) -> &mut Self {
        self.entries.insert(type_ref, StaticEntry { kind, name, fields });
        self
    }
}

impl TypeSystem for StaticTypeSystem {
    fn kind_of(&self, type_ref: &TypeRef) -> Option<TypeKind> {
        self.entries.get(type_ref).map(|entry| entry.kind.clone())
    }

    fn qualified_name_of(&self, type_ref: &TypeRef) -> Option<String> {
        self.entries.get(type_ref)?.name.clone()
    }

    fn fields_of(&self, type_ref: &TypeRef) -> Option<Vec<Field>> {
        let entry = self.entries.get(type_ref)?;
        match entry.kind {
            TypeKind::Composite => Some(entry.fields.clone()),
            _ => None,
        }
    }
}
