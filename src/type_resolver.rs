use crate::error::{Error, Result};
use crate::type_system::{Field, TypeKind, TypeRef, TypeSystem};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Type resolver - turns type references into normalized descriptors
pub struct TypeResolver<'a> {
    /// Host type system being described
    types: &'a dyn TypeSystem,
    /// Primitive kind -> scalar name
    scalars: ScalarTable,
    /// Cache of resolved descriptors; repeated lookups share one allocation
    cache: HashMap<TypeRef, Arc<TypeDescriptor>>,
}

/// Normalized description of one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A leaf value such as `int` or `text`
    Scalar { name: String },
    /// Ordered homogeneous collection
    Array { element: TypeRef },
    /// Mapping type
    Dict { key: TypeRef, value: TypeRef },
    /// Closed set of named values
    Enumeration {
        qualified_name: String,
        values: Vec<String>,
    },
    /// A named record type
    Composite(CompositeType),
}

/// Named record with fields in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeType {
    pub qualified_name: String,
    /// The reference this composite was resolved from
    pub type_ref: TypeRef,
    pub fields: Vec<Field>,
}

impl CompositeType {
    /// Whether two composites describe the same record shape.
    ///
    /// The originating reference is not part of the structure; two aliases of
    /// one record compare equal.
    pub fn same_structure(&self, other: &CompositeType) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| {
                a.name == b.name && a.type_ref == b.type_ref && a.required == b.required
            })
    }

    pub fn field_signatures(&self) -> Vec<String> {
        self.fields.iter().map(Field::signature).collect()
    }
}

/// Table mapping host primitive kinds to documented scalar names
#[derive(Debug, Clone)]
pub struct ScalarTable {
    names: HashMap<String, String>,
}

/// Primitive kinds every run understands, with their documented scalar names
const BUILTIN_SCALARS: &[(&str, &str)] = &[
    ("i8", "int"),
    ("i16", "int"),
    ("i32", "int"),
    ("i64", "int"),
    ("i128", "int"),
    ("isize", "int"),
    ("u8", "int"),
    ("u16", "int"),
    ("u32", "int"),
    ("u64", "int"),
    ("u128", "int"),
    ("usize", "int"),
    ("f32", "float"),
    ("f64", "float"),
    ("bool", "bool"),
    ("String", "text"),
    ("str", "text"),
    ("char", "text"),
    ("DateTime", "datetime"),
    ("NaiveDateTime", "datetime"),
    ("OffsetDateTime", "datetime"),
    ("SystemTime", "datetime"),
    ("NaiveDate", "date"),
    ("NaiveTime", "time"),
    ("Duration", "duration"),
    ("Uuid", "uuid"),
    ("Decimal", "decimal"),
    ("Url", "url"),
    ("Bytes", "binary"),
    ("Value", "json"),
];

impl Default for ScalarTable {
    fn default() -> Self {
        let names = BUILTIN_SCALARS
            .iter()
            .map(|(kind, scalar)| (kind.to_string(), scalar.to_string()))
            .collect();
        Self { names }
    }
}

impl ScalarTable {
    /// Table with no mappings at all
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Map a primitive kind to a scalar name, replacing any earlier mapping
    pub fn insert(&mut self, kind: impl Into<String>, scalar: impl Into<String>) {
        self.names.insert(kind.into(), scalar.into());
    }

    pub fn lookup(&self, kind: &str) -> Option<&str> {
        self.names.get(kind).map(String::as_str)
    }

    /// Primitive kinds this table knows about
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

impl<'a> TypeResolver<'a> {
    /// Create a new TypeResolver over a type system
    pub fn new(types: &'a dyn TypeSystem, scalars: ScalarTable) -> Self {
        debug!("Initializing TypeResolver");
        Self {
            types,
            scalars,
            cache: HashMap::new(),
        }
    }

    /// Resolve a type reference into its descriptor
    pub fn resolve(&mut self, type_ref: &TypeRef) -> Result<Arc<TypeDescriptor>> {
        if let Some(cached) = self.cache.get(type_ref) {
            return Ok(Arc::clone(cached));
        }

        debug!("Resolving type: {}", type_ref);
        let descriptor = Arc::new(self.describe(type_ref)?);
        self.cache.insert(type_ref.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Number of distinct references resolved so far
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn describe(&self, type_ref: &TypeRef) -> Result<TypeDescriptor> {
        let kind = self.types.kind_of(type_ref).ok_or_else(|| {
            let reason = self
                .types
                .unknown_reason(type_ref)
                .unwrap_or_else(|| "the type system does not know this type".to_string());
            unresolvable(type_ref, &reason)
        })?;

        match kind {
            TypeKind::Primitive(kind) => match self.scalars.lookup(&kind) {
                Some(name) => Ok(TypeDescriptor::Scalar {
                    name: name.to_string(),
                }),
                None => Err(Error::UnknownScalarKind {
                    kind,
                    type_ref: type_ref.clone(),
                }),
            },
            TypeKind::Array(element) => Ok(TypeDescriptor::Array { element }),
            TypeKind::Dict(key, value) => Ok(TypeDescriptor::Dict { key, value }),
            TypeKind::Enumeration(values) => Ok(TypeDescriptor::Enumeration {
                qualified_name: self.name_of(type_ref)?,
                values,
            }),
            TypeKind::Composite => {
                let qualified_name = self.name_of(type_ref)?;
                let fields = self
                    .types
                    .fields_of(type_ref)
                    .ok_or_else(|| unresolvable(type_ref, "composite type exposes no fields"))?;
                debug!("Resolved composite {} with {} fields", qualified_name, fields.len());
                Ok(TypeDescriptor::Composite(CompositeType {
                    qualified_name,
                    type_ref: type_ref.clone(),
                    fields,
                }))
            }
        }
    }

    fn name_of(&self, type_ref: &TypeRef) -> Result<String> {
        self.types
            .qualified_name_of(type_ref)
            .ok_or_else(|| unresolvable(type_ref, "named type has no qualified name"))
    }
}

fn unresolvable(type_ref: &TypeRef, reason: &str) -> Error {
    Error::UnresolvableType {
        type_ref: type_ref.clone(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_system::StaticTypeSystem;

    fn sample_types() -> StaticTypeSystem {
        let mut types = StaticTypeSystem::new();
        types
            .primitive("u32", "u32")
            .primitive("String", "String")
            .primitive("Money", "Money")
            .array("Vec<String>", "String")
            .dict("HashMap<String, u32>", "String", "u32")
            .enumeration("Status", "Status", &["active", "retired"])
            .composite(
                "Widget",
                "Widget",
                vec![
                    Field::new("id", "u32"),
                    Field::new("tags", "Vec<String>").optional(),
                ],
            );
        types
    }

    #[test]
    fn test_resolve_scalar_via_table() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let resolved = resolver.resolve(&TypeRef::new("u32")).unwrap();
        assert_eq!(
            *resolved,
            TypeDescriptor::Scalar {
                name: "int".to_string()
            }
        );

        let text = resolver.resolve(&TypeRef::new("String")).unwrap();
        assert_eq!(
            *text,
            TypeDescriptor::Scalar {
                name: "text".to_string()
            }
        );
    }

    #[test]
    fn test_unmapped_primitive_kind_is_reported() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let err = resolver.resolve(&TypeRef::new("Money")).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownScalarKind {
                kind: "Money".to_string(),
                type_ref: TypeRef::new("Money"),
            }
        );
    }

    #[test]
    fn test_extended_table_maps_custom_kind() {
        let types = sample_types();
        let mut scalars = ScalarTable::default();
        scalars.insert("Money", "decimal");
        let mut resolver = TypeResolver::new(&types, scalars);

        let resolved = resolver.resolve(&TypeRef::new("Money")).unwrap();
        assert_eq!(
            *resolved,
            TypeDescriptor::Scalar {
                name: "decimal".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_containers_keep_element_refs() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let array = resolver.resolve(&TypeRef::new("Vec<String>")).unwrap();
        assert_eq!(
            *array,
            TypeDescriptor::Array {
                element: TypeRef::new("String")
            }
        );

        let dict = resolver.resolve(&TypeRef::new("HashMap<String, u32>")).unwrap();
        assert_eq!(
            *dict,
            TypeDescriptor::Dict {
                key: TypeRef::new("String"),
                value: TypeRef::new("u32"),
            }
        );
    }

    #[test]
    fn test_resolve_composite_keeps_field_order() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let resolved = resolver.resolve(&TypeRef::new("Widget")).unwrap();
        match &*resolved {
            TypeDescriptor::Composite(composite) => {
                assert_eq!(composite.qualified_name, "Widget");
                let names: Vec<_> = composite.fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["id", "tags"]);
                assert!(!composite.fields[1].required);
            }
            other => panic!("Expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_enumeration() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let resolved = resolver.resolve(&TypeRef::new("Status")).unwrap();
        assert_eq!(
            *resolved,
            TypeDescriptor::Enumeration {
                qualified_name: "Status".to_string(),
                values: vec!["active".to_string(), "retired".to_string()],
            }
        );
    }

    #[test]
    fn test_type_caching_returns_identical_descriptor() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let first = resolver.resolve(&TypeRef::new("Widget")).unwrap();
        let second = resolver.resolve(&TypeRef::new("Widget")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cached_len(), 1);
    }

    #[test]
    fn test_resolve_nonexistent_type() {
        let types = sample_types();
        let mut resolver = TypeResolver::new(&types, ScalarTable::default());

        let err = resolver.resolve(&TypeRef::new("Ghost")).unwrap_err();
        assert!(matches!(err, Error::UnresolvableType { ref type_ref, .. } if type_ref.as_str() == "Ghost"));
        assert_eq!(resolver.cached_len(), 0);
    }

    #[test]
    fn test_same_structure_ignores_origin_ref() {
        let a = CompositeType {
            qualified_name: "Widget".to_string(),
            type_ref: TypeRef::new("a::Widget"),
            fields: vec![Field::new("id", "u32")],
        };
        let alias = CompositeType {
            type_ref: TypeRef::new("Widget"),
            ..a.clone()
        };
        let different = CompositeType {
            fields: vec![Field::new("id", "u32").optional()],
            ..a.clone()
        };

        assert!(a.same_structure(&alias));
        assert!(!a.same_structure(&different));
    }
}
