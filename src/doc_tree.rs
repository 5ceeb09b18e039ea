use crate::enumerator::EndpointRecord;
use crate::error::{Error, Result};
use crate::flattener::{check_name_conflict, flatten};
use crate::routing::HttpMethod;
use crate::type_resolver::{CompositeType, TypeResolver};
use crate::type_system::{Field, TypeRef};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// Pool-aware shape of a type as it appears in documentation.
///
/// Composite types never appear inline; they are referenced by name and
/// described once in the section's type pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocType {
    Scalar { name: String },
    Array { items: Box<DocType> },
    Dict { key: Box<DocType>, value: Box<DocType> },
    Enumeration { name: String, values: Vec<String> },
    Reference { name: String },
}

impl DocType {
    /// Names of all pooled types this shape refers to
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'s>(&'s self, names: &mut Vec<&'s str>) {
        match self {
            DocType::Reference { name } => names.push(name),
            DocType::Array { items } => items.collect_references(names),
            DocType::Dict { key, value } => {
                key.collect_references(names);
                value.collect_references(names);
            }
            DocType::Scalar { .. } | DocType::Enumeration { .. } => {}
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Scalar { name } => f.write_str(name),
            DocType::Array { items } => write!(f, "list({})", items),
            DocType::Dict { key, value } => write!(f, "dict({}: {})", key, value),
            DocType::Enumeration { name, .. } | DocType::Reference { name } => f.write_str(name),
        }
    }
}

/// A documented field or argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldNode {
    pub name: String,
    #[serde(rename = "type")]
    pub shape: DocType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl FieldNode {
    pub fn new(field: &Field, shape: DocType) -> Self {
        Self {
            name: field.name.clone(),
            shape,
            required: field.required,
            doc: field.doc.clone(),
        }
    }
}

/// A composite type described once in the section pool
#[derive(Debug, Clone, Serialize)]
pub struct TypeNode {
    pub name: String,
    pub type_ref: TypeRef,
    pub fields: Vec<FieldNode>,
    /// Descriptor the node was built from; used for conflict checks
    #[serde(skip)]
    pub composite: CompositeType,
}

impl TypeNode {
    pub fn new(composite: CompositeType, fields: Vec<FieldNode>) -> Self {
        Self {
            name: composite.qualified_name.clone(),
            type_ref: composite.type_ref.clone(),
            fields,
            composite,
        }
    }
}

/// One documented endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointNode {
    pub method: HttpMethod,
    /// Normalized path, no leading or trailing separator
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub arguments: Vec<FieldNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<DocType>,
    /// The record this node documents
    #[serde(skip)]
    pub record: EndpointRecord,
}

/// Documentation for one routing root: endpoints plus the shared type pool
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentationSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub endpoints: Vec<EndpointNode>,
    /// Composite types keyed by qualified name, in first-discovery order
    pub types: IndexMap<String, TypeNode>,
}

impl DocumentationSection {
    pub fn type_node(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    /// References with no pooled type node; empty for any built section
    pub fn dangling_references(&self) -> Vec<String> {
        let endpoint_shapes = self.endpoints.iter().flat_map(|endpoint| {
            endpoint
                .arguments
                .iter()
                .map(|arg| &arg.shape)
                .chain(endpoint.returns.iter())
        });
        let type_shapes = self
            .types
            .values()
            .flat_map(|node| node.fields.iter().map(|field| &field.shape));

        let mut dangling = Vec::new();
        for shape in endpoint_shapes.chain(type_shapes) {
            for name in shape.references() {
                if !self.types.contains_key(name) && !dangling.iter().any(|d| d == name) {
                    dangling.push(name.to_string());
                }
            }
        }
        dangling
    }
}

/// An endpoint left out of the documentation, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEndpoint {
    pub method: HttpMethod,
    pub path: String,
    pub error: Error,
}

impl fmt::Display for SkippedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}: {}", self.method, self.path, self.error)
    }
}

/// Result of a build: the section plus endpoints that could not be documented
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub section: DocumentationSection,
    pub skipped: Vec<SkippedEndpoint>,
}

/// Documentation tree builder
pub struct DocTreeBuilder<'a> {
    resolver: TypeResolver<'a>,
    title: Option<String>,
}

impl<'a> DocTreeBuilder<'a> {
    pub fn new(resolver: TypeResolver<'a>) -> Self {
        debug!("Initializing DocTreeBuilder");
        Self {
            resolver,
            title: None,
        }
    }

    /// Set the section title
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Build a documentation section for the given endpoints.
    ///
    /// Each endpoint is flattened on its own, then its composite types are
    /// merged into the section pool. An endpoint whose types cannot be
    /// resolved is skipped and reported; a type name conflict aborts the build.
    pub fn build(&mut self, endpoints: &[EndpointRecord]) -> Result<BuildOutcome> {
        info!("Building documentation for {} endpoints", endpoints.len());

        let mut section = DocumentationSection {
            title: self.title.clone(),
            ..DocumentationSection::default()
        };
        let mut skipped = Vec::new();

        for endpoint in endpoints {
            let path = endpoint.path_string();
            let roots: Vec<TypeRef> = endpoint
                .arguments
                .iter()
                .map(|arg| arg.type_ref.clone())
                .chain(endpoint.return_type.clone())
                .collect();

            let flattened = match flatten(&mut self.resolver, &roots) {
                Ok(flattened) => flattened,
                Err(error) if error.is_endpoint_local() => {
                    warn!("Skipping {} /{}: {}", endpoint.method, path, error);
                    skipped.push(SkippedEndpoint {
                        method: endpoint.method,
                        path,
                        error,
                    });
                    continue;
                }
                Err(error) => return Err(error),
            };

            for node in flattened.pool {
                match section.types.get(&node.name) {
                    Some(existing) => check_name_conflict(&existing.composite, &node.composite)?,
                    None => {
                        debug!("Pooling type {} (first used by {} /{})", node.name, endpoint.method, path);
                        section.types.insert(node.name.clone(), node);
                    }
                }
            }

            let mut shapes = flattened.shapes.into_iter();
            let arguments = endpoint
                .arguments
                .iter()
                .zip(shapes.by_ref())
                .map(|(arg, shape)| FieldNode::new(arg, shape))
                .collect();
            let returns = shapes.next();

            section.endpoints.push(EndpointNode {
                method: endpoint.method,
                path,
                summary: endpoint.summary.clone(),
                arguments,
                returns,
                record: endpoint.clone(),
            });
        }

        info!(
            "Documented {} endpoints with {} types ({} skipped)",
            section.endpoints.len(),
            section.types.len(),
            skipped.len()
        );
        Ok(BuildOutcome { section, skipped })
    }
}
