//! Type graph flattening.
//!
//! Turns the (possibly cyclic, heavily shared) type graph reachable from a set
//! of root references into pool-aware shapes plus an ordered pool of the
//! composite types that must be documented. Every composite is expanded once;
//! later occurrences, including recursive ones, become named references.

use crate::doc_tree::{DocType, FieldNode, TypeNode};
use crate::error::{Error, Result};
use crate::type_resolver::{CompositeType, TypeDescriptor, TypeResolver};
use crate::type_system::TypeRef;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of flattening a set of roots
#[derive(Debug, Clone)]
pub struct Flattened {
    /// Descriptor of each root, aligned with the input
    pub roots: Vec<Arc<TypeDescriptor>>,
    /// Pool-aware shape of each root, aligned with the input
    pub shapes: Vec<DocType>,
    /// Composite types reached from the roots, in first-discovery order
    pub pool: Vec<TypeNode>,
}

/// Flatten the type graph reachable from `roots`.
pub fn flatten(resolver: &mut TypeResolver<'_>, roots: &[TypeRef]) -> Result<Flattened> {
    let mut walk = Walk {
        resolver,
        visiting: HashSet::new(),
        containers: HashSet::new(),
        discovered: IndexMap::new(),
    };

    let mut descriptors = Vec::with_capacity(roots.len());
    let mut shapes = Vec::with_capacity(roots.len());
    for root in roots {
        descriptors.push(walk.resolver.resolve(root)?);
        shapes.push(walk.visit(root)?);
    }

    debug!(
        "Flattened {} roots into {} composite types",
        roots.len(),
        walk.discovered.len()
    );

    Ok(Flattened {
        roots: descriptors,
        shapes,
        pool: walk.discovered.into_values().collect(),
    })
}

/// Check that a composite met under an already used name is the same type.
///
/// Aliases (different refs, identical structure) are accepted.
pub fn check_name_conflict(existing: &CompositeType, found: &CompositeType) -> Result<()> {
    if existing.type_ref == found.type_ref || existing.same_structure(found) {
        return Ok(());
    }
    Err(Error::TypeNameConflict {
        name: existing.qualified_name.clone(),
        first_ref: existing.type_ref.clone(),
        first_fields: existing.field_signatures(),
        second_ref: found.type_ref.clone(),
        second_fields: found.field_signatures(),
    })
}

struct Walk<'r, 'a> {
    resolver: &'r mut TypeResolver<'a>,
    /// Composite refs on the current traversal stack
    visiting: HashSet<TypeRef>,
    /// Container refs entered since the innermost composite
    containers: HashSet<TypeRef>,
    /// Qualified name -> pooled composite, in discovery order
    discovered: IndexMap<String, TypeNode>,
}

impl Walk<'_, '_> {
    fn visit(&mut self, type_ref: &TypeRef) -> Result<DocType> {
        let descriptor = self.resolver.resolve(type_ref)?;

        match &*descriptor {
            TypeDescriptor::Scalar { name } => Ok(DocType::Scalar { name: name.clone() }),
            TypeDescriptor::Enumeration {
                qualified_name,
                values,
            } => Ok(DocType::Enumeration {
                name: qualified_name.clone(),
                values: values.clone(),
            }),
            TypeDescriptor::Array { element } => {
                let items = self.within(type_ref, |walk| walk.visit(element))?;
                Ok(DocType::Array {
                    items: Box::new(items),
                })
            }
            TypeDescriptor::Dict { key, value } => {
                let (key, value) =
                    self.within(type_ref, |walk| Ok((walk.visit(key)?, walk.visit(value)?)))?;
                Ok(DocType::Dict {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TypeDescriptor::Composite(composite) => self.visit_composite(composite),
        }
    }

    fn visit_composite(&mut self, composite: &CompositeType) -> Result<DocType> {
        let name = &composite.qualified_name;
        let reference = DocType::Reference { name: name.clone() };

        if self.visiting.contains(&composite.type_ref) {
            debug!("Cycle through {}, linking instead of expanding", name);
            return Ok(reference);
        }
        if let Some(existing) = self.discovered.get(name) {
            check_name_conflict(&existing.composite, composite)?;
            return Ok(reference);
        }

        // Reserve the pool slot before descending so the pool keeps
        // first-discovery order.
        self.discovered
            .insert(name.clone(), TypeNode::new(composite.clone(), Vec::new()));

        self.visiting.insert(composite.type_ref.clone());
        let outer_containers = std::mem::take(&mut self.containers);
        let fields = composite
            .fields
            .iter()
            .map(|field| Ok(FieldNode::new(field, self.visit(&field.type_ref)?)))
            .collect::<Result<Vec<_>>>();
        self.containers = outer_containers;
        self.visiting.remove(&composite.type_ref);
        let fields = fields?;

        if let Some(node) = self.discovered.get_mut(name) {
            node.fields = fields;
        }
        Ok(reference)
    }

    /// Run `f` with the container `type_ref` on the traversal stack.
    ///
    /// Containers have no name to link to, so re-entering one before passing
    /// through a composite cannot be described finitely.
    fn within<T>(&mut self, type_ref: &TypeRef, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if !self.containers.insert(type_ref.clone()) {
            return Err(Error::UnresolvableType {
                type_ref: type_ref.clone(),
                reason: "container type contains itself".to_string(),
            });
        }
        let result = f(self);
        self.containers.remove(type_ref);
        result
    }
}
