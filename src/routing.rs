//! Routing tree interface and the in-memory tree the manifest builds.
//!
//! The enumerator only needs two things from a routing node: its child path
//! segments and the HTTP methods it exposes. [`RouteNode`] captures exactly
//! that, so any host representation of a controller tree can be documented.

use crate::type_system::{Field, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods a controller can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Lowercase name as used in directive markup
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Typed description of one exposed controller method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerDescriptor {
    /// Arguments in declaration order
    pub arguments: Vec<Field>,
    /// Declared return type; `None` when the method returns nothing
    pub return_type: Option<TypeRef>,
    /// Free-text summary taken from the controller
    pub summary: Option<String>,
    /// Addresses a single member of the collection; its path gains a
    /// `(first_argument)` segment
    pub member: bool,
}

impl ControllerDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn argument(mut self, field: Field) -> Self {
        self.arguments.push(field);
        self
    }

    pub fn returns(mut self, type_ref: impl Into<TypeRef>) -> Self {
        self.return_type = Some(type_ref.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn member(mut self) -> Self {
        self.member = true;
        self
    }
}

/// A node in a routing tree.
pub trait RouteNode {
    /// Child nodes with the path segment leading to each, in declaration order
    fn children(&self) -> Vec<(&str, &dyn RouteNode)>;

    /// Methods this node exposes, in declaration order
    fn exposed(&self) -> Vec<(HttpMethod, &ControllerDescriptor)>;
}

/// Owned routing tree.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    /// Segment leading to this node from its parent
    pub segment: String,
    pub methods: Vec<(HttpMethod, ControllerDescriptor)>,
    pub children: Vec<RouteTree>,
}

impl RouteTree {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            methods: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn expose(mut self, method: HttpMethod, controller: ControllerDescriptor) -> Self {
        self.methods.push((method, controller));
        self
    }

    pub fn child(mut self, child: RouteTree) -> Self {
        self.children.push(child);
        self
    }
}

impl RouteNode for RouteTree {
    fn children(&self) -> Vec<(&str, &dyn RouteNode)> {
        self.children
            .iter()
            .map(|child| (child.segment.as_str(), child as &dyn RouteNode))
            .collect()
    }

    fn exposed(&self) -> Vec<(HttpMethod, &ControllerDescriptor)> {
        self.methods
            .iter()
            .map(|(method, controller)| (*method, controller))
            .collect()
    }
}
