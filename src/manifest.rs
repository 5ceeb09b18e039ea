//! API manifest: the routing tree and its configuration.
//!
//! A manifest is YAML (or JSON, chosen by a `.json` extension) describing the
//! route tree to document. Each exposed method either spells out its arguments
//! and return type, or names a `handler` whose signature is read from source.

use crate::error::{Error, Result};
use crate::routing::{ControllerDescriptor, HttpMethod, RouteTree};
use crate::source_types::SourceTypeSystem;
use crate::type_resolver::ScalarTable;
use crate::type_system::{Field, TypeRef};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiManifest {
    /// Section title
    pub title: Option<String>,
    /// Path prepended to every endpoint
    pub prefix: String,
    /// Extra type names the source type system treats as primitive kinds
    pub primitives: Vec<String>,
    /// Extra kind to scalar name mappings
    pub scalars: BTreeMap<String, String>,
    pub routes: RouteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSpec {
    pub segment: String,
    pub methods: Vec<MethodSpec>,
    pub children: Vec<RouteSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub method: HttpMethod,
    /// Path of a handler function, e.g. `handlers::widgets::fetch`
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub member: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub doc: Option<String>,
}

fn default_required() -> bool {
    true
}

impl ApiManifest {
    /// Load a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest: {}", path.display());
        let invalid = |message: String| Error::Manifest {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content).map_err(|err| invalid(err.to_string()))
        } else {
            Self::from_yaml(&content).map_err(|err| invalid(err.to_string()))
        }
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Builtin scalar table extended with the manifest's entries
    pub fn scalar_table(&self) -> ScalarTable {
        let mut table = ScalarTable::default();
        for (kind, scalar) in &self.scalars {
            table.insert(kind.clone(), scalar.clone());
        }
        table
    }

    /// Primitive kinds for a source type system: every scalar kind plus the
    /// manifest's extra primitives
    pub fn primitive_kinds(&self) -> Vec<String> {
        let table = self.scalar_table();
        let mut kinds: Vec<String> = table.kinds().map(str::to_string).collect();
        kinds.extend(self.primitives.iter().cloned());
        kinds
    }

    /// Build the routing tree.
    ///
    /// Methods naming a `handler` need `source`; explicit `summary`,
    /// `arguments` and `returns` entries take precedence over what the handler
    /// declares. A non-empty root segment becomes the root's only child.
    pub fn route_tree(&self, source: Option<&SourceTypeSystem>) -> Result<RouteTree> {
        let tree = route_node(&self.routes, source)?;
        if self.routes.segment.trim_matches('/').is_empty() {
            Ok(tree)
        } else {
            Ok(RouteTree::new("").child(tree))
        }
    }
}

fn route_node(spec: &RouteSpec, source: Option<&SourceTypeSystem>) -> Result<RouteTree> {
    let mut node = RouteTree::new(spec.segment.clone());
    for method in &spec.methods {
        node = node.expose(method.method, controller(method, source)?);
    }
    for child in &spec.children {
        node = node.child(route_node(child, source)?);
    }
    Ok(node)
}

fn controller(spec: &MethodSpec, source: Option<&SourceTypeSystem>) -> Result<ControllerDescriptor> {
    let mut controller = match (&spec.handler, source) {
        (Some(handler), Some(source)) => source.controller_for(handler)?,
        (Some(handler), None) => {
            return Err(Error::UnknownHandler {
                handler: handler.clone(),
            })
        }
        (None, _) => ControllerDescriptor::new(),
    };

    if let Some(summary) = &spec.summary {
        controller.summary = Some(summary.clone());
    }
    if !spec.arguments.is_empty() {
        controller.arguments = spec
            .arguments
            .iter()
            .map(|arg| Field {
                name: arg.name.clone(),
                type_ref: TypeRef::new(arg.type_expr.as_str()),
                required: arg.required,
                doc: arg.doc.clone(),
            })
            .collect();
    }
    if let Some(returns) = &spec.returns {
        controller.return_type = Some(TypeRef::new(returns.as_str()));
    }
    controller.member = spec.member;
    Ok(controller)
}
