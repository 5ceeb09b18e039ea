use crate::error::Error;
use crate::routing::{HttpMethod, RouteNode};
use crate::type_system::{Field, TypeRef};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;

/// One documented endpoint: a method exposed at a normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRecord {
    /// Normalized path segments, never empty strings
    pub path: Vec<String>,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Arguments in the controller's declaration order
    pub arguments: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
}

impl EndpointRecord {
    /// Path joined with single separators and no leading or trailing one
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }
}

/// Options controlling enumeration
#[derive(Debug, Clone, Default)]
pub struct EnumerateOptions {
    /// Prefix placed in front of every documented path (e.g. `/v1`)
    pub prefix: String,
}

/// Endpoints found in a routing tree, plus duplicates that were left out
#[derive(Debug, Clone, Default)]
pub struct EnumeratedRoutes {
    pub endpoints: Vec<EndpointRecord>,
    /// One `Error::AmbiguousRoute` per declaration that normalized onto an
    /// already documented method and path
    pub ambiguous: Vec<Error>,
}

/// Split a raw segment on separators and drop empty pieces.
pub fn normalize_segments(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Walk a routing tree depth-first in declaration order.
///
/// A node documents its own methods before its children are visited; nodes
/// without methods only contribute path segments. When two declarations end
/// up at the same method and path, the first one is kept.
pub fn enumerate(root: &dyn RouteNode, options: &EnumerateOptions) -> EnumeratedRoutes {
    let mut walker = Walker {
        routes: EnumeratedRoutes::default(),
        seen: HashSet::new(),
    };
    let mut path: Vec<String> = normalize_segments(&options.prefix).collect();
    walker.walk(root, &mut path);

    debug!(
        "Enumerated {} endpoints ({} ambiguous declarations dropped)",
        walker.routes.endpoints.len(),
        walker.routes.ambiguous.len()
    );
    walker.routes
}

struct Walker {
    routes: EnumeratedRoutes,
    seen: HashSet<(HttpMethod, String)>,
}

impl Walker {
    fn walk(&mut self, node: &dyn RouteNode, path: &mut Vec<String>) {
        for (method, controller) in node.exposed() {
            let mut segments = path.clone();
            if controller.member {
                if let Some(first) = controller.arguments.first() {
                    segments.push(format!("({})", first.name));
                }
            }

            let record = EndpointRecord {
                path: segments,
                method,
                summary: controller.summary.clone(),
                arguments: controller.arguments.clone(),
                return_type: controller.return_type.clone(),
            };
            self.emit(record);
        }

        for (segment, child) in node.children() {
            let depth = path.len();
            path.extend(normalize_segments(segment));
            self.walk(child, path);
            path.truncate(depth);
        }
    }

    fn emit(&mut self, record: EndpointRecord) {
        let key = (record.method, record.path_string());
        if !self.seen.insert(key) {
            warn!(
                "Route {} /{} is declared more than once; keeping the first declaration",
                record.method,
                record.path_string()
            );
            self.routes.ambiguous.push(Error::AmbiguousRoute {
                method: record.method,
                path: record.path_string(),
            });
            return;
        }

        debug!("Found endpoint: {} /{}", record.method, record.path_string());
        self.routes.endpoints.push(record);
    }
}
