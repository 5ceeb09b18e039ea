//! restdoc-from-types - REST API reference documentation from typed routes.
//!
//! Given a routing tree whose controllers declare typed arguments and return
//! types, this library produces a documentation section listing every
//! endpoint with its method, path, summary and argument types, together with a
//! pool describing each composite type exactly once. Recursive and mutually
//! recursive types are handled by referring to pooled types by name.
//!
//! # Architecture
//!
//! 1. [`type_system`] - the host type system interface and an in-memory implementation
//! 2. [`type_resolver`] - resolves type references into cached descriptors
//! 3. [`flattener`] - walks a type graph, pooling composites and inlining containers
//! 4. [`routing`] - routing tree interface and HTTP methods
//! 5. [`enumerator`] - walks a routing tree into normalized endpoint records
//! 6. [`doc_tree`] - builds the documentation section and its shared type pool
//! 7. [`renderer`] / [`serializer`] - reStructuredText, YAML and JSON output
//!
//! Rust sources can back the type system: [`scanner`] finds files, [`parser`]
//! parses them, [`source_index`] indexes definitions and [`source_types`]
//! answers type and handler queries. [`manifest`] describes the routing tree.
//!
//! # Example Usage
//!
//! ```
//! use restdoc_from_types::{
//!     doc_tree::DocTreeBuilder,
//!     enumerator::{enumerate, EnumerateOptions},
//!     renderer::{Renderer, RstRenderer},
//!     routing::{ControllerDescriptor, HttpMethod, RouteTree},
//!     type_resolver::{ScalarTable, TypeResolver},
//!     type_system::{Field, StaticTypeSystem},
//! };
//!
//! let mut types = StaticTypeSystem::new();
//! types
//!     .primitive("u32", "u32")
//!     .composite("Widget", "Widget", vec![Field::new("id", "u32")]);
//!
//! let tree = RouteTree::new("").child(
//!     RouteTree::new("widgets").expose(
//!         HttpMethod::Get,
//!         ControllerDescriptor::new().summary("Fetch a widget.").returns("Widget"),
//!     ),
//! );
//! let routes = enumerate(&tree, &EnumerateOptions::default());
//!
//! let resolver = TypeResolver::new(&types, ScalarTable::default());
//! let outcome = DocTreeBuilder::new(resolver).build(&routes.endpoints).unwrap();
//! assert_eq!(outcome.section.endpoints[0].path, "widgets");
//! assert!(outcome.section.type_node("Widget").is_some());
//!
//! let rst = RstRenderer.render(&outcome.section).unwrap();
//! assert!(rst.contains(".. http:get:: /widgets"));
//! ```

pub mod cli;
pub mod doc_tree;
pub mod enumerator;
pub mod error;
pub mod flattener;
pub mod manifest;
pub mod parser;
pub mod renderer;
pub mod routing;
pub mod scanner;
pub mod serializer;
pub mod source_index;
pub mod source_types;
pub mod type_resolver;
pub mod type_system;
