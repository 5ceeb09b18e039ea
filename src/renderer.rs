//! Output renderers for a documentation section.
//!
//! [`RstRenderer`] produces reStructuredText using the `sphinxcontrib-httpdomain`
//! directive vocabulary; the structured renderers hand the section to the
//! [`serializer`](crate::serializer).

use crate::doc_tree::{DocType, DocumentationSection, EndpointNode, FieldNode, TypeNode};
use crate::serializer::{serialize_json, serialize_yaml};
use anyhow::Result;
use log::debug;

/// Turns a documentation section into text
pub trait Renderer {
    fn render(&self, section: &DocumentationSection) -> Result<String>;
}

/// reStructuredText with `http:<method>` and `rest:type` directives
#[derive(Debug, Clone, Copy, Default)]
pub struct RstRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

const INDENT: &str = "   ";

impl Renderer for RstRenderer {
    fn render(&self, section: &DocumentationSection) -> Result<String> {
        debug!("Rendering reStructuredText");
        let mut lines: Vec<String> = Vec::new();

        if let Some(title) = &section.title {
            lines.push(title.clone());
            lines.push("=".repeat(title.chars().count()));
            lines.push(String::new());
        }
        for endpoint in &section.endpoints {
            endpoint_lines(endpoint, &mut lines);
        }
        for node in section.types.values() {
            type_lines(node, &mut lines);
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

impl Renderer for YamlRenderer {
    fn render(&self, section: &DocumentationSection) -> Result<String> {
        serialize_yaml(section)
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, section: &DocumentationSection) -> Result<String> {
        serialize_json(section)
    }
}

/// Type name as it appears in markup; pooled types become cross references
pub fn rst_type(shape: &DocType) -> String {
    match shape {
        DocType::Scalar { name } => name.clone(),
        DocType::Array { items } => format!("list({})", rst_type(items)),
        DocType::Dict { key, value } => format!("dict({}: {})", rst_type(key), rst_type(value)),
        DocType::Enumeration { values, .. } => format!("enum({})", values.join(", ")),
        DocType::Reference { name } => format!(":class:`{}`", name),
    }
}

fn endpoint_lines(endpoint: &EndpointNode, lines: &mut Vec<String>) {
    lines.push(format!(".. http:{}:: /{}", endpoint.method.as_str(), endpoint.path));
    lines.push(String::new());

    let mut body: Vec<String> = Vec::new();
    if let Some(summary) = &endpoint.summary {
        body.extend(summary.lines().map(str::to_string));
        body.push(String::new());
    }
    for arg in &endpoint.arguments {
        match &arg.doc {
            Some(doc) => body.push(format!(":param {}: {}", arg.name, doc)),
            None => body.push(format!(":param {}:", arg.name)),
        }
        body.push(format!(":type {}: {}", arg.name, rst_type(&arg.shape)));
    }
    if let Some(returns) = &endpoint.returns {
        if !endpoint.arguments.is_empty() {
            body.push(String::new());
        }
        body.push(format!(":return type: {}", rst_type(returns)));
    }
    while body.last().is_some_and(String::is_empty) {
        body.pop();
    }

    lines.extend(body.into_iter().map(indent));
    lines.push(String::new());
}

fn type_lines(node: &TypeNode, lines: &mut Vec<String>) {
    lines.push(format!(".. rest:type:: {}", node.name));
    lines.push(String::new());
    if node.fields.is_empty() {
        lines.push(indent("No fields.".to_string()));
        lines.push(String::new());
        return;
    }

    lines.push(indent(".. list-table::".to_string()));
    lines.push(indent("   :header-rows: 1".to_string()));
    lines.push(String::new());
    row(&["Field", "Type", "Required", "Description"], lines);
    for field in &node.fields {
        field_row(field, lines);
    }
    lines.push(String::new());
}

fn field_row(field: &FieldNode, lines: &mut Vec<String>) {
    let shape = rst_type(&field.shape);
    let required = if field.required { "yes" } else { "no" };
    let doc = field
        .doc
        .as_deref()
        .map(|doc| doc.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    row(&[field.name.as_str(), shape.as_str(), required, doc.as_str()], lines);
}

fn row(cells: &[&str], lines: &mut Vec<String>) {
    for (i, cell) in cells.iter().enumerate() {
        let marker = if i == 0 { "* -" } else { "  -" };
        let line = format!("   {} {}", marker, cell);
        lines.push(indent(line.trim_end().to_string()));
    }
}

fn indent(line: String) -> String {
    if line.is_empty() {
        line
    } else {
        format!("{}{}", INDENT, line)
    }
}
