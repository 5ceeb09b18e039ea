//! Serialization of documentation sections to YAML or JSON, and file output.

use crate::doc_tree::DocumentationSection;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a documentation section to YAML.
///
/// Endpoints keep their enumeration order and pooled types their
/// first-discovery order, so the output is stable across runs.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(section: &DocumentationSection) -> Result<String> {
    debug!("Serializing documentation section to YAML");
    serde_yaml::to_string(section).context("Failed to serialize documentation section to YAML")
}

/// Serializes a documentation section to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(section: &DocumentationSection) -> Result<String> {
    debug!("Serializing documentation section to JSON");
    serde_json::to_string_pretty(section)
        .context("Failed to serialize documentation section to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
