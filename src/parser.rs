use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Parser for the Rust sources that declare an API's types.
///
/// Each file is parsed with `syn` and tagged with the module path implied by
/// its location, so that `models::Widget` can be told apart from
/// `legacy::Widget`.
///
/// # Example
///
/// ```no_run
/// use restdoc_from_types::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("."), Path::new("src/models.rs")).unwrap();
/// assert_eq!(parsed.module_path, vec!["models".to_string()]);
/// ```
pub struct AstParser;

/// A parsed Rust file and the module it defines.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Module path of the file relative to the crate root (`[]` for the root)
    pub module_path: Vec<String>,
    /// The parsed syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parse one file located under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn parse_file(root: &Path, path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module_path: Self::module_path_for(root, path),
            syntax_tree,
        })
    }

    /// Parse in-memory source as if it were the module `module_path`.
    pub fn parse_source(module_path: &[&str], source: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(source).context("Failed to parse Rust source")?;
        Ok(ParsedFile {
            path: PathBuf::from("<memory>"),
            module_path: module_path.iter().map(|s| s.to_string()).collect(),
            syntax_tree,
        })
    }

    /// Parse many files, keeping going past failures.
    ///
    /// Files that fail are logged and dropped; partial sources still document
    /// whatever they declare.
    pub fn parse_files(root: &Path, paths: &[PathBuf]) -> Vec<ParsedFile> {
        debug!("Parsing {} files", paths.len());

        let parsed: Vec<ParsedFile> = paths
            .iter()
            .filter_map(|path| match Self::parse_file(root, path) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    None
                }
            })
            .collect();

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            parsed.len(),
            paths.len() - parsed.len()
        );
        parsed
    }

    /// Module path implied by a file's location under `root`.
    ///
    /// A leading `src` directory is dropped; `lib.rs`, `main.rs` and `mod.rs`
    /// name their parent directory's module.
    pub fn module_path_for(root: &Path, path: &Path) -> Vec<String> {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if let Some(file) = segments.pop() {
            let stem = Path::new(&file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !matches!(stem.as_str(), "lib" | "main" | "mod") {
                segments.push(stem);
            }
        }
        if segments.first().is_some_and(|first| first == "src") {
            segments.remove(0);
        }
        segments
    }
}
