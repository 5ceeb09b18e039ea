use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds the Rust sources that declare an API's types and handlers.
///
/// Walks a directory tree collecting `.rs` files, skipping `target` and hidden
/// directories. Files are returned in sorted order so that type lookups by
/// bare name are stable from run to run.
///
/// # Example
///
/// ```no_run
/// use restdoc_from_types::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-api"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Files discovered by a scan
pub struct ScanResult {
    /// Discovered `.rs` files, sorted
    pub rust_files: Vec<PathBuf>,
    /// Entries that could not be read; the scan continues past them
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Collect all `.rs` files under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself is missing or not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        let metadata = std::fs::metadata(&self.root_path)
            .with_context(|| format!("Cannot access source directory: {}", self.root_path.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Source path is not a directory: {}", self.root_path.display());
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry.file_name()));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().is_some_and(|ext| ext == "rs")
                    {
                        debug!("Found Rust file: {}", path.display());
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(err) => {
                    let message = format!("Skipping unreadable entry: {}", err);
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }

        debug!("Scan complete: {} Rust files", rust_files.len());
        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

fn is_ignored(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name == "target" || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_collects_sorted_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "src/models/widget.rs");
        touch(temp_dir.path(), "src/lib.rs");
        touch(temp_dir.path(), "src/handlers.rs");
        touch(temp_dir.path(), "README.md");

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();
        let relative: Vec<_> = result
            .rust_files
            .iter()
            .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(relative, vec!["src/handlers.rs", "src/lib.rs", "src/models/widget.rs"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "src/main.rs");
        touch(temp_dir.path(), "target/debug/build.rs");
        touch(temp_dir.path(), ".git/hooks/hook.rs");

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert_eq!(result.rust_files.len(), 1);
        assert!(result.rust_files[0].ends_with("src/main.rs"));
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path().join("missing"));

        assert!(scanner.scan().is_err());
    }
}
