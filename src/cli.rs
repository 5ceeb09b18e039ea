use crate::doc_tree::DocTreeBuilder;
use crate::enumerator::{enumerate, EnumerateOptions};
use crate::manifest::ApiManifest;
use crate::parser::AstParser;
use crate::renderer::{JsonRenderer, Renderer, RstRenderer, YamlRenderer};
use crate::scanner::FileScanner;
use crate::serializer::write_to_file;
use crate::source_index::SourceIndex;
use crate::source_types::SourceTypeSystem;
use crate::type_resolver::TypeResolver;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Generate REST API reference documentation from a route manifest and the
/// Rust types it mentions
#[derive(Parser, Debug)]
#[command(name = "restdoc-from-types")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the API manifest (YAML, or JSON with a .json extension)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Directory holding the Rust sources that define the API types
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "rst")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Path prefix for every endpoint; overrides the manifest's prefix
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// reStructuredText with HTTP domain directives
    Rst,
    /// YAML documentation tree
    Yaml,
    /// JSON documentation tree
    Json,
}

impl OutputFormat {
    fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputFormat::Rst => Box::new(RstRenderer),
            OutputFormat::Yaml => Box::new(YamlRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Validate and log already-parsed arguments
pub fn validate_args(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.is_file() {
        anyhow::bail!("Manifest does not exist: {}", args.manifest_path.display());
    }
    if let Some(source_dir) = &args.source_dir {
        if !source_dir.is_dir() {
            anyhow::bail!("Source path is not a directory: {}", source_dir.display());
        }
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the generation workflow and return the rendered documentation
pub fn generate(args: &CliArgs) -> Result<String> {
    let manifest = ApiManifest::load(&args.manifest_path)?;

    // Step 1: index the type sources, if any
    let mut unreadable = 0;
    let parsed_files = match &args.source_dir {
        Some(source_dir) => {
            info!("Scanning source directory...");
            let scanner = FileScanner::new(source_dir.clone());
            let scan_result = scanner.scan()?;
            info!("Found {} Rust files", scan_result.rust_files.len());
            unreadable = scan_result.warnings.len();
            AstParser::parse_files(scanner.root(), &scan_result.rust_files)
        }
        None => Vec::new(),
    };
    let index = SourceIndex::new(&parsed_files);
    if index.is_empty() && args.source_dir.is_some() {
        warn!("No type or handler definitions found in the source directory");
    }
    info!("Indexed {} definitions", index.len());
    let types = SourceTypeSystem::new(index, manifest.primitive_kinds());

    // Step 2: routing tree and endpoints
    let source = args.source_dir.as_ref().map(|_| &types);
    let tree = manifest
        .route_tree(source)
        .with_context(|| format!("Invalid routes in {}", args.manifest_path.display()))?;
    let options = EnumerateOptions {
        prefix: args.prefix.clone().unwrap_or_else(|| manifest.prefix.clone()),
    };
    let routes = enumerate(&tree, &options);
    info!("Enumerated {} endpoints", routes.endpoints.len());
    for ambiguous in &routes.ambiguous {
        warn!("{}", ambiguous);
    }

    // Step 3: documentation tree
    let resolver = TypeResolver::new(&types, manifest.scalar_table());
    let outcome = DocTreeBuilder::new(resolver)
        .with_title(manifest.title.clone())
        .build(&routes.endpoints)?;
    for skipped in &outcome.skipped {
        warn!("Skipped {}", skipped);
    }

    // Step 4: render
    info!("Rendering {:?} output...", args.output_format);
    let content = args.output_format.renderer().render(&outcome.section)?;

    info!("Summary:");
    info!("  - Endpoints documented: {}", outcome.section.endpoints.len());
    info!("  - Endpoints skipped: {}", outcome.skipped.len());
    info!("  - Types described: {}", outcome.section.types.len());
    if unreadable > 0 {
        info!("  - Unreadable source entries: {}", unreadable);
    }
    Ok(content)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting documentation generation...");
    let content = generate(&args)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        print!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["restdoc-from-types", "api.yaml"]).unwrap();

        assert_eq!(args.manifest_path, PathBuf::from("api.yaml"));
        assert_eq!(args.output_format, OutputFormat::Rst);
        assert!(args.source_dir.is_none());
        assert!(args.prefix.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_cli_all_options() {
        let args = CliArgs::try_parse_from([
            "restdoc-from-types",
            "api.json",
            "-s",
            "src",
            "-f",
            "json",
            "-o",
            "out/api.json",
            "--prefix",
            "/v2",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.source_dir, Some(PathBuf::from("src")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.output_path, Some(PathBuf::from("out/api.json")));
        assert_eq!(args.prefix.as_deref(), Some("/v2"));
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(CliArgs::try_parse_from(["restdoc-from-types", "api.yaml", "-f", "html"]).is_err());
    }

    #[test]
    fn test_validate_missing_manifest() {
        let args = CliArgs::try_parse_from(["restdoc-from-types", "/nonexistent/api.yaml"]).unwrap();
        assert!(validate_args(args).is_err());
    }
}
