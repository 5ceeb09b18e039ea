use clap::Parser;
use pretty_assertions::assert_eq;
use restdoc_from_types::{
    cli::{generate, CliArgs},
    doc_tree::DocTreeBuilder,
    enumerator::{enumerate, EnumerateOptions},
    error::Error,
    manifest::ApiManifest,
    parser::AstParser,
    scanner::FileScanner,
    source_index::SourceIndex,
    source_types::SourceTypeSystem,
    type_resolver::TypeResolver,
};
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn widget_project() -> TempDir {
    create_test_project(vec![
        ("src/models.rs", include_str!("fixtures/widget_api/models.rs")),
        ("src/handlers.rs", include_str!("fixtures/widget_api/handlers.rs")),
        ("api.yaml", include_str!("fixtures/widget_api/api.yaml")),
    ])
}

fn args(project: &TempDir, extra: &[&str]) -> CliArgs {
    let manifest = project.path().join("api.yaml");
    let source = project.path().join("src");
    let mut argv = vec![
        "restdoc-from-types".to_string(),
        manifest.to_string_lossy().into_owned(),
        "--source".to_string(),
        source.to_string_lossy().into_owned(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).expect("Failed to parse arguments")
}

#[test]
fn test_rst_end_to_end_generation() {
    let project = widget_project();

    let rst = generate(&args(&project, &[])).expect("Generation failed");

    assert!(rst.starts_with("Widget API\n==========\n"));
    assert!(rst.contains(".. http:get:: /v1\n"));
    assert!(rst.contains(".. http:get:: /v1/widgets\n"));
    assert!(rst.contains(".. http:post:: /v1/widgets\n"));
    assert!(rst.contains(".. http:get:: /v1/widgets/(widget_id)\n"));
    assert!(rst.contains(".. http:delete:: /v1/widgets/(widget_id)\n"));

    assert!(rst.contains("   List widgets, newest first."));
    assert!(rst.contains("   :type filter: :class:`Filter`"));
    assert!(rst.contains("   :return type: :class:`Page<Widget>`"));
    assert!(rst.contains("   :type widget_id: int"));

    assert!(rst.contains(".. rest:type:: Page<Widget>"));
    assert!(rst.contains("- list(:class:`Widget`)"));
    assert!(rst.contains("- enum(draft, active, retired)"));
    assert!(rst.contains("- dict(text: :class:`Label`)"));
    assert!(rst.contains("- displayName"));
    assert!(!rst.contains("cacheKey"));

    // The export endpoint returns an undefined type and is left out
    assert!(!rst.contains("export"));

    // Each composite is described exactly once
    assert_eq!(rst.matches(".. rest:type:: Widget\n").count(), 1);
}

#[test]
fn test_json_end_to_end_generation() {
    let project = widget_project();

    let json = generate(&args(&project, &["-f", "json"])).expect("Generation failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

    let endpoints: Vec<String> = parsed["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| format!("{} {}", e["method"].as_str().unwrap(), e["path"].as_str().unwrap()))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            "get v1",
            "get v1/widgets",
            "post v1/widgets",
            "get v1/widgets/(widget_id)",
            "delete v1/widgets/(widget_id)",
        ]
    );

    // Pooled types appear in first-discovery order
    let pool = ["Filter", "Page<Widget>", "Widget", "Owner", "Label", "NewWidget"];
    let positions: Vec<usize> = pool
        .iter()
        .map(|name| json.find(&format!("\"{}\": {{", name)).expect(name))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", positions);
    assert_eq!(parsed["types"].as_object().unwrap().len(), pool.len());

    let widget_fields = &parsed["types"]["Widget"]["fields"];
    assert_eq!(widget_fields[0]["name"], "id");
    assert_eq!(widget_fields[0]["doc"], "Unique identifier.");
    assert_eq!(widget_fields[3]["type"]["kind"], "array");
    assert_eq!(widget_fields[3]["type"]["items"]["name"], "Widget");
    assert_eq!(widget_fields[4]["required"], false);

    let new_widget = &parsed["types"]["NewWidget"]["fields"];
    assert_eq!(new_widget[0]["name"], "display_name");
    assert_eq!(new_widget[1]["required"], false);
}

#[test]
fn test_yaml_output_with_prefix_override() {
    let project = widget_project();

    let yaml = generate(&args(&project, &["-f", "yaml", "-p", "/api/"])).expect("Generation failed");

    assert!(yaml.contains("path: api/widgets"));
    assert!(!yaml.contains("v1"));
}

#[test]
fn test_skipped_endpoint_is_reported() {
    let project = widget_project();

    let scanner = FileScanner::new(project.path().join("src"));
    let scan_result = scanner.scan().expect("Failed to scan directory");
    let parsed = AstParser::parse_files(scanner.root(), &scan_result.rust_files);
    assert_eq!(parsed.len(), 2);

    let manifest = ApiManifest::load(&project.path().join("api.yaml")).expect("Bad manifest");
    let types = SourceTypeSystem::new(SourceIndex::new(&parsed), manifest.primitive_kinds());
    let tree = manifest.route_tree(Some(&types)).expect("Bad routes");
    let routes = enumerate(
        &tree,
        &EnumerateOptions {
            prefix: manifest.prefix.clone(),
        },
    );
    assert_eq!(routes.endpoints.len(), 6);
    assert!(routes.ambiguous.is_empty());

    let outcome = DocTreeBuilder::new(TypeResolver::new(&types, manifest.scalar_table()))
        .build(&routes.endpoints)
        .expect("Build failed");

    assert_eq!(outcome.section.endpoints.len(), 5);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].path, "v1/widgets/export");
    assert!(matches!(
        &outcome.skipped[0].error,
        Error::UnresolvableType { type_ref, .. } if type_ref.as_str() == "Report"
    ));
    assert!(outcome.section.dangling_references().is_empty());
}

#[test]
fn test_recursive_tree_type() {
    let project = create_test_project(vec![
        (
            "src/lib.rs",
            "pub struct Node { pub label: String, pub children: Vec<Node> }",
        ),
        (
            "api.yaml",
            "routes:\n  segment: nodes\n  methods:\n    - { method: get, returns: Vec<Node> }\n",
        ),
    ]);

    let json = generate(&args(&project, &["-f", "json"])).expect("Generation failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["endpoints"][0]["returns"]["items"]["name"], "Node");
    assert_eq!(parsed["types"].as_object().unwrap().len(), 1);
    assert_eq!(parsed["types"]["Node"]["fields"][1]["type"]["items"]["kind"], "reference");
}

#[test]
fn test_type_name_conflict_aborts() {
    let project = create_test_project(vec![
        ("src/shop.rs", "pub struct Widget { pub id: u32 }"),
        ("src/legacy.rs", "pub struct Widget { pub serial: String }"),
        (
            "api.yaml",
            r#"
routes:
  segment: widgets
  methods:
    - { method: get, returns: "shop::Widget" }
    - { method: post, returns: "legacy::Widget" }
"#,
        ),
    ]);

    let err = generate(&args(&project, &[])).expect_err("Conflict should abort");
    let conflict = err.downcast_ref::<Error>().expect("Expected a core error");

    match conflict {
        Error::TypeNameConflict {
            name,
            first_ref,
            second_ref,
            ..
        } => {
            assert_eq!(name, "Widget");
            assert_eq!(first_ref.as_str(), "shop::Widget");
            assert_eq!(second_ref.as_str(), "legacy::Widget");
        }
        other => panic!("Unexpected error: {}", other),
    }
}

#[test]
fn test_unknown_handler_fails() {
    let project = create_test_project(vec![
        ("src/lib.rs", "pub fn ping() {}"),
        (
            "api.yaml",
            "routes:\n  segment: ping\n  methods:\n    - { method: get, handler: pong }\n",
        ),
    ]);

    let err = generate(&args(&project, &[])).expect_err("Unknown handler should fail");
    assert!(format!("{:#}", err).contains("pong"));
}

#[test]
fn test_generic_instance_spelled_two_ways_is_one_type() {
    let project = create_test_project(vec![
        (
            "src/models.rs",
            "pub struct Widget { pub id: u64 }\npub struct Page<T> { pub items: Vec<T>, pub total: u64 }",
        ),
        (
            "src/handlers.rs",
            r#"
use axum::Json;
use crate::models::{Page, Widget};

pub async fn list() -> Json<Page<Widget>> { todo!() }
pub async fn search() -> Json<Page<crate::models::Widget>> { todo!() }
"#,
        ),
        (
            "api.yaml",
            r#"
routes:
  segment: widgets
  methods:
    - { method: get, handler: handlers::list }
  children:
    - segment: search
      methods:
        - { method: get, handler: handlers::search }
"#,
        ),
    ]);

    let json = generate(&args(&project, &["-f", "json"])).expect("Generation failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["endpoints"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["endpoints"][0]["returns"]["name"], "Page<Widget>");
    assert_eq!(parsed["endpoints"][1]["returns"]["name"], "Page<Widget>");
    let types = parsed["types"].as_object().unwrap();
    assert_eq!(types.len(), 2);
    assert!(types.contains_key("Page<Widget>"));
    assert!(types.contains_key("Widget"));
}

#[test]
fn test_imported_type_wins_over_same_named_type() {
    let project = create_test_project(vec![
        ("src/legacy.rs", "pub struct Widget { pub serial: String }"),
        ("src/models.rs", "pub struct Widget { pub id: u64 }"),
        (
            "src/handlers.rs",
            "use crate::models::Widget;\npub async fn fetch() -> Json<Widget> { todo!() }",
        ),
        (
            "api.yaml",
            "routes:\n  segment: widget\n  methods:\n    - { method: get, handler: handlers::fetch }\n",
        ),
    ]);

    let json = generate(&args(&project, &["-f", "json"])).expect("Generation failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let fields = parsed["types"]["Widget"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["name"], "id");
}

#[test]
fn test_ambiguous_bare_name_skips_endpoint() {
    let project = create_test_project(vec![
        ("src/legacy.rs", "pub struct Widget { pub serial: String }"),
        ("src/models.rs", "pub struct Widget { pub id: u64 }"),
        (
            "api.yaml",
            r#"
routes:
  segment: widgets
  methods:
    - { method: get, returns: Widget }
    - { method: post, returns: "models::Widget" }
"#,
        ),
    ]);

    let json = generate(&args(&project, &["-f", "json"])).expect("Generation failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let endpoints = parsed["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0]["method"], "post");
    assert_eq!(parsed["types"]["Widget"]["fields"][0]["name"], "id");
}
