use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use schemascope_cli::Args;

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .graphql files from a directory
fn collect_graphql_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("graphql")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        select: Some("Query".to_string()),
        output: output.to_string_lossy().to_string(),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_graphql_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, &output_path);

        match schemascope_cli::run(&args) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("SVG should be written");
                assert!(svg.contains("<svg"), "{} produced no SVG", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_graphql_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, &output_path);

        if schemascope_cli::run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_library_nodes_are_drawn_dashed() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("connections.svg");

    let mut args = args_for(&demos_dir().join("connections.graphql"), &output_path);
    args.library = Some(
        demos_dir()
            .join("library/pagination.graphql")
            .to_string_lossy()
            .to_string(),
    );
    args.select = Some("IssueConnection".to_string());

    schemascope_cli::run(&args).expect("Library demo should render");

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("PageInfo"));
    assert!(svg.contains("stroke-dasharray"));
}

#[test]
fn e2e_unknown_node_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("unknown.svg");

    let mut args = args_for(&demos_dir().join("blog.graphql"), &output_path);
    args.select = Some("Nope".to_string());

    let err = schemascope_cli::run(&args).unwrap_err();
    assert_eq!(err.to_string(), "Unknown schema node `Nope`");
    assert!(!output_path.exists());
}

#[test]
fn e2e_set_description_writes_sdl() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("blog.svg");
    let sdl_path = temp_dir.path().join("blog.graphql");

    let mut args = args_for(&demos_dir().join("blog.graphql"), &output_path);
    args.select = Some("Post".to_string());
    args.set_description = Some("A published article".to_string());
    args.sdl_output = Some(sdl_path.to_string_lossy().to_string());

    schemascope_cli::run(&args).expect("Description change should succeed");

    let sdl = fs::read_to_string(&sdl_path).unwrap();
    assert!(sdl.contains("\"A published article\"\ntype Post"));
    assert!(output_path.exists());

    // The written schema parses again and keeps the change.
    let mut reread = args_for(&sdl_path, &temp_dir.path().join("reread.svg"));
    reread.select = Some("Post".to_string());
    schemascope_cli::run(&reread).expect("Printed schema should parse");
}
