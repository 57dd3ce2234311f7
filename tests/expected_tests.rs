//! Runs every `tests/fixtures/*.json` symbol graph through one processing
//! round and compares the generated files and visibility report against
//! `<name>.expected.kt`.
//!
//! Run with: cargo test --test expected_tests
//! Regenerate with: cargo run --bin accept_expected

use autoshot::{MemoryCodeGenerator, ProcessorConfig, ScreenshotProcessor, SymbolGraph};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fs;
use std::path::{Path, PathBuf};

fn collect_fixtures() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("*.json");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(|entry| entry.ok())
        .collect();
    files.sort();
    files
}

/// Generated files in name order, each under a `// <name>` header, then the report
fn snapshot(path: &Path, report_dir: &Path) -> Result<String, String> {
    let graph = SymbolGraph::load(path).map_err(|e| e.to_string())?;
    let report_path = report_dir.join("preview_visibility_report.txt");
    let config = ProcessorConfig {
        report_path: report_path.clone(),
        ..ProcessorConfig::default()
    };

    let mut processor = ScreenshotProcessor::new(config);
    let mut codegen = MemoryCodeGenerator::new();
    processor.process(&graph, &mut codegen).map_err(|e| e.to_string())?;

    let mut snapshot = String::new();
    for name in codegen.names() {
        if !snapshot.is_empty() {
            snapshot.push('\n');
        }
        snapshot.push_str(&format!("// {}\n", name));
        snapshot.push_str(&codegen.contents(name).unwrap_or_default());
    }
    if let Ok(report) = fs::read_to_string(&report_path) {
        if !snapshot.is_empty() {
            snapshot.push('\n');
        }
        snapshot.push_str("// report\n");
        snapshot.push_str(&report);
    }
    Ok(snapshot)
}

fn check(path: &Path) -> Result<(), Failed> {
    let expected_path = path.with_extension("expected.kt");
    let expected = fs::read_to_string(&expected_path)
        .map_err(|_| format!("Missing expected file: {}", expected_path.display()))?;

    let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
    let actual = snapshot(path, dir.path())?;

    if actual.trim() != expected.trim() {
        return Err(format!(
            "Output mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
            path.display(),
            expected.trim(),
            actual.trim()
        )
        .into());
    }
    Ok(())
}

fn main() {
    let args = Arguments::from_args();

    let trials = collect_fixtures()
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("fixture")
                .to_string();
            Trial::test(name, move || check(&path))
        })
        .collect();

    libtest_mimic::run(&args, trials).exit();
}
