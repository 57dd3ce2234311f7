//! Binary to generate/update .expected.kt snapshots for the golden tests
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- meta    # Update only fixtures matching "meta"

use autoshot::{MemoryCodeGenerator, ProcessorConfig, ScreenshotProcessor, SymbolGraph};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let scratch = std::env::temp_dir().join(format!("autoshot-accept-{}", std::process::id()));

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "json"))
    {
        let path = entry.path();

        if let Some(ref f) = filter {
            if !path.to_string_lossy().contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path, &scratch);
        updated += 1;
    }

    let _ = fs::remove_dir_all(&scratch);
    println!("Updated {} files, skipped {}", updated, skipped);
}

fn process_file(path: &Path, scratch: &Path) {
    let graph = match SymbolGraph::load(path) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Failed to load {:?}: {}", path, e);
            return;
        }
    };

    // Fresh report per fixture so violations never leak between them
    let report_path = scratch.join("preview_visibility_report.txt");
    let _ = fs::remove_file(&report_path);
    let config = ProcessorConfig {
        report_path: report_path.clone(),
        ..ProcessorConfig::default()
    };

    let mut processor = ScreenshotProcessor::new(config);
    let mut codegen = MemoryCodeGenerator::new();
    if let Err(e) = processor.process(&graph, &mut codegen) {
        eprintln!("ERROR: {:?} failed to process: {}", path, e);
        return;
    }

    let mut sections = Vec::new();
    for name in codegen.names() {
        sections.push(format!("// {}\n{}", name, codegen.contents(name).unwrap_or_default()));
    }
    if let Ok(report) = fs::read_to_string(&report_path) {
        sections.push(format!("// report\n{}", report));
    }

    let expected = path.with_extension("expected.kt");
    if let Err(e) = fs::write(&expected, sections.join("\n")) {
        eprintln!("Failed to write {:?}: {}", expected, e);
    } else {
        println!("  wrote {}", expected.display());
    }
}
