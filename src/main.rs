use autoshot::{
    DirectoryCodeGenerator, FixOutcome, ProcessorConfig, RoundSummary, ScreenshotProcessor,
    SymbolGraph, fix_visibility,
};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "autoshot")]
#[command(about = "Autoshot - screenshot tests generated from UI previews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate screenshot tests from a symbol graph
    Generate {
        /// Symbol graph (.json) or a directory of them, one round per graph
        graph: PathBuf,

        /// Output directory for generated test sources
        #[arg(long, default_value = "build/generated/autoshot")]
        out: PathBuf,

        /// JSON config file
        #[arg(long, default_value = "autoshot.json")]
        config: PathBuf,

        /// Visibility report path (overrides config)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Processor option, key=value
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },

    /// Make private previews from the visibility report internal
    FixVisibility {
        /// Visibility report path
        #[arg(long, default_value = autoshot::config::DEFAULT_REPORT_PATH)]
        report: PathBuf,
    },
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AUTOSHOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { graph, out, config, report, options } => {
            generate(&graph, &out, &config, report, &options)
        }
        Commands::FixVisibility { report } => fix(&report),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn generate(
    graph: &Path,
    out: &Path,
    config_path: &Path,
    report: Option<PathBuf>,
    options: &[(String, String)],
) -> Result<(), String> {
    let mut config = ProcessorConfig::load(config_path)
        .map_err(|e| format!("{}: {}", config_path.display(), e))?
        .with_options(options.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if let Some(report) = report {
        config.report_path = report;
    }

    let graphs = collect_graphs(graph)?;
    if graphs.is_empty() {
        return Err(format!("No symbol graphs found in {}", graph.display()));
    }

    let start = Instant::now();
    let mut processor = ScreenshotProcessor::new(config);
    let mut codegen = DirectoryCodeGenerator::new(out);
    let mut total = RoundSummary::default();

    for path in &graphs {
        let symbols = SymbolGraph::load(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let already = codegen.generated_files().len();
        let round = processor
            .process(&symbols, &mut codegen)
            .map_err(|e| e.to_string())?;

        for file in &codegen.generated_files()[already..] {
            print_generated(&file.path.display().to_string());
        }
        for function in &round.deferred {
            eprintln!("  deferred {} until its file resolves", function.qualified_name());
        }

        total.files_generated += round.summary.files_generated;
        total.functions_generated += round.summary.functions_generated;
        total.violations += round.summary.violations;
    }

    if total.violations > 0 {
        eprintln!(
            "\n{} private preview(s) skipped, listed in {}",
            total.violations,
            processor.report().path().display()
        );
    }
    print_summary(total.files_generated, total.functions_generated, start.elapsed());
    Ok(())
}

fn collect_graphs(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(format!("{} does not exist", path.display()));
    }

    let mut graphs: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .map(|e| e.into_path())
        .collect();
    graphs.sort();
    Ok(graphs)
}

fn fix(report: &Path) -> Result<(), String> {
    match fix_visibility(report).map_err(|e| e.to_string())? {
        FixOutcome::NoReport => println!("✅ No private previews detected."),
        FixOutcome::Fixed { count, files } => {
            for file in &files {
                let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                println!("Fixed visibility in: {}", name);
            }
            println!("🎉 Fixed {} private @Preview functions.", count);
        }
    }
    Ok(())
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(files: usize, functions: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if files == 1 { "file" } else { "files" };
    let tests_word = if functions == 1 { "test" } else { "tests" };

    if is_tty {
        eprintln!(
            "\n\x1b[1m✨ Generated {} {} in {} {} in {}\x1b[0m",
            functions, tests_word, files, files_word, time_str
        );
    } else {
        eprintln!(
            "\n✨ Generated {} {} in {} {} in {}",
            functions, tests_word, files, files_word, time_str
        );
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
