//! Screenshot test generation for UI previews.
//!
//! Scans resolved declarations for preview functions, including those marked
//! through custom annotations that are themselves annotated with the preview
//! annotation, and writes one screenshot test file per source file.
//!
//! ```no_run
//! use autoshot::{MemoryCodeGenerator, ProcessorConfig, ScreenshotProcessor, SymbolGraph};
//!
//! let graph = SymbolGraph::load(std::path::Path::new("symbols.json"))?;
//! let mut processor = ScreenshotProcessor::new(ProcessorConfig::default());
//! let mut codegen = MemoryCodeGenerator::new();
//! let round = processor.process(&graph, &mut codegen)?;
//! println!("{} test files", round.summary.files_generated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod fixer;
pub mod generate;
pub mod host;
pub mod processor;
pub mod report;
pub mod select;
pub mod symbols;

pub use classify::MarkerCache;
pub use config::{ConfigError, ProcessorConfig};
pub use emit::{EmitOutcome, EmittedFileKey, FileEmitter};
pub use error::{FixError, ProcessError};
pub use fixer::{FixOutcome, fix_visibility};
pub use generate::{GeneratedFragment, Generator, ImportSet, KotlinGenerator};
pub use host::{
    CodeGenerator, Dependencies, DirectoryCodeGenerator, GraphError, MemoryCodeGenerator, Resolver,
    SymbolGraph,
};
pub use processor::{RoundOutput, RoundSummary, ScreenshotProcessor};
pub use report::{Violation, ViolationReport};
pub use select::{EligibleFunction, Selection};
