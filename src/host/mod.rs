//! Interfaces to the compiler host.
//!
//! The processor never owns declarations. It queries a [`Resolver`] and asks a
//! [`CodeGenerator`] for new files; everything else belongs to the host.

mod codegen;
mod graph;

pub use codegen::{DirectoryCodeGenerator, GeneratedFile, MemoryCodeGenerator};
pub use graph::{GraphError, SymbolGraph};

use crate::symbols::{ClassDecl, FunctionDecl, SourceFile};
use std::io::{self, Write};
use std::path::PathBuf;

/// Read-only view of the declarations the host has resolved
pub trait Resolver {
    /// Files that are new or changed since the previous round
    fn new_files(&self) -> Vec<&SourceFile>;

    /// Class declarations annotated directly with `annotation`
    fn symbols_with_annotation(&self, annotation: &str) -> Vec<&ClassDecl>;

    /// Look up a class by qualified name
    fn resolve(&self, name: &str) -> Option<&ClassDecl>;

    /// Whether every type the function refers to resolved
    fn validate(&self, function: &FunctionDecl) -> bool;
}

/// Build-system dependency of a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependencies {
    /// Aggregating outputs are regenerated when any input changes
    pub aggregating: bool,
    pub sources: Vec<PathBuf>,
}

impl Dependencies {
    /// Output depends on exactly one source file
    pub fn isolating(source: impl Into<PathBuf>) -> Self {
        Self {
            aggregating: false,
            sources: vec![source.into()],
        }
    }
}

/// Creates the files the processor emits
pub trait CodeGenerator {
    fn create_new_file(
        &mut self,
        dependencies: Dependencies,
        package: &str,
        file_name: &str,
    ) -> io::Result<Box<dyn Write + '_>>;
}
