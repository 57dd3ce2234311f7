use super::Resolver;
use crate::symbols::{ClassDecl, FunctionDecl, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid symbol graph: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resolved declaration graph, serialized as JSON.
///
/// `files` are the source files of the round. `libraries` holds classes that
/// only exist in compiled dependencies, such as the framework's own preview
/// annotation and its declared defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolGraph {
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub libraries: Vec<ClassDecl>,
    #[serde(skip)]
    index: HashMap<String, ClassLocation>,
}

#[derive(Debug, Clone, Copy)]
enum ClassLocation {
    File(usize, usize),
    Library(usize),
}

impl SymbolGraph {
    pub fn new(files: Vec<SourceFile>, libraries: Vec<ClassDecl>) -> Self {
        let mut graph = Self {
            files,
            libraries,
            index: HashMap::new(),
        };
        graph.link();
        graph
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: SymbolGraph = serde_json::from_str(json)?;
        Ok(Self::new(graph.files, graph.libraries))
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fill function packages from their files and rebuild the class index
    fn link(&mut self) {
        self.index.clear();

        for (file_index, file) in self.files.iter_mut().enumerate() {
            for function in &mut file.functions {
                if function.package.is_empty() {
                    function.package = file.package.clone();
                }
            }
            for (class_index, class) in file.classes.iter().enumerate() {
                if let Some(name) = &class.name {
                    self.index
                        .insert(name.clone(), ClassLocation::File(file_index, class_index));
                }
            }
        }

        for (class_index, class) in self.libraries.iter().enumerate() {
            if let Some(name) = &class.name {
                // Source declarations shadow library ones
                self.index
                    .entry(name.clone())
                    .or_insert(ClassLocation::Library(class_index));
            }
        }
    }
}

impl Resolver for SymbolGraph {
    fn new_files(&self) -> Vec<&SourceFile> {
        self.files.iter().collect()
    }

    fn symbols_with_annotation(&self, annotation: &str) -> Vec<&ClassDecl> {
        self.files
            .iter()
            .flat_map(|file| &file.classes)
            .filter(|class| class.annotations.iter().any(|a| a.name == annotation))
            .collect()
    }

    fn resolve(&self, name: &str) -> Option<&ClassDecl> {
        match *self.index.get(name)? {
            ClassLocation::File(file, class) => self.files.get(file)?.classes.get(class),
            ClassLocation::Library(class) => self.libraries.get(class),
        }
    }

    fn validate(&self, function: &FunctionDecl) -> bool {
        function.valid
            && function
                .parameters
                .iter()
                .all(|parameter| parameter.ty.is_resolved())
    }
}
