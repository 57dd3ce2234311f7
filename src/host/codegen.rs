use super::{CodeGenerator, Dependencies};
use crate::symbols::qualify;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// A file created through a [`CodeGenerator`]
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub dependencies: Dependencies,
}

fn already_exists(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} was already generated", path),
    )
}

/// Writes `<root>/<package dirs>/<file_name>.kt`
pub struct DirectoryCodeGenerator {
    root: PathBuf,
    created: Vec<GeneratedFile>,
}

impl DirectoryCodeGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: Vec::new(),
        }
    }

    pub fn generated_files(&self) -> &[GeneratedFile] {
        &self.created
    }
}

impl CodeGenerator for DirectoryCodeGenerator {
    fn create_new_file(
        &mut self,
        dependencies: Dependencies,
        package: &str,
        file_name: &str,
    ) -> io::Result<Box<dyn Write + '_>> {
        let mut path = self.root.clone();
        path.extend(package.split('.').filter(|segment| !segment.is_empty()));
        path.push(format!("{}.kt", file_name));

        if self.created.iter().any(|file| file.path == path) {
            return Err(already_exists(&path.display().to_string()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        self.created.push(GeneratedFile { path, dependencies });

        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Keeps generated files in memory, keyed by `package.FileName`
#[derive(Default)]
pub struct MemoryCodeGenerator {
    files: BTreeMap<String, (Dependencies, Vec<u8>)>,
}

impl MemoryCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn contents(&self, qualified_name: &str) -> Option<String> {
        self.files
            .get(qualified_name)
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn dependencies(&self, qualified_name: &str) -> Option<&Dependencies> {
        self.files.get(qualified_name).map(|(deps, _)| deps)
    }
}

impl CodeGenerator for MemoryCodeGenerator {
    fn create_new_file(
        &mut self,
        dependencies: Dependencies,
        package: &str,
        file_name: &str,
    ) -> io::Result<Box<dyn Write + '_>> {
        let key = qualify(package, file_name);
        if self.files.contains_key(&key) {
            return Err(already_exists(&key));
        }

        let (_, buffer) = self.files.entry(key).or_insert((dependencies, Vec::new()));
        Ok(Box::new(buffer))
    }
}
