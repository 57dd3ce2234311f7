//! Private preview report.
//!
//! A private function cannot be called from a separately generated file, so
//! such previews are recorded instead of generated. The report is read by
//! `autoshot fix-visibility`, one `path|function` record per line.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A preview that was skipped because it is private
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Violation {
    pub path: String,
    pub function: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            function: function.into(),
        }
    }

    /// Parse a `path|function` record
    pub fn parse(line: &str) -> Option<Self> {
        let (path, function) = line.trim().split_once('|')?;
        if path.is_empty() || function.is_empty() {
            return None;
        }
        Some(Self::new(path, function))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.path, self.function)
    }
}

/// Collects violations during a run and merges them into the report file
#[derive(Debug)]
pub struct ViolationReport {
    path: PathBuf,
    pending: Vec<Violation>,
}

impl ViolationReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, violation: Violation) {
        if !self.pending.contains(&violation) {
            self.pending.push(violation);
        }
    }

    pub fn pending(&self) -> &[Violation] {
        &self.pending
    }

    /// Union pending records with the report on disk, then clear them.
    /// Returns the number of records now in the report; nothing is written
    /// when there is nothing pending.
    pub fn flush(&mut self) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };

        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        let new_lines = self.pending.iter().map(|violation| violation.to_string());
        for line in existing.lines().map(str::to_string).chain(new_lines) {
            if !line.trim().is_empty() && seen.insert(line.clone()) {
                lines.push(line);
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;

        tracing::info!(
            report = %self.path.display(),
            records = lines.len(),
            "wrote visibility report"
        );
        self.pending.clear();
        Ok(lines.len())
    }
}
