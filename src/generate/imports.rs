use crate::symbols::{package_of, simple_name};
use std::collections::{BTreeSet, HashMap};

/// Packages every Kotlin file sees without an import
const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// Imports of one generated file.
///
/// Each simple name refers to a single qualified name within the file. The
/// first qualified name to claim a simple name gets it; later ones with the
/// same simple name are written out in full and never imported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    names: BTreeSet<String>,
    claimed: HashMap<String, String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// How `qualified` is written at a use site, importing it when needed.
    ///
    /// Root-package names and names from default imports need no import
    /// line, but still claim their simple name so an import cannot shadow them.
    pub fn reference(&mut self, qualified: &str) -> String {
        let simple = simple_name(qualified);
        if let Some(owner) = self.claimed.get(simple) {
            return if owner == qualified {
                simple.to_string()
            } else {
                qualified.to_string()
            };
        }

        self.claimed.insert(simple.to_string(), qualified.to_string());
        let package = package_of(qualified);
        if !package.is_empty() && !DEFAULT_IMPORTS.contains(&package) {
            self.names.insert(qualified.to_string());
        }
        simple.to_string()
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.names.contains(qualified)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in ascending lexical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
