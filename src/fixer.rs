//! Rewrites private previews listed in the visibility report to `internal`.
//!
//! Runs after generation, in a later build phase. Matching is textual, keyed
//! on the function name, so two private functions sharing a name in one file
//! are both rewritten.

use crate::error::FixError;
use crate::report::Violation;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// No report, or a report with no records
    NoReport,
    Fixed {
        /// Function names rewritten
        count: usize,
        /// Files that changed
        files: Vec<PathBuf>,
    },
}

/// Fails only when an absurdly long name exceeds the regex size limit
fn private_fun_pattern(name: &str) -> Result<Regex, FixError> {
    // Optional type parameters sit between `fun` and the name
    let pattern = format!(r"private(\s+fun\s+(?:<[^>]*>\s*)?{}\b)", regex::escape(name));
    Regex::new(&pattern).map_err(|error| FixError::Pattern {
        name: name.to_string(),
        error,
    })
}

/// Apply the report at `report_path`, then delete it
pub fn fix_visibility(report_path: &Path) -> Result<FixOutcome, FixError> {
    let content = match fs::read_to_string(report_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FixOutcome::NoReport),
        Err(error) => {
            return Err(FixError::ReadReport {
                path: report_path.to_path_buf(),
                error,
            });
        }
    };

    // Group names by file, keeping first-seen order and dropping repeats
    let mut by_file: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for violation in content.lines().filter_map(Violation::parse) {
        let names = by_file.entry(violation.path).or_default();
        if !names.contains(&violation.function) {
            names.push(violation.function);
        }
    }
    if by_file.is_empty() {
        return Ok(FixOutcome::NoReport);
    }

    let mut count = 0;
    let mut files = Vec::new();
    for (path, names) in by_file {
        let path = PathBuf::from(path);
        let fixed = fix_file(&path, &names)?;
        if fixed > 0 {
            count += fixed;
            files.push(path);
        }
    }

    fs::remove_file(report_path).map_err(|error| FixError::Rewrite {
        path: report_path.to_path_buf(),
        error,
    })?;
    tracing::info!(count, files = files.len(), "fixed private previews");

    Ok(FixOutcome::Fixed { count, files })
}

/// Rewrite one file, returning how many names matched. Missing files are skipped.
fn fix_file(path: &Path, names: &[String]) -> Result<usize, FixError> {
    let mut content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(file = %path.display(), "reported file no longer exists");
            return Ok(0);
        }
        Err(error) => {
            return Err(FixError::Rewrite {
                path: path.to_path_buf(),
                error,
            });
        }
    };

    let mut fixed = 0;
    for name in names {
        let pattern = private_fun_pattern(name)?;
        if pattern.is_match(&content) {
            content = pattern.replace_all(&content, "internal$1").into_owned();
            fixed += 1;
        }
    }

    if fixed > 0 {
        fs::write(path, &content).map_err(|error| FixError::Rewrite {
            path: path.to_path_buf(),
            error,
        })?;
    }
    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = fix_visibility(&dir.path().join("report.txt")).unwrap();
        assert_eq!(outcome, FixOutcome::NoReport);
    }

    #[test]
    fn test_blank_report_is_left_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.txt");
        fs::write(&report, "\n\n").unwrap();
        assert_eq!(fix_visibility(&report).unwrap(), FixOutcome::NoReport);
        assert!(report.exists());
    }

    #[test]
    fn test_rewrites_listed_functions_only() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Sample.kt");
        fs::write(
            &source,
            "@Preview\n@Composable\nprivate fun hidden() {}\n\nprivate fun hiddenHelper() {}\n\n@Preview\nprivate fun <T> generic() {}\n",
        )
        .unwrap();
        let report = dir.path().join("report.txt");
        fs::write(
            &report,
            format!(
                "{0}|hidden\n{0}|generic\n{0}|hidden\n{1}|gone\n",
                source.display(),
                dir.path().join("Deleted.kt").display()
            ),
        )
        .unwrap();

        let outcome = fix_visibility(&report).unwrap();
        assert_eq!(
            outcome,
            FixOutcome::Fixed {
                count: 2,
                files: vec![source.clone()],
            }
        );
        assert_eq!(
            fs::read_to_string(&source).unwrap(),
            "@Preview\n@Composable\ninternal fun hidden() {}\n\nprivate fun hiddenHelper() {}\n\n@Preview\ninternal fun <T> generic() {}\n"
        );
        assert!(!report.exists());
    }

    #[test]
    fn test_pattern_escapes_names() {
        let pattern = private_fun_pattern("a.b").unwrap();
        assert!(!pattern.is_match("private fun axb()"));
    }

    #[test]
    fn test_oversized_name_is_an_error() {
        let name = "a".repeat(20_000_000);
        assert!(matches!(
            private_fun_pattern(&name),
            Err(FixError::Pattern { .. })
        ));
    }
}
