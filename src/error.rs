//! Errors that end a round or a fix.
//!
//! Unresolvable symbols, invalid declarations, private previews and repeated
//! emission are not errors: the processor skips, defers or records them and
//! keeps going. Only I/O failures, and a fixer pattern that cannot be built,
//! surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to write test file for {source_file}: {error}")]
    Write {
        source_file: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to write visibility report {}: {error}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum FixError {
    #[error("Failed to read visibility report {}: {error}", path.display())]
    ReadReport {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to update {}: {error}", path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Cannot match function `{name}`: {error}")]
    Pattern {
        name: String,
        #[source]
        error: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_messages_name_the_file() {
        let err = ProcessError::Report {
            path: PathBuf::from("build/autoshot/report.txt"),
            error: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write visibility report build/autoshot/report.txt: denied"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_pattern_error_names_the_function() {
        let err = FixError::Pattern {
            name: "hidden".to_string(),
            error: regex::Regex::new("(").unwrap_err(),
        };
        assert!(err.to_string().starts_with("Cannot match function `hidden`: "));
        assert!(err.source().is_some());
    }
}
