//! # Error Types: Structured Error Hierarchy
//!
//! Defines the fatal error types of the lint pipeline. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Structural failures (missing dataset, unreadable or unparsable files)
//!   are errors and abort the run.
//! - Data-quality problems inside well-formed files are never errors; they
//!   are collected as violations by `hdiv-schema`.
//! - Every variant carries the path it concerns so a single line is enough
//!   to locate the problem.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level fatal error for a lint run.
#[derive(Error, Debug)]
pub enum HdivError {
    /// The countries root or the selected country directory does not exist.
    #[error("dataset not found: {}", .path.display())]
    DatasetNotFound {
        /// The directory that was expected to hold the dataset.
        path: PathBuf,
    },

    /// A dataset file is not valid YAML.
    #[error("{}:{line}:{column}: failed to parse YAML: {reason}", .file.display())]
    Parse {
        /// File that failed to parse.
        file: PathBuf,
        /// 1-based line of the error, 0 when the parser gave no position.
        line: usize,
        /// 1-based column of the error, 0 when the parser gave no position.
        column: usize,
        /// Parser message.
        reason: String,
    },

    /// A dataset file is not valid UTF-8.
    #[error("{}: file is not valid UTF-8", .path.display())]
    Encoding {
        /// The offending file.
        path: PathBuf,
    },

    /// A file or directory could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The lint configuration file is unreadable or invalid.
    #[error("invalid lint configuration {}: {reason}", .path.display())]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl HdivError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error produced when a scalar cannot be read as a validity date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The string is not one of the accepted date shapes.
    #[error("invalid date '{0}': expected YYYY, YYYY-MM, YYYY-MM-DD or a timestamp")]
    Unrecognized(String),

    /// The shape is right but the calendar date does not exist.
    #[error("invalid date '{0}': no such calendar day")]
    OutOfRange(String),
}
