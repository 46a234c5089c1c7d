//! The [`GenomeModelError`] and [`Rejection`] `enum` definitions and error messages.
//!
//! There are two kinds of problems encountered while parsing:
//!
//!  1. [`GenomeModelError`]: fatal errors that abort a parse (or a command), which
//!     are returned to the user through [`Result`].
//!
//!  2. [`Rejection`]: row-level problems. These never abort a parse; the offending
//!     line is dropped and the rejection message is recorded in the parse report.
//!
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// The [`GenomeModelError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum GenomeModelError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("No file path was provided")]
    EmptyPath,
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    // File parsing related errors
    #[error("Could not detect genomic interval filetype from extension: {0}")]
    UnsupportedFileFormat(String),
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Genome file is invalid: {0}")]
    InvalidGenomeFile(String),
    #[error("Unknown assembly '{0}'")]
    UnknownAssembly(String),

    // Output related errors
    #[error("TSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}

/// The reason a single line was dropped by the parser.
///
/// The [`std::fmt::Display`] output of a [`Rejection`] is the human-readable
/// reason stored in the diagnostic messages of a parse.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("missing {0} column (line has {1} columns)")]
    MissingColumn(&'static str, usize),
    #[error("invalid left position '{0}'")]
    InvalidLeft(String),
    #[error("invalid right position '{0}'")]
    InvalidRight(String),
    #[error("invalid value '{0}'")]
    InvalidValue(String),
    #[error("invalid score '{0}'")]
    InvalidScore(String),
    #[error("invalid frame '{0}': must be 0, 1, 2 or '.'")]
    InvalidFrame(String),
    #[error("invalid base pair code in {0} '{1}'")]
    InvalidBase(&'static str, String),
    #[error("invalid quality '{0}'")]
    InvalidQuality(String),
    #[error("chromosome '{0}' is not in the {1} assembly")]
    UnknownChromosome(String, String),
}
