//! Join error types

use std::path::PathBuf;

use ngram::NGramError;
use thiserror::Error;

/// Errors that stop a similarity join
#[derive(Debug, Error)]
pub enum JoinError {
    /// An input file is missing
    #[error("file \"{}\" does not exist", .0.display())]
    MissingFile(PathBuf),

    /// `--minscore` outside 0.0-1.0
    #[error("minimum score must be between 0 and 1, got {0}")]
    MinScore(f64),

    /// `--count` below zero
    #[error("maximum number of matches per row must be non-negative, got {0}")]
    Count(i64),

    /// A left-hand row is too short to hold the join column
    #[error("row {row} of {file} has no column {column}")]
    MissingColumn {
        file: &'static str,
        row: usize,
        column: usize,
    },

    /// CSV parsing or writing error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Index construction or search error
    #[error("index error: {0}")]
    Index(#[from] NGramError),
}

/// Result type for join operations
pub type Result<T> = std::result::Result<T, JoinError>;
