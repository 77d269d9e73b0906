//! Fuzzy join of two CSV files
//!
//! Rows of the left file are paired with rows of the right file whose join
//! column is similar under N-gram similarity. Join fields are compared after
//! [`normalize`] (whitespace collapsed, lowercased).

pub mod cli;
pub mod error;
pub mod join;
pub mod logging;

pub use error::{JoinError, Result};
pub use join::{join_files, join_readers, normalize, JoinKind, JoinOptions, JoinStats};
