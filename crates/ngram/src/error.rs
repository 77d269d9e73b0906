//! Index error types

use thiserror::Error;

use crate::key::KeyError;

/// Errors that can occur while configuring, mutating or searching an index
#[derive(Debug, Error)]
pub enum NGramError {
    /// A configuration parameter is outside its legal range
    #[error("invalid {param}: {value} ({reason})")]
    Configuration {
        param: &'static str,
        value: String,
        reason: &'static str,
    },

    /// `remove` of an item that is not a member
    #[error("item not found in index: {0}")]
    NotFound(String),

    /// A key function failed while encoding an item or query
    #[error("key function failed on {input}: {source}")]
    KeyFunction {
        input: String,
        #[source]
        source: KeyError,
    },

    /// A key function has no registered name and cannot be serialized
    #[error("{0} is an unnamed closure and cannot be serialized")]
    NotSerializable(&'static str),

    /// A snapshot names a key function missing from the registry
    #[error("unknown key function: {0}")]
    UnknownKeyFunction(String),
}

impl NGramError {
    pub(crate) fn config(param: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::Configuration {
            param,
            value: value.to_string(),
            reason,
        }
    }
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, NGramError>;
