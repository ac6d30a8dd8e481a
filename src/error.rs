//! Error types for the metric core.
//!
//! [`CassimError`] is what fallible operations return. [`GateReason`] is the
//! value a document carries once it has been excluded from scoring; every
//! pair touching a gated document is reported as undefined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while preparing or comparing documents.
#[derive(Debug, Error)]
pub enum CassimError {
    /// The external parser could not be reached or did not answer in time.
    #[error("parser unavailable: {message}")]
    ParseUnavailable { message: String },

    /// A parse tree violated the structural assumptions of the adapter.
    #[error("malformed tree: {message}")]
    MalformedTree { message: String },

    /// A sentence exceeded the configured token threshold.
    #[error("sentence has {tokens} tokens, limit is {limit}")]
    SentenceTooLong { tokens: usize, limit: usize },

    /// The document produced no sentences after segmentation.
    #[error("document has no sentences")]
    EmptyDocument,

    /// The comparison of a document pair ran past its deadline.
    #[error("comparison abandoned after deadline")]
    ComparisonTimeout,

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Error reading a configuration file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CassimError {
    pub fn malformed(message: impl Into<String>) -> Self {
        CassimError::MalformedTree {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        CassimError::ParseUnavailable {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CassimError::Config {
            message: message.into(),
        }
    }
}

/// Result type for core operations.
pub type CassimResult<T> = Result<T, CassimError>;

/// Why a document (or a document pair) has no defined score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateReason {
    /// A sentence was longer than the length gate allows.
    SentenceTooLong { tokens: usize, limit: usize },
    /// Segmentation produced zero sentences.
    EmptyDocument,
    /// The parser failed for this document.
    ParseUnavailable(String),
    /// The parser returned a tree the adapter rejected.
    MalformedTree(String),
    /// The pair comparison was abandoned after its deadline.
    ComparisonTimeout,
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateReason::SentenceTooLong { tokens, limit } => {
                write!(f, "sentence too long ({} > {})", tokens, limit)
            }
            GateReason::EmptyDocument => f.write_str("empty document"),
            GateReason::ParseUnavailable(message) => write!(f, "parser unavailable: {}", message),
            GateReason::MalformedTree(message) => write!(f, "malformed tree: {}", message),
            GateReason::ComparisonTimeout => f.write_str("comparison timed out"),
        }
    }
}

impl From<CassimError> for GateReason {
    fn from(err: CassimError) -> Self {
        match err {
            CassimError::ParseUnavailable { message } => GateReason::ParseUnavailable(message),
            CassimError::MalformedTree { message } => GateReason::MalformedTree(message),
            CassimError::SentenceTooLong { tokens, limit } => {
                GateReason::SentenceTooLong { tokens, limit }
            }
            CassimError::EmptyDocument => GateReason::EmptyDocument,
            CassimError::ComparisonTimeout => GateReason::ComparisonTimeout,
            // Configuration and I/O problems surface before any document is
            // processed; if one leaks through here, treat it as a parser fault.
            other @ (CassimError::Config { .. } | CassimError::Io { .. }) => {
                GateReason::ParseUnavailable(other.to_string())
            }
        }
    }
}
