//! Error types for corpus storage.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    /// Error reading or writing a corpus file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored corpus is not valid RON.
    #[error("failed to parse {path}: {source}")]
    Ron {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize corpus: {0}")]
    RonSerialize(#[from] ron::Error),
}

pub type CorpusResult<T> = Result<T, CorpusError>;
