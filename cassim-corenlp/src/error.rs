//! Errors from talking to a CoreNLP server.

use cassim::CassimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreNlpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unreadable parse tree for sentence {index}: {source}")]
    Tree {
        index: usize,
        #[source]
        source: CassimError,
    },

    #[error("server returned {actual} parses for {expected} sentences")]
    SentenceCount { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreNlpError {
    /// Whether a retry may succeed: transport failures, overload and server
    /// errors are transient, everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreNlpError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            CoreNlpError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type CoreNlpResult<T> = Result<T, CoreNlpError>;

impl From<CoreNlpError> for CassimError {
    fn from(err: CoreNlpError) -> Self {
        match err {
            CoreNlpError::Http(_)
            | CoreNlpError::Status { .. }
            | CoreNlpError::Config(_)
            | CoreNlpError::Io(_) => CassimError::unavailable(err.to_string()),
            CoreNlpError::Json(_)
            | CoreNlpError::Tree { .. }
            | CoreNlpError::SentenceCount { .. } => CassimError::malformed(err.to_string()),
        }
    }
}
