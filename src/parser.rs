//! The boundary to an external constituency parser.

use crate::error::CassimResult;
use crate::tree::SyntaxNode;

/// A constituency parser that turns sentences into parse trees.
///
/// Calls may block on network I/O. Implementations must return exactly one
/// tree per input sentence, in input order, or fail; a short answer is never
/// acceptable. Unreachable services map to
/// [`CassimError::ParseUnavailable`](crate::CassimError::ParseUnavailable)
/// and unusable output to
/// [`CassimError::MalformedTree`](crate::CassimError::MalformedTree).
pub trait SentenceParser: Sync {
    type Tree: SyntaxNode;

    /// Parse the sentences of one document as a single batch.
    fn parse_sentences(&self, sentences: &[String]) -> CassimResult<Vec<Self::Tree>>;
}

impl<P: SentenceParser> SentenceParser for &P {
    type Tree = P::Tree;

    fn parse_sentences(&self, sentences: &[String]) -> CassimResult<Vec<Self::Tree>> {
        (**self).parse_sentences(sentences)
    }
}
