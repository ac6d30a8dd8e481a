//! CoreNLP JSON output, reduced to what the parser binding reads.

use crate::error::{CoreNlpError, CoreNlpResult};
use cassim::BracketedTree;
use serde::Deserialize;

/// Top-level `outputFormat=json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub sentences: Vec<ParsedSentence>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedSentence {
    pub index: usize,
    /// Penn Treebank bracketed constituency tree.
    #[serde(default)]
    pub parse: Option<String>,
}

impl ParseResponse {
    pub fn from_json(body: &str) -> CoreNlpResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// One tree per requested sentence, in order.
    pub fn into_trees(self, expected: usize) -> CoreNlpResult<Vec<BracketedTree>> {
        if self.sentences.len() != expected {
            return Err(CoreNlpError::SentenceCount {
                expected,
                actual: self.sentences.len(),
            });
        }

        let mut sentences = self.sentences;
        sentences.sort_by_key(|sentence| sentence.index);
        sentences
            .into_iter()
            .map(|sentence| {
                let index = sentence.index;
                let parse = sentence.parse.ok_or_else(|| CoreNlpError::Tree {
                    index,
                    source: cassim::CassimError::malformed("no parse annotation"),
                })?;
                BracketedTree::parse(&parse).map_err(|source| CoreNlpError::Tree { index, source })
            })
            .collect()
    }
}
