//! Conversation-level syntax similarity.
//!
//! Each document (an utterance or turn) is segmented, gated, parsed and
//! converted to ordered trees. Every document is then compared with the one
//! that follows it, so `n` documents produce `n − 1` scores. A document that
//! fails anywhere along the way is gated: the pairs on either side of it are
//! undefined and every other position is still scored.

use crate::aggregate::PairScore;
use crate::config::CassimConfig;
use crate::error::{CassimError, CassimResult, GateReason};
use crate::matrix::CostMatrix;
use crate::parser::SentenceParser;
use crate::segment::{segment_document, LengthGate, SentenceSplitter};
use crate::tree::OrderedTree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A document after segmentation, parsing and tree conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedDocument {
    /// One tree per sentence, in sentence order.
    Parsed(Vec<OrderedTree>),
    Gated(GateReason),
}

impl PreparedDocument {
    pub fn trees(&self) -> Option<&[OrderedTree]> {
        match self {
            PreparedDocument::Parsed(trees) => Some(trees),
            PreparedDocument::Gated(_) => None,
        }
    }

    pub fn is_gated(&self) -> bool {
        matches!(self, PreparedDocument::Gated(_))
    }
}

/// Scores for the adjacent pairs of a conversation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationScores {
    scores: Vec<PairScore>,
}

impl ConversationScores {
    pub fn new(scores: Vec<PairScore>) -> Self {
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PairScore> {
        self.scores.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairScore> {
        self.scores.iter()
    }

    /// Numeric view with NaN for undefined pairs.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.scores.iter().map(PairScore::to_f64).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.scores.iter().filter(|s| s.is_defined()).count()
    }

    pub fn undefined_count(&self) -> usize {
        self.len() - self.defined_count()
    }

    /// Mean over defined scores only.
    pub fn defined_mean(&self) -> Option<f64> {
        let defined: Vec<f64> = self.scores.iter().filter_map(PairScore::value).collect();
        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }

    pub fn into_inner(self) -> Vec<PairScore> {
        self.scores
    }
}

/// The CASSIM driver, owning a parser and the metric configuration.
pub struct Cassim<P> {
    parser: P,
    splitter: SentenceSplitter,
    gate: LengthGate,
    config: CassimConfig,
    /// Bounds how many documents are prepared, and so parsed, at once.
    pool: rayon::ThreadPool,
}

impl<P: SentenceParser> Cassim<P> {
    pub fn new(parser: P) -> CassimResult<Self> {
        Self::with_config(parser, CassimConfig::default())
    }

    pub fn with_config(parser: P, config: CassimConfig) -> CassimResult<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parse_workers)
            .thread_name(|idx| format!("cassim-parse-{}", idx))
            .build()
            .map_err(|e| CassimError::config(format!("cannot start parse workers: {}", e)))?;
        Ok(Self {
            parser,
            splitter: SentenceSplitter::new(),
            gate: LengthGate::new(config.max_sentence_tokens),
            config,
            pool,
        })
    }

    pub fn with_splitter(mut self, splitter: SentenceSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn config(&self) -> &CassimConfig {
        &self.config
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Segment, gate, parse and convert one document.
    pub fn prepare_document(&self, text: &str) -> PreparedDocument {
        match self.try_prepare(text) {
            Ok(trees) => PreparedDocument::Parsed(trees),
            Err(err) => {
                match &err {
                    CassimError::SentenceTooLong { .. } | CassimError::EmptyDocument => {
                        debug!(reason = %err, "document gated");
                    }
                    _ => warn!(error = %err, "document could not be parsed"),
                }
                PreparedDocument::Gated(err.into())
            }
        }
    }

    fn try_prepare(&self, text: &str) -> CassimResult<Vec<OrderedTree>> {
        let sentences = segment_document(text, &self.splitter, &self.gate)?;
        let parsed = self.parser.parse_sentences(&sentences)?;
        if parsed.len() != sentences.len() {
            return Err(CassimError::malformed(format!(
                "parser returned {} trees for {} sentences",
                parsed.len(),
                sentences.len()
            )));
        }
        parsed.iter().map(OrderedTree::from_syntax_node).collect()
    }

    /// Prepare many documents concurrently, preserving order.
    pub fn prepare_documents<S>(&self, documents: &[S]) -> Vec<PreparedDocument>
    where
        S: AsRef<str> + Sync,
    {
        self.pool.install(|| {
            documents
                .par_iter()
                .map(|doc| self.prepare_document(doc.as_ref()))
                .collect()
        })
    }

    /// Score one pair of prepared documents.
    pub fn compare(&self, a: &PreparedDocument, b: &PreparedDocument) -> PairScore {
        let (trees_a, trees_b) = match (a, b) {
            (PreparedDocument::Gated(reason), _) | (_, PreparedDocument::Gated(reason)) => {
                return PairScore::Undefined(reason.clone());
            }
            (PreparedDocument::Parsed(trees_a), PreparedDocument::Parsed(trees_b)) => {
                (trees_a, trees_b)
            }
        };

        let matrix = match self.config.comparison_timeout() {
            Some(timeout) => {
                match CostMatrix::build_until(trees_a, trees_b, Instant::now() + timeout) {
                    Ok(matrix) => matrix,
                    Err(err) => {
                        warn!(
                            rows = trees_a.len(),
                            cols = trees_b.len(),
                            error = %err,
                            "pair comparison abandoned"
                        );
                        return PairScore::Undefined(err.into());
                    }
                }
            }
            None => CostMatrix::build(trees_a, trees_b),
        };

        match self.config.aggregation.similarity(&matrix) {
            Some(similarity) => PairScore::Defined(similarity),
            None => PairScore::Undefined(GateReason::EmptyDocument),
        }
    }

    /// Similarity of two standalone documents.
    pub fn document_similarity(&self, a: &str, b: &str) -> PairScore {
        let prepared = self.prepare_documents(&[a, b]);
        self.compare(&prepared[0], &prepared[1])
    }

    /// Similarity of each document with the next one.
    ///
    /// Returns `max(n − 1, 0)` scores; entry `i` compares documents `i` and
    /// `i + 1`.
    #[tracing::instrument(skip_all, fields(documents = documents.len()))]
    pub fn conversation_similarity<S>(&self, documents: &[S]) -> ConversationScores
    where
        S: AsRef<str> + Sync,
    {
        let prepared = self.prepare_documents(documents);
        let gated = prepared.iter().filter(|doc| doc.is_gated()).count();

        let scores = ConversationScores::new(
            prepared
                .windows(2)
                .map(|pair| self.compare(&pair[0], &pair[1]))
                .collect(),
        );

        info!(
            pairs = scores.len(),
            undefined = scores.undefined_count(),
            gated_documents = gated,
            "conversation scored"
        );
        scores
    }
}

/// Score a conversation with the default configuration.
pub fn conversation_similarity<P, S>(parser: P, documents: &[S]) -> CassimResult<ConversationScores>
where
    P: SentenceParser,
    S: AsRef<str> + Sync,
{
    Ok(Cassim::new(parser)?.conversation_similarity(documents))
}
