//! Conversation-level syntax similarity (CASSIM).
//!
//! CASSIM measures how syntactically alike two consecutive turns of a
//! dialogue are. Every sentence is parsed into a constituency tree, the trees
//! are reduced to their category labels, and each sentence of one turn is
//! compared with each sentence of the next using a normalized tree edit
//! distance. The matrix of distances is then aggregated into one similarity.
//!
//! ## Modules
//!
//! - [`tree`] - Ordered labeled trees, the [`SyntaxNode`] adapter interface
//!   and a bracketed-tree reader
//! - [`edit_distance`] - Zhang–Shasha tree edit distance
//! - [`matrix`] - Pairwise cost matrices
//! - [`aggregate`] - Matrix aggregation policies and [`PairScore`]
//! - [`segment`] - Sentence splitting and the length gate
//! - [`parser`] - The [`SentenceParser`] boundary
//! - [`conversation`] - The [`Cassim`] driver
//!
//! ## Example
//!
//! ```
//! use cassim::{tree_edit_distance, BracketedTree, OrderedTree};
//!
//! let a = BracketedTree::parse("(ROOT (S (NP (DT The) (NN cat)) (VP (VBD sat))))").unwrap();
//! let b = BracketedTree::parse("(ROOT (S (NP (DT The) (NN dog)) (VP (VBD sat))))").unwrap();
//!
//! let a = OrderedTree::from_syntax_node(&a).unwrap();
//! let b = OrderedTree::from_syntax_node(&b).unwrap();
//! assert_eq!(tree_edit_distance(&a, &b), 0.0);
//! ```

pub mod aggregate;
pub mod config;
pub mod conversation;
pub mod edit_distance;
pub mod error;
pub mod matrix;
pub mod parser;
pub mod segment;
pub mod tree;

pub use aggregate::{Aggregation, PairScore};
pub use config::{CassimConfig, DEFAULT_MAX_SENTENCE_TOKENS};
pub use conversation::{conversation_similarity, Cassim, ConversationScores, PreparedDocument};
pub use edit_distance::{raw_tree_edit_distance, tree_edit_distance};
pub use error::{CassimError, CassimResult, GateReason};
pub use matrix::CostMatrix;
pub use parser::SentenceParser;
pub use segment::{segment_document, LengthGate, SentenceSplitter};
pub use tree::{BracketedTree, OrderedTree, SyntaxNode};

#[cfg(test)]
mod tests {
    mod conversation;
    mod support;
}
