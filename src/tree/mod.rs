//! Ordered labeled trees and the adapter from parser trees.
//!
//! The metric only looks at syntactic category labels and the left-to-right
//! order of children. Any parser binding exposes its trees through the narrow
//! [`SyntaxNode`] capability set, and [`OrderedTree::from_syntax_node`] turns
//! them into immutable [`OrderedTree`] values with the lexical leaves removed.

mod bracketed;

pub use bracketed::BracketedTree;

use crate::error::{CassimError, CassimResult};
use std::fmt;

/// Nesting limit for converted trees. Parser output is far shallower; deeper
/// input is reported as malformed rather than risking the stack.
pub const MAX_TREE_DEPTH: usize = 512;

/// Read-only view of a node in a parser's tree.
///
/// A terminal is a lexical leaf (a word). Its `label` is the word itself and
/// it has no children.
pub trait SyntaxNode: Sized {
    /// Category label of an internal node, or the word of a terminal.
    fn label(&self) -> &str;

    /// Children in left-to-right order.
    fn children(&self) -> &[Self];

    /// Whether this node is a lexical leaf rather than a syntactic node.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// A node of an ordered labeled tree.
///
/// Each node owns its subtree. The node count (self plus all descendants) is
/// computed once when the node is built, so nothing is mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OrderedTree {
    label: String,
    children: Vec<OrderedTree>,
    size: usize,
}

impl OrderedTree {
    /// Build a node from its label and already-built children.
    pub fn new(label: impl Into<String>, children: Vec<OrderedTree>) -> Self {
        let size = 1 + children.iter().map(OrderedTree::size).sum::<usize>();
        Self {
            label: label.into(),
            children,
            size,
        }
    }

    /// A node without children.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    /// Convert a parser tree, dropping terminal children.
    ///
    /// The root must be a syntactic node and every retained node needs a
    /// non-empty label.
    pub fn from_syntax_node<N: SyntaxNode>(root: &N) -> CassimResult<Self> {
        if root.is_terminal() {
            return Err(CassimError::malformed(format!(
                "root is a terminal ({:?})",
                root.label()
            )));
        }
        convert(root, 0)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[OrderedTree] {
        &self.children
    }

    /// Number of nodes in this tree, root included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(OrderedTree::depth).max().unwrap_or(0)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn convert<N: SyntaxNode>(node: &N, depth: usize) -> CassimResult<OrderedTree> {
    if depth >= MAX_TREE_DEPTH {
        return Err(CassimError::malformed(format!(
            "tree nesting exceeds {} levels",
            MAX_TREE_DEPTH
        )));
    }
    let label = node.label();
    if label.is_empty() {
        return Err(CassimError::malformed("node with empty label"));
    }

    let mut children = Vec::with_capacity(node.children().len());
    for child in node.children() {
        if child.is_terminal() {
            continue;
        }
        children.push(convert(child, depth + 1)?);
    }
    Ok(OrderedTree::new(label, children))
}

impl SyntaxNode for OrderedTree {
    fn label(&self) -> &str {
        &self.label
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Bracketed rendering without words: `(S (NP (DT) (NN)) (VP))`.
impl fmt::Display for OrderedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.label)?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for OrderedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderedTree[{}]{}", self.size, self)
    }
}
