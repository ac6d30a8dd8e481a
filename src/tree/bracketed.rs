//! Penn Treebank bracketed trees.
//!
//! CoreNLP and most constituency parsers print their output as
//! `(ROOT (S (NP (DT The) (NN cat)) (VP (VBD sat)) (. .)))`. This reader
//! builds a [`BracketedTree`] from that text without recursion, so deep input
//! cannot exhaust the stack while parsing.

use super::SyntaxNode;
use crate::error::{CassimError, CassimResult};
use std::fmt;

/// A parser tree as read from bracketed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketedTree {
    /// A syntactic node: `(LABEL child ...)`.
    Node {
        label: String,
        children: Vec<BracketedTree>,
    },
    /// A word.
    Leaf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(input: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = Vec::new();
    let mut atom_start: Option<usize> = None;

    for (idx, ch) in input.char_indices() {
        let is_delimiter = ch == '(' || ch == ')' || ch.is_whitespace();
        if is_delimiter {
            if let Some(start) = atom_start.take() {
                tokens.push((start, Token::Atom(&input[start..idx])));
            }
            match ch {
                '(' => tokens.push((idx, Token::Open)),
                ')' => tokens.push((idx, Token::Close)),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(idx);
        }
    }
    if let Some(start) = atom_start {
        tokens.push((start, Token::Atom(&input[start..])));
    }
    tokens
}

impl BracketedTree {
    /// Read one bracketed tree. Surrounding whitespace is ignored; anything
    /// else after the closing bracket is an error.
    pub fn parse(input: &str) -> CassimResult<Self> {
        let tokens = tokenize(input);
        let mut stack: Vec<(String, Vec<BracketedTree>)> = Vec::new();
        let mut root: Option<BracketedTree> = None;
        let mut idx = 0;

        while idx < tokens.len() {
            let (offset, token) = tokens[idx];
            idx += 1;
            if root.is_some() {
                return Err(CassimError::malformed(format!(
                    "trailing input at byte {}",
                    offset
                )));
            }
            match token {
                Token::Open => match tokens.get(idx) {
                    Some((_, Token::Atom(label))) => {
                        stack.push((label.to_string(), Vec::new()));
                        idx += 1;
                    }
                    _ => {
                        return Err(CassimError::malformed(format!(
                            "missing label at byte {}",
                            offset
                        )));
                    }
                },
                Token::Close => {
                    let (label, children) = stack.pop().ok_or_else(|| {
                        CassimError::malformed(format!("unbalanced ')' at byte {}", offset))
                    })?;
                    let node = BracketedTree::Node { label, children };
                    match stack.last_mut() {
                        Some((_, siblings)) => siblings.push(node),
                        None => root = Some(node),
                    }
                }
                Token::Atom(word) => match stack.last_mut() {
                    Some((_, siblings)) => siblings.push(BracketedTree::Leaf(word.to_string())),
                    None => {
                        return Err(CassimError::malformed(format!(
                            "word {:?} outside brackets at byte {}",
                            word, offset
                        )));
                    }
                },
            }
        }

        if !stack.is_empty() {
            return Err(CassimError::malformed(format!(
                "{} unclosed bracket(s)",
                stack.len()
            )));
        }
        root.ok_or_else(|| CassimError::malformed("empty tree"))
    }

    /// The words under this node, left to right.
    pub fn words(&self) -> Vec<&str> {
        let mut words = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                BracketedTree::Leaf(word) => words.push(word.as_str()),
                BracketedTree::Node { children, .. } => pending.extend(children.iter().rev()),
            }
        }
        words
    }
}

impl SyntaxNode for BracketedTree {
    fn label(&self) -> &str {
        match self {
            BracketedTree::Node { label, .. } => label,
            BracketedTree::Leaf(word) => word,
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            BracketedTree::Node { children, .. } => children,
            BracketedTree::Leaf(_) => &[],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, BracketedTree::Leaf(_))
    }
}

impl fmt::Display for BracketedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketedTree::Leaf(word) => f.write_str(word),
            BracketedTree::Node { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}
