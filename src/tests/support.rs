use crate::{BracketedTree, CassimError, CassimResult, SentenceParser};
use std::collections::HashMap;
use std::sync::Mutex;

pub const CAT_SAT: &str = "(ROOT (S (NP (DT The) (NN cat)) (VP (VBD sat)) (. .)))";
pub const DOG_SAT: &str = "(ROOT (S (NP (DT The) (NN dog)) (VP (VBD sat)) (. .)))";
pub const UNRELATED: &str = "(ROOT (S (NP (DT A) (ADJP (RB totally) (JJ different)) \
    (ADJP (RB structurally) (JJ unrelated)) (NN clause)) (VP (VBZ appears) (ADVP (RB here)) \
    (ADVP (RB now)) (ADVP (RB suddenly))) (. .)))";
pub const YES: &str = "(ROOT (INTJ (UH Yes) (. .)))";

/// Parser backed by a fixed sentence-to-tree table.
///
/// Sentences containing `FAIL` make the whole batch fail as if the service
/// were down. Unknown sentences get a flat `(ROOT (FRAG (NN w) ...))` tree.
pub struct LookupParser {
    trees: HashMap<String, String>,
    drop_last: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl LookupParser {
    pub fn new() -> Self {
        let mut trees = HashMap::new();
        trees.insert("The cat sat.".to_string(), CAT_SAT.to_string());
        trees.insert("The dog sat.".to_string(), DOG_SAT.to_string());
        trees.insert(
            "A totally different structurally unrelated clause appears here now suddenly."
                .to_string(),
            UNRELATED.to_string(),
        );
        trees.insert("Yes.".to_string(), YES.to_string());
        Self {
            trees,
            drop_last: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer with one tree too few.
    pub fn truncating() -> Self {
        Self {
            drop_last: true,
            ..Self::new()
        }
    }

    pub fn with_tree(mut self, sentence: &str, tree: &str) -> Self {
        self.trees.insert(sentence.to_string(), tree.to_string());
        self
    }

    /// Every batch received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn parsed_sentences(&self) -> Vec<String> {
        self.calls().into_iter().flatten().collect()
    }
}

impl SentenceParser for LookupParser {
    type Tree = BracketedTree;

    fn parse_sentences(&self, sentences: &[String]) -> CassimResult<Vec<BracketedTree>> {
        self.calls.lock().unwrap().push(sentences.to_vec());

        if sentences.iter().any(|s| s.contains("FAIL")) {
            return Err(CassimError::unavailable("connection refused"));
        }

        let mut trees = sentences
            .iter()
            .map(|sentence| match self.trees.get(sentence) {
                Some(bracketed) => BracketedTree::parse(bracketed),
                None => {
                    let words: Vec<String> = sentence
                        .split_whitespace()
                        .map(|w| format!("(NN {})", w))
                        .collect();
                    BracketedTree::parse(&format!("(ROOT (FRAG {}))", words.join(" ")))
                }
            })
            .collect::<CassimResult<Vec<_>>>()?;

        if self.drop_last {
            trees.pop();
        }
        Ok(trees)
    }
}
