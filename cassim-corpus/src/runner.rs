//! Batch scoring of stored conversations.

use crate::conversation::Conversation;
use crate::error::CorpusResult;
use crate::store::CorpusStore;
use cassim::{Cassim, SentenceParser};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Conversations with more turns than this are left unscored.
    pub max_conversation_lines: usize,
    /// Drop turns by unidentified speakers before scoring.
    pub skip_unknown_speakers: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_conversation_lines: 1300,
            skip_unknown_speakers: false,
        }
    }
}

/// Counts from one scoring run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scored: usize,
    pub skipped_too_long: usize,
    pub undefined_pairs: usize,
}

/// Scores conversations in place, storing the result in
/// [`Conversation::syntax_alignment`].
pub struct CorpusRunner<'a, P> {
    cassim: &'a Cassim<P>,
    config: RunnerConfig,
}

impl<'a, P: SentenceParser> CorpusRunner<'a, P> {
    pub fn new(cassim: &'a Cassim<P>) -> Self {
        Self::with_config(cassim, RunnerConfig::default())
    }

    pub fn with_config(cassim: &'a Cassim<P>, config: RunnerConfig) -> Self {
        Self { cassim, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn run(&self, conversations: &mut [Conversation]) -> RunSummary {
        let len = conversations.len();
        self.run_range(conversations, 0..len)
    }

    /// Score `conversations[range]`. The range is clamped to the slice.
    #[tracing::instrument(skip_all, fields(start = range.start, end = range.end))]
    pub fn run_range(&self, conversations: &mut [Conversation], range: Range<usize>) -> RunSummary {
        let end = range.end.min(conversations.len());
        let start = range.start.min(end);
        let mut summary = RunSummary::default();

        for conversation in &mut conversations[start..end] {
            if conversation.turns.len() > self.config.max_conversation_lines {
                debug!(
                    id = %conversation.id,
                    turns = conversation.turns.len(),
                    limit = self.config.max_conversation_lines,
                    "conversation too long, skipping"
                );
                summary.skipped_too_long += 1;
                continue;
            }

            let documents: Vec<&str> = if self.config.skip_unknown_speakers {
                conversation
                    .known_speaker_turns()
                    .map(|turn| turn.text.as_str())
                    .collect()
            } else {
                conversation.utterances()
            };
            let scores = self.cassim.conversation_similarity(&documents);
            debug!(id = %conversation.id, pairs = scores.len(), "conversation scored");

            summary.undefined_pairs += scores.undefined_count();
            summary.scored += 1;
            conversation.syntax_alignment = Some(scores);
        }

        info!(
            scored = summary.scored,
            skipped = summary.skipped_too_long,
            undefined_pairs = summary.undefined_pairs,
            "corpus run finished"
        );
        summary
    }

    /// Load a stored corpus, score `range` and write it back.
    pub fn run_store(&self, store: &CorpusStore, range: Range<usize>) -> CorpusResult<RunSummary> {
        let mut conversations = store.load()?;
        let summary = self.run_range(&mut conversations, range);
        store.save(&conversations)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Speaker, Turn};
    use cassim::{BracketedTree, CassimError, CassimResult, PairScore};

    const SIMPLE: &str = "(ROOT (S (NP (NN it)) (VP (VBD was)) (. .)))";

    /// Every sentence parses to the same tree unless it mentions `FAIL`.
    struct UniformParser;

    impl SentenceParser for UniformParser {
        type Tree = BracketedTree;

        fn parse_sentences(&self, sentences: &[String]) -> CassimResult<Vec<BracketedTree>> {
            if sentences.iter().any(|s| s.contains("FAIL")) {
                return Err(CassimError::unavailable("parser down"));
            }
            sentences.iter().map(|_| BracketedTree::parse(SIMPLE)).collect()
        }
    }

    fn conversation(id: &str, turns: &[(&str, &str)]) -> Conversation {
        Conversation::new(
            id,
            vec![Speaker::new("S0001"), Speaker::new("S0002")],
            turns.iter().map(|(s, t)| Turn::new(*s, *t)).collect(),
        )
    }

    fn corpus() -> Vec<Conversation> {
        vec![
            conversation(
                "a",
                &[("S0001", "It was."), ("S0002", "It was."), ("S0001", "It was.")],
            ),
            conversation(
                "b",
                &[("S0001", "It was."), ("UNKMALE", "FAIL now."), ("S0002", "It was.")],
            ),
            conversation("c", &[("S0001", "It was."), ("S0002", "It was.")]),
        ]
    }

    #[test]
    fn test_run_scores_every_conversation() {
        let cassim = Cassim::new(UniformParser).unwrap();
        let mut conversations = corpus();
        let summary = CorpusRunner::new(&cassim).run(&mut conversations);

        insta::assert_debug_snapshot!(summary, @r###"
        RunSummary {
            scored: 3,
            skipped_too_long: 0,
            undefined_pairs: 2,
        }
        "###);
        let a = conversations[0].syntax_alignment.as_ref().unwrap();
        assert_eq!(a.to_f64_vec(), vec![1.0, 1.0]);
        let b = conversations[1].syntax_alignment.as_ref().unwrap();
        assert!(b.iter().all(|score| !score.is_defined()));
    }

    #[test]
    fn test_skip_unknown_speakers() {
        let cassim = Cassim::new(UniformParser).unwrap();
        let runner = CorpusRunner::with_config(
            &cassim,
            RunnerConfig {
                skip_unknown_speakers: true,
                ..RunnerConfig::default()
            },
        );
        let mut conversations = corpus();
        let summary = runner.run(&mut conversations);

        assert_eq!(summary.undefined_pairs, 0);
        let b = conversations[1].syntax_alignment.as_ref().unwrap();
        assert_eq!(b.iter().cloned().collect::<Vec<_>>(), vec![PairScore::Defined(1.0)]);
    }

    #[test]
    fn test_long_conversations_are_skipped() {
        let cassim = Cassim::new(UniformParser).unwrap();
        let runner = CorpusRunner::with_config(
            &cassim,
            RunnerConfig {
                max_conversation_lines: 2,
                ..RunnerConfig::default()
            },
        );
        let mut conversations = corpus();
        let summary = runner.run(&mut conversations);

        assert_eq!(summary.scored, 1);
        assert_eq!(summary.skipped_too_long, 2);
        assert!(!conversations[0].is_scored());
        assert!(conversations[2].is_scored());
    }

    #[test]
    fn test_range_is_clamped() {
        let cassim = Cassim::new(UniformParser).unwrap();
        let runner = CorpusRunner::new(&cassim);
        let mut conversations = corpus();

        let summary = runner.run_range(&mut conversations, 2..10);
        assert_eq!(summary.scored, 1);
        assert!(!conversations[0].is_scored());
        assert!(conversations[2].is_scored());

        assert_eq!(runner.run_range(&mut conversations, 7..9), RunSummary::default());
    }

    #[test]
    fn test_run_store_writes_scores_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("corpus.ron"));
        store.save(&corpus()).unwrap();

        let cassim = Cassim::new(UniformParser).unwrap();
        let summary = CorpusRunner::new(&cassim).run_store(&store, 0..1).unwrap();
        assert_eq!(summary.scored, 1);

        let reloaded = store.load().unwrap();
        assert!(reloaded[0].is_scored());
        assert!(!reloaded[1].is_scored());
        assert_eq!(
            reloaded[0].syntax_alignment.as_ref().unwrap().to_f64_vec(),
            vec![1.0, 1.0]
        );
    }
}
