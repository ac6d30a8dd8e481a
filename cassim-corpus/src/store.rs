//! RON persistence for conversation corpora.

use crate::conversation::Conversation;
use crate::error::{CorpusError, CorpusResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A corpus stored as one RON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the corpus. A missing file is an empty corpus.
    pub fn load(&self) -> CorpusResult<Vec<Conversation>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no corpus file, starting empty");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let conversations: Vec<Conversation> =
            ron::from_str(&content).map_err(|source| CorpusError::Ron {
                path: self.path.display().to_string(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            conversations = conversations.len(),
            "loaded corpus"
        );
        Ok(conversations)
    }

    pub fn save(&self, conversations: &[Conversation]) -> CorpusResult<()> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(conversations, config)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, content).map_err(|source| self.io_error(source))?;
        debug!(
            path = %self.path.display(),
            conversations = conversations.len(),
            "saved corpus"
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> CorpusError {
        CorpusError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Speaker, Turn};
    use cassim::{ConversationScores, GateReason, PairScore};

    fn sample() -> Conversation {
        let mut conversation = Conversation::new(
            "KB7RX",
            vec![
                Speaker::new("S0001").with_metadata("gender", "F"),
                Speaker::new("S0002"),
            ],
            vec![
                Turn::new("S0001", "The cat sat."),
                Turn::new("S0002", "The dog sat."),
                Turn::new("S0001", "Yes."),
            ],
        );
        conversation.syntax_alignment = Some(ConversationScores::new(vec![
            PairScore::Defined(1.0),
            PairScore::Undefined(GateReason::SentenceTooLong {
                tokens: 71,
                limit: 70,
            }),
        ]));
        conversation
    }

    #[test]
    fn test_missing_file_is_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("corpus.ron"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("nested").join("corpus.ron"));
        let conversations = vec![sample(), Conversation::new("empty", vec![], vec![])];

        store.save(&conversations).unwrap();
        assert_eq!(store.load().unwrap(), conversations);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.ron");
        fs::write(&path, "[ (id: ").unwrap();

        let err = CorpusStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CorpusError::Ron { .. }));
        assert!(err.to_string().contains("corpus.ron"));
    }

    #[test]
    fn test_stored_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("corpus.ron"));
        let conversation = Conversation::new(
            "c1",
            vec![Speaker::new("S0001")],
            vec![Turn::new("S0001", "Yes.")],
        );
        store.save(&[conversation]).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("id: \"c1\""));
        assert!(content.contains("text: \"Yes.\""));
        assert!(content.contains("syntax_alignment: None"));
        assert!(content.lines().count() > 1);
    }
}
