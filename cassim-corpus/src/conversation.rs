//! Conversation records.

use cassim::ConversationScores;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of placeholder speaker ids (`UNKMALE`, `UNKFEMALE`, `UNKMULTI`)
/// that transcripts use when the speaker could not be identified.
const UNKNOWN_SPEAKER_PREFIX: &str = "UNK";

pub fn is_unknown_speaker(id: &str) -> bool {
    id.starts_with(UNKNOWN_SPEAKER_PREFIX)
}

/// A conversation participant. Only the id is interpreted; metadata is
/// carried along for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Speaker {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One turn: consecutive speech by one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: String,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub speakers: Vec<Speaker>,
    pub turns: Vec<Turn>,
    /// Adjacent-turn syntax similarity, once scored.
    #[serde(default)]
    pub syntax_alignment: Option<ConversationScores>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, speakers: Vec<Speaker>, turns: Vec<Turn>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            speakers,
            turns,
            syntax_alignment: None,
        }
    }

    /// Build from transcript lines of `(speaker, text)`.
    ///
    /// A line whose text is empty (after markup removal upstream) means the
    /// speaker's turn was interrupted by a non-speech event; when the next
    /// line is by the same speaker it continues the previous turn instead of
    /// starting a new one.
    pub fn from_raw_lines<I, S, T>(id: impl Into<String>, speakers: Vec<Speaker>, lines: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let mut turns: Vec<Turn> = Vec::new();
        let mut continues = false;

        for (speaker, text) in lines {
            let speaker = speaker.into();
            let text = text.as_ref().trim();
            if text.is_empty() {
                continues = true;
                continue;
            }
            match turns.last_mut() {
                Some(last) if continues && last.speaker == speaker => {
                    last.text.push(' ');
                    last.text.push_str(text);
                }
                _ => turns.push(Turn::new(speaker, text)),
            }
            continues = false;
        }

        Self::new(id, speakers, turns)
    }

    /// Turn texts in order.
    pub fn utterances(&self) -> Vec<&str> {
        self.turns.iter().map(|turn| turn.text.as_str()).collect()
    }

    /// Turns whose speaker is identified.
    pub fn known_speaker_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns
            .iter()
            .filter(|turn| !is_unknown_speaker(&turn.speaker))
    }

    pub fn n_speakers(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_two_party(&self) -> bool {
        self.n_speakers() == 2
    }

    pub fn speaker(&self, id: &str) -> Option<&Speaker> {
        self.speakers.iter().find(|speaker| speaker.id == id)
    }

    pub fn is_scored(&self) -> bool {
        self.syntax_alignment.is_some()
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conversation(id={}, speakers={}, turns={})",
            self.id,
            self.n_speakers(),
            self.turns.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_merges_into_previous_turn() {
        let conversation = Conversation::from_raw_lines(
            " S0024.xml ",
            vec![Speaker::new("S0001"), Speaker::new("S0002")],
            vec![
                ("S0001", "so what did you do"),
                ("S0001", ""),
                ("S0001", "after the match"),
                ("S0002", "nothing much"),
                ("S0001", "really"),
            ],
        );

        assert_eq!(conversation.id, "S0024.xml");
        assert_eq!(
            conversation.utterances(),
            vec!["so what did you do after the match", "nothing much", "really"]
        );
    }

    #[test]
    fn test_without_gap_same_speaker_starts_new_turn() {
        let conversation = Conversation::from_raw_lines(
            "c",
            vec![],
            vec![("S0001", "yeah"), ("S0001", "I know")],
        );
        assert_eq!(conversation.turns.len(), 2);
    }

    #[test]
    fn test_gap_before_other_speaker_does_not_merge() {
        let conversation = Conversation::from_raw_lines(
            "c",
            vec![],
            vec![("S0001", "yeah"), ("S0001", "  "), ("S0002", "okay")],
        );
        assert_eq!(conversation.utterances(), vec!["yeah", "okay"]);
    }

    #[test]
    fn test_unknown_speakers() {
        assert!(is_unknown_speaker("UNKFEMALE"));
        assert!(is_unknown_speaker("UNKMULTI"));
        assert!(!is_unknown_speaker("S0001"));

        let conversation = Conversation::new(
            "c",
            vec![Speaker::new("S0001").with_metadata("age", "42"), Speaker::new("S0002")],
            vec![
                Turn::new("S0001", "hi"),
                Turn::new("UNKMALE", "hello"),
                Turn::new("S0002", "hey"),
            ],
        );
        let known: Vec<_> = conversation
            .known_speaker_turns()
            .map(|turn| turn.text.as_str())
            .collect();
        assert_eq!(known, vec!["hi", "hey"]);
        assert!(conversation.is_two_party());
        assert_eq!(
            conversation.speaker("S0001").unwrap().metadata.get("age").map(String::as_str),
            Some("42")
        );
        assert_eq!(
            conversation.to_string(),
            "Conversation(id=c, speakers=2, turns=3)"
        );
    }
}
