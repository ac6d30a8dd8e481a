//! Sentence segmentation and the length gate.
//!
//! Splitting uses Unicode sentence boundaries (UAX #29). A boundary directly
//! after a known abbreviation ("Dr.", "e.g.", "etc.") is a false positive, so
//! such pieces are joined back onto the following sentence.

use crate::config::DEFAULT_MAX_SENTENCE_TOKENS;
use crate::error::{CassimError, CassimResult};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

static DEFAULT_ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "st", "inc", "ltd", "corp", "co", "e.g",
        "i.e", "vs", "etc", "approx", "u.s", "u.k", "p.m", "a.m", "fig", "dept",
    ]
    .into_iter()
    .collect()
});

/// Splits raw utterance text into sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceSplitter {
    custom_abbreviations: HashSet<String>,
}

impl SentenceSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add abbreviations (without the final period, case-insensitive).
    pub fn with_custom_abbreviations(mut self, abbreviations: &[&str]) -> Self {
        for abbrev in abbreviations {
            self.custom_abbreviations
                .insert(abbrev.trim_end_matches('.').to_lowercase());
        }
        self
    }

    fn ends_with_abbreviation(&self, piece: &str) -> bool {
        let piece = piece.trim_end();
        if !piece.ends_with('.') {
            return false;
        }
        let last_word = match piece.split_whitespace().last() {
            Some(word) => word,
            None => return false,
        };
        let normalized = last_word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .trim_end_matches('.')
            .to_lowercase();
        DEFAULT_ABBREVIATIONS.contains(normalized.as_str())
            || self.custom_abbreviations.contains(&normalized)
    }

    /// Sentences of `text`, trimmed, in order. Whitespace-only text has none.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();

        for piece in text.trim().split_sentence_bounds() {
            pending.push_str(piece);
            if self.ends_with_abbreviation(piece) {
                continue;
            }
            let sentence = pending.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            pending.clear();
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}

/// Rejects documents containing a sentence with too many tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthGate {
    max_tokens: usize,
}

impl LengthGate {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Fails on the first sentence with more whitespace-delimited tokens than
    /// the limit. A sentence exactly at the limit passes.
    pub fn check<S: AsRef<str>>(&self, sentences: &[S]) -> CassimResult<()> {
        for sentence in sentences {
            let tokens = sentence.as_ref().split_whitespace().count();
            if tokens > self.max_tokens {
                return Err(CassimError::SentenceTooLong {
                    tokens,
                    limit: self.max_tokens,
                });
            }
        }
        Ok(())
    }
}

impl Default for LengthGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCE_TOKENS)
    }
}

/// Split a document and apply the gate. Nothing here calls the parser.
pub fn segment_document(
    text: &str,
    splitter: &SentenceSplitter,
    gate: &LengthGate,
) -> CassimResult<Vec<String>> {
    let sentences = splitter.split(text);
    if sentences.is_empty() {
        return Err(CassimError::EmptyDocument);
    }
    gate.check(&sentences)?;
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentences() {
        let splitter = SentenceSplitter::new();
        assert_eq!(
            splitter.split("Hello world. Goodbye."),
            vec!["Hello world.", "Goodbye."]
        );
        assert_eq!(splitter.split("Why? Because!"), vec!["Why?", "Because!"]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let splitter = SentenceSplitter::new();
        assert_eq!(
            splitter.split("Dr. Smith arrived. He sat down."),
            vec!["Dr. Smith arrived.", "He sat down."]
        );
    }

    #[test]
    fn test_custom_abbreviations() {
        let splitter = SentenceSplitter::new().with_custom_abbreviations(&["Approx.", "Cf"]);
        assert_eq!(
            splitter.split("See Cf. Jones for details."),
            vec!["See Cf. Jones for details."]
        );
    }

    #[test]
    fn test_whitespace_and_missing_punctuation() {
        let splitter = SentenceSplitter::new();
        assert!(splitter.split("   \n\t").is_empty());
        assert_eq!(splitter.split("  yeah  "), vec!["yeah"]);
        assert_eq!(
            splitter.split("Colorless green ideas sleep furiously"),
            vec!["Colorless green ideas sleep furiously"]
        );
    }

    #[test]
    fn test_gate_boundary() {
        let gate = LengthGate::default();
        let at_limit = vec!["word"; 70].join(" ");
        let over_limit = vec!["word"; 71].join(" ");

        assert!(gate.check(&[at_limit.as_str()]).is_ok());
        assert!(matches!(
            gate.check(&["short one", over_limit.as_str()]),
            Err(CassimError::SentenceTooLong { tokens: 71, limit: 70 })
        ));
    }

    #[test]
    fn test_segment_document() {
        let splitter = SentenceSplitter::new();
        let gate = LengthGate::new(5);

        assert_eq!(
            segment_document("One two. Three four.", &splitter, &gate).unwrap(),
            vec!["One two.", "Three four."]
        );
        assert!(matches!(
            segment_document("", &splitter, &gate),
            Err(CassimError::EmptyDocument)
        ));
        assert!(matches!(
            segment_document("Fine. This one has far too many tokens in it.", &splitter, &gate),
            Err(CassimError::SentenceTooLong { tokens: 9, limit: 5 })
        ));
    }
}
