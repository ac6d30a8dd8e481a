//! Conversation corpora for cassim.
//!
//! A [`Conversation`] holds its speakers and turns and, once scored, the
//! adjacent-turn syntax similarity. [`CorpusStore`] keeps a corpus in one RON
//! file and [`CorpusRunner`] scores a range of it with a [`cassim::Cassim`]
//! driver, writing the scores back.

mod conversation;
mod error;
mod runner;
mod store;

pub use conversation::{is_unknown_speaker, Conversation, Speaker, Turn};
pub use error::{CorpusError, CorpusResult};
pub use runner::{CorpusRunner, RunSummary, RunnerConfig};
pub use store::CorpusStore;
