//! Stanford CoreNLP binding for cassim.
//!
//! [`CoreNlpClient`] implements [`cassim::SentenceParser`] against a running
//! CoreNLP server: each document's sentences are sent as one request, one
//! sentence per line, and the returned constituency parses are read as
//! [`cassim::BracketedTree`]s. [`CoreNlpServer`] starts and stops a local
//! server process.
//!
//! ```no_run
//! use cassim::Cassim;
//! use cassim_corenlp::{CoreNlpClient, CoreNlpConfig};
//!
//! let client = CoreNlpClient::new(CoreNlpConfig::from_env())?;
//! let cassim = Cassim::new(client)?;
//! let scores = cassim.conversation_similarity(&[
//!     "Colorless green ideas sleep furiously",
//!     "Whereof one cannot speak, thereof one must be silent",
//! ]);
//! println!("{:?}", scores.to_f64_vec());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod error;
mod response;
mod server;

pub use client::{CoreNlpClient, CoreNlpConfig};
pub use error::{CoreNlpError, CoreNlpResult};
pub use response::{ParseResponse, ParsedSentence};
pub use server::{shutdown, CoreNlpServer, ServerConfig};
