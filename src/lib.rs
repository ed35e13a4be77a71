//! # prosa - text preprocessing for web corpora
//!
//! prosa turns raw, web-scraped document text into a clean, tokenized,
//! sentence-segmented representation suitable for search indexing. The
//! core is a configurable, offset-exact pipeline of three pure
//! components:
//!
//! - [`Normalizer`](text::Normalizer) strips markup and normalizes
//!   whitespace and quotation marks;
//! - [`Tokenizer`](text::Tokenizer) scans the normalized text into
//!   typed tokens with exact source offsets, applying special-token
//!   recognition, split rules, and hyphen/clitic fusion;
//! - [`Segmenter`](text::Segmenter) groups tokens into sentences using
//!   configurable boundary punctuation, abbreviation exceptions, and
//!   sentence-start heuristics, then repairs spurious breaks and
//!   numbers the words of every sentence.
//!
//! ## Quick start
//!
//! ```
//! use prosa::{Pipeline, PipelineConfig};
//!
//! let mut config = PipelineConfig::default();
//! config.abbreviations.insert("т.е".to_string());
//! let pipeline = Pipeline::new(&config);
//!
//! let doc = pipeline.process("<p>Кот спит. Собака лает.</p>");
//! assert_eq!(doc.sentences.len(), 2);
//! assert_eq!(doc.sentences[0].text, "Кот спит.");
//! ```
//!
//! Configuration is loaded once (for example with
//! [`PipelineConfig::from_file`]) and shared read-only; a [`Pipeline`]
//! compiled from it is `Send + Sync`, and each document is processed
//! independently, so callers may fan documents out across threads with
//! no coordination. Processing itself never fails; invalid patterns in
//! the configuration are replaced with safe defaults at construction
//! time and logged as warnings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod text;

// Re-export commonly used types
pub use config::{PipelineConfig, TokenTemplate};
pub use error::{ProsaError, Result};
pub use pipeline::{Pipeline, ProcessedDocument};
pub use text::{AlignSpan, Normalizer, Segmenter, Sentence, Token, TokenKind, Tokenizer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
