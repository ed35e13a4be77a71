//! Configuration for the prosa preprocessing pipeline.

use crate::error::{ProsaError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default pattern matching sentence-final punctuation.
pub const DEFAULT_SENT_END_PUNC: &str = "[.?!]";

/// Default pattern matching a valid sentence-initial character.
pub const DEFAULT_SENT_START: &str = "[A-ZА-ЯЁ]";

/// Default pattern for punctuation ignored in word-ordinal counting.
pub const DEFAULT_TRANSPARENT_PUNCTUATION: &str = "^ *$";

/// Template for a token recognized by a special-token pattern.
///
/// Omitted fields fall back to the `word` kind and the literal matched
/// text at tokenization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenTemplate {
    /// Token kind name (`word`, `punct`, or a custom kind).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtype: Option<String>,

    /// Literal word-form replacing the matched text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wf: Option<String>,
}

/// Corpus-specific settings shared by all pipeline components.
///
/// Loaded once and treated as read-only for the rest of the process;
/// a [`Pipeline`](crate::Pipeline) borrows it only during construction,
/// so one configuration value can serve any number of pipelines.
/// Unknown keys in the source JSON are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Anchored patterns splitting one token into its capture groups.
    pub split_tokens: Vec<String>,

    /// Patterns recognizing multi-character atomic tokens (emails,
    /// emoticons), tried in this order before generic scanning.
    pub special_tokens: IndexMap<String, TokenTemplate>,

    /// Punctuation strings that never join two words into one token.
    pub non_word_internal_punct: Vec<String>,

    /// Pattern identifying sentence-final punctuation.
    pub sent_end_punc: String,

    /// Pattern identifying a valid sentence-initial character.
    pub sent_start: String,

    /// Pattern for punctuation ignored when numbering words.
    pub transparent_punctuation: String,

    /// Word-forms that never trigger a sentence break.
    pub abbreviations: HashSet<String>,

    /// Whether a newline marker token always forces a sentence boundary.
    pub newline_ends_sent: bool,

    /// Whether straight quotes are rewritten to the configured glyphs.
    pub convert_quotes: bool,

    /// Opening quotation glyph used when `convert_quotes` is set.
    pub left_quot_mark: String,

    /// Closing quotation glyph used when `convert_quotes` is set.
    pub right_quot_mark: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split_tokens: Vec::new(),
            special_tokens: IndexMap::new(),
            non_word_internal_punct: vec!["\n".to_string(), "\\n".to_string()],
            sent_end_punc: DEFAULT_SENT_END_PUNC.to_string(),
            sent_start: DEFAULT_SENT_START.to_string(),
            transparent_punctuation: DEFAULT_TRANSPARENT_PUNCTUATION.to_string(),
            abbreviations: HashSet::new(),
            newline_ends_sent: true,
            convert_quotes: true,
            left_quot_mark: "«".to_string(),
            right_quot_mark: "»".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        // Settings files written on Windows may carry a BOM.
        Ok(serde_json::from_str(json.trim_start_matches('\u{FEFF}'))?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProsaError::FileNotFound(path.to_path_buf()));
        }
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
