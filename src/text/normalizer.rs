//! Normalization of raw web-scraped text.
//!
//! The normalizer strips structural markup, decodes HTML entities,
//! collapses whitespace and rewrites quotation marks so that the
//! tokenizer downstream only ever sees flat, single-line text.

use crate::config::PipelineConfig;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Structural tags plus a band of control and box-drawing characters
// that web scrapes tend to carry.
static RX_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(?:a|img|span|div|p|body|html|head)(?: [^<>]+)?>|[\x{0}\x{2310}-\x{266F}]+")
        .unwrap()
});

// Runs of horizontal whitespace, including non-breaking spaces that
// survived entity decoding and ones that did not.
static RX_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new("(?:[ \t\u{A0}]|&nbsp;)+").unwrap());

// Runs of blank lines, collapsed to a single newline-plus-space marker.
static RX_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new("(?: *\n)+ *").unwrap());

// Closing punctuation glued to a following word or open bracket.
static RX_PUNC_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([,!?:;·;·)\]>])([\w(\[<])").unwrap());

// A straight double quote is an opening quote after whitespace, an open
// bracket or a dash, and a closing quote after word material or
// sentence punctuation.
static RX_QUOTES_L: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([\s(\[{<\-])"([\w\-'`´‘’‛@.,-‒–—―•])"#).unwrap());

static RX_QUOTES_R: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([\w\-'`´‘’‛/@.,-‒–—―•,!?:;·;·])"([\s)\]}>\-.,!])"#).unwrap());

/// Text normalizer turning one raw document body into clean text.
///
/// All transforms are total: `clean` never fails, at worst it returns
/// a degenerate but valid string.
#[derive(Debug, Clone)]
pub struct Normalizer {
    convert_quotes: bool,
    left_quot_mark: String,
    right_quot_mark: String,
}

impl Normalizer {
    /// Creates a normalizer from the shared configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            convert_quotes: config.convert_quotes,
            left_quot_mark: config.left_quot_mark.clone(),
            right_quot_mark: config.right_quot_mark.clone(),
        }
    }

    /// Runs all normalization steps in order.
    pub fn clean(&self, raw: &str) -> String {
        let text = Self::convert_html(raw);
        let text = Self::clean_spaces(&text);
        let text = Self::separate_words(&text);
        let text = if self.convert_quotes {
            self.rewrite_quotes(&text)
        } else {
            text
        };
        Self::clean_other(&text)
    }

    /// Strips structural markup and decodes HTML character entities.
    fn convert_html(text: &str) -> String {
        let text = RX_TAGS.replace_all(text, "");
        html_escape::decode_html_entities(text.as_ref()).into_owned()
    }

    /// Collapses horizontal whitespace and blank-line runs.
    fn clean_spaces(text: &str) -> String {
        let text = RX_SPACES.replace_all(text.trim(), " ");
        RX_BLANK_LINES.replace_all(text.as_ref(), "\n ").into_owned()
    }

    /// Inserts a space between closing punctuation and a following
    /// word character, so the tokenizer cannot fuse across it.
    fn separate_words(text: &str) -> String {
        RX_PUNC_WORDS.replace_all(text, "${1} ${2}").into_owned()
    }

    /// Rewrites context-dependent straight quotes and any leftover
    /// curly quotes to the configured quotation glyphs.
    fn rewrite_quotes(&self, text: &str) -> String {
        let text = RX_QUOTES_L.replace_all(text, |caps: &Captures| {
            format!("{}{}{}", &caps[1], self.left_quot_mark, &caps[2])
        });
        let text = RX_QUOTES_R.replace_all(text.as_ref(), |caps: &Captures| {
            format!("{}{}{}", &caps[1], self.right_quot_mark, &caps[2])
        });
        text.replace('\u{201C}', &self.left_quot_mark)
            .replace('\u{201D}', &self.right_quot_mark)
    }

    /// Final cleanup: ellipses, escaped newlines, backslashes, and the
    /// removal of every remaining literal newline.
    fn clean_other(text: &str) -> String {
        text.replace('…', "...")
            .replace("\\r\\n", "\n")
            .replace("\\n", "\n")
            .replace('\\', "/")
            .replace('\n', "")
    }
}
