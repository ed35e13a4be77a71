//! Sentence segmentation over the token stream.
//!
//! The segmenter walks the token sequence once, closing a sentence at
//! configured end-of-sentence punctuation unless an abbreviation or a
//! non-sentence-initial continuation vetoes the break. Three repair
//! passes then run over the sentence list: punctuation-only sentences
//! are folded back into their predecessor, token offsets are rebased to
//! the start of each sentence, and word ordinals are assigned.

use crate::config::{
    PipelineConfig, DEFAULT_SENT_END_PUNC, DEFAULT_SENT_START, DEFAULT_TRANSPARENT_PUNCTUATION,
};
use crate::text::tokenizer::{Token, TokenKind};
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An auxiliary offset-bearing annotation attached to a sentence.
///
/// Spans are shifted in lockstep with their owning sentence's tokens
/// whenever sentences are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignSpan {
    /// Start offset (bytes).
    pub off_start: usize,
    /// End offset (bytes, exclusive).
    pub off_end: usize,
    /// Sentence-relative start offset, if assigned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub off_start_sent: Option<usize>,
    /// Sentence-relative end offset, if assigned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub off_end_sent: Option<usize>,
}

/// One sentence: its tokens, reconstructed text, and auxiliary spans.
///
/// After segmentation, token offsets are relative to the start of the
/// sentence, never to the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Ordered tokens of the sentence.
    pub words: Vec<Token>,
    /// Text reconstructed from the token span.
    pub text: String,
    /// Source alignment spans.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub src_alignment: Vec<AlignSpan>,
    /// Parallel alignment spans.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub para_alignment: Vec<AlignSpan>,
    /// Style annotation spans.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub style_spans: Vec<AlignSpan>,
}

impl Sentence {
    fn from_words(words: Vec<Token>, text: &str) -> Self {
        let sent_text = match (words.first(), words.last()) {
            (Some(first), Some(last)) => text
                .get(first.off_start..last.off_end)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
        Self {
            words,
            text: sent_text,
            ..Self::default()
        }
    }

    fn is_punct_only(&self) -> bool {
        self.words.iter().all(|w| w.kind.is_punct())
    }
}

/// Sentence segmenter driven by configurable boundary patterns.
#[derive(Debug)]
pub struct Segmenter {
    rx_sent_end: Regex,
    rx_sent_start: Regex,
    rx_transparent: Regex,
    abbreviations: HashSet<String>,
    newline_ends_sent: bool,
}

impl Segmenter {
    /// Creates a segmenter from the shared configuration.
    ///
    /// An invalid boundary pattern is replaced by its fixed default
    /// with a warning, never surfaced as an error.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            rx_sent_end: compile_or_default(&config.sent_end_punc, DEFAULT_SENT_END_PUNC),
            rx_sent_start: compile_or_default(&config.sent_start, DEFAULT_SENT_START),
            rx_transparent: compile_or_default(
                &config.transparent_punctuation,
                DEFAULT_TRANSPARENT_PUNCTUATION,
            ),
            abbreviations: config.abbreviations.clone(),
            newline_ends_sent: config.newline_ends_sent,
        }
    }

    /// Creates a segmenter with default configuration.
    pub fn default_config() -> Self {
        Self::new(&PipelineConfig::default())
    }

    /// Packs tokens into sentences, using `text` (the string the tokens
    /// were cut from) to reconstruct each sentence's surface form.
    pub fn split(&self, tokens: &[Token], text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut cur: Vec<Token> = Vec::new();
        let len = tokens.len();
        for (i, token) in tokens.iter().enumerate() {
            cur.push(token.clone());
            if token.kind.is_punct() {
                let boundary = i + 1 == len
                    || (self.newline_ends_sent && token.is_newline_marker())
                    || (self.rx_sent_end.is_match(&token.wf)
                        && i > 0
                        && !self.abbreviations.contains(&tokens[i - 1].wf)
                        && self.rx_sent_start.is_match(next_word(tokens, i + 1)));
                if boundary {
                    self.append_sentence(&mut sentences, std::mem::take(&mut cur), text);
                }
            } else if i + 1 == len {
                self.append_sentence(&mut sentences, std::mem::take(&mut cur), text);
            }
        }
        self.recalculate_offsets(&mut sentences);
        self.assign_word_indices(&mut sentences);
        sentences
    }

    /// Appends a closed sentence to the list. A sentence holding only
    /// punctuation is folded into the previous sentence instead; an
    /// empty one is discarded.
    fn append_sentence(&self, sentences: &mut Vec<Sentence>, words: Vec<Token>, text: &str) {
        if words.is_empty() {
            return;
        }
        let sentence = Sentence::from_words(words, text);
        match sentences.last_mut() {
            Some(prev) if sentence.is_punct_only() => {
                // Offsets are still absolute at this point; the merge
                // must preserve the source gap between the two spans.
                join_sentences(prev, sentence, true);
            }
            _ => sentences.push(sentence),
        }
    }

    /// Rebases every sentence's token offsets so its first token starts
    /// at offset zero.
    fn recalculate_offsets(&self, sentences: &mut [Sentence]) {
        for sent in sentences {
            let Some(start) = sent.words.first().map(|w| w.off_start) else {
                continue;
            };
            for w in &mut sent.words {
                w.off_start -= start;
                w.off_end -= start;
            }
        }
    }

    /// Assigns `next_word` links and forward/backward word ordinals in
    /// every sentence.
    fn assign_word_indices(&self, sentences: &mut [Sentence]) {
        for sent in sentences {
            self.assign_word_indices_sentence(sent);
        }
    }

    /// Numbers the tokens of one sentence: `next_word` points at the
    /// following token, `sentence_index` counts real words (skipping
    /// the leading non-word run and transparent punctuation), and
    /// `sentence_index_neg` mirrors it from the sentence end. Needed by
    /// callers aligning multiple tokenizations of the same sentence.
    fn assign_word_indices_sentence(&self, sent: &mut Sentence) {
        let len = sent.words.len();
        if len == 0 {
            return;
        }
        // Whether any word-kind token remains at position i or later.
        let mut word_remains = vec![false; len];
        let mut seen = false;
        for i in (0..len).rev() {
            seen = seen || sent.words[i].kind.is_word();
            word_remains[i] = seen;
        }
        let mut leading_punct = 0;
        let mut max_word_num = 0;
        let mut words_started = false;
        for i in 0..len {
            if !words_started {
                if sent.words[i].kind.is_word() {
                    words_started = true;
                } else {
                    leading_punct += 1;
                }
            }
            if !matches!(&sent.words[i].kind, TokenKind::Custom(k) if k == "style_span") {
                sent.words[i].next_word = Some(i + 1);
            }
            if words_started && word_remains[i] {
                if sent.words[i].kind.is_word()
                    || !self.rx_transparent.is_match(&sent.words[i].wf)
                {
                    sent.words[i].sentence_index = Some(i - leading_punct);
                    max_word_num = i - leading_punct;
                } else {
                    leading_punct += 1;
                }
            }
        }
        if max_word_num > 0 {
            for w in &mut sent.words {
                if let Some(idx) = w.sentence_index {
                    w.sentence_index_neg = Some(max_word_num - idx);
                }
            }
        }
    }
}

/// Appends the words, text and alignment spans of `right` onto `left`.
///
/// With `absolute_offsets`, all offsets are taken as referring to the
/// whole source text and the gap between the two spans is preserved;
/// otherwise both sentences are already self-contained and `right` is
/// shifted past `left`'s text plus one joining space.
fn join_sentences(left: &mut Sentence, mut right: Sentence, absolute_offsets: bool) {
    if right.words.is_empty() {
        return;
    }
    let (n_spaces, shift) = if absolute_offsets {
        let left_end = left.words.last().map_or(0, |w| w.off_end);
        (right.words[0].off_start.saturating_sub(left_end), 0)
    } else {
        (1, left.text.len() + 1)
    };
    if shift > 0 {
        for w in &mut right.words {
            w.off_start += shift;
            w.off_end += shift;
        }
    }
    left.words.append(&mut right.words);
    left.text.push_str(&" ".repeat(n_spaces));
    left.text.push_str(&right.text);
    shift_spans(&mut left.src_alignment, right.src_alignment, shift);
    shift_spans(&mut left.para_alignment, right.para_alignment, shift);
    shift_spans(&mut left.style_spans, right.style_spans, shift);
}

fn shift_spans(left: &mut Vec<AlignSpan>, right: Vec<AlignSpan>, shift: usize) {
    for mut span in right {
        span.off_start += shift;
        span.off_end += shift;
        span.off_start_sent = span.off_start_sent.map(|v| v + shift);
        span.off_end_sent = span.off_end_sent.map(|v| v + shift);
        left.push(span);
    }
}

/// The nearest word-form at or after `start`, or the empty string.
fn next_word(tokens: &[Token], start: usize) -> &str {
    tokens
        .iter()
        .skip(start)
        .find(|t| t.kind.is_word())
        .map_or("", |t| t.wf.as_str())
}

fn compile_or_default(pattern: &str, default: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(rx) => rx,
        Err(err) => {
            warn!("invalid pattern {pattern:?}, falling back to {default:?}: {err}");
            Regex::new(default).expect("default pattern compiles")
        }
    }
}
