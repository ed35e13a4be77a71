//! Tokenization of normalized text.
//!
//! The tokenizer performs a single left-to-right scan over the input,
//! producing typed tokens that carry exact byte offsets into the text
//! they were cut from. Configured special-token patterns are tried at
//! every position before generic scanning, split rules can break one
//! token into its capture groups, and a final fusion pass joins
//! hyphenated and clitic fragments back into single words.

use crate::config::{PipelineConfig, TokenTemplate};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker word-form emitted for a literal newline character.
pub const NEWLINE_MARKER: &str = "\\n";

// Word characters in the tokenizer's sense; everything that is neither
// a word character nor a space counts as punctuation.
static RX_WORD_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").unwrap());

/// Token kind.
///
/// `Custom` kinds can only enter the token stream through special-token
/// templates; the scanner itself produces only words and punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenKind {
    /// A word token.
    Word,
    /// A punctuation token.
    Punct,
    /// A template-defined kind.
    Custom(String),
}

impl TokenKind {
    /// Whether this is a word token.
    pub fn is_word(&self) -> bool {
        matches!(self, TokenKind::Word)
    }

    /// Whether this is a punctuation token.
    pub fn is_punct(&self) -> bool {
        matches!(self, TokenKind::Punct)
    }
}

impl From<String> for TokenKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "word" => TokenKind::Word,
            "punct" => TokenKind::Punct,
            _ => TokenKind::Custom(name),
        }
    }
}

impl From<TokenKind> for String {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Word => "word".to_string(),
            TokenKind::Punct => "punct".to_string(),
            TokenKind::Custom(name) => name,
        }
    }
}

/// A token with its position in the text it was produced from.
///
/// For every scanner-produced token, `wf` equals the text slice at
/// `[off_start, off_end)`; special-token templates may substitute a
/// different literal form. Offsets are byte offsets, absolute until the
/// segmenter rebases them to the owning sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface word-form.
    pub wf: String,
    /// Token kind.
    #[serde(rename = "wtype")]
    pub kind: TokenKind,
    /// Start offset (bytes).
    pub off_start: usize,
    /// End offset (bytes, exclusive).
    pub off_end: usize,
    /// Position of the following token within the sentence.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_word: Option<usize>,
    /// Zero-based word ordinal within the sentence.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sentence_index: Option<usize>,
    /// Mirrored backward word ordinal within the sentence.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sentence_index_neg: Option<usize>,
}

impl Token {
    /// Creates a new token without sentence-level numbering.
    pub fn new(wf: String, kind: TokenKind, off_start: usize, off_end: usize) -> Self {
        Self {
            wf,
            kind,
            off_start,
            off_end,
            next_word: None,
            sentence_index: None,
            sentence_index_neg: None,
        }
    }

    /// Whether this token is the newline marker.
    pub fn is_newline_marker(&self) -> bool {
        self.kind.is_punct() && self.wf == NEWLINE_MARKER
    }
}

/// A token being accumulated during the scan. Always carries at least
/// one character of word-form, so a formless token cannot exist.
struct PartialToken {
    off_start: usize,
    kind: TokenKind,
    wf: String,
}

impl PartialToken {
    fn start(off_start: usize, c: char, kind: TokenKind) -> Self {
        Self {
            off_start,
            kind,
            wf: c.to_string(),
        }
    }

    fn close(self, off_end: usize) -> Token {
        Token::new(self.wf, self.kind, self.off_start, off_end)
    }
}

/// A token plus its provenance during one `tokenize` call. Tokens
/// built from special-token templates are exempt from the fusion pass.
struct ScannedToken {
    token: Token,
    special: bool,
}

struct SpecialRule {
    regex: Regex,
    template: TokenTemplate,
}

impl std::fmt::Debug for SpecialRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialRule")
            .field("regex", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

/// Tokenizer that splits normalized text into offset-bearing tokens.
#[derive(Debug)]
pub struct Tokenizer {
    split_rules: Vec<Regex>,
    special_rules: Vec<SpecialRule>,
    non_word_internal_punct: Vec<String>,
}

impl Tokenizer {
    /// Creates a tokenizer from the shared configuration.
    ///
    /// Invalid patterns are dropped with a warning rather than failing
    /// construction, so one bad corpus setting cannot halt a batch.
    pub fn new(config: &PipelineConfig) -> Self {
        let mut split_rules = Vec::new();
        for pattern in &config.split_tokens {
            let anchored = Self::anchor(pattern);
            match Regex::new(&anchored) {
                Ok(rx) => split_rules.push(rx),
                Err(err) => warn!("dropping invalid split-token pattern {pattern:?}: {err}"),
            }
        }
        let mut special_rules = Vec::new();
        for (pattern, template) in &config.special_tokens {
            // Anchored so the rule can only match at the scan position.
            match Regex::new(&format!("^(?:{pattern})")) {
                Ok(rx) => special_rules.push(SpecialRule {
                    regex: rx,
                    template: template.clone(),
                }),
                Err(err) => warn!("dropping invalid special-token pattern {pattern:?}: {err}"),
            }
        }
        Self {
            split_rules,
            special_rules,
            non_word_internal_punct: config.non_word_internal_punct.clone(),
        }
    }

    /// Creates a tokenizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(&PipelineConfig::default())
    }

    /// Tokenizes text into a sequence of offset-bearing tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<ScannedToken> = Vec::new();
        let mut cur: Option<PartialToken> = None;
        let mut pos = 0;
        while let Some(c) = text[pos..].chars().next() {
            if c == ' ' {
                if let Some(tok) = cur.take() {
                    self.add_token(&mut tokens, tok.close(pos));
                }
                pos += 1;
                continue;
            }
            if c == '\n' {
                if let Some(tok) = cur.take() {
                    self.add_token(&mut tokens, tok.close(pos));
                }
                tokens.push(ScannedToken {
                    token: Token::new(NEWLINE_MARKER.to_string(), TokenKind::Punct, pos, pos + 1),
                    special: false,
                });
                pos += 1;
                continue;
            }
            if let Some((token, match_len)) = self.match_special(text, pos) {
                if let Some(tok) = cur.take() {
                    self.add_token(&mut tokens, tok.close(pos));
                }
                // Special tokens are emitted as built; neither split
                // rules nor the fusion pass apply to them.
                tokens.push(ScannedToken {
                    token,
                    special: true,
                });
                pos += match_len;
                continue;
            }
            // A token opens on the bare punctuation class; while one is
            // under construction, excluded word-internal punctuation
            // also counts as a class boundary.
            let b_punct = is_punct_char(c) || (cur.is_some() && self.is_excluded_char(c));
            let same_class = cur.as_ref().is_some_and(|tok| tok.kind.is_punct() == b_punct);
            if same_class {
                if let Some(tok) = cur.as_mut() {
                    tok.wf.push(c);
                }
            } else {
                if let Some(done) = cur.take() {
                    self.add_token(&mut tokens, done.close(pos));
                }
                let kind = if b_punct {
                    TokenKind::Punct
                } else {
                    TokenKind::Word
                };
                cur = Some(PartialToken::start(pos, c, kind));
            }
            pos += c.len_utf8();
        }
        if let Some(tok) = cur.take() {
            self.add_token(&mut tokens, tok.close(text.len()));
        }
        self.join_hyphens(tokens)
    }

    /// Tries every special-token pattern at the given position, in
    /// configuration order. Returns the built token and the length of
    /// the matched text.
    ///
    /// The built token is final: it is never routed through the split
    /// rules, even when its kind is `word`, so a recognized special
    /// token always enters the stream atomically.
    fn match_special(&self, text: &str, pos: usize) -> Option<(Token, usize)> {
        for rule in &self.special_rules {
            let Some(m) = rule.regex.find(&text[pos..]) else {
                continue;
            };
            if m.as_str().is_empty() {
                continue;
            }
            let kind = rule
                .template
                .wtype
                .clone()
                .map_or(TokenKind::Word, TokenKind::from);
            let wf = rule
                .template
                .wf
                .clone()
                .unwrap_or_else(|| m.as_str().to_string());
            return Some((Token::new(wf, kind, pos, pos + m.end()), m.end()));
        }
        None
    }

    /// Appends a token, splitting it first if a split rule matches its
    /// full word-form. Only the first matching rule applies; a rule
    /// with no usable capture group leaves the token whole.
    fn add_token(&self, tokens: &mut Vec<ScannedToken>, token: Token) {
        if !token.kind.is_word() {
            tokens.push(ScannedToken {
                token,
                special: false,
            });
            return;
        }
        for rule in &self.split_rules {
            let Some(caps) = rule.captures(&token.wf) else {
                continue;
            };
            let mut parts = Vec::new();
            for group in caps.iter().skip(1).flatten() {
                if !group.as_str().is_empty() {
                    parts.push(ScannedToken {
                        token: Token::new(
                            group.as_str().to_string(),
                            token.kind.clone(),
                            token.off_start + group.start(),
                            token.off_start + group.end(),
                        ),
                        special: false,
                    });
                }
            }
            if parts.is_empty() {
                tokens.push(ScannedToken {
                    token,
                    special: false,
                });
            } else {
                tokens.extend(parts);
            }
            return;
        }
        tokens.push(ScannedToken {
            token,
            special: false,
        });
    }

    /// Fuses hyphenated and clitic fragments into single word tokens.
    ///
    /// Each incoming token is compared only against the last token
    /// already placed in the output. Two gapless words merge when no
    /// split rules are configured or the left one ends in a hyphen; a
    /// gapless word-punctuation-word triple merges into one word when
    /// the punctuation is not excluded from word-internal use. Merged
    /// tokens stay eligible for further chaining; special tokens never
    /// take part on either side.
    fn join_hyphens(&self, tokens: Vec<ScannedToken>) -> Vec<Token> {
        let mut joined: Vec<ScannedToken> = Vec::with_capacity(tokens.len());
        let mut iter = tokens.into_iter().peekable();
        while let Some(scanned) = iter.next() {
            let Some(last) = joined.last_mut().filter(|last| !last.special) else {
                joined.push(scanned);
                continue;
            };
            if scanned.special {
                joined.push(scanned);
                continue;
            }
            let token = scanned.token;
            if token.kind.is_word()
                && last.token.kind.is_word()
                && last.token.off_end == token.off_start
                && (self.split_rules.is_empty() || last.token.wf.ends_with('-'))
            {
                fuse(&mut last.token, token);
            } else if token.kind.is_punct()
                && !self.is_excluded_joiner(&token.wf)
                && last.token.kind.is_word()
                && last.token.off_end == token.off_start
                && iter.peek().is_some_and(|next| {
                    !next.special
                        && next.token.kind.is_word()
                        && next.token.off_start == token.off_end
                })
            {
                fuse(&mut last.token, token);
                if let Some(next) = iter.next() {
                    fuse(&mut last.token, next.token);
                }
            } else {
                joined.push(ScannedToken {
                    token,
                    special: false,
                });
            }
        }
        joined.into_iter().map(|s| s.token).collect()
    }

    /// Whether a punctuation word-form may not join two words: it is
    /// listed in `non_word_internal_punct`, or contains a listed
    /// character.
    fn is_excluded_joiner(&self, wf: &str) -> bool {
        if self.non_word_internal_punct.iter().any(|p| p == wf) {
            return true;
        }
        wf.chars().any(|c| self.is_excluded_char(c))
    }

    fn is_excluded_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        let s: &str = c.encode_utf8(&mut buf);
        self.non_word_internal_punct.iter().any(|p| p == s)
    }

    /// Anchors a split pattern at both ends so it can only match a full
    /// word-form.
    fn anchor(pattern: &str) -> String {
        let mut anchored = String::with_capacity(pattern.len() + 2);
        if !pattern.starts_with('^') {
            anchored.push('^');
        }
        anchored.push_str(pattern);
        if !pattern.ends_with('$') {
            anchored.push('$');
        }
        anchored
    }
}

fn fuse(left: &mut Token, right: Token) {
    left.wf.push_str(&right.wf);
    left.off_end = right.off_end;
    left.kind = TokenKind::Word;
}

fn is_punct_char(c: char) -> bool {
    if c == ' ' {
        return false;
    }
    let mut buf = [0u8; 4];
    !RX_WORD_CHAR.is_match(c.encode_utf8(&mut buf))
}
