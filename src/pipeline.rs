//! The per-document processing pipeline.

use crate::config::PipelineConfig;
use crate::text::{Normalizer, Segmenter, Sentence, Tokenizer};
use serde::Serialize;

/// The fully processed form of one raw document.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    /// The normalized document text.
    pub text: String,
    /// The document's sentences, in order.
    pub sentences: Vec<Sentence>,
}

/// One-document-in, sentence-list-out processing pipeline.
///
/// All configuration patterns are compiled once at construction; the
/// resulting value is immutable and can be shared across threads, so
/// any number of documents may be processed concurrently against the
/// same pipeline. Processing never fails: malformed input yields an
/// empty sentence list.
#[derive(Debug)]
pub struct Pipeline {
    normalizer: Normalizer,
    tokenizer: Tokenizer,
    segmenter: Segmenter,
}

impl Pipeline {
    /// Creates a pipeline from the shared configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
            tokenizer: Tokenizer::new(config),
            segmenter: Segmenter::new(config),
        }
    }

    /// Creates a pipeline with default configuration.
    pub fn default_config() -> Self {
        Self::new(&PipelineConfig::default())
    }

    /// Runs the full pipeline on one raw document body.
    pub fn process(&self, raw: &str) -> ProcessedDocument {
        let text = self.normalizer.clean(raw);
        let tokens = self.tokenizer.tokenize(&text);
        let sentences = self.segmenter.split(&tokens, &text);
        ProcessedDocument { text, sentences }
    }

    /// Runs the pipeline and keeps only the reconstructed sentence
    /// texts, the form consumed by bulk search indexing.
    pub fn sentence_texts(&self, raw: &str) -> Vec<String> {
        self.process(raw)
            .sentences
            .into_iter()
            .map(|s| s.text)
            .collect()
    }
}
