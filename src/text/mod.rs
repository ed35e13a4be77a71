//! Text processing module: normalization, tokenization, and sentence
//! segmentation.

mod normalizer;
mod segmenter;
mod tokenizer;

pub use normalizer::Normalizer;
pub use segmenter::{AlignSpan, Segmenter, Sentence};
pub use tokenizer::{Token, TokenKind, Tokenizer, NEWLINE_MARKER};
