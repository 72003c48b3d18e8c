// Pipeline ingestion: CSV lexing and preview sampling

pub mod preview;
pub mod tokenizer;

pub use preview::{preview, PreviewSample, PREVIEW_SAMPLE_ROWS};
pub use tokenizer::{tokenize, tokenize_line};
