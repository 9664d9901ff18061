//! esfront_core: Core utilities for the esfront JavaScript parser.
//!
//! Provides source positions, the offset-to-line map, character
//! classification and the keyword/reserved-word tables shared by the
//! tokenizer and the parser.

pub mod chars;
pub mod text;
pub mod words;

// Re-export commonly used types
pub use text::{LineMap, Position, SourceLocation};
