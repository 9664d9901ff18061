//! Source comments.

use esfront_core::text::{SourceLocation, TextPos};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    CommentBlock,
    CommentLine,
}

/// A `/* */` or `//` comment. `value` excludes the delimiters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub value: String,
    pub start: TextPos,
    pub end: TextPos,
    pub loc: SourceLocation,
}

impl Comment {
    pub fn is_block(&self) -> bool {
        self.kind == CommentKind::CommentBlock
    }
}
