//! Tokens produced by the tokenizer and recorded in the token list.

use esfront_core::text::{SourceLocation, TextPos};
use serde::Serialize;

use crate::comment::Comment;
use crate::token_kind::TokenKind;

/// The value carried by a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// Punctuation without text (`(`, `;`, end of input, ...).
    None,
    /// Identifier names, keyword and operator text, cooked string values,
    /// template chunks and JSX text.
    Str(String),
    Num(f64),
    Regex { pattern: String, flags: String },
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            TokenValue::Num(n) => Some(*n),
            _ => None,
        }
    }
}

/// A finished token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: TextPos,
    pub end: TextPos,
    pub loc: SourceLocation,
}

/// An entry of the token list: tokens and comments interleaved by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenOrComment {
    Token(Token),
    Comment(Comment),
}

impl TokenOrComment {
    pub fn start(&self) -> TextPos {
        match self {
            TokenOrComment::Token(t) => t.start,
            TokenOrComment::Comment(c) => c.start,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenOrComment::Token(t) => Some(t),
            TokenOrComment::Comment(_) => None,
        }
    }
}
