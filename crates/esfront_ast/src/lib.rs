//! esfront_ast: Token and syntax tree definitions.
//!
//! This crate defines the token-kind registry, tokens, comments, and the
//! [`Node`]/[`NodeKind`] tree, all serializable in the Babel-compatible JSON
//! shape.

pub mod comment;
pub mod node;
pub mod token;
pub mod token_kind;
pub mod visitor;

// Re-export key types
pub use comment::{Comment, CommentKind};
pub use node::*;
pub use token::{Token, TokenOrComment, TokenValue};
pub use token_kind::{TokenFlags, TokenKind, TokenSpec};
