//! esfront_tokenizer: On-demand lexer for JavaScript source text.
//!
//! The tokenizer reads one token at a time on request from the parser and
//! tracks a stack of [`TokenContext`]s to decide the ambiguous cases:
//! - `/` as division or regular expression
//! - `{` as block or object literal
//! - template chunks versus `${` substitutions
//! - JSX text and tag tokens
//!
//! Dialect plugins hook token reading through [`TokenizerPlugin`].

mod context;
mod plugin;
mod state;
mod tokenizer;

pub use context::TokenContext;
pub use plugin::{Chain, TokenizerPlugin};
pub use state::{CommentStackEntry, Label, LabelKind, MethodKind, State, TokenSnapshot};
pub use tokenizer::{Checkpoint, Lookahead, Tokenizer};
