//! Tokenizer override hooks for dialect plugins.
//!
//! Plugins are kept in an ordered table. Each hook receives a [`Chain`]
//! cursor pointing at the next plugin; calling the matching `*_from` method
//! on the tokenizer with that cursor runs the rest of the chain and finally
//! the base implementation.

use esfront_ast::TokenKind;
use esfront_diagnostics::PResult;

use crate::tokenizer::Tokenizer;

/// Position in a plugin table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chain(usize);

impl Chain {
    pub const START: Chain = Chain(0);

    #[inline]
    pub fn next(self) -> Chain {
        Chain(self.0 + 1)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tokenizer-level overrides. Every method defaults to delegating.
pub trait TokenizerPlugin: Send + Sync {
    /// Read the token starting with `code` at `state.pos`.
    fn read_token(&self, tok: &mut Tokenizer<'_>, next: Chain, code: char) -> PResult<()> {
        tok.read_token_from(next, code)
    }

    /// Update the context stack after a token of kind `state.kind` was
    /// finished, `prev` being the kind before it.
    fn update_context(&self, tok: &mut Tokenizer<'_>, next: Chain, prev: TokenKind) {
        tok.update_context_from(next, prev)
    }

    /// Whether `word` reads as a keyword token.
    fn is_keyword(&self, tok: &Tokenizer<'_>, next: Chain, word: &str) -> bool {
        tok.is_keyword_from(next, word)
    }
}
