//! Token contexts.
//!
//! The context stack records which bracketed construct the tokenizer is in.
//! It is what lets the tokenizer tell a regular expression from a division
//! and a block from an object literal without help from the parser.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenContext {
    /// `{` opening a block.
    BraceStatement,
    /// `{` opening an object literal or pattern.
    BraceExpression,
    /// `${` inside a template.
    BraceTemplate,
    /// `(` after `if`, `for`, `with` or `while`.
    ParenStatement,
    ParenExpression,
    /// Inside a template literal: space is significant and chunks are read
    /// as template tokens.
    QuoteTemplate,
    FunctionExpression,
    /// Inside `<tag ...>`.
    JsxOpenTag,
    /// Inside `</tag>`.
    JsxCloseTag,
    /// Between the tags of a JSX element.
    JsxExpression,
}

impl TokenContext {
    /// The opening text the context stands for.
    pub fn token(self) -> &'static str {
        match self {
            TokenContext::BraceStatement | TokenContext::BraceExpression => "{",
            TokenContext::BraceTemplate => "${",
            TokenContext::ParenStatement | TokenContext::ParenExpression => "(",
            TokenContext::QuoteTemplate => "`",
            TokenContext::FunctionExpression => "function",
            TokenContext::JsxOpenTag => "<tag",
            TokenContext::JsxCloseTag => "</tag",
            TokenContext::JsxExpression => "<tag>...</tag>",
        }
    }

    /// Whether closing this context ends an expression, so that a following
    /// `/` is division.
    #[inline]
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            TokenContext::BraceExpression
                | TokenContext::BraceTemplate
                | TokenContext::ParenExpression
                | TokenContext::FunctionExpression
                | TokenContext::JsxExpression
        )
    }

    /// Whether whitespace and comments are part of the content rather than
    /// skipped between tokens.
    #[inline]
    pub fn preserve_space(self) -> bool {
        matches!(self, TokenContext::QuoteTemplate | TokenContext::JsxExpression)
    }
}

impl fmt::Display for TokenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_flags() {
        assert!(!TokenContext::BraceStatement.is_expr());
        assert!(TokenContext::BraceExpression.is_expr());
        assert!(TokenContext::QuoteTemplate.preserve_space());
        assert!(!TokenContext::QuoteTemplate.is_expr());
        assert!(TokenContext::JsxExpression.preserve_space());
        assert!(TokenContext::JsxExpression.is_expr());
        assert_eq!(TokenContext::BraceTemplate.to_string(), "${");
    }
}
