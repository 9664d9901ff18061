//! esfront_parser: Recursive descent parser for ES2015+ with Flow and JSX.
//!
//! Produces a positioned [`File`] tree with the token stream and every
//! comment, or the first [`ParseError`]. Grammar extensions are enabled per
//! parse through [`ParseOptions::plugins`].

mod comments;
mod expression;
mod lval;
mod options;
mod parser;
mod plugins;
mod statement;

use std::borrow::Cow;

use esfront_ast::File;
use esfront_diagnostics::ParseError;
use tracing::debug;

pub use options::{ParseOptions, Plugin};
pub use parser::Parser;

/// Parse `input` into a [`File`]. `\r\n` sequences are normalized to `\n`
/// first, so every offset and location refers to the normalized text.
pub fn parse(input: &str, options: &ParseOptions) -> Result<File, ParseError> {
    let source = normalize_line_endings(input);
    debug!(
        len = source.len(),
        source_type = ?options.source_type,
        plugins = ?options.plugins,
        "parsing"
    );
    Parser::new(&source, options).parse()
}

/// Replace each `\r\n` with `\n`, borrowing when there is none.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}
