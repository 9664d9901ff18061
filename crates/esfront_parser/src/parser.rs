//! The parser core.
//!
//! A recursive descent parser over the on-demand [`Tokenizer`]. Node
//! construction, token helpers, speculation and the top-level entry live
//! here; the grammar is split over `expression`, `statement` and `lval`,
//! and dialect overrides come in through the plugin table.

use esfront_ast::{File, Node, NodeId, NodeKind, TokenKind};
use esfront_core::text::{has_line_break, Position, SourceLocation, TextPos};
use esfront_diagnostics::{PResult, ParseError};
use esfront_tokenizer::{State, Tokenizer};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::comments::Attached;
use crate::options::ParseOptions;
use crate::plugins::{self, ParserPlugin};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Where a node under construction started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeStart {
    pub pos: TextPos,
    pub loc: Position,
}

impl NodeStart {
    pub fn of(node: &Node) -> Self {
        Self { pos: node.start, loc: node.loc.start }
    }
}

/// A value parsed where it may still be converted into a pattern.
/// `shorthand_default` is the offset of the first `=` of a shorthand
/// property default (`{a = 1}`) inside it. That `=` is legal only once the
/// value becomes an assignment target; otherwise parsing fails there.
#[derive(Debug)]
pub(crate) struct MaybePattern<T = Node> {
    pub value: T,
    pub shorthand_default: Option<TextPos>,
}

impl<T> MaybePattern<T> {
    pub fn new(value: T) -> Self {
        Self { value, shorthand_default: None }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.shorthand_default.is_some()
    }

    /// The value used as a plain expression.
    pub fn expression(self, p: &Parser<'_>) -> PResult<T> {
        match self.shorthand_default {
            Some(pos) => p.unexpected(Some(pos)),
            None => Ok(self.value),
        }
    }
}

pub struct Parser<'a> {
    pub(crate) tok: Tokenizer<'a>,
    pub(crate) options: ParseOptions,
    pub(crate) plugins: Vec<&'static dyn ParserPlugin>,
    next_id: u32,
    /// Comments attached to finished nodes, moved onto the tree once the
    /// parse succeeds.
    pub(crate) attached: FxHashMap<NodeId, Attached>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser over `input`, which must already have `\r\n`
    /// normalized to `\n`.
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        let (parser_plugins, tokenizer_plugins) = plugins::plugin_tables(options);
        let mut tok =
            Tokenizer::new(input, options.source_type, options.strict_mode).with_plugins(tokenizer_plugins);
        tok.skip_shebang();
        Self {
            tok,
            options: options.clone(),
            plugins: parser_plugins,
            next_id: 1,
            attached: FxHashMap::default(),
            recursion_depth: 0,
        }
    }

    /// Parse the whole input into a [`File`].
    pub fn parse(mut self) -> Result<File, ParseError> {
        let file_start = self.start_node();
        let program_start = self.start_node();
        self.tok.next_token()?;

        let (body, directives) = self.parse_block_body(true, true, TokenKind::Eof)?;
        let program = self.finish_node(
            program_start,
            NodeKind::Program { source_type: self.options.source_type, body, directives },
        );
        let (tokens, comments) = self.tok.take_output();
        debug!(tokens = tokens.len(), comments = comments.len(), "parse finished");

        let id = self.alloc_id();
        let end = self.state().last_tok_end;
        let end_loc = self.state().last_tok_end_loc;
        self.process_comment(id, file_start.pos, end);

        let mut file = File {
            id,
            start: file_start.pos,
            end,
            loc: SourceLocation::new(file_start.loc, end_loc),
            program,
            comments,
            tokens,
            leading_comments: None,
            trailing_comments: None,
            inner_comments: None,
        };
        self.transfer_comments(&mut file);
        Ok(file)
    }

    // ========================================================================
    // State access
    // ========================================================================

    #[inline]
    pub(crate) fn state(&self) -> &State {
        &self.tok.state
    }

    #[inline]
    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.tok.state
    }

    #[inline]
    pub(crate) fn in_module(&self) -> bool {
        self.tok.in_module()
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    #[inline]
    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.tok.is(kind)
    }

    #[inline]
    pub(crate) fn next(&mut self) -> PResult<()> {
        self.tok.next()
    }

    #[inline]
    pub(crate) fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        self.tok.eat(kind)
    }

    /// The current token's text, or the empty string for valueless tokens.
    pub(crate) fn value_string(&self) -> String {
        self.tok.value_str().unwrap_or_default().to_string()
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.eat(kind)? {
            Ok(())
        } else {
            self.unexpected(None)
        }
    }

    pub(crate) fn raise<T>(&self, pos: TextPos, message: &str) -> PResult<T> {
        self.tok.raise(pos, message)
    }

    pub(crate) fn unexpected<T>(&self, pos: Option<TextPos>) -> PResult<T> {
        self.tok.unexpected(pos)
    }

    /// Is the current token the identifier `name`, unescaped or not?
    pub(crate) fn is_contextual(&self, name: &str) -> bool {
        self.is(TokenKind::Name) && self.tok.value_str() == Some(name)
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> PResult<bool> {
        if self.is_contextual(name) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> PResult<()> {
        if self.eat_contextual(name)? {
            Ok(())
        } else {
            self.unexpected(None)
        }
    }

    /// Is the current token the relational operator `op` (`<` or `>`)?
    pub(crate) fn is_relational(&self, op: &str) -> bool {
        self.is(TokenKind::Relational) && self.tok.value_str() == Some(op)
    }

    pub(crate) fn eat_relational(&mut self, op: &str) -> PResult<bool> {
        if self.is_relational(op) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_relational(&mut self, op: &str) -> PResult<()> {
        if self.eat_relational(op)? {
            Ok(())
        } else {
            self.unexpected(None)
        }
    }

    /// Could a semicolon be inserted before the current token?
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        let state = self.state();
        self.is(TokenKind::Eof)
            || self.is(TokenKind::BraceR)
            || has_line_break(self.tok.slice(state.last_tok_end, state.start))
    }

    /// Consume a `;` or accept an inserted one.
    pub(crate) fn is_line_terminator(&mut self) -> PResult<bool> {
        Ok(self.eat(TokenKind::Semi)? || self.can_insert_semicolon())
    }

    pub(crate) fn semicolon(&mut self) -> PResult<()> {
        if self.is_line_terminator()? {
            Ok(())
        } else {
            self.unexpected(None)
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    pub(crate) fn start_node(&self) -> NodeStart {
        NodeStart { pos: self.state().start, loc: self.state().start_loc }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Finish a node ending at the end of the previous token.
    pub(crate) fn finish_node(&mut self, start: NodeStart, kind: NodeKind) -> Node {
        let end = self.state().last_tok_end;
        let end_loc = self.state().last_tok_end_loc;
        self.finish_node_at(start, kind, end, end_loc)
    }

    pub(crate) fn finish_node_at(&mut self, start: NodeStart, kind: NodeKind, end: TextPos, end_loc: Position) -> Node {
        let id = self.alloc_id();
        let skip_comments = matches!(&kind, NodeKind::Program { body, .. } if !body.is_empty());
        let node = Node::new(id, kind, start.pos, end, SourceLocation::new(start.loc, end_loc));
        if !skip_comments {
            self.process_comment(id, start.pos, end);
        }
        node
    }

    /// Extend an already finished node to the end of the previous token.
    pub(crate) fn refinish(&mut self, node: &mut Node) {
        let end = self.state().last_tok_end;
        let end_loc = self.state().last_tok_end_loc;
        self.refinish_at(node, end, end_loc);
    }

    pub(crate) fn refinish_at(&mut self, node: &mut Node, end: TextPos, end_loc: Position) {
        node.end = end;
        node.loc.end = end_loc;
        self.process_comment(node.id, node.start, end);
    }

    /// Copy a node under a fresh identity, attached comments included.
    pub(crate) fn clone_node(&mut self, node: &Node) -> Node {
        let mut copy = node.clone();
        copy.id = self.alloc_id();
        if let Some(attached) = self.attached.get(&node.id).cloned() {
            self.attached.insert(copy.id, attached);
        }
        copy
    }

    // ========================================================================
    // Speculation and nesting
    // ========================================================================

    /// Run `parse` speculatively. On a syntax error everything it consumed
    /// is rolled back and `None` is returned; other errors propagate.
    pub(crate) fn try_parse<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        let checkpoint = self.tok.checkpoint();
        let attached = self.attached.clone();
        let depth = self.recursion_depth;
        match parse(self) {
            Ok(value) => Ok(Some(value)),
            Err(ParseError::Syntax(err)) => {
                debug!(pos = err.pos, message = %err.message, "speculative parse rolled back");
                self.tok.rewind(checkpoint);
                self.attached = attached;
                self.recursion_depth = depth;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn enter_nested(&mut self) -> PResult<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            let state = self.state();
            return Err(ParseError::NestingTooDeep { pos: state.start, loc: state.start_loc });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn leave_nested(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }
}
