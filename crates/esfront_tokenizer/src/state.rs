//! The mutable cursor shared by the tokenizer and the parser.
//!
//! A lookahead saves only the fields reading one token touches
//! ([`TokenSnapshot`]). A speculative parse may touch any field and saves a
//! full copy of the `State`.

use esfront_ast::{Comment, Node, NodeId, TokenKind, TokenValue};
use esfront_core::text::{Position, TextPos};

use crate::context::TokenContext;

/// What a label encloses, which decides what `break`/`continue` may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
}

/// The kind of method whose body is being parsed. Decides where `super`
/// and `super()` are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    ConstructorCall,
    Method,
    Get,
    Set,
}

impl MethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodKind::Constructor => "constructor",
            MethodKind::ConstructorCall => "constructorCall",
            MethodKind::Method => "method",
            MethodKind::Get => "get",
            MethodKind::Set => "set",
        }
    }
}

/// An entry of the label stack. Loops and switches push unnamed labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: Option<String>,
    pub kind: Option<LabelKind>,
    pub statement_start: Option<TextPos>,
}

/// A finished node waiting on the comment-attachment stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStackEntry {
    pub id: NodeId,
    pub start: TextPos,
    pub end: TextPos,
}

#[derive(Debug, Clone)]
pub struct State {
    pub strict: bool,

    // Parser flags
    pub potential_arrow_at: Option<TextPos>,
    pub in_method: Option<MethodKind>,
    pub in_function: bool,
    pub in_generator: bool,
    pub in_async: bool,
    pub in_type: bool,
    pub labels: Vec<Label>,
    /// Decorators parsed but not yet attached to a class or member.
    pub decorators: Vec<Node>,

    // Comment attachment buffers
    pub trailing_comments: Vec<Comment>,
    pub leading_comments: Vec<Comment>,
    pub comment_stack: Vec<CommentStackEntry>,

    // Cursor
    pub pos: TextPos,
    pub line_start: TextPos,
    /// 1-based line of `pos`.
    pub cur_line: u32,

    // Current token
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: TextPos,
    pub end: TextPos,
    pub start_loc: Position,
    pub end_loc: Position,

    // Previous token
    pub last_tok_start: TextPos,
    pub last_tok_end: TextPos,
    pub last_tok_start_loc: Position,
    pub last_tok_end_loc: Position,

    pub context: Vec<TokenContext>,
    /// Whether an expression may start at the current position, which makes
    /// `/` a regular expression and `<` a JSX tag.
    pub expr_allowed: bool,

    /// The current word contained a `\u` escape.
    pub contains_esc: bool,
    /// The current string contained a legacy octal escape.
    pub contains_octal: bool,
    pub octal_position: Option<TextPos>,
}

impl State {
    pub fn new(strict: bool) -> Self {
        let origin = Position::new(1, 0);
        Self {
            strict,
            potential_arrow_at: None,
            in_method: None,
            in_function: false,
            in_generator: false,
            in_async: false,
            in_type: false,
            labels: Vec::new(),
            decorators: Vec::new(),
            trailing_comments: Vec::new(),
            leading_comments: Vec::new(),
            comment_stack: Vec::new(),
            pos: 0,
            line_start: 0,
            cur_line: 1,
            kind: TokenKind::Eof,
            value: TokenValue::None,
            start: 0,
            end: 0,
            start_loc: origin,
            end_loc: origin,
            last_tok_start: 0,
            last_tok_end: 0,
            last_tok_start_loc: origin,
            last_tok_end_loc: origin,
            context: vec![TokenContext::BraceStatement],
            expr_allowed: true,
            contains_esc: false,
            contains_octal: false,
            octal_position: None,
        }
    }

    /// Line and column of `pos`.
    #[inline]
    pub fn cur_position(&self) -> Position {
        Position::new(self.cur_line, self.pos - self.line_start)
    }

    pub fn snapshot_token(&self) -> TokenSnapshot {
        TokenSnapshot {
            pos: self.pos,
            line_start: self.line_start,
            cur_line: self.cur_line,
            kind: self.kind,
            value: self.value.clone(),
            start: self.start,
            end: self.end,
            start_loc: self.start_loc,
            end_loc: self.end_loc,
            last_tok_start: self.last_tok_start,
            last_tok_end: self.last_tok_end,
            last_tok_start_loc: self.last_tok_start_loc,
            last_tok_end_loc: self.last_tok_end_loc,
            context: self.context.clone(),
            expr_allowed: self.expr_allowed,
            contains_esc: self.contains_esc,
            contains_octal: self.contains_octal,
            octal_position: self.octal_position,
        }
    }

    pub fn restore_token(&mut self, snapshot: TokenSnapshot) {
        self.pos = snapshot.pos;
        self.line_start = snapshot.line_start;
        self.cur_line = snapshot.cur_line;
        self.kind = snapshot.kind;
        self.value = snapshot.value;
        self.start = snapshot.start;
        self.end = snapshot.end;
        self.start_loc = snapshot.start_loc;
        self.end_loc = snapshot.end_loc;
        self.last_tok_start = snapshot.last_tok_start;
        self.last_tok_end = snapshot.last_tok_end;
        self.last_tok_start_loc = snapshot.last_tok_start_loc;
        self.last_tok_end_loc = snapshot.last_tok_end_loc;
        self.context = snapshot.context;
        self.expr_allowed = snapshot.expr_allowed;
        self.contains_esc = snapshot.contains_esc;
        self.contains_octal = snapshot.contains_octal;
        self.octal_position = snapshot.octal_position;
    }
}

/// The part of [`State`] that reading a single token changes: the cursor,
/// the current and previous token, the context stack and the per-token
/// flags. Comments are not recorded while looking ahead.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pos: TextPos,
    line_start: TextPos,
    cur_line: u32,
    kind: TokenKind,
    value: TokenValue,
    start: TextPos,
    end: TextPos,
    start_loc: Position,
    end_loc: Position,
    last_tok_start: TextPos,
    last_tok_end: TextPos,
    last_tok_start_loc: Position,
    last_tok_end_loc: Position,
    context: Vec<TokenContext>,
    expr_allowed: bool,
    contains_esc: bool,
    contains_octal: bool,
    octal_position: Option<TextPos>,
}
