//! The JavaScript tokenizer.
//!
//! Tokens are read on demand: the parser calls [`Tokenizer::next`] and
//! inspects `state.kind`/`state.value`. Every finished token updates the
//! context stack, and the context stack decides how the next one is read.
//! Offsets are byte offsets into the input.

use esfront_ast::{Comment, CommentKind, SourceType, Token, TokenKind, TokenOrComment, TokenValue};
use esfront_core::chars::{is_identifier_char, is_identifier_start, is_non_ascii_whitespace};
use esfront_core::text::{has_line_break, LineMap, Position, SourceLocation, TextPos};
use esfront_diagnostics::{format_message, messages, PResult, ParseError, SyntaxError};
use tracing::trace;

use crate::context::TokenContext;
use crate::plugin::{Chain, TokenizerPlugin};
use crate::state::State;

/// The token after the current one, as seen by [`Tokenizer::lookahead`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lookahead {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: TextPos,
    pub end: TextPos,
}

/// Everything needed to rewind the tokenizer to an earlier token.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    state: State,
    tokens_len: usize,
    comments_len: usize,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pub state: State,
    /// Finished tokens and comments in source order.
    tokens: Vec<TokenOrComment>,
    comments: Vec<Comment>,
    in_module: bool,
    /// Set while reading a lookahead token: nothing is recorded.
    is_lookahead: bool,
    plugins: Vec<&'static dyn TokenizerPlugin>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned before the first token. Strict mode is
    /// on only for module code with `strict_mode` set.
    pub fn new(input: &'a str, source_type: SourceType, strict_mode: bool) -> Self {
        let in_module = source_type == SourceType::Module;
        Self {
            input,
            state: State::new(strict_mode && in_module),
            tokens: Vec::new(),
            comments: Vec::new(),
            in_module,
            is_lookahead: false,
            plugins: Vec::new(),
        }
    }

    /// Install the plugin table. The first entry runs first.
    pub fn with_plugins(mut self, plugins: Vec<&'static dyn TokenizerPlugin>) -> Self {
        self.plugins = plugins;
        self
    }

    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    #[inline]
    pub fn in_module(&self) -> bool {
        self.in_module
    }

    #[inline]
    pub fn tokens(&self) -> &[TokenOrComment] {
        &self.tokens
    }

    #[inline]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Hand over the recorded tokens and comments.
    pub fn take_output(&mut self) -> (Vec<TokenOrComment>, Vec<Comment>) {
        (std::mem::take(&mut self.tokens), std::mem::take(&mut self.comments))
    }

    // ========================================================================
    // Token-level API used by the parser
    // ========================================================================

    /// Is the current token of `kind`?
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.state.kind == kind
    }

    /// The current token's text value, if it has one.
    #[inline]
    pub fn value_str(&self) -> Option<&str> {
        self.state.value.as_str()
    }

    /// Record the current token and move to the next one.
    pub fn next(&mut self) -> PResult<()> {
        if !self.is_lookahead {
            let token = self.current_token();
            self.tokens.push(TokenOrComment::Token(token));
        }
        self.state.last_tok_end = self.state.end;
        self.state.last_tok_start = self.state.start;
        self.state.last_tok_end_loc = self.state.end_loc;
        self.state.last_tok_start_loc = self.state.start_loc;
        self.next_token()
    }

    /// Consume the current token if it is of `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.is(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Read the token after the current one without consuming anything.
    pub fn lookahead(&mut self) -> PResult<Lookahead> {
        let saved = self.state.snapshot_token();
        self.is_lookahead = true;
        let result = self.next();
        self.is_lookahead = false;
        let ahead = Lookahead {
            kind: self.state.kind,
            value: std::mem::replace(&mut self.state.value, TokenValue::None),
            start: self.state.start,
            end: self.state.end,
        };
        self.state.restore_token(saved);
        result.map(|()| ahead)
    }

    /// Snapshot for a speculative parse. Labels, decorators, comment
    /// buffers and function flags can all change during one, so the whole
    /// state is saved.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint { state: self.state.clone(), tokens_len: self.tokens.len(), comments_len: self.comments.len() }
    }

    /// Rewind to `checkpoint`, dropping tokens and comments read since.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.tokens.truncate(checkpoint.tokens_len);
        self.comments.truncate(checkpoint.comments_len);
    }

    /// Switch strict mode. A numeric or string token already read under the
    /// old mode is read again, since octal rules depend on strictness.
    pub fn set_strict(&mut self, strict: bool) -> PResult<()> {
        self.state.strict = strict;
        if !self.is(TokenKind::Num) && !self.is(TokenKind::String) {
            return Ok(());
        }
        self.state.pos = self.state.start;
        while self.state.pos < self.state.line_start {
            let before = &self.input[..(self.state.line_start - 1) as usize];
            self.state.line_start = before.rfind('\n').map_or(0, |i| i as TextPos + 1);
            self.state.cur_line -= 1;
        }
        self.next_token()
    }

    #[inline]
    pub fn cur_context(&self) -> TokenContext {
        self.state.context.last().copied().unwrap_or(TokenContext::BraceStatement)
    }

    /// Skip `#!...` at the very start of the input.
    pub fn skip_shebang(&mut self) {
        if self.state.pos == 0 && self.input.starts_with("#!") {
            self.skip_line_comment(2);
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Build a syntax error at `pos`.
    pub fn error_at(&self, pos: TextPos, message: &str) -> ParseError {
        SyntaxError::at(self.input, pos, message).into()
    }

    pub fn raise<T>(&self, pos: TextPos, message: &str) -> PResult<T> {
        Err(self.error_at(pos, message))
    }

    /// "Unexpected token" at `pos`, or at the current token.
    pub fn unexpected<T>(&self, pos: Option<TextPos>) -> PResult<T> {
        self.raise(pos.unwrap_or(self.state.start), messages::UNEXPECTED_TOKEN)
    }

    // ========================================================================
    // Character access
    // ========================================================================

    /// Byte at `pos`, or 0 past the end.
    #[inline]
    pub fn byte_at(&self, pos: TextPos) -> u8 {
        self.input.as_bytes().get(pos as usize).copied().unwrap_or(0)
    }

    /// Full character starting at `pos`.
    #[inline]
    pub fn char_at(&self, pos: TextPos) -> Option<char> {
        self.input.get(pos as usize..)?.chars().next()
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.state.pos as usize >= self.input.len()
    }

    #[inline]
    pub fn slice(&self, start: TextPos, end: TextPos) -> &'a str {
        &self.input[start as usize..end as usize]
    }

    /// Does a line terminator start at `pos`?
    pub fn is_new_line_at(&self, pos: TextPos) -> bool {
        match self.byte_at(pos) {
            b'\n' | b'\r' => true,
            0xE2 => self.byte_at(pos + 1) == 0x80 && matches!(self.byte_at(pos + 2), 0xA8 | 0xA9),
            _ => false,
        }
    }

    /// Consume the line terminator at `pos`, treating `\r\n` as one, and
    /// start a new line. Returns the terminator text.
    pub fn read_new_line(&mut self, normalize_crlf: bool) -> &'a str {
        let start = self.state.pos;
        let len = match self.byte_at(start) {
            b'\r' if self.byte_at(start + 1) == b'\n' => 2,
            b'\r' | b'\n' => 1,
            _ => 3,
        };
        self.state.pos += len;
        self.state.cur_line += 1;
        self.state.line_start = self.state.pos;
        if len == 2 && normalize_crlf {
            "\n"
        } else {
            self.slice(start, start + len)
        }
    }

    // ========================================================================
    // Token boundaries
    // ========================================================================

    fn current_token(&self) -> Token {
        Token {
            kind: self.state.kind,
            value: self.state.value.clone(),
            start: self.state.start,
            end: self.state.end,
            loc: SourceLocation::new(self.state.start_loc, self.state.end_loc),
        }
    }

    /// Read the next token into the state.
    pub fn next_token(&mut self) -> PResult<()> {
        let context = self.cur_context();
        if !context.preserve_space() {
            self.skip_space()?;
        }
        self.state.contains_octal = false;
        self.state.octal_position = None;
        self.state.start = self.state.pos;
        self.state.start_loc = self.state.cur_position();

        let Some(code) = self.char_at(self.state.pos) else {
            return self.finish_token(TokenKind::Eof, TokenValue::None);
        };
        if context == TokenContext::QuoteTemplate {
            self.read_tmpl_token()
        } else {
            self.read_token(code)
        }
    }

    /// Close the current token at `pos` and update the context stack.
    pub fn finish_token(&mut self, kind: TokenKind, value: TokenValue) -> PResult<()> {
        self.state.end = self.state.pos;
        self.state.end_loc = self.state.cur_position();
        let prev = self.state.kind;
        self.state.kind = kind;
        self.state.value = value;
        self.update_context(prev);
        Ok(())
    }

    /// Finish an operator token of `size` bytes whose value is its text.
    pub fn finish_op(&mut self, kind: TokenKind, size: u32) -> PResult<()> {
        let text = self.slice(self.state.pos, self.state.pos + size);
        self.state.pos += size;
        self.finish_token(kind, TokenValue::Str(text.to_string()))
    }

    // ========================================================================
    // Plugin chains
    // ========================================================================

    pub fn read_token(&mut self, code: char) -> PResult<()> {
        self.read_token_from(Chain::START, code)
    }

    pub fn read_token_from(&mut self, chain: Chain, code: char) -> PResult<()> {
        match self.plugins.get(chain.index()).copied() {
            Some(plugin) => plugin.read_token(self, chain.next(), code),
            None => self.read_token_base(code),
        }
    }

    pub fn update_context(&mut self, prev: TokenKind) {
        self.update_context_from(Chain::START, prev)
    }

    pub fn update_context_from(&mut self, chain: Chain, prev: TokenKind) {
        match self.plugins.get(chain.index()).copied() {
            Some(plugin) => plugin.update_context(self, chain.next(), prev),
            None => self.update_context_base(prev),
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is_keyword_from(Chain::START, word)
    }

    pub fn is_keyword_from(&self, chain: Chain, word: &str) -> bool {
        match self.plugins.get(chain.index()).copied() {
            Some(plugin) => plugin.is_keyword(self, chain.next(), word),
            None => esfront_core::words::is_keyword(word),
        }
    }

    fn read_token_base(&mut self, code: char) -> PResult<()> {
        if is_identifier_start(code) || code == '\\' {
            return self.read_word();
        }
        self.get_token_from_code(code)
    }

    // ========================================================================
    // Context tracking
    // ========================================================================

    fn update_context_base(&mut self, prev: TokenKind) {
        let kind = self.state.kind;
        if kind.is_keyword() && prev == TokenKind::Dot {
            self.state.expr_allowed = false;
            return;
        }
        match kind {
            TokenKind::ParenR | TokenKind::BraceR => {
                if self.state.context.len() == 1 {
                    self.state.expr_allowed = true;
                    return;
                }
                let out = self.state.context.pop().unwrap_or(TokenContext::BraceStatement);
                if out == TokenContext::BraceStatement && self.cur_context() == TokenContext::FunctionExpression {
                    self.state.context.pop();
                    self.state.expr_allowed = false;
                } else if out == TokenContext::BraceTemplate {
                    self.state.expr_allowed = true;
                } else {
                    self.state.expr_allowed = !out.is_expr();
                }
            }
            TokenKind::Name => {
                self.state.expr_allowed = false;
                if matches!(prev, TokenKind::Let | TokenKind::Const | TokenKind::Var)
                    && has_line_break(&self.input[self.state.end as usize..])
                {
                    self.state.expr_allowed = true;
                }
            }
            TokenKind::BraceL => {
                let context = if self.brace_is_block(prev) {
                    TokenContext::BraceStatement
                } else {
                    TokenContext::BraceExpression
                };
                trace!(pos = self.state.start, %context, "push brace context");
                self.state.context.push(context);
                self.state.expr_allowed = true;
            }
            TokenKind::DollarBraceL => {
                self.state.context.push(TokenContext::BraceTemplate);
                self.state.expr_allowed = true;
            }
            TokenKind::ParenL => {
                let statement_parens =
                    matches!(prev, TokenKind::If | TokenKind::For | TokenKind::With | TokenKind::While);
                self.state.context.push(if statement_parens {
                    TokenContext::ParenStatement
                } else {
                    TokenContext::ParenExpression
                });
                self.state.expr_allowed = true;
            }
            TokenKind::IncDec => {}
            TokenKind::Function => {
                if self.cur_context() == TokenContext::BraceStatement {
                    self.state.context.push(TokenContext::FunctionExpression);
                }
                self.state.expr_allowed = false;
            }
            TokenKind::BackQuote => {
                if self.cur_context() == TokenContext::QuoteTemplate {
                    self.state.context.pop();
                } else {
                    self.state.context.push(TokenContext::QuoteTemplate);
                }
                self.state.expr_allowed = false;
            }
            TokenKind::JsxTagStart => {
                self.state.context.push(TokenContext::JsxExpression);
                self.state.context.push(TokenContext::JsxOpenTag);
                self.state.expr_allowed = false;
            }
            TokenKind::JsxTagEnd => {
                let out = self.state.context.pop();
                if (out == Some(TokenContext::JsxOpenTag) && prev == TokenKind::Slash)
                    || out == Some(TokenContext::JsxCloseTag)
                {
                    self.state.context.pop();
                    self.state.expr_allowed = self.cur_context() == TokenContext::JsxExpression;
                } else {
                    self.state.expr_allowed = true;
                }
            }
            _ => self.state.expr_allowed = kind.before_expr(),
        }
    }

    /// Does a `{` following a `prev` token open a block?
    pub fn brace_is_block(&self, prev: TokenKind) -> bool {
        match prev {
            TokenKind::Colon
                if matches!(self.cur_context(), TokenContext::BraceStatement | TokenContext::BraceExpression) =>
            {
                !self.cur_context().is_expr()
            }
            TokenKind::Return => has_line_break(self.slice(self.state.last_tok_end, self.state.start)),
            TokenKind::Else | TokenKind::Semi | TokenKind::Eof | TokenKind::ParenR => true,
            TokenKind::BraceL => self.cur_context() == TokenContext::BraceStatement,
            _ => !self.state.expr_allowed,
        }
    }

    // ========================================================================
    // Whitespace and comments
    // ========================================================================

    fn push_comment(&mut self, kind: CommentKind, value: &str, start: TextPos, start_loc: Position) {
        if self.is_lookahead {
            return;
        }
        let comment = Comment {
            kind,
            value: value.to_string(),
            start,
            end: self.state.pos,
            loc: SourceLocation::new(start_loc, self.state.cur_position()),
        };
        self.tokens.push(TokenOrComment::Comment(comment.clone()));
        self.comments.push(comment.clone());
        self.state.trailing_comments.push(comment.clone());
        self.state.leading_comments.push(comment);
    }

    fn skip_block_comment(&mut self) -> PResult<()> {
        let start_loc = self.state.cur_position();
        let start = self.state.pos;
        let body_start = start + 2;
        let Some(offset) = memchr::memmem::find(&self.input.as_bytes()[body_start as usize..], b"*/") else {
            return self.raise(start, messages::UNTERMINATED_COMMENT);
        };
        let end = body_start + offset as TextPos;
        self.state.pos = end + 2;

        let lines = LineMap::new(self.slice(start, end));
        if lines.line_count() > 1 {
            let last = (lines.line_count() - 1) as u32;
            self.state.cur_line += last;
            self.state.line_start = start + lines.line_start(last);
        }
        let value = self.slice(body_start, end);
        self.push_comment(CommentKind::CommentBlock, value, start, start_loc);
        Ok(())
    }

    /// Skip a line comment whose opening delimiter is `start_skip` bytes.
    pub fn skip_line_comment(&mut self, start_skip: u32) {
        let start = self.state.pos;
        let start_loc = self.state.cur_position();
        let body_start = start + start_skip;
        let bytes = &self.input.as_bytes()[body_start as usize..];
        let mut end = self.input.len() as TextPos;
        for offset in memchr::memchr3_iter(b'\n', b'\r', 0xE2, bytes) {
            let at = body_start + offset as TextPos;
            if self.is_new_line_at(at) {
                end = at;
                break;
            }
        }
        self.state.pos = end;
        let value = self.slice(body_start, end);
        self.push_comment(CommentKind::CommentLine, value, start, start_loc);
    }

    /// Skip whitespace and comments, counting lines.
    pub fn skip_space(&mut self) -> PResult<()> {
        while let Some(ch) = self.char_at(self.state.pos) {
            match ch {
                ' ' | '\u{a0}' => self.state.pos += ch.len_utf8() as TextPos,
                '\r' | '\n' | '\u{2028}' | '\u{2029}' => {
                    self.read_new_line(true);
                }
                '/' => match self.byte_at(self.state.pos + 1) {
                    b'*' => self.skip_block_comment()?,
                    b'/' => self.skip_line_comment(2),
                    _ => break,
                },
                _ if ('\u{9}'..='\u{d}').contains(&ch) || is_non_ascii_whitespace(ch) => {
                    self.state.pos += ch.len_utf8() as TextPos;
                }
                _ => break,
            }
        }
        Ok(())
    }

    // ========================================================================
    // Punctuation and operators
    // ========================================================================

    fn read_token_dot(&mut self) -> PResult<()> {
        let next = self.byte_at(self.state.pos + 1);
        if next.is_ascii_digit() {
            return self.read_number(true);
        }
        if next == b'.' && self.byte_at(self.state.pos + 2) == b'.' {
            self.state.pos += 3;
            return self.finish_token(TokenKind::Ellipsis, TokenValue::None);
        }
        self.state.pos += 1;
        self.finish_token(TokenKind::Dot, TokenValue::None)
    }

    fn read_token_slash(&mut self) -> PResult<()> {
        if self.state.expr_allowed {
            self.state.pos += 1;
            return self.read_regexp();
        }
        if self.byte_at(self.state.pos + 1) == b'=' {
            self.finish_op(TokenKind::Assign, 2)
        } else {
            self.finish_op(TokenKind::Slash, 1)
        }
    }

    fn read_token_mult_modulo(&mut self, code: u8) -> PResult<()> {
        let mut kind = if code == b'*' { TokenKind::Star } else { TokenKind::Modulo };
        let mut width = 1;
        let mut next = self.byte_at(self.state.pos + 1);
        if next == b'*' {
            width += 1;
            next = self.byte_at(self.state.pos + 2);
            kind = TokenKind::Exponent;
        }
        if next == b'=' {
            width += 1;
            kind = TokenKind::Assign;
        }
        self.finish_op(kind, width)
    }

    fn read_token_pipe_amp(&mut self, code: u8) -> PResult<()> {
        let next = self.byte_at(self.state.pos + 1);
        if next == code {
            let kind = if code == b'|' { TokenKind::LogicalOr } else { TokenKind::LogicalAnd };
            return self.finish_op(kind, 2);
        }
        if next == b'=' {
            return self.finish_op(TokenKind::Assign, 2);
        }
        let kind = if code == b'|' { TokenKind::BitwiseOr } else { TokenKind::BitwiseAnd };
        self.finish_op(kind, 1)
    }

    fn read_token_caret(&mut self) -> PResult<()> {
        if self.byte_at(self.state.pos + 1) == b'=' {
            self.finish_op(TokenKind::Assign, 2)
        } else {
            self.finish_op(TokenKind::BitwiseXor, 1)
        }
    }

    fn read_token_plus_min(&mut self, code: u8) -> PResult<()> {
        let next = self.byte_at(self.state.pos + 1);
        if next == code {
            if next == b'-'
                && self.byte_at(self.state.pos + 2) == b'>'
                && has_line_break(self.slice(self.state.last_tok_end, self.state.pos))
            {
                // `-->` at the start of a line is an HTML close comment.
                self.skip_line_comment(3);
                self.skip_space()?;
                return self.next_token();
            }
            return self.finish_op(TokenKind::IncDec, 2);
        }
        if next == b'=' {
            self.finish_op(TokenKind::Assign, 2)
        } else {
            self.finish_op(TokenKind::PlusMin, 1)
        }
    }

    fn read_token_lt_gt(&mut self, code: u8) -> PResult<()> {
        let next = self.byte_at(self.state.pos + 1);
        if next == code {
            let size = if code == b'>' && self.byte_at(self.state.pos + 2) == b'>' { 3 } else { 2 };
            if self.byte_at(self.state.pos + size) == b'=' {
                return self.finish_op(TokenKind::Assign, size + 1);
            }
            return self.finish_op(TokenKind::BitShift, size);
        }
        if next == b'!'
            && code == b'<'
            && self.byte_at(self.state.pos + 2) == b'-'
            && self.byte_at(self.state.pos + 3) == b'-'
        {
            // `<!--` opens an HTML comment, which module code does not allow.
            if self.in_module {
                return self.unexpected(None);
            }
            self.skip_line_comment(4);
            self.skip_space()?;
            return self.next_token();
        }
        if next == b'=' {
            let size = if self.byte_at(self.state.pos + 2) == b'=' { 3 } else { 2 };
            return self.finish_op(TokenKind::Relational, size);
        }
        self.finish_op(TokenKind::Relational, 1)
    }

    fn read_token_eq_excl(&mut self, code: u8) -> PResult<()> {
        let next = self.byte_at(self.state.pos + 1);
        if next == b'=' {
            let size = if self.byte_at(self.state.pos + 2) == b'=' { 3 } else { 2 };
            return self.finish_op(TokenKind::Equality, size);
        }
        if code == b'=' && next == b'>' {
            self.state.pos += 2;
            return self.finish_token(TokenKind::Arrow, TokenValue::None);
        }
        let kind = if code == b'=' { TokenKind::Eq } else { TokenKind::Prefix };
        self.finish_op(kind, 1)
    }

    fn finish_punctuation(&mut self, kind: TokenKind) -> PResult<()> {
        self.state.pos += 1;
        self.finish_token(kind, TokenValue::None)
    }

    /// Read a punctuation, operator, number or string token.
    pub fn get_token_from_code(&mut self, code: char) -> PResult<()> {
        let byte = if code.is_ascii() { code as u8 } else { 0 };
        match byte {
            b'.' => self.read_token_dot(),
            b'(' => self.finish_punctuation(TokenKind::ParenL),
            b')' => self.finish_punctuation(TokenKind::ParenR),
            b';' => self.finish_punctuation(TokenKind::Semi),
            b',' => self.finish_punctuation(TokenKind::Comma),
            b'[' => self.finish_punctuation(TokenKind::BracketL),
            b']' => self.finish_punctuation(TokenKind::BracketR),
            b'{' => self.finish_punctuation(TokenKind::BraceL),
            b'}' => self.finish_punctuation(TokenKind::BraceR),
            b':' => {
                if self.byte_at(self.state.pos + 1) == b':' {
                    self.finish_op(TokenKind::DoubleColon, 2)
                } else {
                    self.finish_punctuation(TokenKind::Colon)
                }
            }
            b'?' => self.finish_punctuation(TokenKind::Question),
            b'@' => self.finish_punctuation(TokenKind::At),
            b'`' => self.finish_punctuation(TokenKind::BackQuote),
            b'0' => match self.byte_at(self.state.pos + 1) {
                b'x' | b'X' => self.read_radix_number(16),
                b'o' | b'O' => self.read_radix_number(8),
                b'b' | b'B' => self.read_radix_number(2),
                _ => self.read_number(false),
            },
            b'1'..=b'9' => self.read_number(false),
            b'"' | b'\'' => self.read_string(byte),
            b'/' => self.read_token_slash(),
            b'%' | b'*' => self.read_token_mult_modulo(byte),
            b'|' | b'&' => self.read_token_pipe_amp(byte),
            b'^' => self.read_token_caret(),
            b'+' | b'-' => self.read_token_plus_min(byte),
            b'<' | b'>' => self.read_token_lt_gt(byte),
            b'=' | b'!' => self.read_token_eq_excl(byte),
            b'~' => self.finish_op(TokenKind::Prefix, 1),
            _ => {
                let message = format_message(messages::UNEXPECTED_CHARACTER_0, &[&code.to_string()]);
                self.raise(self.state.pos, &message)
            }
        }
    }

    // ========================================================================
    // Regular expressions
    // ========================================================================

    fn read_regexp(&mut self) -> PResult<()> {
        let start = self.state.pos;
        let mut escaped = false;
        let mut in_class = false;
        loop {
            if self.at_end() || self.is_new_line_at(self.state.pos) {
                return self.raise(start, messages::UNTERMINATED_REGEXP);
            }
            let ch = self.byte_at(self.state.pos);
            if escaped {
                escaped = false;
            } else {
                match ch {
                    b'[' => in_class = true,
                    b']' if in_class => in_class = false,
                    b'/' if !in_class => break,
                    _ => {}
                }
                escaped = ch == b'\\';
            }
            self.state.pos += 1;
        }
        let pattern = self.slice(start, self.state.pos).to_string();
        self.state.pos += 1;

        let flags = self.read_word1()?;
        if !flags.chars().all(|c| "gmsiyu".contains(c)) {
            return self.raise(start, messages::INVALID_REGEXP_FLAG);
        }
        self.finish_token(TokenKind::Regexp, TokenValue::Regex { pattern, flags })
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Read digits in `radix`. With `len`, exactly that many must be read.
    fn read_int(&mut self, radix: u32, len: Option<u32>) -> Option<f64> {
        let start = self.state.pos;
        let mut total = 0f64;
        let mut count = 0u32;
        while len.map_or(true, |len| count < len) {
            let Some(digit) = esfront_core::chars::digit_value(self.byte_at(self.state.pos), radix) else {
                break;
            };
            self.state.pos += 1;
            total = total * f64::from(radix) + f64::from(digit);
            count += 1;
        }
        if self.state.pos == start || len.is_some_and(|len| count != len) {
            return None;
        }
        Some(total)
    }

    fn check_no_identifier_after_number(&self) -> PResult<()> {
        if self.char_at(self.state.pos).is_some_and(is_identifier_start) {
            return self.raise(self.state.pos, messages::IDENTIFIER_AFTER_NUMBER);
        }
        Ok(())
    }

    fn read_radix_number(&mut self, radix: u32) -> PResult<()> {
        self.state.pos += 2;
        let Some(value) = self.read_int(radix, None) else {
            let message = format_message(messages::EXPECTED_NUMBER_IN_RADIX_0, &[&radix.to_string()]);
            return self.raise(self.state.start + 2, &message);
        };
        self.check_no_identifier_after_number()?;
        self.finish_token(TokenKind::Num, TokenValue::Num(value))
    }

    fn read_number(&mut self, starts_with_dot: bool) -> PResult<()> {
        let start = self.state.pos;
        let octal = self.byte_at(start) == b'0';
        let mut is_float = false;

        if !starts_with_dot && self.read_int(10, None).is_none() {
            return self.raise(start, messages::INVALID_NUMBER);
        }
        let mut next = self.byte_at(self.state.pos);
        if next == b'.' {
            self.state.pos += 1;
            self.read_int(10, None);
            is_float = true;
            next = self.byte_at(self.state.pos);
        }
        if next == b'e' || next == b'E' {
            self.state.pos += 1;
            if matches!(self.byte_at(self.state.pos), b'+' | b'-') {
                self.state.pos += 1;
            }
            if self.read_int(10, None).is_none() {
                return self.raise(start, messages::INVALID_NUMBER);
            }
            is_float = true;
        }
        self.check_no_identifier_after_number()?;

        let text = self.slice(start, self.state.pos);
        let value = if is_float || !octal || text.len() == 1 {
            match text.parse::<f64>() {
                Ok(value) => value,
                Err(_) => return self.raise(start, messages::INVALID_NUMBER),
            }
        } else if text.contains(['8', '9']) || self.state.strict {
            return self.raise(start, messages::INVALID_NUMBER);
        } else {
            text.bytes().fold(0f64, |total, b| total * 8.0 + f64::from(b - b'0'))
        };
        self.finish_token(TokenKind::Num, TokenValue::Num(value))
    }

    // ========================================================================
    // Strings, templates and escapes
    // ========================================================================

    /// Read `\u{XXXX}` or `\uXXXX` after the `u`.
    fn read_code_point(&mut self) -> PResult<u32> {
        if self.byte_at(self.state.pos) != b'{' {
            return self.read_hex_char(4);
        }
        self.state.pos += 1;
        let code_pos = self.state.pos;
        let close = self.input[code_pos as usize..].find('}');
        let code = match close {
            Some(len) => self.read_hex_char(len as u32)?,
            None => return self.raise(code_pos, messages::BAD_ESCAPE_SEQUENCE),
        };
        self.state.pos += 1;
        if code > 0x10FFFF {
            return self.raise(code_pos, messages::CODE_POINT_OUT_OF_BOUNDS);
        }
        Ok(code)
    }

    fn read_hex_char(&mut self, len: u32) -> PResult<u32> {
        let code_pos = self.state.pos;
        match self.read_int(16, Some(len)) {
            Some(value) => Ok(value.min(f64::from(u32::MAX)) as u32),
            None => self.raise(code_pos, messages::BAD_ESCAPE_SEQUENCE),
        }
    }

    fn read_string(&mut self, quote: u8) -> PResult<()> {
        let mut out = String::new();
        self.state.pos += 1;
        let mut chunk_start = self.state.pos;
        loop {
            if self.at_end() {
                return self.raise(self.state.start, messages::UNTERMINATED_STRING);
            }
            let ch = self.byte_at(self.state.pos);
            if ch == quote {
                break;
            }
            if ch == b'\\' {
                out.push_str(self.slice(chunk_start, self.state.pos));
                self.read_escaped_char(false, &mut out)?;
                chunk_start = self.state.pos;
            } else {
                if self.is_new_line_at(self.state.pos) {
                    return self.raise(self.state.start, messages::UNTERMINATED_STRING);
                }
                self.state.pos += 1;
            }
        }
        out.push_str(self.slice(chunk_start, self.state.pos));
        self.state.pos += 1;
        self.finish_token(TokenKind::String, TokenValue::Str(out))
    }

    /// Read a template chunk, or the `` ` ``/`${` right at the token start.
    pub fn read_tmpl_token(&mut self) -> PResult<()> {
        let mut out = String::new();
        let mut chunk_start = self.state.pos;
        loop {
            if self.at_end() {
                return self.raise(self.state.start, messages::UNTERMINATED_TEMPLATE);
            }
            let ch = self.byte_at(self.state.pos);
            if ch == b'`' || (ch == b'$' && self.byte_at(self.state.pos + 1) == b'{') {
                if self.state.pos == self.state.start && self.is(TokenKind::Template) {
                    if ch == b'$' {
                        self.state.pos += 2;
                        return self.finish_token(TokenKind::DollarBraceL, TokenValue::None);
                    }
                    self.state.pos += 1;
                    return self.finish_token(TokenKind::BackQuote, TokenValue::None);
                }
                out.push_str(self.slice(chunk_start, self.state.pos));
                return self.finish_token(TokenKind::Template, TokenValue::Str(out));
            }
            if ch == b'\\' {
                out.push_str(self.slice(chunk_start, self.state.pos));
                self.read_escaped_char(true, &mut out)?;
                chunk_start = self.state.pos;
            } else if self.is_new_line_at(self.state.pos) {
                out.push_str(self.slice(chunk_start, self.state.pos));
                // Cooked template text turns every CR and CRLF into LF.
                match self.read_new_line(true) {
                    "\r" => out.push('\n'),
                    terminator => out.push_str(terminator),
                }
                chunk_start = self.state.pos;
            } else {
                self.state.pos += 1;
            }
        }
    }

    /// Decode the escape sequence at `pos` (a backslash) into `out`.
    fn read_escaped_char(&mut self, in_template: bool, out: &mut String) -> PResult<()> {
        self.state.pos += 1;
        let Some(ch) = self.char_at(self.state.pos) else {
            return Ok(());
        };
        self.state.pos += ch.len_utf8() as TextPos;
        match ch {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'x' => {
                let code = self.read_hex_char(2)?;
                out.push(code_point_to_char(code));
            }
            'u' => {
                let code = self.read_code_point()?;
                out.push(code_point_to_char(code));
            }
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'v' => out.push('\u{b}'),
            'f' => out.push('\u{c}'),
            '\r' | '\n' => {
                // Line continuation.
                if ch == '\r' && self.byte_at(self.state.pos) == b'\n' {
                    self.state.pos += 1;
                }
                self.state.line_start = self.state.pos;
                self.state.cur_line += 1;
            }
            '0'..='7' => {
                let digits_start = self.state.pos - 1;
                let mut len = 1;
                while len < 3 && (b'0'..=b'7').contains(&self.byte_at(digits_start + len)) {
                    len += 1;
                }
                let mut octal = octal_value(self.slice(digits_start, digits_start + len));
                if octal > 255 {
                    len -= 1;
                    octal = octal_value(self.slice(digits_start, digits_start + len));
                }
                if octal > 0 {
                    if !self.state.contains_octal {
                        self.state.contains_octal = true;
                        self.state.octal_position = Some(self.state.pos - 2);
                    }
                    if self.state.strict || in_template {
                        return self.raise(self.state.pos - 2, messages::OCTAL_IN_STRICT_MODE);
                    }
                }
                self.state.pos += len - 1;
                out.push(code_point_to_char(octal));
            }
            _ => out.push(ch),
        }
        Ok(())
    }

    // ========================================================================
    // Identifiers and keywords
    // ========================================================================

    /// Read an identifier name, decoding `\u` escapes. Sets
    /// `state.contains_esc` when an escape was seen.
    pub fn read_word1(&mut self) -> PResult<String> {
        self.state.contains_esc = false;
        let mut word = String::new();
        let mut first = true;
        let mut chunk_start = self.state.pos;
        while let Some(ch) = self.char_at(self.state.pos) {
            if is_identifier_char(ch) {
                self.state.pos += ch.len_utf8() as TextPos;
            } else if ch == '\\' {
                self.state.contains_esc = true;
                word.push_str(self.slice(chunk_start, self.state.pos));
                let esc_start = self.state.pos;
                self.state.pos += 1;
                if self.byte_at(self.state.pos) != b'u' {
                    return self.raise(self.state.pos, messages::EXPECTING_UNICODE_ESCAPE);
                }
                self.state.pos += 1;
                let escaped = char::from_u32(self.read_code_point()?)
                    .filter(|&c| if first { is_identifier_start(c) } else { is_identifier_char(c) });
                let Some(escaped) = escaped else {
                    return self.raise(esc_start, messages::INVALID_UNICODE_ESCAPE);
                };
                word.push(escaped);
                chunk_start = self.state.pos;
            } else {
                break;
            }
            first = false;
        }
        word.push_str(self.slice(chunk_start, self.state.pos));
        Ok(word)
    }

    fn read_word(&mut self) -> PResult<()> {
        let word = self.read_word1()?;
        let kind = match TokenKind::keyword(&word) {
            Some(keyword) if !self.state.contains_esc && self.is_keyword(&word) => keyword,
            _ => TokenKind::Name,
        };
        self.finish_token(kind, TokenValue::Str(word))
    }
}

fn octal_value(digits: &str) -> u32 {
    digits.bytes().fold(0, |total, b| total * 8 + u32::from(b - b'0'))
}

/// Lone surrogates have no `char`; they decode to U+FFFD.
fn code_point_to_char(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(source: &str) -> Tokenizer<'_> {
        Tokenizer::new(source, SourceType::Script, true)
    }

    #[test]
    fn test_cur_position_tracks_lines() {
        let mut tok = tokenizer("a\n  b");
        tok.next_token().unwrap();
        tok.next().unwrap();
        assert_eq!(tok.state.start_loc, Position::new(2, 2));
        assert_eq!(tok.state.start, 4);
    }

    #[test]
    fn test_lookahead_restores_state() {
        let mut tok = tokenizer("a /* c */ b");
        tok.next_token().unwrap();
        let ahead = tok.lookahead().unwrap();
        assert_eq!(ahead.kind, TokenKind::Name);
        assert_eq!(ahead.value, TokenValue::Str("b".into()));
        assert_eq!(tok.state.value, TokenValue::Str("a".into()));
        assert!(tok.comments().is_empty());
        assert!(tok.state.leading_comments.is_empty());
    }

    #[test]
    fn test_lookahead_keeps_context_and_position() {
        let mut tok = tokenizer("(a\n/b/)");
        tok.next_token().unwrap();
        tok.next().unwrap();
        let context = tok.state.context.clone();
        let ahead = tok.lookahead().unwrap();
        assert_eq!(ahead.kind, TokenKind::Slash);
        assert_eq!(tok.state.context, context);
        assert_eq!(tok.state.pos, 2);
        assert_eq!(tok.state.cur_line, 1);
        assert_eq!(tok.state.last_tok_end, 1);
        assert!(!tok.state.expr_allowed);
    }

    #[test]
    fn test_checkpoint_rewind() {
        let mut tok = tokenizer("a // c\nb c");
        tok.next_token().unwrap();
        let checkpoint = tok.checkpoint();
        tok.next().unwrap();
        tok.next().unwrap();
        assert_eq!(tok.tokens().len(), 3);
        tok.rewind(checkpoint);
        assert!(tok.tokens().is_empty());
        assert!(tok.comments().is_empty());
        assert_eq!(tok.state.value, TokenValue::Str("a".into()));
    }

    #[test]
    fn test_brace_is_block_after_return_newline() {
        let mut tok = tokenizer("return\n{}");
        tok.next_token().unwrap();
        tok.next().unwrap();
        assert_eq!(tok.cur_context(), TokenContext::BraceStatement);
        assert_eq!(tok.state.context.len(), 2);
    }

    #[test]
    fn test_octal_value() {
        assert_eq!(octal_value("377"), 255);
        assert_eq!(octal_value("7"), 7);
    }
}
