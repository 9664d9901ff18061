//! Expression parsing.
//!
//! Operator precedence is resolved by `parse_expr_op` from the binop values
//! in the token registry. Object and array literals are parsed once as
//! expressions and converted to patterns afterwards when an `=` or `=>`
//! shows they were binding targets. Such values come back as a
//! [`MaybePattern`], which carries the position of any `{a = 1}` default
//! that is only legal in a pattern.

use esfront_ast::{Function, Node, NodeKind, RawValue, TemplateValue, TokenKind, TokenValue};
use esfront_core::text::TextPos;
use esfront_core::words::{is_strict_bind_reserved_word, is_strict_reserved_word};
use esfront_diagnostics::{format_message, messages, PResult};
use esfront_tokenizer::MethodKind;

use crate::parser::{MaybePattern, NodeStart, Parser};
use crate::statement::{ClassParts, FunctionParts};

/// The part of an object member parsed before its value: position, key and
/// decorators.
#[derive(Debug)]
pub(crate) struct PropHead {
    pub start: NodeStart,
    pub key: Node,
    pub computed: bool,
    pub decorators: Vec<Node>,
}

impl Parser<'_> {
    // ========================================================================
    // Sequences and assignment
    // ========================================================================

    /// Parse a full expression, comma sequences included.
    pub(crate) fn parse_expression(&mut self, no_in: bool) -> PResult<Node> {
        let start = self.start_node();
        let expr = self.parse_maybe_assign(no_in)?;
        if !self.is(TokenKind::Comma) {
            return Ok(expr);
        }
        let mut expressions = vec![expr];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_maybe_assign(no_in)?);
        }
        self.to_referenced_list(expressions.iter())?;
        Ok(self.finish_node(start, NodeKind::SequenceExpression { expressions }))
    }

    /// Like [`Parser::parse_expression`], but a shorthand default is left
    /// to the caller, which may still turn the expression into a pattern.
    pub(crate) fn parse_expression_deferred(&mut self, no_in: bool) -> PResult<MaybePattern> {
        let start = self.start_node();
        let first = self.parse_maybe_assign_deferred(no_in)?;
        if !self.is(TokenKind::Comma) {
            return Ok(first);
        }
        let mut shorthand_default = first.shorthand_default;
        let mut expressions = vec![first.value];
        while self.eat(TokenKind::Comma)? {
            let item = self.parse_maybe_assign_deferred(no_in)?;
            shorthand_default = shorthand_default.or(item.shorthand_default);
            expressions.push(item.value);
        }
        self.to_referenced_list(expressions.iter())?;
        let value = self.finish_node(start, NodeKind::SequenceExpression { expressions });
        Ok(MaybePattern { value, shorthand_default })
    }

    pub(crate) fn parse_maybe_assign(&mut self, no_in: bool) -> PResult<Node> {
        self.parse_maybe_assign_with(no_in, false)?.expression(self)
    }

    pub(crate) fn parse_maybe_assign_deferred(&mut self, no_in: bool) -> PResult<MaybePattern> {
        self.parse_maybe_assign_with(no_in, false)
    }

    /// Parse an assignment expression. With `paren_item` set, the left side
    /// is an item of a parenthesized list and goes through
    /// `parse_paren_item` before any assignment operator is considered.
    pub(crate) fn parse_maybe_assign_with(&mut self, no_in: bool, paren_item: bool) -> PResult<MaybePattern> {
        self.enter_nested()?;
        let result = self.parse_maybe_assign_inner(no_in, paren_item);
        self.leave_nested();
        result
    }

    fn parse_maybe_assign_inner(&mut self, no_in: bool, paren_item: bool) -> PResult<MaybePattern> {
        if self.is(TokenKind::Yield) && self.state().in_generator {
            return Ok(MaybePattern::new(self.parse_yield()?));
        }

        let start = self.start_node();
        if self.is(TokenKind::ParenL) || self.is(TokenKind::Name) {
            self.state_mut().potential_arrow_at = Some(start.pos);
        }

        let mut left = self.parse_maybe_conditional(no_in)?;
        if paren_item {
            left.value = self.parse_paren_item(left.value, start, false)?;
        }

        if self.state().kind.is_assign() {
            let operator = self.value_string();
            let left = left.value;
            let left = if self.is(TokenKind::Eq) { self.to_assignable(left, false)? } else { left };
            self.check_lval(&left, false, None)?;
            if left.is_parenthesized() {
                match left.kind {
                    NodeKind::ObjectPattern { .. } => return self.raise(left.start, messages::PARENTHESIZED_PATTERN),
                    NodeKind::ArrayPattern { .. } => {
                        return self.raise(left.start, messages::PARENTHESIZED_ARRAY_PATTERN)
                    }
                    _ => {}
                }
            }
            self.next()?;
            let right = self.parse_maybe_assign(no_in)?;
            return Ok(MaybePattern::new(self.finish_node(
                start,
                NodeKind::AssignmentExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    type_annotation: None,
                },
            )));
        }
        Ok(left)
    }

    fn parse_maybe_conditional(&mut self, no_in: bool) -> PResult<MaybePattern> {
        let start = self.start_node();
        let expr = self.parse_expr_ops(no_in)?;
        if expr.is_pending() || !self.eat(TokenKind::Question)? {
            return Ok(expr);
        }
        let consequent = self.parse_maybe_assign(false)?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_maybe_assign(no_in)?;
        Ok(MaybePattern::new(self.finish_node(
            start,
            NodeKind::ConditionalExpression {
                test: Box::new(expr.value),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        )))
    }

    // ========================================================================
    // Binary and unary operators
    // ========================================================================

    fn parse_expr_ops(&mut self, no_in: bool) -> PResult<MaybePattern> {
        let start = self.start_node();
        let expr = self.parse_maybe_unary()?;
        if expr.is_pending() {
            return Ok(expr);
        }
        Ok(MaybePattern::new(self.parse_expr_op(expr.value, start, -1, no_in)?))
    }

    /// Fold binary operators binding tighter than `min_prec` onto `left`.
    fn parse_expr_op(&mut self, left: Node, left_start: NodeStart, min_prec: i32, no_in: bool) -> PResult<Node> {
        let mut left = left;
        loop {
            let kind = self.state().kind;
            let Some(prec) = kind.binop().map(i32::from) else {
                return Ok(left);
            };
            if prec <= min_prec || (no_in && kind == TokenKind::In) {
                return Ok(left);
            }

            let operator = self.value_string();
            if operator == "**" {
                if let NodeKind::UnaryExpression { argument, .. } = &left.kind {
                    let extra = left.extra.as_deref();
                    let guarded = extra.is_some_and(|e| e.parenthesized || e.parenthesized_argument == Some(true));
                    if !guarded {
                        return self.raise(argument.start, messages::ILLEGAL_EXPONENT_LHS);
                    }
                }
            }
            self.next()?;

            let right_start = self.start_node();
            let right_prec = if kind.right_associative() { prec - 1 } else { prec };
            self.enter_nested()?;
            let right = self
                .parse_maybe_unary()
                .and_then(|unary| unary.expression(self))
                .and_then(|unary| self.parse_expr_op(unary, right_start, right_prec, no_in));
            self.leave_nested();
            let right = right?;

            let (left_box, right_box) = (Box::new(left), Box::new(right));
            let node_kind = if matches!(kind, TokenKind::LogicalOr | TokenKind::LogicalAnd) {
                NodeKind::LogicalExpression { operator, left: left_box, right: right_box }
            } else {
                NodeKind::BinaryExpression { operator, left: left_box, right: right_box }
            };
            left = self.finish_node(left_start, node_kind);
        }
    }

    pub(crate) fn parse_maybe_unary(&mut self) -> PResult<MaybePattern> {
        let start = self.start_node();
        if self.state().kind.is_prefix() {
            let update = self.is(TokenKind::IncDec);
            let operator = self.value_string();
            self.next()?;
            let parenthesized_argument = self.is(TokenKind::ParenL);

            self.enter_nested()?;
            let argument = self.parse_maybe_unary().and_then(|argument| argument.expression(self));
            self.leave_nested();
            let argument = argument?;

            if update {
                self.check_lval(&argument, false, None)?;
            } else if self.state().strict && operator == "delete" && argument.is_identifier() {
                return self.raise(start.pos, messages::DELETE_LOCAL_IN_STRICT);
            }

            let argument = Box::new(argument);
            let kind = if update {
                NodeKind::UpdateExpression { operator, prefix: true, argument }
            } else {
                NodeKind::UnaryExpression { operator, prefix: true, argument }
            };
            let mut node = self.finish_node(start, kind);
            node.extra_mut().parenthesized_argument = Some(parenthesized_argument);
            return Ok(MaybePattern::new(node));
        }

        let expr = self.parse_expr_subscripts()?;
        if expr.is_pending() {
            return Ok(expr);
        }
        let mut expr = expr.value;
        while self.state().kind.is_postfix() && !self.can_insert_semicolon() {
            let operator = self.value_string();
            self.check_lval(&expr, false, None)?;
            self.next()?;
            expr = self.finish_node(
                start,
                NodeKind::UpdateExpression { operator, prefix: false, argument: Box::new(expr) },
            );
        }
        Ok(MaybePattern::new(expr))
    }

    // ========================================================================
    // Calls and member access
    // ========================================================================

    pub(crate) fn parse_expr_subscripts(&mut self) -> PResult<MaybePattern> {
        let start = self.start_node();
        let potential_arrow_at = self.state().potential_arrow_at;
        let expr = self.parse_expr_atom()?;

        let is_arrow = matches!(expr.value.kind, NodeKind::ArrowFunctionExpression(_))
            && Some(expr.value.start) == potential_arrow_at;
        if is_arrow || expr.is_pending() {
            return Ok(expr);
        }
        Ok(MaybePattern::new(self.parse_subscripts(expr.value, start, false)?))
    }

    pub(crate) fn parse_subscripts(&mut self, base: Node, start: NodeStart, no_calls: bool) -> PResult<Node> {
        let mut base = base;
        loop {
            if !no_calls && self.eat(TokenKind::DoubleColon)? {
                let callee = self.parse_no_call_expr()?;
                let node = self.finish_node(
                    start,
                    NodeKind::BindExpression { object: Some(Box::new(base)), callee: Box::new(callee) },
                );
                return self.parse_subscripts(node, start, no_calls);
            } else if self.eat(TokenKind::Dot)? {
                let property = self.parse_identifier(true)?;
                base = self.finish_node(
                    start,
                    NodeKind::MemberExpression { object: Box::new(base), property: Box::new(property), computed: false },
                );
            } else if self.eat(TokenKind::BracketL)? {
                let property = self.parse_expression(false)?;
                self.expect(TokenKind::BracketR)?;
                base = self.finish_node(
                    start,
                    NodeKind::MemberExpression { object: Box::new(base), property: Box::new(property), computed: true },
                );
            } else if !no_calls && self.is(TokenKind::ParenL) {
                let possible_async = self.state().potential_arrow_at == Some(base.start)
                    && base.identifier_name() == Some("async")
                    && !self.can_insert_semicolon();
                self.next()?;
                let arguments = self.parse_call_expression_arguments(TokenKind::ParenR, true, possible_async)?;
                let mut call = self.finish_node(start, NodeKind::CallExpression { callee: Box::new(base), arguments });

                if possible_async && self.should_parse_async_arrow() {
                    let arguments = match call.take_kind() {
                        NodeKind::CallExpression { arguments, .. } => arguments,
                        _ => Vec::new(),
                    };
                    return self.parse_async_arrow_from_call(start, arguments, None);
                }
                if let NodeKind::CallExpression { arguments, .. } = &call.kind {
                    self.to_referenced_list(arguments.iter())?;
                }
                base = call;
            } else if self.is(TokenKind::BackQuote) {
                let quasi = self.parse_template()?;
                base = self.finish_node(
                    start,
                    NodeKind::TaggedTemplateExpression { tag: Box::new(base), quasi: Box::new(quasi) },
                );
            } else {
                return Ok(base);
            }
        }
    }

    fn parse_call_expression_arguments(
        &mut self,
        close: TokenKind,
        allow_trailing_comma: bool,
        possible_async_arrow: bool,
    ) -> PResult<Vec<Node>> {
        let mut inner_paren_start: Option<TextPos> = None;
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if allow_trailing_comma && self.eat(close)? {
                    break;
                }
            }
            if self.is(TokenKind::ParenL) && inner_paren_start.is_none() {
                inner_paren_start = Some(self.state().start);
            }
            if let Some(element) = self.parse_expr_list_item(false)?.expression(self)? {
                elements.push(element);
            }
        }
        if possible_async_arrow && inner_paren_start.is_some() && self.should_parse_async_arrow() {
            return self.unexpected(None);
        }
        Ok(elements)
    }

    pub(crate) fn should_parse_async_arrow_base(&mut self) -> bool {
        self.is(TokenKind::Arrow)
    }

    pub(crate) fn parse_async_arrow_from_call_base(
        &mut self,
        start: NodeStart,
        args: Vec<Node>,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        self.expect(TokenKind::Arrow)?;
        self.parse_arrow_expression(start, args, true, return_type)
    }

    /// Parse an expression with no call at its top level, as a `new` callee
    /// or the right side of `::`.
    fn parse_no_call_expr(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let atom = self.parse_expr_atom()?.expression(self)?;
        self.parse_subscripts(atom, start, true)
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    /// Array and object literals may come back with a pending shorthand
    /// default; every other atom is a plain expression.
    pub(crate) fn parse_expr_atom_base(&mut self) -> PResult<MaybePattern> {
        match self.state().kind {
            TokenKind::BracketL => {
                let start = self.start_node();
                self.next()?;
                let elements = self.parse_expr_list(TokenKind::BracketR, true, true)?;
                self.to_referenced_list(elements.value.iter().flatten())?;
                let value = self.finish_node(
                    start,
                    NodeKind::ArrayExpression { elements: elements.value, type_annotation: None },
                );
                Ok(MaybePattern { value, shorthand_default: elements.shorthand_default })
            }
            TokenKind::BraceL => self.parse_obj(false),
            _ => Ok(MaybePattern::new(self.parse_plain_atom()?)),
        }
    }

    fn parse_plain_atom(&mut self) -> PResult<Node> {
        let can_be_arrow = self.state().potential_arrow_at == Some(self.state().start);
        let start = self.start_node();

        let kind = self.state().kind;
        match kind {
            TokenKind::Super => {
                if self.state().in_method.is_none() && !self.options.allow_super_outside_method {
                    return self.raise(start.pos, messages::SUPER_OUTSIDE_METHOD);
                }
                self.next()?;
                if !self.is(TokenKind::ParenL) && !self.is(TokenKind::BracketL) && !self.is(TokenKind::Dot) {
                    return self.unexpected(None);
                }
                if self.is(TokenKind::ParenL)
                    && self.state().in_method != Some(MethodKind::Constructor)
                    && !self.options.allow_super_outside_method
                {
                    return self.raise(start.pos, messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR);
                }
                Ok(self.finish_node(start, NodeKind::Super))
            }

            TokenKind::This => {
                self.next()?;
                Ok(self.finish_node(start, NodeKind::ThisExpression))
            }

            TokenKind::Yield | TokenKind::Name => {
                if self.is(TokenKind::Yield) && self.state().in_generator {
                    return self.unexpected(None);
                }
                let allow_await = self.state().in_async && self.tok.value_str() == Some("await");
                let liberal = allow_await || self.should_allow_yield_identifier();
                let id = self.parse_identifier(liberal)?;

                match id.identifier_name() {
                    Some("await") if self.state().in_async || self.in_module() => return self.parse_await(start),
                    Some("async") if self.is(TokenKind::Function) && !self.can_insert_semicolon() => {
                        self.next()?;
                        let parts = FunctionParts { is_async: true, ..FunctionParts::default() };
                        return self.parse_function(start, parts, false, false, false);
                    }
                    Some("async") if can_be_arrow && self.is(TokenKind::Name) => {
                        let param = self.parse_identifier(false)?;
                        self.expect(TokenKind::Arrow)?;
                        return self.parse_arrow_expression(start, vec![param], true, None);
                    }
                    _ => {}
                }

                if can_be_arrow && !self.can_insert_semicolon() && self.eat(TokenKind::Arrow)? {
                    return self.parse_arrow_expression(start, vec![id], false, None);
                }
                Ok(id)
            }

            TokenKind::Do => {
                self.next()?;
                let old_in_function = self.state().in_function;
                let old_labels = std::mem::take(&mut self.state_mut().labels);
                self.state_mut().in_function = false;
                let body = self.parse_block(false)?;
                self.state_mut().in_function = old_in_function;
                self.state_mut().labels = old_labels;
                Ok(self.finish_node(start, NodeKind::DoExpression { body: Box::new(body) }))
            }

            TokenKind::Regexp => {
                let (pattern, flags) = match &self.state().value {
                    TokenValue::Regex { pattern, flags } => (pattern.clone(), flags.clone()),
                    _ => (String::new(), String::new()),
                };
                self.parse_literal(NodeKind::RegExpLiteral { pattern, flags }, None)
            }

            TokenKind::Num => {
                let value = self.state().value.as_num().unwrap_or(f64::NAN);
                self.parse_literal(NodeKind::NumericLiteral { value }, Some(RawValue::Num(value)))
            }

            TokenKind::String => {
                let value = self.value_string();
                self.parse_literal(NodeKind::StringLiteral { value: value.clone() }, Some(RawValue::Str(value)))
            }

            TokenKind::Null => {
                self.next()?;
                Ok(self.finish_node(start, NodeKind::NullLiteral))
            }

            TokenKind::True | TokenKind::False => {
                let value = self.is(TokenKind::True);
                self.next()?;
                Ok(self.finish_node(start, NodeKind::BooleanLiteral { value }))
            }

            TokenKind::ParenL => self.parse_paren_and_distinguish(start, can_be_arrow),

            TokenKind::Function => self.parse_function_expression(),

            TokenKind::At | TokenKind::Class => {
                if self.is(TokenKind::At) {
                    self.parse_decorators(false)?;
                }
                let start = self.start_node();
                let decorators = self.take_decorators();
                self.parse_class(start, ClassParts { decorators, ..ClassParts::default() }, false, false)
            }

            TokenKind::New => self.parse_new(),

            TokenKind::BackQuote => self.parse_template(),

            TokenKind::DoubleColon => {
                self.next()?;
                let callee = self.parse_no_call_expr()?;
                if !matches!(callee.kind, NodeKind::MemberExpression { .. }) {
                    return self.raise(callee.start, messages::BIND_ON_NON_MEMBER);
                }
                Ok(self.finish_node(start, NodeKind::BindExpression { object: None, callee: Box::new(callee) }))
            }

            _ => self.unexpected(None),
        }
    }

    /// Finish a literal token, recording its source text as `extra.raw`.
    pub(crate) fn parse_literal(&mut self, kind: NodeKind, raw_value: Option<RawValue>) -> PResult<Node> {
        let start = self.start_node();
        let raw = self.tok.slice(self.state().start, self.state().end).to_string();
        self.next()?;
        let mut node = self.finish_node(start, kind);
        let extra = node.extra_mut();
        extra.raw = Some(raw);
        extra.raw_value = raw_value;
        Ok(node)
    }

    pub(crate) fn parse_paren_expression(&mut self) -> PResult<Node> {
        self.expect(TokenKind::ParenL)?;
        let expr = self.parse_expression(false)?;
        self.expect(TokenKind::ParenR)?;
        Ok(expr)
    }

    pub(crate) fn parse_paren_and_distinguish_base(&mut self, start: NodeStart, can_be_arrow: bool) -> PResult<Node> {
        self.next()?;

        let inner_start = self.start_node();
        let mut expr_list: Vec<Node> = Vec::new();
        let mut first = true;
        let mut shorthand_default: Option<TextPos> = None;
        let mut optional_comma_start: Option<TextPos> = None;
        let mut spread_start: Option<TextPos> = None;

        while !self.is(TokenKind::ParenR) {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.is(TokenKind::ParenR) {
                    optional_comma_start = Some(self.state().start);
                    break;
                }
            }

            if self.is(TokenKind::Ellipsis) {
                let spread_node_start = self.start_node();
                spread_start = Some(spread_node_start.pos);
                let rest = self.parse_rest()?;
                expr_list.push(self.parse_paren_item(rest, spread_node_start, false)?);
                break;
            }
            let item = self.parse_maybe_assign_with(false, true)?;
            shorthand_default = shorthand_default.or(item.shorthand_default);
            expr_list.push(item.value);
        }

        let inner_end = self.state().start;
        let inner_end_loc = self.state().start_loc;
        self.expect(TokenKind::ParenR)?;

        if can_be_arrow && !self.can_insert_semicolon() && self.eat(TokenKind::Arrow)? {
            if let Some(param) = expr_list.iter().find(|param| param.is_parenthesized()) {
                let paren_start = param.extra.as_ref().and_then(|e| e.paren_start);
                return self.unexpected(paren_start);
            }
            return self.parse_arrow_expression(start, expr_list, false, None);
        }

        if expr_list.is_empty() {
            return self.unexpected(Some(self.state().last_tok_start));
        }
        if let Some(pos) = optional_comma_start {
            return self.unexpected(Some(pos));
        }
        if let Some(pos) = spread_start {
            return self.unexpected(Some(pos));
        }
        if let Some(pos) = shorthand_default {
            return self.unexpected(Some(pos));
        }

        let mut value = if expr_list.len() > 1 {
            self.to_referenced_list(expr_list.iter())?;
            self.finish_node_at(
                inner_start,
                NodeKind::SequenceExpression { expressions: expr_list },
                inner_end,
                inner_end_loc,
            )
        } else {
            match expr_list.pop() {
                Some(expr) => expr,
                None => return self.unexpected(None),
            }
        };
        let extra = value.extra_mut();
        extra.parenthesized = true;
        extra.paren_start = Some(start.pos);
        Ok(value)
    }

    pub(crate) fn parse_paren_item_base(&mut self, node: Node, _start: NodeStart, _force_arrow: bool) -> PResult<Node> {
        Ok(node)
    }

    fn parse_new(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let meta = self.parse_identifier(true)?;
        if self.eat(TokenKind::Dot)? {
            return self.parse_meta_property(start, meta, "target");
        }

        let callee = self.parse_no_call_expr()?;
        let arguments = if self.eat(TokenKind::ParenL)? {
            let arguments: Vec<Node> =
                self.parse_expr_list(TokenKind::ParenR, true, false)?.expression(self)?.into_iter().flatten().collect();
            self.to_referenced_list(arguments.iter())?;
            arguments
        } else {
            Vec::new()
        };
        Ok(self.finish_node(start, NodeKind::NewExpression { callee: Box::new(callee), arguments }))
    }

    fn parse_meta_property(&mut self, start: NodeStart, meta: Node, property_name: &str) -> PResult<Node> {
        let property = self.parse_identifier(true)?;
        if property.identifier_name() != Some(property_name) {
            let meta_name = meta.identifier_name().unwrap_or_default();
            let message = format_message(messages::META_PROPERTY_0_1, &[meta_name, property_name]);
            return self.raise(property.start, &message);
        }
        Ok(self.finish_node(start, NodeKind::MetaProperty { meta: Box::new(meta), property: Box::new(property) }))
    }

    fn parse_function_expression(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let meta = self.parse_identifier(true)?;
        if self.state().in_generator && self.eat(TokenKind::Dot)? {
            return self.parse_meta_property(start, meta, "sent");
        }
        self.parse_function(start, FunctionParts::default(), false, false, false)
    }

    // ========================================================================
    // Templates
    // ========================================================================

    fn parse_template_element(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let raw = self.tok.slice(self.state().start, self.state().end).replace('\r', "\n");
        let cooked = self.value_string();
        self.next()?;
        let tail = self.is(TokenKind::BackQuote);
        Ok(self.finish_node(start, NodeKind::TemplateElement { value: TemplateValue { raw, cooked }, tail }))
    }

    pub(crate) fn parse_template(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.next()?;
        let mut expressions = Vec::new();
        let mut element = self.parse_template_element()?;
        let mut tail = matches!(element.kind, NodeKind::TemplateElement { tail: true, .. });
        let mut quasis = vec![element];
        while !tail {
            self.expect(TokenKind::DollarBraceL)?;
            expressions.push(self.parse_expression(false)?);
            self.expect(TokenKind::BraceR)?;
            element = self.parse_template_element()?;
            tail = matches!(element.kind, NodeKind::TemplateElement { tail: true, .. });
            quasis.push(element);
        }
        self.next()?;
        Ok(self.finish_node(start, NodeKind::TemplateLiteral { expressions, quasis }))
    }

    // ========================================================================
    // Object literals and patterns
    // ========================================================================

    /// Parse an object literal, or an object pattern with `is_pattern`.
    pub(crate) fn parse_obj(&mut self, is_pattern: bool) -> PResult<MaybePattern> {
        let start = self.start_node();
        let mut shorthand_default: Option<TextPos> = None;
        let mut decorators = Vec::new();
        let mut seen_proto = false;
        let mut properties = Vec::new();
        let mut first = true;
        self.next()?;

        while !self.eat(TokenKind::BraceR)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }

            while self.is(TokenKind::At) {
                decorators.push(self.parse_decorator()?);
            }

            let prop_start = self.start_node();
            let prop_decorators = std::mem::take(&mut decorators);

            if self.is(TokenKind::Ellipsis) {
                self.next()?;
                let argument = Box::new(self.parse_maybe_assign(false)?);
                let kind = if is_pattern {
                    NodeKind::RestProperty { argument }
                } else {
                    NodeKind::SpreadProperty { argument }
                };
                properties.push(self.finish_node(prop_start, kind));
                continue;
            }

            let mut is_generator = false;
            let mut is_async = false;
            if !is_pattern {
                is_generator = self.eat(TokenKind::Star)?;
            }

            let (key, computed) = if !is_pattern && self.is_contextual("async") {
                if is_generator {
                    return self.unexpected(None);
                }
                let async_id = self.parse_identifier(false)?;
                if self.is(TokenKind::Colon)
                    || self.is(TokenKind::ParenL)
                    || self.is(TokenKind::BraceR)
                    || self.is(TokenKind::Comma)
                    || self.is(TokenKind::Eq)
                {
                    (async_id, false)
                } else {
                    is_async = true;
                    is_generator = self.eat(TokenKind::Star)?;
                    self.parse_property_name()?
                }
            } else {
                self.parse_property_name()?
            };

            let head = PropHead { start: prop_start, key, computed, decorators: prop_decorators };
            let prop = self.parse_obj_prop_value(head, is_generator, is_async, is_pattern)?;
            shorthand_default = shorthand_default.or(prop.shorthand_default);
            let prop = prop.value;
            if !is_pattern {
                self.check_prop_clash(&prop, &mut seen_proto)?;
            }
            properties.push(prop);
        }

        if !decorators.is_empty() {
            return self.raise(self.state().start, messages::TRAILING_DECORATORS_PROPERTY);
        }

        let kind = if is_pattern {
            NodeKind::ObjectPattern { properties, type_annotation: None, optional: false }
        } else {
            NodeKind::ObjectExpression { properties, type_annotation: None }
        };
        Ok(MaybePattern { value: self.finish_node(start, kind), shorthand_default })
    }

    /// Reject a second `__proto__: value` in the same object literal.
    fn check_prop_clash(&mut self, prop: &Node, seen_proto: &mut bool) -> PResult<()> {
        let NodeKind::ObjectProperty { key, computed: false, shorthand: false, .. } = &prop.kind else {
            return Ok(());
        };
        let is_proto = match &key.kind {
            NodeKind::Identifier { name, .. } => name == "__proto__",
            NodeKind::StringLiteral { value } => value == "__proto__",
            _ => false,
        };
        if !is_proto {
            return Ok(());
        }
        if *seen_proto {
            return self.raise(key.start, messages::PROTO_REDEFINITION);
        }
        *seen_proto = true;
        Ok(())
    }

    pub(crate) fn parse_obj_prop_value_base(
        &mut self,
        head: PropHead,
        is_generator: bool,
        is_async: bool,
        is_pattern: bool,
    ) -> PResult<MaybePattern> {
        let PropHead { start, key, computed, decorators } = head;

        if is_generator || is_async || self.is(TokenKind::ParenL) {
            if is_pattern {
                return self.unexpected(None);
            }
            let parts = FunctionParts { generator: is_generator, is_async, ..FunctionParts::default() };
            let function = self.parse_method(parts, MethodKind::Method)?;
            return Ok(MaybePattern::new(self.finish_node(
                start,
                NodeKind::ObjectMethod {
                    kind: MethodKind::Method.as_str().to_string(),
                    method: true,
                    shorthand: false,
                    computed,
                    key: Box::new(key),
                    decorators,
                    function,
                },
            )));
        }

        if self.eat(TokenKind::Colon)? {
            let value = if is_pattern {
                MaybePattern::new(self.parse_maybe_default(None, None)?)
            } else {
                self.parse_maybe_assign_deferred(false)?
            };
            let node = self.finish_node(
                start,
                NodeKind::ObjectProperty {
                    method: false,
                    shorthand: false,
                    computed,
                    key: Box::new(key),
                    value: Box::new(value.value),
                    decorators,
                },
            );
            return Ok(MaybePattern { value: node, shorthand_default: value.shorthand_default });
        }

        let accessor = match key.identifier_name() {
            Some("get") if !computed => Some(MethodKind::Get),
            Some("set") if !computed => Some(MethodKind::Set),
            _ => None,
        };
        if let Some(kind) = accessor {
            if !self.is(TokenKind::Comma) && !self.is(TokenKind::BraceR) {
                if is_generator || is_async || is_pattern {
                    return self.unexpected(None);
                }
                let (key, computed) = self.parse_property_name()?;
                let function = self.parse_method(FunctionParts::default(), kind)?;
                let (param_count, message) = match kind {
                    MethodKind::Get => (0, messages::GETTER_ARITY),
                    _ => (1, messages::SETTER_ARITY),
                };
                if function.params.len() != param_count {
                    return self.raise(start.pos, message);
                }
                return Ok(MaybePattern::new(self.finish_node(
                    start,
                    NodeKind::ObjectMethod {
                        kind: kind.as_str().to_string(),
                        method: false,
                        shorthand: false,
                        computed,
                        key: Box::new(key),
                        decorators,
                        function,
                    },
                )));
            }
        }

        if !computed {
            if let Some(name) = key.identifier_name() {
                let mut shorthand_default = None;
                let value = if is_pattern {
                    let strict = self.state().strict;
                    if self.tok.is_keyword(name)
                        || (strict && (is_strict_bind_reserved_word(name) || is_strict_reserved_word(name)))
                    {
                        let message = format_message(messages::BINDING_0, &[name]);
                        return self.raise(key.start, &message);
                    }
                    let left = self.clone_node(&key);
                    self.parse_maybe_default(Some(start), Some(left))?
                } else if self.is(TokenKind::Eq) {
                    shorthand_default = Some(self.state().start);
                    let left = self.clone_node(&key);
                    self.parse_maybe_default(Some(start), Some(left))?
                } else {
                    self.clone_node(&key)
                };
                let node = self.finish_node(
                    start,
                    NodeKind::ObjectProperty {
                        method: false,
                        shorthand: true,
                        computed,
                        key: Box::new(key),
                        value: Box::new(value),
                        decorators,
                    },
                );
                return Ok(MaybePattern { value: node, shorthand_default });
            }
        }

        self.unexpected(None)
    }

    /// Parse a property key, returning it and whether it was computed.
    pub(crate) fn parse_property_name(&mut self) -> PResult<(Node, bool)> {
        if self.eat(TokenKind::BracketL)? {
            let key = self.parse_maybe_assign(false)?;
            self.expect(TokenKind::BracketR)?;
            return Ok((key, true));
        }
        let key = if self.is(TokenKind::Num) || self.is(TokenKind::String) {
            self.parse_expr_atom()?.expression(self)?
        } else {
            self.parse_identifier(true)?
        };
        Ok((key, false))
    }

    /// Parse the parameters and body of an object or class method.
    pub(crate) fn parse_method(&mut self, mut parts: FunctionParts, kind: MethodKind) -> PResult<Function> {
        let old_in_method = self.state().in_method;
        self.state_mut().in_method = Some(kind);
        self.expect(TokenKind::ParenL)?;
        parts.params = self.parse_binding_list(TokenKind::ParenR, false, true)?.into_iter().flatten().collect();
        let function = self.parse_function_body(parts, false)?;
        self.state_mut().in_method = old_in_method;
        Ok(function)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub(crate) fn parse_arrow_expression(
        &mut self,
        start: NodeStart,
        params: Vec<Node>,
        is_async: bool,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        let params = self.to_assignable_list(params.into_iter().map(Some).collect(), true)?;
        let parts = FunctionParts {
            is_async,
            params: params.into_iter().flatten().collect(),
            return_type,
            ..FunctionParts::default()
        };
        let function = self.parse_function_body(parts, true)?;
        Ok(self.finish_node(start, NodeKind::ArrowFunctionExpression(function)))
    }

    pub(crate) fn parse_function_body_base(&mut self, parts: FunctionParts, allow_expression: bool) -> PResult<Function> {
        let is_expression = allow_expression && !self.is(TokenKind::BraceL);

        let old_in_async = self.state().in_async;
        self.state_mut().in_async = parts.is_async;
        let body = if is_expression {
            self.parse_maybe_assign(false)
        } else {
            let old_in_function = self.state().in_function;
            let old_in_generator = self.state().in_generator;
            let old_labels = std::mem::take(&mut self.state_mut().labels);
            self.state_mut().in_function = true;
            self.state_mut().in_generator = parts.generator;
            let body = self.parse_block(true);
            let state = self.state_mut();
            state.in_function = old_in_function;
            state.in_generator = old_in_generator;
            state.labels = old_labels;
            body
        };
        self.state_mut().in_async = old_in_async;
        let body = body?;

        let use_strict = !is_expression
            && matches!(&body.kind, NodeKind::BlockStatement { directives, .. }
                if directives.iter().any(is_use_strict_directive));
        let check_lval = self.state().strict || allow_expression || use_strict;

        if use_strict {
            if let Some(id) = &parts.id {
                if id.identifier_name() == Some("yield") {
                    return self.raise(id.start, messages::BINDING_YIELD_IN_STRICT);
                }
            }
        }

        if check_lval {
            let old_strict = self.state().strict;
            if use_strict {
                self.state_mut().strict = true;
            }
            let mut names = rustc_hash::FxHashSet::default();
            if let Some(id) = &parts.id {
                self.check_lval(id, true, None)?;
            }
            for param in &parts.params {
                self.check_lval(param, true, Some(&mut names))?;
            }
            self.state_mut().strict = old_strict;
        }

        Ok(Function {
            id: parts.id.map(Box::new),
            generator: parts.generator,
            is_async: parts.is_async,
            expression: is_expression,
            params: parts.params,
            body: Box::new(body),
            return_type: parts.return_type.map(Box::new),
            type_parameters: parts.type_parameters.map(Box::new),
        })
    }

    // ========================================================================
    // Lists and identifiers
    // ========================================================================

    /// Parse a comma-separated list up to `close`. Holes come back as `None`
    /// when `allow_empty` is set.
    pub(crate) fn parse_expr_list(
        &mut self,
        close: TokenKind,
        allow_trailing_comma: bool,
        allow_empty: bool,
    ) -> PResult<MaybePattern<Vec<Option<Node>>>> {
        let mut elements = Vec::new();
        let mut shorthand_default: Option<TextPos> = None;
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if allow_trailing_comma && self.eat(close)? {
                    break;
                }
            }
            let item = self.parse_expr_list_item(allow_empty)?;
            shorthand_default = shorthand_default.or(item.shorthand_default);
            elements.push(item.value);
        }
        Ok(MaybePattern { value: elements, shorthand_default })
    }

    pub(crate) fn parse_expr_list_item_base(&mut self, allow_empty: bool) -> PResult<MaybePattern<Option<Node>>> {
        if allow_empty && self.is(TokenKind::Comma) {
            return Ok(MaybePattern::new(None));
        }
        let item = if self.is(TokenKind::Ellipsis) {
            self.parse_spread()?
        } else {
            self.parse_maybe_assign_deferred(false)?
        };
        Ok(MaybePattern { value: Some(item.value), shorthand_default: item.shorthand_default })
    }

    /// Parse an identifier. `liberal` also accepts keywords, as in property
    /// names.
    pub(crate) fn parse_identifier(&mut self, liberal: bool) -> PResult<Node> {
        let start = self.start_node();
        let name = if self.is(TokenKind::Name) {
            let name = self.value_string();
            if !liberal && self.state().strict && is_strict_reserved_word(&name) {
                let message = format_message(messages::KEYWORD_0_IS_RESERVED, &[name.as_str()]);
                return self.raise(start.pos, &message);
            }
            name
        } else if let Some(keyword) = self.state().kind.keyword_text().filter(|_| liberal) {
            keyword.to_string()
        } else {
            return self.unexpected(None);
        };

        if !liberal && name == "await" && self.state().in_async {
            return self.raise(start.pos, messages::AWAIT_IN_ASYNC);
        }

        self.next()?;
        Ok(self.finish_node(start, NodeKind::Identifier { name, type_annotation: None, optional: false }))
    }

    fn parse_await(&mut self, start: NodeStart) -> PResult<Node> {
        if !self.state().in_async {
            return self.unexpected(None);
        }
        if self.is_line_terminator()? {
            return self.unexpected(None);
        }
        let all = self.eat(TokenKind::Star)?;
        let argument = self.parse_maybe_unary()?.expression(self)?;
        Ok(self.finish_node(start, NodeKind::AwaitExpression { all, argument: Box::new(argument) }))
    }

    fn parse_yield(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.next()?;
        let (delegate, argument) = if self.is(TokenKind::Semi)
            || self.can_insert_semicolon()
            || (!self.is(TokenKind::Star) && !self.state().kind.starts_expr())
        {
            (false, None)
        } else {
            let delegate = self.eat(TokenKind::Star)?;
            (delegate, Some(Box::new(self.parse_maybe_assign(false)?)))
        };
        Ok(self.finish_node(start, NodeKind::YieldExpression { delegate, argument }))
    }
}

fn is_use_strict_directive(directive: &Node) -> bool {
    match &directive.kind {
        NodeKind::Directive { value } => {
            matches!(&value.kind, NodeKind::DirectiveLiteral { value } if value == "use strict")
        }
        _ => false,
    }
}
