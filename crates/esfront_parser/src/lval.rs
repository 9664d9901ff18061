//! Assignment targets and binding patterns.
//!
//! Expressions that turn out to be assignment or binding targets are
//! converted in place (`ObjectExpression` to `ObjectPattern` and so on), then
//! validated by `check_lval`.

use esfront_ast::{Node, NodeKind, TokenKind};
use esfront_core::words::{is_strict_bind_reserved_word, is_strict_reserved_word};
use esfront_diagnostics::{format_message, messages, PResult};
use rustc_hash::FxHashSet;

use crate::parser::{MaybePattern, NodeStart, Parser};

impl Parser<'_> {
    /// Convert an expression into an assignment target.
    pub(crate) fn to_assignable_base(&mut self, mut node: Node, is_binding: bool) -> PResult<Node> {
        node.kind = match node.take_kind() {
            kind @ (NodeKind::Identifier { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::AssignmentPattern { .. }) => kind,

            NodeKind::ObjectExpression { properties, type_annotation } => {
                let mut converted = Vec::with_capacity(properties.len());
                for prop in properties {
                    if let NodeKind::ObjectMethod { kind, key, .. } = &prop.kind {
                        let message = if kind == "get" || kind == "set" {
                            messages::PATTERN_GETTER_SETTER
                        } else {
                            messages::PATTERN_METHOD
                        };
                        return self.raise(key.start, message);
                    }
                    converted.push(self.to_assignable(prop, is_binding)?);
                }
                NodeKind::ObjectPattern { properties: converted, type_annotation, optional: false }
            }

            NodeKind::ObjectProperty { method, shorthand, computed, key, value, decorators } => {
                let value = Box::new(self.to_assignable(*value, is_binding)?);
                NodeKind::ObjectProperty { method, shorthand, computed, key, value, decorators }
            }

            NodeKind::SpreadProperty { argument } => NodeKind::RestProperty { argument },

            NodeKind::ArrayExpression { elements, type_annotation } => {
                let elements = self.to_assignable_list(elements, is_binding)?;
                NodeKind::ArrayPattern { elements, type_annotation, optional: false }
            }

            NodeKind::AssignmentExpression { operator, left, right, type_annotation } => {
                if operator != "=" {
                    return self.raise(left.end, messages::DEFAULT_VALUE_OPERATOR);
                }
                NodeKind::AssignmentPattern { left, right, type_annotation }
            }

            kind @ NodeKind::MemberExpression { .. } if !is_binding => kind,

            _ => return self.raise(node.start, messages::ASSIGNING_TO_RVALUE),
        };
        Ok(node)
    }

    /// Convert a list of elements or parameters. A trailing spread becomes a
    /// rest element.
    pub(crate) fn to_assignable_list_base(
        &mut self,
        mut exprs: Vec<Option<Node>>,
        is_binding: bool,
    ) -> PResult<Vec<Option<Node>>> {
        let mut end = exprs.len();
        if let Some(Some(last)) = exprs.last_mut() {
            match last.take_kind() {
                NodeKind::SpreadElement { argument } => {
                    let argument = self.to_assignable(*argument, is_binding)?;
                    if !matches!(
                        argument.kind,
                        NodeKind::Identifier { .. } | NodeKind::MemberExpression { .. } | NodeKind::ArrayPattern { .. }
                    ) {
                        return self.unexpected(Some(argument.start));
                    }
                    last.kind = NodeKind::RestElement { argument: Box::new(argument), type_annotation: None, optional: false };
                    end -= 1;
                }
                kind => {
                    if matches!(kind, NodeKind::RestElement { .. }) {
                        end -= 1;
                    }
                    last.kind = kind;
                }
            }
        }

        for slot in exprs.iter_mut().take(end) {
            if let Some(elt) = slot.take() {
                *slot = Some(self.to_assignable(elt, is_binding)?);
            }
        }
        Ok(exprs)
    }

    pub(crate) fn to_referenced_list<'n>(&mut self, nodes: impl Iterator<Item = &'n Node>) -> PResult<()> {
        for node in nodes {
            self.check_referenced(node)?;
        }
        Ok(())
    }

    pub(crate) fn check_referenced_base(&mut self, _node: &Node) -> PResult<()> {
        Ok(())
    }

    // ========================================================================
    // Binding patterns
    // ========================================================================

    pub(crate) fn parse_spread(&mut self) -> PResult<MaybePattern> {
        let start = self.start_node();
        self.next()?;
        let argument = self.parse_maybe_assign_deferred(false)?;
        let value = self.finish_node(start, NodeKind::SpreadElement { argument: Box::new(argument.value) });
        Ok(MaybePattern { value, shorthand_default: argument.shorthand_default })
    }

    pub(crate) fn parse_rest(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.next()?;
        let argument = self.parse_binding_identifier()?;
        Ok(self.finish_node(
            start,
            NodeKind::RestElement { argument: Box::new(argument), type_annotation: None, optional: false },
        ))
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> PResult<Node> {
        self.parse_identifier(false)
    }

    /// Is `yield` usable as a plain identifier here?
    pub(crate) fn should_allow_yield_identifier(&self) -> bool {
        self.is(TokenKind::Yield) && !self.state().strict && !self.state().in_generator
    }

    pub(crate) fn parse_binding_atom(&mut self) -> PResult<Node> {
        let kind = self.state().kind;
        match kind {
            TokenKind::Yield if self.state().strict || self.state().in_generator => self.unexpected(None),
            TokenKind::Yield | TokenKind::Name => self.parse_identifier(true),
            TokenKind::BracketL => {
                let start = self.start_node();
                self.next()?;
                let elements = self.parse_binding_list(TokenKind::BracketR, true, true)?;
                Ok(self.finish_node(start, NodeKind::ArrayPattern { elements, type_annotation: None, optional: false }))
            }
            TokenKind::BraceL => self.parse_obj(true)?.expression(self),
            _ => self.unexpected(None),
        }
    }

    /// Parse binding elements up to `close`: function parameters or the
    /// elements of an array pattern.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
        allow_trailing_comma: bool,
    ) -> PResult<Vec<Option<Node>>> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
            }

            if allow_empty && self.is(TokenKind::Comma) {
                elements.push(None);
            } else if allow_trailing_comma && self.eat(close)? {
                break;
            } else if self.is(TokenKind::Ellipsis) {
                let rest = self.parse_rest()?;
                elements.push(Some(self.parse_assignable_list_item_types(rest)?));
                self.expect(close)?;
                break;
            } else {
                let left = self.parse_maybe_default(None, None)?;
                let left = self.parse_assignable_list_item_types(left)?;
                let start = NodeStart::of(&left);
                elements.push(Some(self.parse_maybe_default(Some(start), Some(left))?));
            }
        }
        Ok(elements)
    }

    pub(crate) fn parse_assignable_list_item_types_base(&mut self, param: Node) -> PResult<Node> {
        Ok(param)
    }

    /// Parse a binding target followed by an optional `= default`.
    pub(crate) fn parse_maybe_default(&mut self, start: Option<NodeStart>, left: Option<Node>) -> PResult<Node> {
        let start = start.unwrap_or_else(|| self.start_node());
        let left = match left {
            Some(left) => left,
            None => self.parse_binding_atom()?,
        };
        if !self.eat(TokenKind::Eq)? {
            return Ok(left);
        }
        let right = self.parse_maybe_assign(false)?;
        Ok(self.finish_node(
            start,
            NodeKind::AssignmentPattern { left: Box::new(left), right: Box::new(right), type_annotation: None },
        ))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Verify that `expr` is a valid assignment or binding target. With
    /// `clashes` set, every bound name must be new to the set.
    pub(crate) fn check_lval_base(
        &mut self,
        expr: &Node,
        is_binding: bool,
        mut clashes: Option<&mut FxHashSet<String>>,
    ) -> PResult<()> {
        match &expr.kind {
            NodeKind::Identifier { name, .. } => {
                if self.state().strict && (is_strict_bind_reserved_word(name) || is_strict_reserved_word(name)) {
                    let template =
                        if is_binding { messages::BINDING_0_IN_STRICT } else { messages::ASSIGNING_TO_0_IN_STRICT };
                    return self.raise(expr.start, &format_message(template, &[name.as_str()]));
                }
                if let Some(clashes) = clashes {
                    if !clashes.insert(name.clone()) {
                        return self.raise(expr.start, messages::ARGUMENT_NAME_CLASH);
                    }
                }
                Ok(())
            }
            NodeKind::MemberExpression { .. } => {
                if is_binding {
                    return self.raise(expr.start, messages::BINDING_MEMBER_EXPRESSION);
                }
                Ok(())
            }
            NodeKind::ObjectPattern { properties, .. } => {
                for prop in properties {
                    let target = match &prop.kind {
                        NodeKind::ObjectProperty { value, .. } => value.as_ref(),
                        _ => prop,
                    };
                    self.check_lval(target, is_binding, clashes.as_deref_mut())?;
                }
                Ok(())
            }
            NodeKind::ArrayPattern { elements, .. } => {
                for elem in elements.iter().flatten() {
                    self.check_lval(elem, is_binding, clashes.as_deref_mut())?;
                }
                Ok(())
            }
            NodeKind::AssignmentPattern { left, .. } => self.check_lval(left, is_binding, clashes),
            NodeKind::RestProperty { argument } | NodeKind::RestElement { argument, .. } => {
                self.check_lval(argument, is_binding, clashes)
            }
            _ => {
                let message = if is_binding { messages::BINDING_RVALUE } else { messages::ASSIGNING_TO_RVALUE };
                self.raise(expr.start, message)
            }
        }
    }
}
