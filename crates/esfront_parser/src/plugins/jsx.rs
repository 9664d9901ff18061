//! JSX elements.
//!
//! Inside a tag the tokenizer switches to JSX contexts: `JsxOpenTag` and
//! `JsxCloseTag` read names (which may contain `-`) and quoted attribute
//! strings without escapes, while `JsxExpression` reads raw text children
//! with entities decoded, up to the next `<` or `{`.

use esfront_ast::{Node, NodeKind, TokenKind, TokenValue};
use esfront_core::chars::{is_identifier_char, is_identifier_start};
use esfront_diagnostics::{format_message, messages, PResult};
use esfront_tokenizer::{Chain, TokenContext, Tokenizer, TokenizerPlugin};

use super::xhtml;
use crate::parser::{MaybePattern, NodeStart, Parser};
use crate::plugins::ParserPlugin;

/// Longest entity reference looked at after `&`, terminator included.
const MAX_ENTITY_LEN: usize = 10;

pub(crate) struct JsxPlugin;

impl TokenizerPlugin for JsxPlugin {
    fn read_token(&self, tok: &mut Tokenizer<'_>, next: Chain, code: char) -> PResult<()> {
        let context = tok.cur_context();
        if context == TokenContext::JsxExpression {
            return read_jsx_token(tok);
        }

        if matches!(context, TokenContext::JsxOpenTag | TokenContext::JsxCloseTag) {
            if is_identifier_start(code) {
                return read_jsx_word(tok);
            }
            if code == '>' {
                tok.state.pos += 1;
                return tok.finish_token(TokenKind::JsxTagEnd, TokenValue::None);
            }
            if (code == '"' || code == '\'') && context == TokenContext::JsxOpenTag {
                return read_jsx_string(tok, code);
            }
        }

        if code == '<' && tok.state.expr_allowed {
            tok.state.pos += 1;
            return tok.finish_token(TokenKind::JsxTagStart, TokenValue::None);
        }

        tok.read_token_from(next, code)
    }

    fn update_context(&self, tok: &mut Tokenizer<'_>, next: Chain, prev: TokenKind) {
        if tok.is(TokenKind::BraceL) {
            match tok.cur_context() {
                TokenContext::JsxOpenTag => tok.state.context.push(TokenContext::BraceExpression),
                TokenContext::JsxExpression => tok.state.context.push(TokenContext::BraceTemplate),
                _ => tok.update_context_from(next, prev),
            }
            tok.state.expr_allowed = true;
        } else if tok.is(TokenKind::Slash) && prev == TokenKind::JsxTagStart {
            // `</`: the open tag and its expression context become a close tag.
            let len = tok.state.context.len().saturating_sub(2);
            tok.state.context.truncate(len);
            tok.state.context.push(TokenContext::JsxCloseTag);
            tok.state.expr_allowed = false;
        } else {
            tok.update_context_from(next, prev);
        }
    }
}

/// Text children: everything up to the next `<` or `{`.
fn read_jsx_token(tok: &mut Tokenizer<'_>) -> PResult<()> {
    let mut out = String::new();
    let mut chunk_start = tok.state.pos;
    loop {
        let pos = tok.state.pos;
        let Some(ch) = tok.char_at(pos) else {
            return tok.raise(tok.state.start, messages::UNTERMINATED_JSX);
        };
        match ch {
            '<' | '{' => {
                if pos == tok.state.start {
                    if ch == '<' && tok.state.expr_allowed {
                        tok.state.pos += 1;
                        return tok.finish_token(TokenKind::JsxTagStart, TokenValue::None);
                    }
                    return tok.get_token_from_code(ch);
                }
                out.push_str(tok.slice(chunk_start, pos));
                return tok.finish_token(TokenKind::JsxText, TokenValue::Str(out));
            }
            '&' => {
                out.push_str(tok.slice(chunk_start, pos));
                out.push_str(&read_jsx_entity(tok));
                chunk_start = tok.state.pos;
            }
            _ if tok.is_new_line_at(pos) => {
                out.push_str(tok.slice(chunk_start, pos));
                out.push_str(tok.read_new_line(true));
                chunk_start = tok.state.pos;
            }
            _ => tok.state.pos += ch.len_utf8() as u32,
        }
    }
}

/// A quoted attribute value. Backslashes are literal; entities are decoded.
fn read_jsx_string(tok: &mut Tokenizer<'_>, quote: char) -> PResult<()> {
    let mut out = String::new();
    tok.state.pos += 1;
    let mut chunk_start = tok.state.pos;
    loop {
        let pos = tok.state.pos;
        let Some(ch) = tok.char_at(pos) else {
            return tok.raise(tok.state.start, messages::UNTERMINATED_STRING);
        };
        if ch == quote {
            break;
        }
        if ch == '&' {
            out.push_str(tok.slice(chunk_start, pos));
            out.push_str(&read_jsx_entity(tok));
            chunk_start = tok.state.pos;
        } else if tok.is_new_line_at(pos) {
            out.push_str(tok.slice(chunk_start, pos));
            out.push_str(tok.read_new_line(false));
            chunk_start = tok.state.pos;
        } else {
            tok.state.pos += ch.len_utf8() as u32;
        }
    }
    out.push_str(tok.slice(chunk_start, tok.state.pos));
    tok.state.pos += 1;
    tok.finish_token(TokenKind::String, TokenValue::Str(out))
}

/// Decode the entity reference at `&`. An unknown or unterminated reference
/// yields a literal `&` and leaves the cursor right after it.
fn read_jsx_entity(tok: &mut Tokenizer<'_>) -> String {
    tok.state.pos += 1;
    let name_start = tok.state.pos;
    let mut name = String::new();
    let mut entity = None;
    for _ in 0..MAX_ENTITY_LEN {
        let Some(ch) = tok.char_at(tok.state.pos) else { break };
        tok.state.pos += ch.len_utf8() as u32;
        if ch == ';' {
            entity = decode_entity(&name);
            break;
        }
        name.push(ch);
    }
    match entity {
        Some(ch) => ch.to_string(),
        None => {
            tok.state.pos = name_start;
            "&".to_string()
        }
    }
}

fn decode_entity(name: &str) -> Option<char> {
    let Some(number) = name.strip_prefix('#') else {
        return xhtml::entity(name);
    };
    let (digits, radix) = match number.strip_prefix('x') {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)
}

/// A tag or attribute name. Dashes are allowed after the first character.
fn read_jsx_word(tok: &mut Tokenizer<'_>) -> PResult<()> {
    let start = tok.state.pos;
    while let Some(ch) = tok.char_at(tok.state.pos) {
        if tok.state.pos != start && !is_identifier_char(ch) && ch != '-' {
            break;
        }
        tok.state.pos += ch.len_utf8() as u32;
    }
    let word = tok.slice(start, tok.state.pos).to_string();
    tok.finish_token(TokenKind::JsxName, TokenValue::Str(word))
}

/// The dotted or namespaced source form of an element name, used to match
/// opening and closing tags.
fn qualified_name(node: &Node) -> String {
    match &node.kind {
        NodeKind::JsxIdentifier { name } => name.clone(),
        NodeKind::JsxNamespacedName { namespace, name } => {
            format!("{}:{}", qualified_name(namespace), qualified_name(name))
        }
        NodeKind::JsxMemberExpression { object, property } => {
            format!("{}.{}", qualified_name(object), qualified_name(property))
        }
        _ => String::new(),
    }
}

impl Parser<'_> {
    // ========================================================================
    // Names
    // ========================================================================

    /// A `JSXIdentifier`. Keywords are valid names inside tags.
    fn jsx_parse_identifier(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let kind = self.state().kind;
        let name = if kind == TokenKind::JsxName {
            self.value_string()
        } else if let Some(keyword) = kind.keyword_text() {
            keyword.to_string()
        } else {
            return self.unexpected(None);
        };
        self.next()?;
        Ok(self.finish_node(start, NodeKind::JsxIdentifier { name }))
    }

    fn jsx_parse_namespaced_name(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let name = self.jsx_parse_identifier()?;
        if !self.eat(TokenKind::Colon)? {
            return Ok(name);
        }
        let local = self.jsx_parse_identifier()?;
        Ok(self.finish_node(
            start,
            NodeKind::JsxNamespacedName { namespace: Box::new(name), name: Box::new(local) },
        ))
    }

    fn jsx_parse_element_name(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let mut node = self.jsx_parse_namespaced_name()?;
        while self.eat(TokenKind::Dot)? {
            let property = self.jsx_parse_identifier()?;
            node = self.finish_node(
                start,
                NodeKind::JsxMemberExpression { object: Box::new(node), property: Box::new(property) },
            );
        }
        Ok(node)
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn jsx_parse_attribute_value(&mut self) -> PResult<Node> {
        let kind = self.state().kind;
        match kind {
            TokenKind::BraceL => {
                let node = self.jsx_parse_expression_container()?;
                if let NodeKind::JsxExpressionContainer { expression } = &node.kind {
                    if matches!(expression.kind, NodeKind::JsxEmptyExpression) {
                        return self.raise(node.start, messages::JSX_EMPTY_ATTRIBUTE);
                    }
                }
                Ok(node)
            }
            TokenKind::JsxTagStart | TokenKind::String => {
                let mut node = self.parse_expr_atom()?.expression(self)?;
                node.extra = None;
                Ok(node)
            }
            _ => self.raise(self.state().start, messages::JSX_BAD_ATTRIBUTE_VALUE),
        }
    }

    /// `{}` with nothing inside: spans the gap between the braces.
    fn jsx_parse_empty_expression(&mut self) -> Node {
        let state = self.state();
        let start = NodeStart { pos: state.last_tok_end, loc: state.last_tok_end_loc };
        let (end, end_loc) = (state.start, state.start_loc);
        self.finish_node_at(start, NodeKind::JsxEmptyExpression, end, end_loc)
    }

    fn jsx_parse_expression_container(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.next()?;
        let expression = if self.is(TokenKind::BraceR) {
            self.jsx_parse_empty_expression()
        } else {
            self.parse_expression(false)?
        };
        self.expect(TokenKind::BraceR)?;
        Ok(self.finish_node(start, NodeKind::JsxExpressionContainer { expression: Box::new(expression) }))
    }

    /// `name`, `name=value` or `{...spread}`.
    fn jsx_parse_attribute(&mut self) -> PResult<Node> {
        let start = self.start_node();
        if self.eat(TokenKind::BraceL)? {
            self.expect(TokenKind::Ellipsis)?;
            let argument = self.parse_maybe_assign(false)?;
            self.expect(TokenKind::BraceR)?;
            return Ok(self.finish_node(start, NodeKind::JsxSpreadAttribute { argument: Box::new(argument) }));
        }
        let name = self.jsx_parse_namespaced_name()?;
        let value = if self.eat(TokenKind::Eq)? { Some(Box::new(self.jsx_parse_attribute_value()?)) } else { None };
        Ok(self.finish_node(start, NodeKind::JsxAttribute { name: Box::new(name), value }))
    }

    // ========================================================================
    // Elements
    // ========================================================================

    fn jsx_parse_opening_element_at(&mut self, start: NodeStart) -> PResult<Node> {
        let name = self.jsx_parse_element_name()?;
        let mut attributes = Vec::new();
        while !self.is(TokenKind::Slash) && !self.is(TokenKind::JsxTagEnd) {
            attributes.push(self.jsx_parse_attribute()?);
        }
        let self_closing = self.eat(TokenKind::Slash)?;
        self.expect(TokenKind::JsxTagEnd)?;
        Ok(self.finish_node(start, NodeKind::JsxOpeningElement { name: Box::new(name), attributes, self_closing }))
    }

    fn jsx_parse_closing_element_at(&mut self, start: NodeStart) -> PResult<Node> {
        let name = self.jsx_parse_element_name()?;
        self.expect(TokenKind::JsxTagEnd)?;
        Ok(self.finish_node(start, NodeKind::JsxClosingElement { name: Box::new(name) }))
    }

    /// An element whose `<` was already consumed at `start`.
    fn jsx_parse_element_at(&mut self, start: NodeStart) -> PResult<Node> {
        self.enter_nested()?;
        let result = self.jsx_parse_element_inner(start);
        self.leave_nested();
        result
    }

    fn jsx_parse_element_inner(&mut self, start: NodeStart) -> PResult<Node> {
        let opening = self.jsx_parse_opening_element_at(start)?;
        let mut children = Vec::new();
        let mut closing = None;

        let self_closing = matches!(opening.kind, NodeKind::JsxOpeningElement { self_closing: true, .. });
        if !self_closing {
            loop {
                let kind = self.state().kind;
                match kind {
                    TokenKind::JsxTagStart => {
                        let child_start = self.start_node();
                        self.next()?;
                        if self.eat(TokenKind::Slash)? {
                            closing = Some(self.jsx_parse_closing_element_at(child_start)?);
                            break;
                        }
                        children.push(self.jsx_parse_element_at(child_start)?);
                    }
                    TokenKind::JsxText => children.push(self.parse_expr_atom()?.expression(self)?),
                    TokenKind::BraceL => children.push(self.jsx_parse_expression_container()?),
                    _ => return self.unexpected(None),
                }
            }

            if let (NodeKind::JsxOpeningElement { name: open_name, .. }, Some(closing)) = (&opening.kind, &closing) {
                if let NodeKind::JsxClosingElement { name: close_name } = &closing.kind {
                    let expected = qualified_name(open_name);
                    if qualified_name(close_name) != expected {
                        let message = format_message(messages::JSX_CLOSING_TAG_0, &[expected.as_str()]);
                        return self.raise(closing.start, &message);
                    }
                }
            }
        }

        if self.is_relational("<") {
            return self.raise(self.state().start, messages::JSX_ADJACENT_ELEMENTS);
        }

        Ok(self.finish_node(
            start,
            NodeKind::JsxElement {
                opening_element: Box::new(opening),
                closing_element: closing.map(Box::new),
                children,
            },
        ))
    }
}

impl ParserPlugin for JsxPlugin {
    fn parse_expr_atom(&self, p: &mut Parser<'_>, next: Chain) -> PResult<MaybePattern> {
        if p.is(TokenKind::JsxText) {
            let value = p.value_string();
            let mut node = p.parse_literal(NodeKind::JsxText { value }, None)?;
            node.extra = None;
            return Ok(MaybePattern::new(node));
        }
        if p.is(TokenKind::JsxTagStart) {
            let start = p.start_node();
            p.next()?;
            return p.jsx_parse_element_at(start).map(MaybePattern::new);
        }
        p.parse_expr_atom_from(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("amp"), Some('&'));
        assert_eq!(decode_entity("#65"), Some('A'));
        assert_eq!(decode_entity("#x41"), Some('A'));
        assert_eq!(decode_entity("#x1F600"), Some('\u{1F600}'));
        assert_eq!(decode_entity("#"), None);
        assert_eq!(decode_entity("#xZZ"), None);
        assert_eq!(decode_entity("#xD800"), None);
        assert_eq!(decode_entity("bogus"), None);
    }
}
