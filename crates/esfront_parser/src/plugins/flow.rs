//! Flow type annotations.
//!
//! Types are parsed by a separate small grammar (`flow_parse_type` and
//! friends) that runs with `state.in_type` set, so the tokenizer reads `<`
//! and `>` one character at a time and `void` as a plain name. The parser
//! overrides attach annotations to bindings, parameters, class members and
//! functions, and turn `(x: T)` into type casts or annotated arrow
//! parameters.

use esfront_ast::{Function, Node, NodeKind, RawValue, TokenKind};
use esfront_diagnostics::{messages, PResult};
use esfront_tokenizer::{Chain, Tokenizer, TokenizerPlugin};
use rustc_hash::FxHashSet;

use crate::expression::PropHead;
use crate::parser::{MaybePattern, NodeStart, Parser};
use crate::plugins::ParserPlugin;
use crate::statement::{ClassMember, ClassParts, ExportParts, FunctionParts, ImportParts};

pub(crate) struct FlowPlugin;

impl TokenizerPlugin for FlowPlugin {
    fn read_token(&self, tok: &mut Tokenizer<'_>, next: Chain, code: char) -> PResult<()> {
        if tok.state.in_type && (code == '<' || code == '>') {
            return tok.finish_op(TokenKind::Relational, 1);
        }
        tok.read_token_from(next, code)
    }

    fn is_keyword(&self, tok: &Tokenizer<'_>, next: Chain, word: &str) -> bool {
        if tok.state.in_type && word == "void" {
            return false;
        }
        tok.is_keyword_from(next, word)
    }
}

/// Parameters of a function type: the named ones and an optional rest.
struct FunctionTypeParams {
    params: Vec<Node>,
    rest: Option<Node>,
}

impl Parser<'_> {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// Expect `tok` (`:` or `=`) and parse the type after it.
    fn flow_parse_type_initialiser(&mut self, tok: TokenKind) -> PResult<Node> {
        let old_in_type = self.state().in_type;
        self.state_mut().in_type = true;
        let result = self.expect(tok).and_then(|()| self.flow_parse_type());
        self.state_mut().in_type = old_in_type;
        result
    }

    /// `: Type` as a `TypeAnnotation` node.
    pub(crate) fn flow_parse_type_annotation(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let type_annotation = self.flow_parse_type_initialiser(TokenKind::Colon)?;
        Ok(self.finish_node(start, NodeKind::TypeAnnotation { type_annotation: Box::new(type_annotation) }))
    }

    /// An identifier with an optional `: Type`.
    fn flow_parse_type_annotatable_identifier(&mut self) -> PResult<Node> {
        let mut ident = self.parse_identifier(false)?;
        if self.is(TokenKind::Colon) {
            let annotation = self.flow_parse_type_annotation()?;
            ident.set_type_annotation(annotation);
            self.refinish(&mut ident);
        }
        Ok(ident)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// `declare class`, `declare function`, `declare var` or `declare module`;
    /// the `declare` word has been consumed.
    fn flow_parse_declare(&mut self, start: NodeStart) -> PResult<Node> {
        if self.is(TokenKind::Class) {
            self.next()?;
            let (id, type_parameters, extends, body) = self.flow_parse_interfaceish(true)?;
            return Ok(self.finish_node(
                start,
                NodeKind::DeclareClass {
                    id: Box::new(id),
                    type_parameters: type_parameters.map(Box::new),
                    extends,
                    body: Box::new(body),
                },
            ));
        }
        if self.is(TokenKind::Function) {
            return self.flow_parse_declare_function(start);
        }
        if self.is(TokenKind::Var) {
            self.next()?;
            let id = self.flow_parse_type_annotatable_identifier()?;
            self.semicolon()?;
            return Ok(self.finish_node(start, NodeKind::DeclareVariable { id: Box::new(id) }));
        }
        if self.is_contextual("module") {
            return self.flow_parse_declare_module(start);
        }
        self.unexpected(None)
    }

    fn flow_parse_declare_function(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let mut id = self.parse_identifier(false)?;

        let type_start = self.start_node();
        let type_parameters =
            if self.is_relational("<") { Some(Box::new(self.flow_parse_type_parameter_declaration()?)) } else { None };
        self.expect(TokenKind::ParenL)?;
        let FunctionTypeParams { params, rest } = self.flow_parse_function_type_params()?;
        self.expect(TokenKind::ParenR)?;
        let return_type = self.flow_parse_type_initialiser(TokenKind::Colon)?;

        let function_type = self.finish_node(
            type_start,
            NodeKind::FunctionTypeAnnotation {
                type_parameters,
                params,
                rest: rest.map(Box::new),
                return_type: Box::new(return_type),
            },
        );
        let annotation =
            self.finish_node(type_start, NodeKind::TypeAnnotation { type_annotation: Box::new(function_type) });
        id.set_type_annotation(annotation);
        self.refinish(&mut id);
        self.semicolon()?;
        Ok(self.finish_node(start, NodeKind::DeclareFunction { id: Box::new(id) }))
    }

    fn flow_parse_declare_module(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let id = if self.is(TokenKind::String) { self.parse_expr_atom()?.expression(self)? } else { self.parse_identifier(false)? };

        let body_start = self.start_node();
        let mut body = Vec::new();
        self.expect(TokenKind::BraceL)?;
        while !self.is(TokenKind::BraceR) {
            let declare_start = self.start_node();
            self.expect_contextual("declare")?;
            body.push(self.flow_parse_declare(declare_start)?);
        }
        self.expect(TokenKind::BraceR)?;
        let body = self.finish_node(body_start, NodeKind::BlockStatement { body, directives: Vec::new() });

        Ok(self.finish_node(start, NodeKind::DeclareModule { id: Box::new(id), body: Box::new(body) }))
    }

    /// The shared head and body of `interface` and `declare class`.
    fn flow_parse_interfaceish(&mut self, allow_static: bool) -> PResult<(Node, Option<Node>, Vec<Node>, Node)> {
        let id = self.parse_identifier(false)?;
        let type_parameters =
            if self.is_relational("<") { Some(self.flow_parse_type_parameter_declaration()?) } else { None };
        let mut extends = Vec::new();
        if self.eat(TokenKind::Extends)? {
            loop {
                extends.push(self.flow_parse_interface_extends()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let body = self.flow_parse_object_type(allow_static)?;
        Ok((id, type_parameters, extends, body))
    }

    fn flow_parse_interface_extends(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let id = self.parse_identifier(false)?;
        let type_parameters =
            if self.is_relational("<") { Some(Box::new(self.flow_parse_type_parameter_instantiation()?)) } else { None };
        Ok(self.finish_node(start, NodeKind::InterfaceExtends { id: Box::new(id), type_parameters }))
    }

    fn flow_parse_interface(&mut self, start: NodeStart) -> PResult<Node> {
        let (id, type_parameters, extends, body) = self.flow_parse_interfaceish(false)?;
        Ok(self.finish_node(
            start,
            NodeKind::InterfaceDeclaration {
                id: Box::new(id),
                type_parameters: type_parameters.map(Box::new),
                extends,
                body: Box::new(body),
            },
        ))
    }

    /// `type Name<T> = Type;` after the `type` word.
    fn flow_parse_type_alias(&mut self, start: NodeStart) -> PResult<Node> {
        let id = self.parse_identifier(false)?;
        let type_parameters =
            if self.is_relational("<") { Some(Box::new(self.flow_parse_type_parameter_declaration()?)) } else { None };
        let right = self.flow_parse_type_initialiser(TokenKind::Eq)?;
        self.semicolon()?;
        Ok(self.finish_node(start, NodeKind::TypeAlias { id: Box::new(id), type_parameters, right: Box::new(right) }))
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    fn flow_parse_type_parameter_declaration(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let mut params = Vec::new();
        self.expect_relational("<")?;
        while !self.is_relational(">") {
            let param = match self.flow_parse_existential_type_param()? {
                Some(param) => param,
                None => self.flow_parse_type_annotatable_identifier()?,
            };
            params.push(param);
            if !self.is_relational(">") {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect_relational(">")?;
        Ok(self.finish_node(start, NodeKind::TypeParameterDeclaration { params }))
    }

    fn flow_parse_existential_type_param(&mut self) -> PResult<Option<Node>> {
        if !self.is(TokenKind::Star) {
            return Ok(None);
        }
        let start = self.start_node();
        self.next()?;
        Ok(Some(self.finish_node(start, NodeKind::ExistentialTypeParam)))
    }

    fn flow_parse_type_parameter_instantiation(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let old_in_type = self.state().in_type;
        self.state_mut().in_type = true;
        let params = self.flow_parse_type_arguments();
        self.state_mut().in_type = old_in_type;
        let params = params?;
        Ok(self.finish_node(start, NodeKind::TypeParameterInstantiation { params }))
    }

    fn flow_parse_type_arguments(&mut self) -> PResult<Vec<Node>> {
        let mut params = Vec::new();
        self.expect_relational("<")?;
        while !self.is_relational(">") {
            let param = match self.flow_parse_existential_type_param()? {
                Some(param) => param,
                None => self.flow_parse_type()?,
            };
            params.push(param);
            if !self.is_relational(">") {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect_relational(">")?;
        Ok(params)
    }

    // ========================================================================
    // Object types
    // ========================================================================

    fn flow_parse_object_type(&mut self, allow_static: bool) -> PResult<Node> {
        let start = self.start_node();
        let mut properties = Vec::new();
        let mut indexers = Vec::new();
        let mut call_properties = Vec::new();

        self.expect(TokenKind::BraceL)?;
        while !self.is(TokenKind::BraceR) {
            let member_start = self.start_node();
            let mut is_static = false;
            if allow_static && self.is_contextual("static") {
                let ahead = self.tok.lookahead()?.kind;
                if ahead != TokenKind::Colon && ahead != TokenKind::Question {
                    self.next()?;
                    is_static = true;
                }
            }

            if self.is(TokenKind::BracketL) {
                indexers.push(self.flow_parse_object_type_indexer(member_start, is_static)?);
            } else if self.is(TokenKind::ParenL) || self.is_relational("<") {
                call_properties.push(self.flow_parse_object_type_call_property(member_start, is_static)?);
            } else {
                let key = self.flow_parse_object_property_key()?;
                if self.is_relational("<") || self.is(TokenKind::ParenL) {
                    properties.push(self.flow_parse_object_type_method(member_start, is_static, key)?);
                } else {
                    let optional = self.eat(TokenKind::Question)?;
                    let value = self.flow_parse_type_initialiser(TokenKind::Colon)?;
                    self.flow_object_type_semicolon()?;
                    properties.push(self.finish_node(
                        member_start,
                        NodeKind::ObjectTypeProperty { key: Box::new(key), value: Box::new(value), optional, is_static },
                    ));
                }
            }
        }
        self.expect(TokenKind::BraceR)?;

        Ok(self.finish_node(start, NodeKind::ObjectTypeAnnotation { properties, indexers, call_properties }))
    }

    fn flow_parse_object_property_key(&mut self) -> PResult<Node> {
        if self.is(TokenKind::Num) || self.is(TokenKind::String) {
            self.parse_expr_atom()?.expression(self)
        } else {
            self.parse_identifier(true)
        }
    }

    /// `[name: KeyType]: ValueType`
    fn flow_parse_object_type_indexer(&mut self, start: NodeStart, is_static: bool) -> PResult<Node> {
        self.expect(TokenKind::BracketL)?;
        let id = self.flow_parse_object_property_key()?;
        let key = self.flow_parse_type_initialiser(TokenKind::Colon)?;
        self.expect(TokenKind::BracketR)?;
        let value = self.flow_parse_type_initialiser(TokenKind::Colon)?;
        self.flow_object_type_semicolon()?;
        Ok(self.finish_node(
            start,
            NodeKind::ObjectTypeIndexer { id: Box::new(id), key: Box::new(key), value: Box::new(value), is_static },
        ))
    }

    /// `<T>(params): ReturnType` of a method or call property.
    fn flow_parse_object_type_methodish(&mut self, start: NodeStart) -> PResult<Node> {
        let type_parameters =
            if self.is_relational("<") { Some(Box::new(self.flow_parse_type_parameter_declaration()?)) } else { None };
        self.expect(TokenKind::ParenL)?;
        let FunctionTypeParams { params, rest } = self.flow_parse_function_type_params()?;
        self.expect(TokenKind::ParenR)?;
        let return_type = self.flow_parse_type_initialiser(TokenKind::Colon)?;
        Ok(self.finish_node(
            start,
            NodeKind::FunctionTypeAnnotation {
                type_parameters,
                params,
                rest: rest.map(Box::new),
                return_type: Box::new(return_type),
            },
        ))
    }

    fn flow_parse_object_type_method(&mut self, start: NodeStart, is_static: bool, key: Node) -> PResult<Node> {
        let value = self.flow_parse_object_type_methodish(start)?;
        self.flow_object_type_semicolon()?;
        Ok(self.finish_node(
            start,
            NodeKind::ObjectTypeProperty { key: Box::new(key), value: Box::new(value), optional: false, is_static },
        ))
    }

    fn flow_parse_object_type_call_property(&mut self, start: NodeStart, is_static: bool) -> PResult<Node> {
        let value_start = self.start_node();
        let value = self.flow_parse_object_type_methodish(value_start)?;
        self.flow_object_type_semicolon()?;
        Ok(self.finish_node(start, NodeKind::ObjectTypeCallProperty { value: Box::new(value), is_static }))
    }

    fn flow_object_type_semicolon(&mut self) -> PResult<()> {
        if !self.eat(TokenKind::Semi)? && !self.eat(TokenKind::Comma)? && !self.is(TokenKind::BraceR) {
            return self.unexpected(None);
        }
        Ok(())
    }

    // ========================================================================
    // Function types
    // ========================================================================

    fn flow_parse_function_type_params(&mut self) -> PResult<FunctionTypeParams> {
        let mut params = Vec::new();
        while self.is(TokenKind::Name) {
            params.push(self.flow_parse_function_type_param()?);
            if !self.is(TokenKind::ParenR) {
                self.expect(TokenKind::Comma)?;
            }
        }
        let rest = if self.eat(TokenKind::Ellipsis)? { Some(self.flow_parse_function_type_param()?) } else { None };
        Ok(FunctionTypeParams { params, rest })
    }

    /// `name?: Type`
    fn flow_parse_function_type_param(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let name = self.parse_identifier(false)?;
        let optional = self.eat(TokenKind::Question)?;
        let type_annotation = self.flow_parse_type_initialiser(TokenKind::Colon)?;
        Ok(self.finish_node(
            start,
            NodeKind::FunctionTypeParam { name: Box::new(name), optional, type_annotation: Box::new(type_annotation) },
        ))
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// A named type: one of the builtin keywords or a generic reference.
    fn flow_ident_to_type_annotation(&mut self, start: NodeStart, id: Node) -> PResult<Node> {
        let kind = match id.identifier_name() {
            Some("any") => NodeKind::AnyTypeAnnotation,
            Some("void") => NodeKind::VoidTypeAnnotation,
            Some("bool" | "boolean") => NodeKind::BooleanTypeAnnotation,
            Some("mixed") => NodeKind::MixedTypeAnnotation,
            Some("number") => NodeKind::NumberTypeAnnotation,
            Some("string") => NodeKind::StringTypeAnnotation,
            _ => return self.flow_parse_generic_type(start, id),
        };
        Ok(self.finish_node(start, kind))
    }

    fn flow_parse_generic_type(&mut self, start: NodeStart, id: Node) -> PResult<Node> {
        let mut id = id;
        while self.eat(TokenKind::Dot)? {
            let property = self.parse_identifier(false)?;
            id = self.finish_node(
                start,
                NodeKind::QualifiedTypeIdentifier { qualification: Box::new(id), id: Box::new(property) },
            );
        }
        let type_parameters =
            if self.is_relational("<") { Some(Box::new(self.flow_parse_type_parameter_instantiation()?)) } else { None };
        Ok(self.finish_node(start, NodeKind::GenericTypeAnnotation { id: Box::new(id), type_parameters }))
    }

    fn flow_parse_typeof_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.expect(TokenKind::Typeof)?;
        let argument = self.flow_parse_primary_type()?;
        Ok(self.finish_node(start, NodeKind::TypeofTypeAnnotation { argument: Box::new(argument) }))
    }

    fn flow_parse_tuple_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let mut types = Vec::new();
        self.expect(TokenKind::BracketL)?;
        while !self.is(TokenKind::Eof) && !self.is(TokenKind::BracketR) {
            types.push(self.flow_parse_type()?);
            if self.is(TokenKind::BracketR) {
                break;
            }
            self.expect(TokenKind::Comma)?;
        }
        self.expect(TokenKind::BracketR)?;
        Ok(self.finish_node(start, NodeKind::TupleTypeAnnotation { types }))
    }

    /// Finish a function type after its parameter list opened; the `(` has
    /// been consumed.
    fn flow_finish_function_type(&mut self, start: NodeStart, type_parameters: Option<Node>) -> PResult<Node> {
        let FunctionTypeParams { params, rest } = self.flow_parse_function_type_params()?;
        self.expect(TokenKind::ParenR)?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.flow_parse_type()?;
        Ok(self.finish_node(
            start,
            NodeKind::FunctionTypeAnnotation {
                type_parameters: type_parameters.map(Box::new),
                params,
                rest: rest.map(Box::new),
                return_type: Box::new(return_type),
            },
        ))
    }

    /// The primitives other types are built from.
    fn flow_parse_primary_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let kind = self.state().kind;
        match kind {
            TokenKind::Name => {
                let id = self.parse_identifier(false)?;
                self.flow_ident_to_type_annotation(start, id)
            }

            TokenKind::BraceL => self.flow_parse_object_type(false),

            TokenKind::BracketL => self.flow_parse_tuple_type(),

            TokenKind::Relational if self.is_relational("<") => {
                let type_parameters = self.flow_parse_type_parameter_declaration()?;
                self.expect(TokenKind::ParenL)?;
                self.flow_finish_function_type(start, Some(type_parameters))
            }

            TokenKind::ParenL => {
                self.next()?;
                let is_grouped_type = if self.is(TokenKind::ParenR) || self.is(TokenKind::Ellipsis) {
                    false
                } else if self.is(TokenKind::Name) {
                    let ahead = self.tok.lookahead()?.kind;
                    ahead != TokenKind::Question && ahead != TokenKind::Colon
                } else {
                    true
                };

                if !is_grouped_type {
                    return self.flow_finish_function_type(start, None);
                }
                let grouped = self.flow_parse_type()?;
                self.expect(TokenKind::ParenR)?;
                if self.eat(TokenKind::Arrow)? {
                    return self.raise(start.pos, messages::GROUPED_FUNCTION_TYPE);
                }
                Ok(grouped)
            }

            TokenKind::String => {
                let value = self.value_string();
                let raw = self.tok.slice(self.state().start, self.state().end).to_string();
                self.next()?;
                let mut node =
                    self.finish_node(start, NodeKind::StringLiteralTypeAnnotation { value: value.clone() });
                let extra = node.extra_mut();
                extra.raw_value = Some(RawValue::Str(value));
                extra.raw = Some(raw);
                Ok(node)
            }

            TokenKind::Num => {
                let value = self.state().value.as_num().unwrap_or(f64::NAN);
                let raw = self.tok.slice(self.state().start, self.state().end).to_string();
                self.next()?;
                let mut node = self.finish_node(start, NodeKind::NumericLiteralTypeAnnotation { value });
                let extra = node.extra_mut();
                extra.raw_value = Some(RawValue::Num(value));
                extra.raw = Some(raw);
                Ok(node)
            }

            TokenKind::True | TokenKind::False => {
                let value = self.is(TokenKind::True);
                self.next()?;
                Ok(self.finish_node(start, NodeKind::BooleanLiteralTypeAnnotation { value }))
            }

            TokenKind::Null => {
                self.next()?;
                Ok(self.finish_node(start, NodeKind::NullLiteralTypeAnnotation))
            }

            TokenKind::This => {
                self.next()?;
                Ok(self.finish_node(start, NodeKind::ThisTypeAnnotation))
            }

            TokenKind::Typeof => self.flow_parse_typeof_type(),

            _ => self.unexpected(None),
        }
    }

    /// `T[]`, repeatable. A `[` on the next line starts a new statement.
    fn flow_parse_postfix_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let mut ty = self.flow_parse_primary_type()?;
        while self.is(TokenKind::BracketL) && !self.can_insert_semicolon() {
            self.expect(TokenKind::BracketL)?;
            self.expect(TokenKind::BracketR)?;
            ty = self.finish_node(start, NodeKind::ArrayTypeAnnotation { element_type: Box::new(ty) });
        }
        Ok(ty)
    }

    fn flow_parse_prefix_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        if self.eat(TokenKind::Question)? {
            let inner = self.flow_parse_prefix_type()?;
            return Ok(self.finish_node(start, NodeKind::NullableTypeAnnotation { type_annotation: Box::new(inner) }));
        }
        self.flow_parse_postfix_type()
    }

    fn flow_parse_intersection_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let first = self.flow_parse_prefix_type()?;
        if !self.is(TokenKind::BitwiseAnd) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat(TokenKind::BitwiseAnd)? {
            types.push(self.flow_parse_prefix_type()?);
        }
        Ok(self.finish_node(start, NodeKind::IntersectionTypeAnnotation { types }))
    }

    fn flow_parse_union_type(&mut self) -> PResult<Node> {
        let start = self.start_node();
        let first = self.flow_parse_intersection_type()?;
        if !self.is(TokenKind::BitwiseOr) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat(TokenKind::BitwiseOr)? {
            types.push(self.flow_parse_intersection_type()?);
        }
        Ok(self.finish_node(start, NodeKind::UnionTypeAnnotation { types }))
    }

    pub(crate) fn flow_parse_type(&mut self) -> PResult<Node> {
        self.enter_nested()?;
        let old_in_type = self.state().in_type;
        self.state_mut().in_type = true;
        let ty = self.flow_parse_union_type();
        self.state_mut().in_type = old_in_type;
        self.leave_nested();
        ty
    }

    // ========================================================================
    // Type casts
    // ========================================================================

    /// Move a type cast's annotation onto its expression so it can serve as
    /// an annotated parameter.
    fn flow_type_cast_to_parameter(&mut self, node: Node) -> PResult<Node> {
        let NodeKind::TypeCastExpression { expression, type_annotation, .. } = node.kind else {
            return Ok(node);
        };
        let mut param = *expression;
        let end = type_annotation.end;
        let end_loc = type_annotation.loc.end;
        let annotation_start = type_annotation.start;
        if !param.set_type_annotation(*type_annotation) {
            return self.unexpected(Some(annotation_start));
        }
        self.refinish_at(&mut param, end, end_loc);
        Ok(param)
    }
}

fn is_type_cast(node: &Node) -> bool {
    matches!(node.kind, NodeKind::TypeCastExpression { .. })
}

impl ParserPlugin for FlowPlugin {
    fn parse_function_body(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        mut parts: FunctionParts,
        allow_expression: bool,
    ) -> PResult<Function> {
        if p.is(TokenKind::Colon) && !allow_expression {
            parts.return_type = Some(p.flow_parse_type_annotation()?);
        }
        p.parse_function_body_from(next, parts, allow_expression)
    }

    fn parse_statement(&self, p: &mut Parser<'_>, next: Chain, declaration: bool, top_level: bool) -> PResult<Node> {
        if p.state().strict && p.is_contextual("interface") {
            let start = p.start_node();
            p.next()?;
            return p.flow_parse_interface(start);
        }
        p.parse_statement_from(next, declaration, top_level)
    }

    fn parse_expression_statement(&self, p: &mut Parser<'_>, next: Chain, start: NodeStart, expr: Node) -> PResult<Node> {
        match expr.identifier_name() {
            Some("declare")
                if p.is(TokenKind::Class) || p.is(TokenKind::Name) || p.is(TokenKind::Function) || p.is(TokenKind::Var) =>
            {
                return p.flow_parse_declare(start);
            }
            Some("interface") if p.is(TokenKind::Name) => return p.flow_parse_interface(start),
            Some("type") if p.is(TokenKind::Name) => return p.flow_parse_type_alias(start),
            _ => {}
        }
        p.parse_expression_statement_from(next, start, expr)
    }

    fn should_parse_export_declaration(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.is_contextual("type") || p.should_parse_export_declaration_from(next)
    }

    fn parse_paren_item(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        node: Node,
        start: NodeStart,
        force_arrow: bool,
    ) -> PResult<Node> {
        if !p.is(TokenKind::Colon) {
            return p.parse_paren_item_from(next, node, start, force_arrow);
        }
        let type_annotation = p.flow_parse_type_annotation()?;
        if force_arrow {
            if !p.is(TokenKind::Arrow) {
                return p.unexpected(None);
            }
            p.next()?;
            let mut node = node;
            let params = match node.take_kind() {
                NodeKind::SequenceExpression { expressions } => expressions,
                kind => {
                    node.kind = kind;
                    vec![node]
                }
            };
            return p.parse_arrow_expression(start, params, false, Some(type_annotation));
        }
        Ok(p.finish_node(
            start,
            NodeKind::TypeCastExpression {
                expression: Box::new(node),
                type_annotation: Box::new(type_annotation),
                list_item: false,
            },
        ))
    }

    fn parse_export(&self, p: &mut Parser<'_>, next: Chain, start: NodeStart) -> PResult<Node> {
        let mut node = p.parse_export_from(next, start)?;
        if let NodeKind::ExportNamedDeclaration { export_kind, .. } = &mut node.kind {
            export_kind.get_or_insert_with(|| "value".to_string());
        }
        Ok(node)
    }

    fn parse_export_declaration(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ExportParts) -> PResult<Option<Node>> {
        if !p.is_contextual("type") {
            return p.parse_export_declaration_from(next, parts);
        }
        parts.export_kind = Some("type".to_string());
        let declaration_start = p.start_node();
        p.next()?;
        if p.is(TokenKind::BraceL) {
            parts.specifiers = p.parse_export_specifiers()?;
            p.parse_export_source(parts, false)?;
            return Ok(None);
        }
        Ok(Some(p.flow_parse_type_alias(declaration_start)?))
    }

    fn parse_class_id(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        parts: &mut ClassParts,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<()> {
        p.parse_class_id_from(next, parts, is_statement, optional_id)?;
        if p.is_relational("<") {
            parts.type_parameters = Some(p.flow_parse_type_parameter_declaration()?);
        }
        Ok(())
    }

    fn parse_class_super(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ClassParts) -> PResult<()> {
        p.parse_class_super_from(next, parts)?;
        if parts.super_class.is_some() && p.is_relational("<") {
            parts.super_type_parameters = Some(p.flow_parse_type_parameter_instantiation()?);
        }
        if p.eat_contextual("implements")? {
            let mut implements = Vec::new();
            loop {
                let start = p.start_node();
                let id = p.parse_identifier(false)?;
                let type_parameters = if p.is_relational("<") {
                    Some(Box::new(p.flow_parse_type_parameter_instantiation()?))
                } else {
                    None
                };
                implements.push(p.finish_node(start, NodeKind::ClassImplements { id: Box::new(id), type_parameters }));
                if !p.eat(TokenKind::Comma)? {
                    break;
                }
            }
            parts.implements = Some(implements);
        }
        Ok(())
    }

    fn to_assignable(&self, p: &mut Parser<'_>, next: Chain, node: Node, is_binding: bool) -> PResult<Node> {
        let node = if is_type_cast(&node) { p.flow_type_cast_to_parameter(node)? } else { node };
        p.to_assignable_from(next, node, is_binding)
    }

    fn to_assignable_list(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        list: Vec<Option<Node>>,
        is_binding: bool,
    ) -> PResult<Vec<Option<Node>>> {
        let mut converted = Vec::with_capacity(list.len());
        for item in list {
            converted.push(match item {
                Some(expr) if is_type_cast(&expr) => Some(p.flow_type_cast_to_parameter(expr)?),
                other => other,
            });
        }
        p.to_assignable_list_from(next, converted, is_binding)
    }

    fn check_referenced(&self, p: &mut Parser<'_>, next: Chain, node: &Node) -> PResult<()> {
        if matches!(node.kind, NodeKind::TypeCastExpression { list_item: true, .. }) {
            return p.raise(node.start, messages::UNEXPECTED_TYPE_CAST);
        }
        p.check_referenced_from(next, node)
    }

    fn parse_expr_list_item(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        allow_empty: bool,
    ) -> PResult<MaybePattern<Option<Node>>> {
        let start = p.start_node();
        let item = p.parse_expr_list_item_from(next, allow_empty)?;
        if !p.is(TokenKind::Colon) {
            return Ok(item);
        }
        let Some(expression) = item.value else {
            return p.unexpected(None);
        };
        let type_annotation = p.flow_parse_type_annotation()?;
        let cast = p.finish_node(
            start,
            NodeKind::TypeCastExpression {
                expression: Box::new(expression),
                type_annotation: Box::new(type_annotation),
                list_item: true,
            },
        );
        Ok(MaybePattern { value: Some(cast), shorthand_default: item.shorthand_default })
    }

    fn check_lval(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        node: &Node,
        is_binding: bool,
        clashes: Option<&mut FxHashSet<String>>,
    ) -> PResult<()> {
        if is_type_cast(node) {
            return Ok(());
        }
        p.check_lval_from(next, node, is_binding, clashes)
    }

    fn parse_class_property(&self, p: &mut Parser<'_>, next: Chain, mut member: ClassMember) -> PResult<Node> {
        if p.is(TokenKind::Colon) {
            member.type_annotation = Some(p.flow_parse_type_annotation()?);
        }
        p.parse_class_property_from(next, member)
    }

    fn is_class_property(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.is(TokenKind::Colon) || p.is_class_property_from(next)
    }

    fn parse_class_method(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        mut member: ClassMember,
        is_generator: bool,
        is_async: bool,
    ) -> PResult<Node> {
        if p.is_relational("<") {
            member.type_parameters = Some(p.flow_parse_type_parameter_declaration()?);
        }
        p.parse_class_method_from(next, member, is_generator, is_async)
    }

    fn parse_obj_prop_value(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        head: PropHead,
        is_generator: bool,
        is_async: bool,
        is_pattern: bool,
    ) -> PResult<MaybePattern> {
        let type_parameters = if p.is_relational("<") {
            let type_parameters = p.flow_parse_type_parameter_declaration()?;
            if !p.is(TokenKind::ParenL) {
                return p.unexpected(None);
            }
            Some(type_parameters)
        } else {
            None
        };

        let mut prop = p.parse_obj_prop_value_from(next, head, is_generator, is_async, is_pattern)?;
        if let Some(type_parameters) = type_parameters {
            if let NodeKind::ObjectMethod { function, .. } = &mut prop.value.kind {
                function.type_parameters = Some(Box::new(type_parameters));
            }
        }
        Ok(prop)
    }

    fn parse_assignable_list_item_types(&self, p: &mut Parser<'_>, next: Chain, param: Node) -> PResult<Node> {
        let mut param = param;
        let mut changed = false;
        if p.eat(TokenKind::Question)? {
            if !param.set_optional() {
                return p.unexpected(Some(p.state().last_tok_start));
            }
            changed = true;
        }
        if p.is(TokenKind::Colon) {
            let annotation = p.flow_parse_type_annotation()?;
            param.set_type_annotation(annotation);
            changed = true;
        }
        if changed {
            p.refinish(&mut param);
        }
        p.parse_assignable_list_item_types_from(next, param)
    }

    fn parse_import_specifiers(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ImportParts) -> PResult<()> {
        parts.import_kind = Some("value".to_string());

        let kind = if p.is(TokenKind::Typeof) {
            Some("typeof")
        } else if p.is_contextual("type") {
            Some("type")
        } else {
            None
        };
        if let Some(kind) = kind {
            let ahead = p.tok.lookahead()?;
            let names_binding = match ahead.kind {
                TokenKind::Name => ahead.value.as_str() != Some("from"),
                TokenKind::BraceL | TokenKind::Star => true,
                _ => false,
            };
            if names_binding {
                p.next()?;
                parts.import_kind = Some(kind.to_string());
            }
        }
        p.parse_import_specifiers_from(next, parts)
    }

    fn parse_function_params(&self, p: &mut Parser<'_>, next: Chain, parts: &mut FunctionParts) -> PResult<()> {
        if p.is_relational("<") {
            parts.type_parameters = Some(p.flow_parse_type_parameter_declaration()?);
        }
        p.parse_function_params_from(next, parts)
    }

    fn parse_var_head(&self, p: &mut Parser<'_>, next: Chain) -> PResult<Node> {
        let mut id = p.parse_var_head_from(next)?;
        if p.is(TokenKind::Colon) {
            let annotation = p.flow_parse_type_annotation()?;
            id.set_type_annotation(annotation);
            p.refinish(&mut id);
        }
        Ok(id)
    }

    fn parse_async_arrow_from_call(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        start: NodeStart,
        args: Vec<Node>,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        let return_type = if p.is(TokenKind::Colon) { Some(p.flow_parse_type_annotation()?) } else { return_type };
        p.parse_async_arrow_from_call_from(next, start, args, return_type)
    }

    fn should_parse_async_arrow(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.is(TokenKind::Colon) || p.should_parse_async_arrow_from(next)
    }

    fn parse_paren_and_distinguish(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        start: NodeStart,
        can_be_arrow: bool,
    ) -> PResult<Node> {
        if can_be_arrow && p.tok.lookahead()?.kind == TokenKind::ParenR {
            p.expect(TokenKind::ParenL)?;
            p.expect(TokenKind::ParenR)?;
            let return_type = if p.is(TokenKind::Colon) { Some(p.flow_parse_type_annotation()?) } else { None };
            p.expect(TokenKind::Arrow)?;
            return p.parse_arrow_expression(start, Vec::new(), false, return_type);
        }

        let node = p.parse_paren_and_distinguish_from(next, start, can_be_arrow)?;
        if !p.is(TokenKind::Colon) {
            return Ok(node);
        }
        let candidate = p.clone_node(&node);
        match p.try_parse(|p| p.parse_paren_item(candidate, start, true))? {
            Some(arrow) => Ok(arrow),
            None => Ok(node),
        }
    }
}
