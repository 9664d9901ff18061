//! Statement, class and module parsing.

use esfront_ast::{Class, Node, NodeKind, RawValue, TokenKind};
use esfront_core::text::TextPos;
use esfront_diagnostics::{format_message, messages, PResult};
use esfront_tokenizer::{Label, LabelKind, MethodKind};

use crate::parser::{NodeStart, Parser};

/// The pieces of a function collected before its body is parsed.
#[derive(Debug, Default)]
pub(crate) struct FunctionParts {
    pub id: Option<Node>,
    pub generator: bool,
    pub is_async: bool,
    pub params: Vec<Node>,
    pub type_parameters: Option<Node>,
    pub return_type: Option<Node>,
}

/// The heading of a class: name, superclass and their type arguments.
#[derive(Debug, Default)]
pub(crate) struct ClassParts {
    pub id: Option<Node>,
    pub super_class: Option<Node>,
    pub type_parameters: Option<Node>,
    pub super_type_parameters: Option<Node>,
    pub implements: Option<Vec<Node>>,
    pub decorators: Vec<Node>,
}

/// A class member whose key has been read but whose value has not.
#[derive(Debug)]
pub(crate) struct ClassMember {
    pub start: NodeStart,
    pub key: Node,
    pub computed: bool,
    pub is_static: bool,
    pub decorators: Vec<Node>,
    pub kind: MethodKind,
    pub type_annotation: Option<Node>,
    pub type_parameters: Option<Node>,
}

#[derive(Debug, Default)]
pub(crate) struct ImportParts {
    pub specifiers: Vec<Node>,
    pub import_kind: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ExportParts {
    /// Start of the `export` keyword, where misplaced decorators are reported.
    pub start: TextPos,
    pub specifiers: Vec<Node>,
    pub source: Option<Node>,
    pub export_kind: Option<String>,
}

impl ExportParts {
    fn new(start: TextPos) -> Self {
        Self { start, specifiers: Vec::new(), source: None, export_kind: None }
    }
}

fn loop_label() -> Label {
    Label { name: None, kind: Some(LabelKind::Loop), statement_start: None }
}

fn switch_label() -> Label {
    Label { name: None, kind: Some(LabelKind::Switch), statement_start: None }
}

/// Is `key` the name `name`, written as an identifier or a string?
fn is_key_named(key: &Node, name: &str) -> bool {
    match &key.kind {
        NodeKind::Identifier { name: n, .. } => n == name,
        NodeKind::StringLiteral { value } => value == name,
        _ => false,
    }
}

impl Parser<'_> {
    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn parse_statement_base(&mut self, declaration: bool, top_level: bool) -> PResult<Node> {
        if self.is(TokenKind::At) {
            self.parse_decorators(true)?;
        }

        let start_kind = self.state().kind;
        let start = self.start_node();

        match start_kind {
            TokenKind::Break | TokenKind::Continue => self.parse_break_continue_statement(start, start_kind == TokenKind::Break),
            TokenKind::Debugger => {
                self.next()?;
                self.semicolon()?;
                Ok(self.finish_node(start, NodeKind::DebuggerStatement))
            }
            TokenKind::Do => self.parse_do_statement(start),
            TokenKind::For => self.parse_for_statement(start),
            TokenKind::Function => {
                if !declaration {
                    return self.unexpected(None);
                }
                self.next()?;
                self.parse_function(start, FunctionParts::default(), true, false, false)
            }
            TokenKind::Class => {
                if !declaration {
                    return self.unexpected(None);
                }
                let decorators = self.take_decorators();
                self.parse_class(start, ClassParts { decorators, ..ClassParts::default() }, true, false)
            }
            TokenKind::If => self.parse_if_statement(start),
            TokenKind::Return => self.parse_return_statement(start),
            TokenKind::Switch => self.parse_switch_statement(start),
            TokenKind::Throw => self.parse_throw_statement(start),
            TokenKind::Try => self.parse_try_statement(start),
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                if start_kind != TokenKind::Var && !declaration {
                    return self.unexpected(None);
                }
                self.parse_var_statement(start, start_kind)
            }
            TokenKind::While => self.parse_while_statement(start),
            TokenKind::With => self.parse_with_statement(start),
            TokenKind::BraceL => self.parse_block(false),
            TokenKind::Semi => {
                self.next()?;
                Ok(self.finish_node(start, NodeKind::EmptyStatement))
            }
            TokenKind::Export | TokenKind::Import => {
                if !self.options.allow_import_export_everywhere {
                    if !top_level {
                        return self.raise(self.state().start, messages::IMPORT_EXPORT_TOP_LEVEL);
                    }
                    if !self.in_module() {
                        return self.raise(self.state().start, messages::IMPORT_EXPORT_MODULE);
                    }
                }
                if start_kind == TokenKind::Import {
                    self.parse_import(start)
                } else {
                    self.parse_export(start)
                }
            }
            _ => {
                if self.is_contextual("async") {
                    let checkpoint = self.tok.checkpoint();
                    self.next()?;
                    if self.is(TokenKind::Function) && !self.can_insert_semicolon() {
                        self.expect(TokenKind::Function)?;
                        let parts = FunctionParts { is_async: true, ..FunctionParts::default() };
                        return self.parse_function(start, parts, true, false, false);
                    }
                    self.tok.rewind(checkpoint);
                }

                let maybe_name = self.value_string();
                let expr = self.parse_expression(false)?;
                if start_kind == TokenKind::Name && expr.is_identifier() && self.eat(TokenKind::Colon)? {
                    return self.parse_labeled_statement(start, maybe_name, expr);
                }
                self.parse_expression_statement(start, expr)
            }
        }
    }

    pub(crate) fn take_decorators(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.state_mut().decorators)
    }

    /// Parse decorators into the pending list. They must be followed by a
    /// class, or by `export` when `allow_export` is set.
    pub(crate) fn parse_decorators(&mut self, allow_export: bool) -> PResult<()> {
        while self.is(TokenKind::At) {
            let decorator = self.parse_decorator()?;
            self.state_mut().decorators.push(decorator);
        }
        if allow_export && self.is(TokenKind::Export) {
            return Ok(());
        }
        if !self.is(TokenKind::Class) {
            return self.raise(self.state().start, messages::LEADING_DECORATORS);
        }
        Ok(())
    }

    pub(crate) fn parse_decorator(&mut self) -> PResult<Node> {
        let start = self.start_node();
        self.next()?;
        let expression = self.parse_maybe_assign(false)?;
        Ok(self.finish_node(start, NodeKind::Decorator { expression: Box::new(expression) }))
    }

    fn parse_break_continue_statement(&mut self, start: NodeStart, is_break: bool) -> PResult<Node> {
        let keyword = if is_break { "break" } else { "continue" };
        self.next()?;

        let label = if self.is_line_terminator()? {
            None
        } else if !self.is(TokenKind::Name) {
            return self.unexpected(None);
        } else {
            let label = self.parse_identifier(false)?;
            self.semicolon()?;
            Some(label)
        };

        let label_name = label.as_ref().and_then(|l| l.identifier_name());
        let found = self.state().labels.iter().any(|lab| {
            if label_name.is_some() && lab.name.as_deref() != label_name {
                return false;
            }
            (lab.kind.is_some() && (is_break || lab.kind == Some(LabelKind::Loop))) || (label_name.is_some() && is_break)
        });
        if !found {
            return self.raise(start.pos, &format_message(messages::UNSYNTACTIC_0, &[keyword]));
        }

        let label = label.map(Box::new);
        let kind = if is_break { NodeKind::BreakStatement { label } } else { NodeKind::ContinueStatement { label } };
        Ok(self.finish_node(start, kind))
    }

    fn parse_do_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        self.state_mut().labels.push(loop_label());
        let body = self.parse_statement(false, false)?;
        self.state_mut().labels.pop();
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        self.eat(TokenKind::Semi)?;
        Ok(self.finish_node(start, NodeKind::DoWhileStatement { body: Box::new(body), test: Box::new(test) }))
    }

    /// Parse `for`, `for`-`in` and `for`-`of`. The init is parsed with `in`
    /// disabled, and the token after it decides which loop this is.
    fn parse_for_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        self.state_mut().labels.push(loop_label());
        self.expect(TokenKind::ParenL)?;

        if self.is(TokenKind::Semi) {
            return self.parse_for(start, None);
        }

        if self.is(TokenKind::Var) || self.is(TokenKind::Let) || self.is(TokenKind::Const) {
            let init_start = self.start_node();
            let var_kind = self.state().kind;
            self.next()?;
            let declarations = self.parse_var(true, var_kind)?;
            let single_without_init = declarations.len() == 1
                && matches!(&declarations[0].kind, NodeKind::VariableDeclarator { init: None, .. });
            let kind = var_kind.keyword_text().unwrap_or_default().to_string();
            let init = self.finish_node(init_start, NodeKind::VariableDeclaration { kind, declarations });

            if (self.is(TokenKind::In) || self.is_contextual("of")) && single_without_init {
                return self.parse_for_in(start, init);
            }
            return self.parse_for(start, Some(init));
        }

        let init = self.parse_expression_deferred(true)?;
        if self.is(TokenKind::In) || self.is_contextual("of") {
            let init = self.to_assignable(init.value, false)?;
            self.check_lval(&init, false, None)?;
            return self.parse_for_in(start, init);
        }
        let init = init.expression(self)?;
        self.parse_for(start, Some(init))
    }

    fn parse_for(&mut self, start: NodeStart, init: Option<Node>) -> PResult<Node> {
        self.expect(TokenKind::Semi)?;
        let test = if self.is(TokenKind::Semi) { None } else { Some(self.parse_expression(false)?) };
        self.expect(TokenKind::Semi)?;
        let update = if self.is(TokenKind::ParenR) { None } else { Some(self.parse_expression(false)?) };
        self.expect(TokenKind::ParenR)?;
        let body = self.parse_statement(false, false)?;
        self.state_mut().labels.pop();
        Ok(self.finish_node(
            start,
            NodeKind::ForStatement {
                init: init.map(Box::new),
                test: test.map(Box::new),
                update: update.map(Box::new),
                body: Box::new(body),
            },
        ))
    }

    fn parse_for_in(&mut self, start: NodeStart, left: Node) -> PResult<Node> {
        let is_in = self.is(TokenKind::In);
        self.next()?;
        let right = self.parse_expression(false)?;
        self.expect(TokenKind::ParenR)?;
        let body = self.parse_statement(false, false)?;
        self.state_mut().labels.pop();

        let (left, right, body) = (Box::new(left), Box::new(right), Box::new(body));
        let kind = if is_in {
            NodeKind::ForInStatement { left, right, body }
        } else {
            NodeKind::ForOfStatement { left, right, body }
        };
        Ok(self.finish_node(start, kind))
    }

    fn parse_if_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement(false, false)?;
        let alternate = if self.eat(TokenKind::Else)? { Some(Box::new(self.parse_statement(false, false)?)) } else { None };
        Ok(self.finish_node(
            start,
            NodeKind::IfStatement { test: Box::new(test), consequent: Box::new(consequent), alternate },
        ))
    }

    fn parse_return_statement(&mut self, start: NodeStart) -> PResult<Node> {
        if !self.state().in_function && !self.options.allow_return_outside_function {
            return self.raise(self.state().start, messages::RETURN_OUTSIDE_FUNCTION);
        }
        self.next()?;
        let argument = if self.is_line_terminator()? {
            None
        } else {
            let argument = self.parse_expression(false)?;
            self.semicolon()?;
            Some(Box::new(argument))
        };
        Ok(self.finish_node(start, NodeKind::ReturnStatement { argument }))
    }

    fn parse_switch_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let discriminant = self.parse_paren_expression()?;
        self.expect(TokenKind::BraceL)?;
        self.state_mut().labels.push(switch_label());

        let mut cases = Vec::new();
        let mut current: Option<(NodeStart, Option<Node>, Vec<Node>)> = None;
        let mut saw_default = false;

        while !self.is(TokenKind::BraceR) {
            if self.is(TokenKind::Case) || self.is(TokenKind::Default) {
                let is_case = self.is(TokenKind::Case);
                if let Some((case_start, test, consequent)) = current.take() {
                    let test = test.map(Box::new);
                    cases.push(self.finish_node(case_start, NodeKind::SwitchCase { test, consequent }));
                }
                let case_start = self.start_node();
                self.next()?;
                let test = if is_case {
                    Some(self.parse_expression(false)?)
                } else {
                    if saw_default {
                        return self.raise(self.state().last_tok_start, messages::MULTIPLE_DEFAULTS);
                    }
                    saw_default = true;
                    None
                };
                self.expect(TokenKind::Colon)?;
                current = Some((case_start, test, Vec::new()));
            } else {
                match current.as_mut() {
                    Some((_, _, consequent)) => consequent.push(self.parse_statement(true, false)?),
                    None => return self.unexpected(None),
                }
            }
        }
        if let Some((case_start, test, consequent)) = current.take() {
            let test = test.map(Box::new);
            cases.push(self.finish_node(case_start, NodeKind::SwitchCase { test, consequent }));
        }

        self.next()?;
        self.state_mut().labels.pop();
        Ok(self.finish_node(start, NodeKind::SwitchStatement { discriminant: Box::new(discriminant), cases }))
    }

    fn parse_throw_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let state = self.state();
        if esfront_core::text::has_line_break(self.tok.slice(state.last_tok_end, state.start)) {
            return self.raise(state.last_tok_end, messages::NEWLINE_AFTER_THROW);
        }
        let argument = self.parse_expression(false)?;
        self.semicolon()?;
        Ok(self.finish_node(start, NodeKind::ThrowStatement { argument: Box::new(argument) }))
    }

    fn parse_try_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let block = self.parse_block(false)?;

        let handler = if self.is(TokenKind::Catch) {
            let clause_start = self.start_node();
            self.next()?;
            self.expect(TokenKind::ParenL)?;
            let param = self.parse_binding_atom()?;
            let mut names = rustc_hash::FxHashSet::default();
            self.check_lval(&param, true, Some(&mut names))?;
            self.expect(TokenKind::ParenR)?;
            let body = self.parse_block(false)?;
            Some(Box::new(self.finish_node(
                clause_start,
                NodeKind::CatchClause { param: Box::new(param), body: Box::new(body) },
            )))
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::Finally)? { Some(Box::new(self.parse_block(false)?)) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return self.raise(start.pos, messages::MISSING_CATCH_OR_FINALLY);
        }
        Ok(self.finish_node(
            start,
            NodeKind::TryStatement { block: Box::new(block), handler, guarded_handlers: Vec::new(), finalizer },
        ))
    }

    fn parse_var_statement(&mut self, start: NodeStart, kind: TokenKind) -> PResult<Node> {
        self.next()?;
        let declarations = self.parse_var(false, kind)?;
        self.semicolon()?;
        let kind = kind.keyword_text().unwrap_or_default().to_string();
        Ok(self.finish_node(start, NodeKind::VariableDeclaration { kind, declarations }))
    }

    fn parse_while_statement(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        self.state_mut().labels.push(loop_label());
        let body = self.parse_statement(false, false)?;
        self.state_mut().labels.pop();
        Ok(self.finish_node(start, NodeKind::WhileStatement { test: Box::new(test), body: Box::new(body) }))
    }

    fn parse_with_statement(&mut self, start: NodeStart) -> PResult<Node> {
        if self.state().strict {
            return self.raise(self.state().start, messages::WITH_IN_STRICT);
        }
        self.next()?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement(false, false)?;
        Ok(self.finish_node(start, NodeKind::WithStatement { object: Box::new(object), body: Box::new(body) }))
    }

    fn parse_labeled_statement(&mut self, start: NodeStart, name: String, expr: Node) -> PResult<Node> {
        if self.state().labels.iter().any(|label| label.name.as_deref() == Some(name.as_str())) {
            return self.raise(expr.start, &format_message(messages::LABEL_0_ALREADY_DECLARED, &[name.as_str()]));
        }

        let kind = if self.state().kind.is_loop() {
            Some(LabelKind::Loop)
        } else if self.is(TokenKind::Switch) {
            Some(LabelKind::Switch)
        } else {
            None
        };
        let statement_start = self.state().start;
        for label in self.state_mut().labels.iter_mut().rev() {
            if label.statement_start != Some(start.pos) {
                break;
            }
            label.statement_start = Some(statement_start);
            label.kind = kind;
        }
        self.state_mut().labels.push(Label { name: Some(name), kind, statement_start: Some(statement_start) });
        let body = self.parse_statement(true, false)?;
        self.state_mut().labels.pop();

        Ok(self.finish_node(start, NodeKind::LabeledStatement { label: Box::new(expr), body: Box::new(body) }))
    }

    pub(crate) fn parse_expression_statement_base(&mut self, start: NodeStart, expr: Node) -> PResult<Node> {
        self.semicolon()?;
        Ok(self.finish_node(start, NodeKind::ExpressionStatement { expression: Box::new(expr) }))
    }

    // ========================================================================
    // Blocks and directives
    // ========================================================================

    pub(crate) fn parse_block(&mut self, allow_directives: bool) -> PResult<Node> {
        let start = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let (body, directives) = self.parse_block_body(allow_directives, false, TokenKind::BraceR)?;
        Ok(self.finish_node(start, NodeKind::BlockStatement { body, directives }))
    }

    /// Parse statements up to `end`, splitting a leading run of string
    /// statements off as directives. `"use strict"` switches strict mode on
    /// until the end of the body.
    pub(crate) fn parse_block_body(
        &mut self,
        allow_directives: bool,
        top_level: bool,
        end: TokenKind,
    ) -> PResult<(Vec<Node>, Vec<Node>)> {
        let mut body = Vec::new();
        let mut directives = Vec::new();
        let mut parsed_non_directive = false;
        let mut old_strict: Option<bool> = None;
        let mut octal_position: Option<TextPos> = None;

        while !self.eat(end)? {
            if !parsed_non_directive && self.state().contains_octal && octal_position.is_none() {
                octal_position = self.state().octal_position;
            }

            let stmt = self.parse_statement(true, top_level)?;

            if allow_directives && !parsed_non_directive && is_directive_candidate(&stmt) {
                let directive = self.stmt_to_directive(stmt);
                let use_strict = matches!(&directive.kind, NodeKind::Directive { value }
                    if matches!(&value.kind, NodeKind::DirectiveLiteral { value } if value == "use strict"));
                directives.push(directive);

                if use_strict && old_strict.is_none() {
                    old_strict = Some(self.state().strict);
                    self.tok.set_strict(true)?;
                    if let Some(pos) = octal_position {
                        return self.raise(pos, messages::OCTAL_IN_STRICT_MODE);
                    }
                }
                continue;
            }

            parsed_non_directive = true;
            body.push(stmt);
        }

        if old_strict == Some(false) {
            self.tok.set_strict(false)?;
        }
        Ok((body, directives))
    }

    /// Turn a string expression statement into a directive, keeping the
    /// literal's raw text.
    fn stmt_to_directive(&mut self, stmt: Node) -> Node {
        let Node { id, kind, start, end, loc, .. } = stmt;
        let NodeKind::ExpressionStatement { expression } = kind else {
            return Node::new(id, kind, start, end, loc);
        };

        let raw = self.tok.slice(expression.start, expression.end);
        let value = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default().to_string();
        let mut literal = self.finish_node_at(
            NodeStart::of(&expression),
            NodeKind::DirectiveLiteral { value: value.clone() },
            expression.end,
            expression.loc.end,
        );
        let extra = literal.extra_mut();
        extra.raw = Some(raw.to_string());
        extra.raw_value = Some(RawValue::Str(value));

        self.finish_node_at(
            NodeStart { pos: start, loc: loc.start },
            NodeKind::Directive { value: Box::new(literal) },
            end,
            loc.end,
        )
    }

    // ========================================================================
    // Variables and functions
    // ========================================================================

    pub(crate) fn parse_var(&mut self, is_for: bool, kind: TokenKind) -> PResult<Vec<Node>> {
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start_node();
            let id = self.parse_var_head()?;
            let init = if self.eat(TokenKind::Eq)? {
                Some(Box::new(self.parse_maybe_assign(is_for)?))
            } else if kind == TokenKind::Const && !(self.is(TokenKind::In) || self.is_contextual("of")) {
                return self.unexpected(None);
            } else if !id.is_identifier() && !(is_for && (self.is(TokenKind::In) || self.is_contextual("of"))) {
                return self.raise(self.state().last_tok_end, messages::COMPLEX_BINDING_WITHOUT_INIT);
            } else {
                None
            };
            declarations.push(self.finish_node(decl_start, NodeKind::VariableDeclarator { id: Box::new(id), init }));
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(declarations)
    }

    pub(crate) fn parse_var_head_base(&mut self) -> PResult<Node> {
        let id = self.parse_binding_atom()?;
        self.check_lval(&id, true, None)?;
        Ok(id)
    }

    /// Parse a function declaration or expression; the `function` keyword
    /// has been consumed.
    pub(crate) fn parse_function(
        &mut self,
        start: NodeStart,
        mut parts: FunctionParts,
        is_statement: bool,
        allow_expression_body: bool,
        optional_id: bool,
    ) -> PResult<Node> {
        let old_in_method = self.state().in_method;
        self.state_mut().in_method = None;

        if self.eat(TokenKind::Star)? {
            parts.generator = true;
        }
        let has_name = self.is(TokenKind::Name) || self.is(TokenKind::Yield);
        if is_statement && !optional_id && !has_name {
            return self.unexpected(None);
        }
        if has_name {
            parts.id = Some(self.parse_binding_identifier()?);
        }

        self.parse_function_params(&mut parts)?;
        let function = self.parse_function_body(parts, allow_expression_body)?;
        self.state_mut().in_method = old_in_method;

        let kind = if is_statement { NodeKind::FunctionDeclaration(function) } else { NodeKind::FunctionExpression(function) };
        Ok(self.finish_node(start, kind))
    }

    pub(crate) fn parse_function_params_base(&mut self, parts: &mut FunctionParts) -> PResult<()> {
        self.expect(TokenKind::ParenL)?;
        parts.params = self.parse_binding_list(TokenKind::ParenR, false, true)?.into_iter().flatten().collect();
        Ok(())
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Parse a class declaration or expression starting at the `class`
    /// keyword.
    pub(crate) fn parse_class(
        &mut self,
        start: NodeStart,
        mut parts: ClassParts,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<Node> {
        self.next()?;
        self.parse_class_id(&mut parts, is_statement, optional_id)?;
        self.parse_class_super(&mut parts)?;
        let body = self.parse_class_body()?;

        let class = Class {
            id: parts.id.map(Box::new),
            super_class: parts.super_class.map(Box::new),
            body: Box::new(body),
            decorators: parts.decorators,
            type_parameters: parts.type_parameters.map(Box::new),
            super_type_parameters: parts.super_type_parameters.map(Box::new),
            implements: parts.implements,
        };
        let kind = if is_statement { NodeKind::ClassDeclaration(class) } else { NodeKind::ClassExpression(class) };
        Ok(self.finish_node(start, kind))
    }

    pub(crate) fn parse_class_id_base(
        &mut self,
        parts: &mut ClassParts,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<()> {
        if self.is(TokenKind::Name) {
            parts.id = Some(self.parse_identifier(false)?);
        } else if !optional_id && is_statement {
            return self.unexpected(None);
        }
        Ok(())
    }

    pub(crate) fn parse_class_super_base(&mut self, parts: &mut ClassParts) -> PResult<()> {
        if self.eat(TokenKind::Extends)? {
            parts.super_class = Some(self.parse_expr_subscripts()?.expression(self)?);
        }
        Ok(())
    }

    /// Parse `{ ... }` of a class. Class bodies are always strict.
    fn parse_class_body(&mut self) -> PResult<Node> {
        let old_strict = self.state().strict;
        self.state_mut().strict = true;
        let body = self.parse_class_members();
        self.state_mut().strict = old_strict;
        body
    }

    fn parse_class_members(&mut self) -> PResult<Node> {
        let body_start = self.start_node();
        let mut members = Vec::new();
        let mut decorators = Vec::new();
        let mut had_constructor = false;
        let mut had_constructor_call = false;

        self.expect(TokenKind::BraceL)?;
        while !self.eat(TokenKind::BraceR)? {
            if self.eat(TokenKind::Semi)? {
                continue;
            }
            if self.is(TokenKind::At) {
                decorators.push(self.parse_decorator()?);
                continue;
            }

            let start = self.start_node();
            let member_decorators = std::mem::take(&mut decorators);
            let maybe_static = self.is_contextual("static");
            let mut is_generator = self.eat(TokenKind::Star)?;
            let mut is_async = false;
            let mut is_get_set = false;
            let mut is_constructor_call = false;

            let (mut key, mut computed) = self.parse_property_name()?;
            let is_static = maybe_static && !self.is(TokenKind::ParenL);
            if is_static {
                if is_generator {
                    return self.unexpected(None);
                }
                is_generator = self.eat(TokenKind::Star)?;
                (key, computed) = self.parse_property_name()?;
            }

            let mut member = ClassMember {
                start,
                key,
                computed,
                is_static,
                decorators: member_decorators,
                kind: MethodKind::Method,
                type_annotation: None,
                type_parameters: None,
            };

            if !is_generator && !member.computed && member.key.is_identifier() {
                if self.is_class_property() {
                    members.push(self.parse_class_property(member)?);
                    continue;
                }
                if member.key.identifier_name() == Some("call") && self.is_contextual("constructor") {
                    is_constructor_call = true;
                    (member.key, member.computed) = self.parse_property_name()?;
                }
            }

            let is_async_method =
                !self.is(TokenKind::ParenL) && !member.computed && member.key.identifier_name() == Some("async");
            if is_async_method {
                if self.eat(TokenKind::Star)? {
                    is_generator = true;
                }
                is_async = true;
                (member.key, member.computed) = self.parse_property_name()?;
            }

            if !member.computed {
                let accessor = match member.key.identifier_name() {
                    Some("get") => Some(MethodKind::Get),
                    Some("set") => Some(MethodKind::Set),
                    _ => None,
                };
                if let Some(kind) = accessor.filter(|_| !is_async && !is_generator && !self.is(TokenKind::ParenL)) {
                    is_get_set = true;
                    member.kind = kind;
                    (member.key, member.computed) = self.parse_property_name()?;
                }

                let is_constructor =
                    !is_constructor_call && !member.is_static && is_key_named(&member.key, "constructor");
                if is_constructor {
                    let key_start = member.key.start;
                    if had_constructor {
                        return self.raise(key_start, messages::DUPLICATE_CONSTRUCTOR);
                    }
                    if is_get_set {
                        return self.raise(key_start, messages::CONSTRUCTOR_GET_SET);
                    }
                    if is_generator {
                        return self.raise(key_start, messages::CONSTRUCTOR_GENERATOR);
                    }
                    if is_async {
                        return self.raise(key_start, messages::CONSTRUCTOR_ASYNC);
                    }
                    member.kind = MethodKind::Constructor;
                    had_constructor = true;
                }

                if member.is_static && is_key_named(&member.key, "prototype") {
                    return self.raise(member.key.start, messages::STATIC_PROTOTYPE);
                }
            }

            if is_constructor_call {
                if had_constructor_call {
                    return self.raise(start.pos, messages::DUPLICATE_CONSTRUCTOR_CALL);
                }
                member.kind = MethodKind::ConstructorCall;
                had_constructor_call = true;
            }

            if matches!(member.kind, MethodKind::Constructor | MethodKind::ConstructorCall)
                && !member.decorators.is_empty()
            {
                return self.raise(start.pos, messages::DECORATED_CONSTRUCTOR);
            }

            let kind = member.kind;
            let method = self.parse_class_method(member, is_generator, is_async)?;
            if is_get_set {
                let (param_count, message) = match kind {
                    MethodKind::Get => (0, messages::GETTER_ARITY),
                    _ => (1, messages::SETTER_ARITY),
                };
                if let NodeKind::ClassMethod { function, .. } = &method.kind {
                    if function.params.len() != param_count {
                        return self.raise(start.pos, message);
                    }
                }
            }
            members.push(method);
        }

        if !decorators.is_empty() {
            return self.raise(self.state().start, messages::TRAILING_DECORATORS_METHOD);
        }
        Ok(self.finish_node(body_start, NodeKind::ClassBody { body: members }))
    }

    /// Does the current token end a class member key as a property?
    pub(crate) fn is_class_property_base(&mut self) -> bool {
        self.is(TokenKind::Eq) || self.is(TokenKind::Semi) || self.can_insert_semicolon()
    }

    pub(crate) fn parse_class_property_base(&mut self, member: ClassMember) -> PResult<Node> {
        let value = if self.eat(TokenKind::Eq)? { Some(Box::new(self.parse_maybe_assign(false)?)) } else { None };
        self.semicolon()?;
        Ok(self.finish_node(
            member.start,
            NodeKind::ClassProperty {
                computed: member.computed,
                key: Box::new(member.key),
                value,
                is_static: member.is_static,
                decorators: member.decorators,
                type_annotation: member.type_annotation.map(Box::new),
            },
        ))
    }

    pub(crate) fn parse_class_method_base(
        &mut self,
        member: ClassMember,
        is_generator: bool,
        is_async: bool,
    ) -> PResult<Node> {
        let parts = FunctionParts {
            generator: is_generator,
            is_async,
            type_parameters: member.type_parameters,
            ..FunctionParts::default()
        };
        let function = self.parse_method(parts, member.kind)?;
        Ok(self.finish_node(
            member.start,
            NodeKind::ClassMethod {
                kind: member.kind.as_str().to_string(),
                computed: member.computed,
                key: Box::new(member.key),
                is_static: member.is_static,
                decorators: member.decorators,
                function,
            },
        ))
    }

    // ========================================================================
    // Modules
    // ========================================================================

    pub(crate) fn parse_export_base(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let mut parts = ExportParts::new(start.pos);

        let declaration = if self.is(TokenKind::Star) {
            let spec_start = self.start_node();
            self.next()?;
            if !self.eat_contextual("as")? {
                self.parse_export_source(&mut parts, true)?;
                let Some(source) = parts.source else {
                    return self.unexpected(None);
                };
                return Ok(self.finish_node(start, NodeKind::ExportAllDeclaration { source: Box::new(source) }));
            }
            let exported = self.parse_identifier(false)?;
            let specifier = self.finish_node(spec_start, NodeKind::ExportNamespaceSpecifier { exported: Box::new(exported) });
            parts.specifiers.push(specifier);
            self.parse_export_specifiers_maybe(&mut parts)?;
            self.parse_export_source(&mut parts, true)?;
            None
        } else if self.is_export_default_specifier()? {
            let spec_start = self.start_node();
            let exported = self.parse_identifier(true)?;
            let specifier = self.finish_node(spec_start, NodeKind::ExportDefaultSpecifier { exported: Box::new(exported) });
            parts.specifiers.push(specifier);

            if self.is(TokenKind::Comma) && self.tok.lookahead()?.kind == TokenKind::Star {
                self.expect(TokenKind::Comma)?;
                let spec_start = self.start_node();
                self.expect(TokenKind::Star)?;
                self.expect_contextual("as")?;
                let exported = self.parse_identifier(false)?;
                let specifier =
                    self.finish_node(spec_start, NodeKind::ExportNamespaceSpecifier { exported: Box::new(exported) });
                parts.specifiers.push(specifier);
            } else {
                self.parse_export_specifiers_maybe(&mut parts)?;
            }
            self.parse_export_source(&mut parts, true)?;
            None
        } else if self.eat(TokenKind::Default)? {
            let expr_start = self.start_node();
            let mut declaration = if self.eat(TokenKind::Function)? {
                self.parse_function(expr_start, FunctionParts::default(), true, false, true)?
            } else if self.is(TokenKind::Class) {
                self.parse_class(expr_start, ClassParts::default(), true, true)?
            } else {
                let expr = self.parse_maybe_assign(false)?;
                self.semicolon()?;
                expr
            };
            self.check_export(start.pos, Some(&mut declaration))?;
            return Ok(self.finish_node(start, NodeKind::ExportDefaultDeclaration { declaration: Box::new(declaration) }));
        } else if self.state().kind.is_keyword() || self.should_parse_export_declaration() {
            self.parse_export_declaration(&mut parts)?
        } else {
            parts.specifiers = self.parse_export_specifiers()?;
            self.parse_export_source(&mut parts, false)?;
            None
        };

        let mut declaration = declaration;
        self.check_export(start.pos, declaration.as_mut())?;
        Ok(self.finish_node(
            start,
            NodeKind::ExportNamedDeclaration {
                declaration: declaration.map(Box::new),
                specifiers: parts.specifiers,
                source: parts.source.map(Box::new),
                export_kind: parts.export_kind,
            },
        ))
    }

    pub(crate) fn should_parse_export_declaration_base(&mut self) -> bool {
        self.is_contextual("async")
    }

    pub(crate) fn parse_export_declaration_base(&mut self, _parts: &mut ExportParts) -> PResult<Option<Node>> {
        Ok(Some(self.parse_statement(true, false)?))
    }

    /// Is this `export name from` or `export default, ...` rather than a
    /// declaration?
    fn is_export_default_specifier(&mut self) -> PResult<bool> {
        if self.is(TokenKind::Name) {
            return Ok(!self.is_contextual("type") && !self.is_contextual("async"));
        }
        if !self.is(TokenKind::Default) {
            return Ok(false);
        }
        let lookahead = self.tok.lookahead()?;
        Ok(lookahead.kind == TokenKind::Comma
            || (lookahead.kind == TokenKind::Name && lookahead.value.as_str() == Some("from")))
    }

    fn parse_export_specifiers_maybe(&mut self, parts: &mut ExportParts) -> PResult<()> {
        if self.eat(TokenKind::Comma)? {
            let specifiers = self.parse_export_specifiers()?;
            parts.specifiers.extend(specifiers);
        }
        Ok(())
    }

    pub(crate) fn parse_export_source(&mut self, parts: &mut ExportParts, expect: bool) -> PResult<()> {
        if self.eat_contextual("from")? {
            if !self.is(TokenKind::String) {
                return self.unexpected(None);
            }
            parts.source = Some(self.parse_expr_atom()?.expression(self)?);
            self.check_export(parts.start, None)?;
        } else if expect {
            return self.unexpected(None);
        }
        self.semicolon()
    }

    /// Decorators before `export` are only valid when a class is exported;
    /// they move onto that class.
    fn check_export(&mut self, start: TextPos, declaration: Option<&mut Node>) -> PResult<()> {
        if self.state().decorators.is_empty() {
            return Ok(());
        }
        let class = declaration.and_then(|decl| match &mut decl.kind {
            NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class) => Some(class),
            _ => None,
        });
        match class {
            Some(class) => {
                class.decorators = self.take_decorators();
                Ok(())
            }
            None => self.raise(start, messages::EXPORT_DECORATORS),
        }
    }

    pub(crate) fn parse_export_specifiers(&mut self) -> PResult<Vec<Node>> {
        let mut specifiers = Vec::new();
        let mut first = true;
        let mut needs_from = false;

        self.expect(TokenKind::BraceL)?;
        while !self.eat(TokenKind::BraceR)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }

            let is_default = self.is(TokenKind::Default);
            needs_from |= is_default;

            let start = self.start_node();
            let local = self.parse_identifier(is_default)?;
            let exported = if self.eat_contextual("as")? { self.parse_identifier(true)? } else { self.clone_node(&local) };
            specifiers.push(self.finish_node(
                start,
                NodeKind::ExportSpecifier { local: Box::new(local), exported: Box::new(exported) },
            ));
        }

        if needs_from && !self.is_contextual("from") {
            return self.unexpected(None);
        }
        Ok(specifiers)
    }

    fn parse_import(&mut self, start: NodeStart) -> PResult<Node> {
        self.next()?;
        let mut parts = ImportParts::default();

        if !self.is(TokenKind::String) {
            self.parse_import_specifiers(&mut parts)?;
            self.expect_contextual("from")?;
            if !self.is(TokenKind::String) {
                return self.unexpected(None);
            }
        }
        let source = self.parse_expr_atom()?.expression(self)?;
        self.semicolon()?;
        Ok(self.finish_node(
            start,
            NodeKind::ImportDeclaration {
                specifiers: parts.specifiers,
                source: Box::new(source),
                import_kind: parts.import_kind,
            },
        ))
    }

    pub(crate) fn parse_import_specifiers_base(&mut self, parts: &mut ImportParts) -> PResult<()> {
        if self.is(TokenKind::Name) {
            let start = self.start_node();
            let local = self.parse_identifier(false)?;
            self.check_lval(&local, true, None)?;
            parts.specifiers.push(self.finish_node(start, NodeKind::ImportDefaultSpecifier { local: Box::new(local) }));
            if !self.eat(TokenKind::Comma)? {
                return Ok(());
            }
        }

        if self.is(TokenKind::Star) {
            let start = self.start_node();
            self.next()?;
            self.expect_contextual("as")?;
            let local = self.parse_identifier(false)?;
            self.check_lval(&local, true, None)?;
            parts.specifiers.push(self.finish_node(start, NodeKind::ImportNamespaceSpecifier { local: Box::new(local) }));
            return Ok(());
        }

        self.expect(TokenKind::BraceL)?;
        let mut first = true;
        while !self.eat(TokenKind::BraceR)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }

            let start = self.start_node();
            let imported = self.parse_identifier(true)?;
            let local = if self.eat_contextual("as")? { self.parse_identifier(false)? } else { self.clone_node(&imported) };
            self.check_lval(&local, true, None)?;
            parts.specifiers.push(self.finish_node(
                start,
                NodeKind::ImportSpecifier { imported: Box::new(imported), local: Box::new(local) },
            ));
        }
        Ok(())
    }
}

fn is_directive_candidate(stmt: &Node) -> bool {
    matches!(&stmt.kind, NodeKind::ExpressionStatement { expression }
        if matches!(expression.kind, NodeKind::StringLiteral { .. }) && !expression.is_parenthesized())
}
