//! Dialect plugins.
//!
//! A plugin overrides a fixed set of parser routines. The active plugins
//! form an ordered table; each override receives a [`Chain`] cursor and
//! runs the rest of the table (and finally the base routine) by calling the
//! matching `*_from` method with it. Flow sits before JSX, so its in-type
//! token reading wins over JSX tag reading.

mod flow;
mod jsx;
mod xhtml;

use esfront_ast::{Function, Node};
use esfront_diagnostics::PResult;
use esfront_tokenizer::{Chain, TokenizerPlugin};
use rustc_hash::FxHashSet;

use crate::expression::PropHead;
use crate::options::{ParseOptions, Plugin};
use crate::parser::{MaybePattern, NodeStart, Parser};
use crate::statement::{ClassMember, ClassParts, ExportParts, FunctionParts, ImportParts};

pub(crate) use flow::FlowPlugin;
pub(crate) use jsx::JsxPlugin;

/// Build the parser and tokenizer plugin tables for `options`.
pub(crate) fn plugin_tables(
    options: &ParseOptions,
) -> (Vec<&'static dyn ParserPlugin>, Vec<&'static dyn TokenizerPlugin>) {
    let mut parser: Vec<&'static dyn ParserPlugin> = Vec::new();
    let mut tokenizer: Vec<&'static dyn TokenizerPlugin> = Vec::new();
    if options.has_plugin(Plugin::Flow) {
        parser.push(&FlowPlugin);
        tokenizer.push(&FlowPlugin);
    }
    if options.has_plugin(Plugin::Jsx) {
        parser.push(&JsxPlugin);
        tokenizer.push(&JsxPlugin);
    }
    (parser, tokenizer)
}

/// Parser-level overrides. Every method defaults to delegating down the
/// chain.
pub(crate) trait ParserPlugin: Send + Sync {
    fn parse_expr_atom(&self, p: &mut Parser<'_>, next: Chain) -> PResult<MaybePattern> {
        p.parse_expr_atom_from(next)
    }

    fn parse_statement(&self, p: &mut Parser<'_>, next: Chain, declaration: bool, top_level: bool) -> PResult<Node> {
        p.parse_statement_from(next, declaration, top_level)
    }

    fn parse_expression_statement(&self, p: &mut Parser<'_>, next: Chain, start: NodeStart, expr: Node) -> PResult<Node> {
        p.parse_expression_statement_from(next, start, expr)
    }

    fn should_parse_export_declaration(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.should_parse_export_declaration_from(next)
    }

    fn parse_paren_item(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        node: Node,
        start: NodeStart,
        force_arrow: bool,
    ) -> PResult<Node> {
        p.parse_paren_item_from(next, node, start, force_arrow)
    }

    fn parse_export(&self, p: &mut Parser<'_>, next: Chain, start: NodeStart) -> PResult<Node> {
        p.parse_export_from(next, start)
    }

    fn parse_export_declaration(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ExportParts) -> PResult<Option<Node>> {
        p.parse_export_declaration_from(next, parts)
    }

    fn parse_class_id(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        parts: &mut ClassParts,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<()> {
        p.parse_class_id_from(next, parts, is_statement, optional_id)
    }

    fn parse_class_super(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ClassParts) -> PResult<()> {
        p.parse_class_super_from(next, parts)
    }

    fn to_assignable(&self, p: &mut Parser<'_>, next: Chain, node: Node, is_binding: bool) -> PResult<Node> {
        p.to_assignable_from(next, node, is_binding)
    }

    fn to_assignable_list(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        list: Vec<Option<Node>>,
        is_binding: bool,
    ) -> PResult<Vec<Option<Node>>> {
        p.to_assignable_list_from(next, list, is_binding)
    }

    fn check_referenced(&self, p: &mut Parser<'_>, next: Chain, node: &Node) -> PResult<()> {
        p.check_referenced_from(next, node)
    }

    fn parse_expr_list_item(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        allow_empty: bool,
    ) -> PResult<MaybePattern<Option<Node>>> {
        p.parse_expr_list_item_from(next, allow_empty)
    }

    fn check_lval(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        node: &Node,
        is_binding: bool,
        clashes: Option<&mut FxHashSet<String>>,
    ) -> PResult<()> {
        p.check_lval_from(next, node, is_binding, clashes)
    }

    fn parse_class_property(&self, p: &mut Parser<'_>, next: Chain, member: ClassMember) -> PResult<Node> {
        p.parse_class_property_from(next, member)
    }

    fn is_class_property(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.is_class_property_from(next)
    }

    fn parse_class_method(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        member: ClassMember,
        is_generator: bool,
        is_async: bool,
    ) -> PResult<Node> {
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
        p.parse_obj_prop_value_from(next, head, is_generator, is_async, is_pattern)
    }

    fn parse_assignable_list_item_types(&self, p: &mut Parser<'_>, next: Chain, param: Node) -> PResult<Node> {
        p.parse_assignable_list_item_types_from(next, param)
    }

    fn parse_import_specifiers(&self, p: &mut Parser<'_>, next: Chain, parts: &mut ImportParts) -> PResult<()> {
        p.parse_import_specifiers_from(next, parts)
    }

    fn parse_function_params(&self, p: &mut Parser<'_>, next: Chain, parts: &mut FunctionParts) -> PResult<()> {
        p.parse_function_params_from(next, parts)
    }

    fn parse_var_head(&self, p: &mut Parser<'_>, next: Chain) -> PResult<Node> {
        p.parse_var_head_from(next)
    }

    fn parse_async_arrow_from_call(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        start: NodeStart,
        args: Vec<Node>,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        p.parse_async_arrow_from_call_from(next, start, args, return_type)
    }

    fn should_parse_async_arrow(&self, p: &mut Parser<'_>, next: Chain) -> bool {
        p.should_parse_async_arrow_from(next)
    }

    fn parse_paren_and_distinguish(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        start: NodeStart,
        can_be_arrow: bool,
    ) -> PResult<Node> {
        p.parse_paren_and_distinguish_from(next, start, can_be_arrow)
    }

    fn parse_function_body(
        &self,
        p: &mut Parser<'_>,
        next: Chain,
        parts: FunctionParts,
        allow_expression: bool,
    ) -> PResult<Function> {
        p.parse_function_body_from(next, parts, allow_expression)
    }
}

/// Run the plugin at `$chain`, or the base routine once the table is
/// exhausted.
macro_rules! chain {
    ($p:ident, $chain:expr, $method:ident, $base:ident($($arg:expr),*)) => {
        match $p.plugins.get($chain.index()).copied() {
            Some(plugin) => plugin.$method($p, $chain.next(), $($arg),*),
            None => $p.$base($($arg),*),
        }
    };
}

impl Parser<'_> {
    pub(crate) fn parse_expr_atom(&mut self) -> PResult<MaybePattern> {
        self.parse_expr_atom_from(Chain::START)
    }

    pub(crate) fn parse_expr_atom_from(&mut self, chain: Chain) -> PResult<MaybePattern> {
        chain!(self, chain, parse_expr_atom, parse_expr_atom_base())
    }

    pub(crate) fn parse_statement(&mut self, declaration: bool, top_level: bool) -> PResult<Node> {
        self.enter_nested()?;
        let result = self.parse_statement_from(Chain::START, declaration, top_level);
        self.leave_nested();
        result
    }

    pub(crate) fn parse_statement_from(&mut self, chain: Chain, declaration: bool, top_level: bool) -> PResult<Node> {
        chain!(self, chain, parse_statement, parse_statement_base(declaration, top_level))
    }

    pub(crate) fn parse_expression_statement(&mut self, start: NodeStart, expr: Node) -> PResult<Node> {
        self.parse_expression_statement_from(Chain::START, start, expr)
    }

    pub(crate) fn parse_expression_statement_from(&mut self, chain: Chain, start: NodeStart, expr: Node) -> PResult<Node> {
        chain!(self, chain, parse_expression_statement, parse_expression_statement_base(start, expr))
    }

    pub(crate) fn should_parse_export_declaration(&mut self) -> bool {
        self.should_parse_export_declaration_from(Chain::START)
    }

    pub(crate) fn should_parse_export_declaration_from(&mut self, chain: Chain) -> bool {
        chain!(self, chain, should_parse_export_declaration, should_parse_export_declaration_base())
    }

    pub(crate) fn parse_paren_item(&mut self, node: Node, start: NodeStart, force_arrow: bool) -> PResult<Node> {
        self.parse_paren_item_from(Chain::START, node, start, force_arrow)
    }

    pub(crate) fn parse_paren_item_from(
        &mut self,
        chain: Chain,
        node: Node,
        start: NodeStart,
        force_arrow: bool,
    ) -> PResult<Node> {
        chain!(self, chain, parse_paren_item, parse_paren_item_base(node, start, force_arrow))
    }

    pub(crate) fn parse_export(&mut self, start: NodeStart) -> PResult<Node> {
        self.parse_export_from(Chain::START, start)
    }

    pub(crate) fn parse_export_from(&mut self, chain: Chain, start: NodeStart) -> PResult<Node> {
        chain!(self, chain, parse_export, parse_export_base(start))
    }

    pub(crate) fn parse_export_declaration(&mut self, parts: &mut ExportParts) -> PResult<Option<Node>> {
        self.parse_export_declaration_from(Chain::START, parts)
    }

    pub(crate) fn parse_export_declaration_from(&mut self, chain: Chain, parts: &mut ExportParts) -> PResult<Option<Node>> {
        chain!(self, chain, parse_export_declaration, parse_export_declaration_base(parts))
    }

    pub(crate) fn parse_class_id(&mut self, parts: &mut ClassParts, is_statement: bool, optional_id: bool) -> PResult<()> {
        self.parse_class_id_from(Chain::START, parts, is_statement, optional_id)
    }

    pub(crate) fn parse_class_id_from(
        &mut self,
        chain: Chain,
        parts: &mut ClassParts,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<()> {
        chain!(self, chain, parse_class_id, parse_class_id_base(parts, is_statement, optional_id))
    }

    pub(crate) fn parse_class_super(&mut self, parts: &mut ClassParts) -> PResult<()> {
        self.parse_class_super_from(Chain::START, parts)
    }

    pub(crate) fn parse_class_super_from(&mut self, chain: Chain, parts: &mut ClassParts) -> PResult<()> {
        chain!(self, chain, parse_class_super, parse_class_super_base(parts))
    }

    pub(crate) fn to_assignable(&mut self, node: Node, is_binding: bool) -> PResult<Node> {
        self.to_assignable_from(Chain::START, node, is_binding)
    }

    pub(crate) fn to_assignable_from(&mut self, chain: Chain, node: Node, is_binding: bool) -> PResult<Node> {
        chain!(self, chain, to_assignable, to_assignable_base(node, is_binding))
    }

    pub(crate) fn to_assignable_list(&mut self, list: Vec<Option<Node>>, is_binding: bool) -> PResult<Vec<Option<Node>>> {
        self.to_assignable_list_from(Chain::START, list, is_binding)
    }

    pub(crate) fn to_assignable_list_from(
        &mut self,
        chain: Chain,
        list: Vec<Option<Node>>,
        is_binding: bool,
    ) -> PResult<Vec<Option<Node>>> {
        chain!(self, chain, to_assignable_list, to_assignable_list_base(list, is_binding))
    }

    pub(crate) fn check_referenced(&mut self, node: &Node) -> PResult<()> {
        self.check_referenced_from(Chain::START, node)
    }

    pub(crate) fn check_referenced_from(&mut self, chain: Chain, node: &Node) -> PResult<()> {
        chain!(self, chain, check_referenced, check_referenced_base(node))
    }

    pub(crate) fn parse_expr_list_item(&mut self, allow_empty: bool) -> PResult<MaybePattern<Option<Node>>> {
        self.parse_expr_list_item_from(Chain::START, allow_empty)
    }

    pub(crate) fn parse_expr_list_item_from(
        &mut self,
        chain: Chain,
        allow_empty: bool,
    ) -> PResult<MaybePattern<Option<Node>>> {
        chain!(self, chain, parse_expr_list_item, parse_expr_list_item_base(allow_empty))
    }

    pub(crate) fn check_lval(
        &mut self,
        node: &Node,
        is_binding: bool,
        clashes: Option<&mut FxHashSet<String>>,
    ) -> PResult<()> {
        self.check_lval_from(Chain::START, node, is_binding, clashes)
    }

    pub(crate) fn check_lval_from(
        &mut self,
        chain: Chain,
        node: &Node,
        is_binding: bool,
        clashes: Option<&mut FxHashSet<String>>,
    ) -> PResult<()> {
        chain!(self, chain, check_lval, check_lval_base(node, is_binding, clashes))
    }

    pub(crate) fn parse_class_property(&mut self, member: ClassMember) -> PResult<Node> {
        self.parse_class_property_from(Chain::START, member)
    }

    pub(crate) fn parse_class_property_from(&mut self, chain: Chain, member: ClassMember) -> PResult<Node> {
        chain!(self, chain, parse_class_property, parse_class_property_base(member))
    }

    pub(crate) fn is_class_property(&mut self) -> bool {
        self.is_class_property_from(Chain::START)
    }

    pub(crate) fn is_class_property_from(&mut self, chain: Chain) -> bool {
        chain!(self, chain, is_class_property, is_class_property_base())
    }

    pub(crate) fn parse_class_method(&mut self, member: ClassMember, is_generator: bool, is_async: bool) -> PResult<Node> {
        self.parse_class_method_from(Chain::START, member, is_generator, is_async)
    }

    pub(crate) fn parse_class_method_from(
        &mut self,
        chain: Chain,
        member: ClassMember,
        is_generator: bool,
        is_async: bool,
    ) -> PResult<Node> {
        chain!(self, chain, parse_class_method, parse_class_method_base(member, is_generator, is_async))
    }

    pub(crate) fn parse_obj_prop_value(
        &mut self,
        head: PropHead,
        is_generator: bool,
        is_async: bool,
        is_pattern: bool,
    ) -> PResult<MaybePattern> {
        self.parse_obj_prop_value_from(Chain::START, head, is_generator, is_async, is_pattern)
    }

    pub(crate) fn parse_obj_prop_value_from(
        &mut self,
        chain: Chain,
        head: PropHead,
        is_generator: bool,
        is_async: bool,
        is_pattern: bool,
    ) -> PResult<MaybePattern> {
        chain!(
            self,
            chain,
            parse_obj_prop_value,
            parse_obj_prop_value_base(head, is_generator, is_async, is_pattern)
        )
    }

    pub(crate) fn parse_assignable_list_item_types(&mut self, param: Node) -> PResult<Node> {
        self.parse_assignable_list_item_types_from(Chain::START, param)
    }

    pub(crate) fn parse_assignable_list_item_types_from(&mut self, chain: Chain, param: Node) -> PResult<Node> {
        chain!(self, chain, parse_assignable_list_item_types, parse_assignable_list_item_types_base(param))
    }

    pub(crate) fn parse_import_specifiers(&mut self, parts: &mut ImportParts) -> PResult<()> {
        self.parse_import_specifiers_from(Chain::START, parts)
    }

    pub(crate) fn parse_import_specifiers_from(&mut self, chain: Chain, parts: &mut ImportParts) -> PResult<()> {
        chain!(self, chain, parse_import_specifiers, parse_import_specifiers_base(parts))
    }

    pub(crate) fn parse_function_params(&mut self, parts: &mut FunctionParts) -> PResult<()> {
        self.parse_function_params_from(Chain::START, parts)
    }

    pub(crate) fn parse_function_params_from(&mut self, chain: Chain, parts: &mut FunctionParts) -> PResult<()> {
        chain!(self, chain, parse_function_params, parse_function_params_base(parts))
    }

    pub(crate) fn parse_var_head(&mut self) -> PResult<Node> {
        self.parse_var_head_from(Chain::START)
    }

    pub(crate) fn parse_var_head_from(&mut self, chain: Chain) -> PResult<Node> {
        chain!(self, chain, parse_var_head, parse_var_head_base())
    }

    pub(crate) fn parse_async_arrow_from_call(
        &mut self,
        start: NodeStart,
        args: Vec<Node>,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        self.parse_async_arrow_from_call_from(Chain::START, start, args, return_type)
    }

    pub(crate) fn parse_async_arrow_from_call_from(
        &mut self,
        chain: Chain,
        start: NodeStart,
        args: Vec<Node>,
        return_type: Option<Node>,
    ) -> PResult<Node> {
        chain!(self, chain, parse_async_arrow_from_call, parse_async_arrow_from_call_base(start, args, return_type))
    }

    pub(crate) fn should_parse_async_arrow(&mut self) -> bool {
        self.should_parse_async_arrow_from(Chain::START)
    }

    pub(crate) fn should_parse_async_arrow_from(&mut self, chain: Chain) -> bool {
        chain!(self, chain, should_parse_async_arrow, should_parse_async_arrow_base())
    }

    pub(crate) fn parse_paren_and_distinguish(&mut self, start: NodeStart, can_be_arrow: bool) -> PResult<Node> {
        self.parse_paren_and_distinguish_from(Chain::START, start, can_be_arrow)
    }

    pub(crate) fn parse_paren_and_distinguish_from(
        &mut self,
        chain: Chain,
        start: NodeStart,
        can_be_arrow: bool,
    ) -> PResult<Node> {
        chain!(self, chain, parse_paren_and_distinguish, parse_paren_and_distinguish_base(start, can_be_arrow))
    }

    pub(crate) fn parse_function_body(&mut self, parts: FunctionParts, allow_expression: bool) -> PResult<Function> {
        self.parse_function_body_from(Chain::START, parts, allow_expression)
    }

    pub(crate) fn parse_function_body_from(
        &mut self,
        chain: Chain,
        parts: FunctionParts,
        allow_expression: bool,
    ) -> PResult<Function> {
        chain!(self, chain, parse_function_body, parse_function_body_base(parts, allow_expression))
    }
}
