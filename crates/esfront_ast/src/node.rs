//! AST node definitions.
//!
//! A [`Node`] is the common envelope (positions, `extra` metadata, attached
//! comments) around a [`NodeKind`], the tagged union of every production the
//! parser can build. Children are owned through `Box`/`Vec`; no node is
//! reachable from two parents.

use esfront_core::text::{SourceLocation, TextPos};
use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::token::TokenOrComment;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Identity of a node within one parse. Used to key comment attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// Non-semantic metadata about how a node was written.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<RawValue>,
    #[serde(skip_serializing_if = "is_false")]
    pub parenthesized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paren_start: Option<TextPos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parenthesized_argument: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Str(String),
    Num(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    pub cooked: String,
}

/// Fields shared by every function-like production.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub id: Option<Box<Node>>,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub expression: bool,
    pub params: Vec<Node>,
    pub body: Box<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Box<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<Box<Node>>,
}

/// Fields shared by class declarations and expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Option<Box<Node>>,
    pub super_class: Option<Box<Node>>,
    pub body: Box<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<Box<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type_parameters: Option<Box<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implements: Option<Vec<Node>>,
}

/// Every node production, tagged by its `type` name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    // ========================================================================
    // Program and directives
    // ========================================================================
    Program {
        source_type: SourceType,
        body: Vec<Node>,
        directives: Vec<Node>,
    },
    Directive {
        value: Box<Node>,
    },
    DirectiveLiteral {
        value: String,
    },

    // ========================================================================
    // Identifiers and literals
    // ========================================================================
    Identifier {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
        #[serde(skip_serializing_if = "is_false")]
        optional: bool,
    },
    RegExpLiteral {
        pattern: String,
        flags: String,
    },
    NullLiteral,
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NumericLiteral {
        value: f64,
    },

    // ========================================================================
    // Statements
    // ========================================================================
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
        directives: Vec<Node>,
    },
    EmptyStatement,
    DebuggerStatement,
    WithStatement {
        object: Box<Node>,
        body: Box<Node>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    LabeledStatement {
        label: Box<Node>,
        body: Box<Node>,
    },
    BreakStatement {
        label: Option<Box<Node>>,
    },
    ContinueStatement {
        label: Option<Box<Node>>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        guarded_handlers: Vec<Node>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Box<Node>,
        body: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    ForOfStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    FunctionDeclaration(Function),
    VariableDeclaration {
        kind: String,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },

    // ========================================================================
    // Expressions
    // ========================================================================
    Decorator {
        expression: Box<Node>,
    },
    Super,
    ThisExpression,
    ArrowFunctionExpression(Function),
    YieldExpression {
        delegate: bool,
        argument: Option<Box<Node>>,
    },
    AwaitExpression {
        all: bool,
        argument: Box<Node>,
    },
    ArrayExpression {
        elements: Vec<Option<Node>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
    },
    ObjectExpression {
        properties: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
    },
    ObjectProperty {
        method: bool,
        shorthand: bool,
        computed: bool,
        key: Box<Node>,
        value: Box<Node>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Node>,
    },
    ObjectMethod {
        kind: String,
        method: bool,
        shorthand: bool,
        computed: bool,
        key: Box<Node>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Node>,
        #[serde(flatten)]
        function: Function,
    },
    SpreadProperty {
        argument: Box<Node>,
    },
    RestProperty {
        argument: Box<Node>,
    },
    FunctionExpression(Function),
    UnaryExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    SpreadElement {
        argument: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    BindExpression {
        object: Option<Box<Node>>,
        callee: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
    DoExpression {
        body: Box<Node>,
    },
    TemplateLiteral {
        expressions: Vec<Node>,
        quasis: Vec<Node>,
    },
    TaggedTemplateExpression {
        tag: Box<Node>,
        quasi: Box<Node>,
    },
    TemplateElement {
        value: TemplateValue,
        tail: bool,
    },
    MetaProperty {
        meta: Box<Node>,
        property: Box<Node>,
    },

    // ========================================================================
    // Patterns
    // ========================================================================
    ObjectPattern {
        properties: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
        #[serde(skip_serializing_if = "is_false")]
        optional: bool,
    },
    ArrayPattern {
        elements: Vec<Option<Node>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
        #[serde(skip_serializing_if = "is_false")]
        optional: bool,
    },
    RestElement {
        argument: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
        #[serde(skip_serializing_if = "is_false")]
        optional: bool,
    },
    AssignmentPattern {
        left: Box<Node>,
        right: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
    },

    // ========================================================================
    // Classes
    // ========================================================================
    ClassBody {
        body: Vec<Node>,
    },
    ClassMethod {
        kind: String,
        computed: bool,
        key: Box<Node>,
        #[serde(rename = "static")]
        is_static: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Node>,
        #[serde(flatten)]
        function: Function,
    },
    ClassProperty {
        computed: bool,
        key: Box<Node>,
        value: Option<Box<Node>>,
        #[serde(rename = "static")]
        is_static: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_annotation: Option<Box<Node>>,
    },
    ClassDeclaration(Class),
    ClassExpression(Class),

    // ========================================================================
    // Modules
    // ========================================================================
    ImportDeclaration {
        specifiers: Vec<Node>,
        source: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        import_kind: Option<String>,
    },
    ImportSpecifier {
        imported: Box<Node>,
        local: Box<Node>,
    },
    ImportDefaultSpecifier {
        local: Box<Node>,
    },
    ImportNamespaceSpecifier {
        local: Box<Node>,
    },
    ExportNamedDeclaration {
        declaration: Option<Box<Node>>,
        specifiers: Vec<Node>,
        source: Option<Box<Node>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        export_kind: Option<String>,
    },
    ExportDefaultDeclaration {
        declaration: Box<Node>,
    },
    ExportAllDeclaration {
        source: Box<Node>,
    },
    ExportSpecifier {
        local: Box<Node>,
        exported: Box<Node>,
    },
    ExportDefaultSpecifier {
        exported: Box<Node>,
    },
    ExportNamespaceSpecifier {
        exported: Box<Node>,
    },

    // ========================================================================
    // JSX
    // ========================================================================
    #[serde(rename = "JSXAttribute")]
    JsxAttribute {
        name: Box<Node>,
        value: Option<Box<Node>>,
    },
    #[serde(rename = "JSXClosingElement")]
    JsxClosingElement {
        name: Box<Node>,
    },
    #[serde(rename = "JSXElement")]
    JsxElement {
        opening_element: Box<Node>,
        closing_element: Option<Box<Node>>,
        children: Vec<Node>,
    },
    #[serde(rename = "JSXEmptyExpression")]
    JsxEmptyExpression,
    #[serde(rename = "JSXExpressionContainer")]
    JsxExpressionContainer {
        expression: Box<Node>,
    },
    #[serde(rename = "JSXSpreadAttribute")]
    JsxSpreadAttribute {
        argument: Box<Node>,
    },
    #[serde(rename = "JSXIdentifier")]
    JsxIdentifier {
        name: String,
    },
    #[serde(rename = "JSXMemberExpression")]
    JsxMemberExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    #[serde(rename = "JSXNamespacedName")]
    JsxNamespacedName {
        namespace: Box<Node>,
        name: Box<Node>,
    },
    #[serde(rename = "JSXOpeningElement")]
    JsxOpeningElement {
        name: Box<Node>,
        attributes: Vec<Node>,
        self_closing: bool,
    },
    #[serde(rename = "JSXText")]
    JsxText {
        value: String,
    },

    // ========================================================================
    // Flow declarations
    // ========================================================================
    TypeAlias {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
        right: Box<Node>,
    },
    InterfaceDeclaration {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
        extends: Vec<Node>,
        body: Box<Node>,
    },
    InterfaceExtends {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
    },
    DeclareClass {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
        extends: Vec<Node>,
        body: Box<Node>,
    },
    DeclareFunction {
        id: Box<Node>,
    },
    DeclareVariable {
        id: Box<Node>,
    },
    DeclareModule {
        id: Box<Node>,
        body: Box<Node>,
    },
    ClassImplements {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
    },
    TypeCastExpression {
        expression: Box<Node>,
        type_annotation: Box<Node>,
        /// Parsed as an item of a call-argument or array list, where a bare
        /// type cast is not allowed.
        #[serde(skip)]
        list_item: bool,
    },

    // ========================================================================
    // Flow types
    // ========================================================================
    TypeAnnotation {
        type_annotation: Box<Node>,
    },
    TypeParameterDeclaration {
        params: Vec<Node>,
    },
    TypeParameterInstantiation {
        params: Vec<Node>,
    },
    ExistentialTypeParam,
    AnyTypeAnnotation,
    VoidTypeAnnotation,
    BooleanTypeAnnotation,
    MixedTypeAnnotation,
    NumberTypeAnnotation,
    StringTypeAnnotation,
    StringLiteralTypeAnnotation {
        value: String,
    },
    NumericLiteralTypeAnnotation {
        value: f64,
    },
    BooleanLiteralTypeAnnotation {
        value: bool,
    },
    NullLiteralTypeAnnotation,
    ThisTypeAnnotation,
    GenericTypeAnnotation {
        id: Box<Node>,
        type_parameters: Option<Box<Node>>,
    },
    QualifiedTypeIdentifier {
        qualification: Box<Node>,
        id: Box<Node>,
    },
    TypeofTypeAnnotation {
        argument: Box<Node>,
    },
    TupleTypeAnnotation {
        types: Vec<Node>,
    },
    ArrayTypeAnnotation {
        element_type: Box<Node>,
    },
    NullableTypeAnnotation {
        type_annotation: Box<Node>,
    },
    UnionTypeAnnotation {
        types: Vec<Node>,
    },
    IntersectionTypeAnnotation {
        types: Vec<Node>,
    },
    FunctionTypeAnnotation {
        type_parameters: Option<Box<Node>>,
        params: Vec<Node>,
        rest: Option<Box<Node>>,
        return_type: Box<Node>,
    },
    FunctionTypeParam {
        name: Box<Node>,
        optional: bool,
        type_annotation: Box<Node>,
    },
    ObjectTypeAnnotation {
        properties: Vec<Node>,
        indexers: Vec<Node>,
        call_properties: Vec<Node>,
    },
    ObjectTypeProperty {
        key: Box<Node>,
        value: Box<Node>,
        optional: bool,
        #[serde(rename = "static")]
        is_static: bool,
    },
    ObjectTypeIndexer {
        id: Box<Node>,
        key: Box<Node>,
        value: Box<Node>,
        #[serde(rename = "static")]
        is_static: bool,
    },
    ObjectTypeCallProperty {
        value: Box<Node>,
        #[serde(rename = "static")]
        is_static: bool,
    },
}

/// An AST node: positions, metadata and attached comments around a
/// [`NodeKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub start: TextPos,
    pub end: TextPos,
    pub loc: SourceLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Box<Extra>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_comments: Option<Vec<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comments: Option<Vec<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_comments: Option<Vec<Comment>>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, start: TextPos, end: TextPos, loc: SourceLocation) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            loc,
            extra: None,
            leading_comments: None,
            trailing_comments: None,
            inner_comments: None,
        }
    }

    /// Move the kind out, leaving a placeholder. Used to retype a node in
    /// place while keeping its identity and positions.
    pub fn take_kind(&mut self) -> NodeKind {
        std::mem::replace(&mut self.kind, NodeKind::NullLiteral)
    }

    /// The name, if this is an `Identifier`.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, NodeKind::Identifier { .. })
    }

    pub fn extra_mut(&mut self) -> &mut Extra {
        self.extra.get_or_insert_with(Default::default)
    }

    pub fn is_parenthesized(&self) -> bool {
        self.extra.as_ref().is_some_and(|e| e.parenthesized)
    }

    /// The raw source text recorded for a literal.
    pub fn raw(&self) -> Option<&str> {
        self.extra.as_ref().and_then(|e| e.raw.as_deref())
    }

    /// Attach a type annotation. Returns false for kinds with no annotation
    /// slot.
    pub fn set_type_annotation(&mut self, annotation: Node) -> bool {
        let slot = match &mut self.kind {
            NodeKind::Identifier { type_annotation, .. }
            | NodeKind::ObjectPattern { type_annotation, .. }
            | NodeKind::ArrayPattern { type_annotation, .. }
            | NodeKind::RestElement { type_annotation, .. }
            | NodeKind::ObjectExpression { type_annotation, .. }
            | NodeKind::ArrayExpression { type_annotation, .. }
            | NodeKind::AssignmentPattern { type_annotation, .. }
            | NodeKind::AssignmentExpression { type_annotation, .. } => type_annotation,
            _ => return false,
        };
        *slot = Some(Box::new(annotation));
        true
    }

    /// The end of the attached type annotation, if any.
    pub fn type_annotation_end(&self) -> Option<TextPos> {
        match &self.kind {
            NodeKind::Identifier { type_annotation, .. }
            | NodeKind::ObjectPattern { type_annotation, .. }
            | NodeKind::ArrayPattern { type_annotation, .. }
            | NodeKind::RestElement { type_annotation, .. }
            | NodeKind::ObjectExpression { type_annotation, .. }
            | NodeKind::ArrayExpression { type_annotation, .. }
            | NodeKind::AssignmentPattern { type_annotation, .. }
            | NodeKind::AssignmentExpression { type_annotation, .. } => type_annotation.as_ref().map(|t| t.end),
            _ => None,
        }
    }

    /// Mark an optional parameter. Returns false for kinds that cannot be
    /// optional.
    pub fn set_optional(&mut self) -> bool {
        match &mut self.kind {
            NodeKind::Identifier { optional, .. }
            | NodeKind::ObjectPattern { optional, .. }
            | NodeKind::ArrayPattern { optional, .. }
            | NodeKind::RestElement { optional, .. } => {
                *optional = true;
                true
            }
            _ => false,
        }
    }
}

/// The parse result: the program plus every token and comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "File", rename_all = "camelCase")]
pub struct File {
    #[serde(skip)]
    pub id: NodeId,
    pub start: TextPos,
    pub end: TextPos,
    pub loc: SourceLocation,
    pub program: Node,
    pub comments: Vec<Comment>,
    pub tokens: Vec<TokenOrComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_comments: Option<Vec<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comments: Option<Vec<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_comments: Option<Vec<Comment>>,
}

impl File {
    /// The top-level statements.
    pub fn body(&self) -> &[Node] {
        match &self.program.kind {
            NodeKind::Program { body, .. } => body,
            _ => &[],
        }
    }

    /// The top-level directives.
    pub fn directives(&self) -> &[Node] {
        match &self.program.kind {
            NodeKind::Program { directives, .. } => directives,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esfront_core::text::Position;

    fn loc() -> SourceLocation {
        SourceLocation::new(Position::new(1, 0), Position::new(1, 1))
    }

    fn ident(name: &str) -> Node {
        Node::new(
            NodeId(1),
            NodeKind::Identifier { name: name.to_string(), type_annotation: None, optional: false },
            0,
            1,
            loc(),
        )
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(ident("a")).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "a");
        assert_eq!(json["start"], 0);
        assert_eq!(json["loc"]["start"]["line"], 1);
        assert!(json.get("typeAnnotation").is_none());
        assert!(json.get("optional").is_none());
        assert!(json.get("extra").is_none());
        assert!(json.get("leadingComments").is_none());
    }

    #[test]
    fn test_serialize_renamed_fields() {
        let body = Node::new(NodeId(2), NodeKind::BlockStatement { body: vec![], directives: vec![] }, 0, 1, loc());
        let func = Function {
            id: None,
            generator: false,
            is_async: true,
            expression: false,
            params: vec![],
            body: Box::new(body),
            return_type: None,
            type_parameters: None,
        };
        let node = Node::new(NodeId(3), NodeKind::FunctionExpression(func), 0, 1, loc());
        let json = serde_json::to_value(node).unwrap();
        assert_eq!(json["type"], "FunctionExpression");
        assert_eq!(json["async"], true);
        assert_eq!(json["body"]["type"], "BlockStatement");
        assert!(json["id"].is_null());

        let jsx = Node::new(NodeId(4), NodeKind::JsxIdentifier { name: "div".into() }, 0, 1, loc());
        assert_eq!(serde_json::to_value(jsx).unwrap()["type"], "JSXIdentifier");
    }

    #[test]
    fn test_type_annotation_slot() {
        let mut id = ident("x");
        let ann = Node::new(NodeId(5), NodeKind::AnyTypeAnnotation, 0, 1, loc());
        assert!(id.set_type_annotation(ann.clone()));
        assert!(id.set_optional());
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["typeAnnotation"]["type"], "AnyTypeAnnotation");
        assert_eq!(json["optional"], true);

        let mut this = Node::new(NodeId(6), NodeKind::ThisExpression, 0, 1, loc());
        assert!(!this.set_type_annotation(ann));
    }

    #[test]
    fn test_take_kind() {
        let mut id = ident("y");
        let kind = id.take_kind();
        assert!(matches!(kind, NodeKind::Identifier { .. }));
        assert!(matches!(id.kind, NodeKind::NullLiteral));
        assert_eq!(id.start, 0);
    }

    #[test]
    fn test_extra() {
        let mut node = ident("z");
        assert!(!node.is_parenthesized());
        node.extra_mut().parenthesized = true;
        node.extra_mut().paren_start = Some(0);
        assert!(node.is_parenthesized());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["extra"]["parenthesized"], true);
        assert_eq!(json["extra"]["parenStart"], 0);
    }
}
