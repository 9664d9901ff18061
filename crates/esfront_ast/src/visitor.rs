//! Generic child traversal.
//!
//! [`for_each_child_mut`] calls a closure on every direct child of a node, in
//! source order. [`walk_mut`] builds a pre-order traversal on top of it.

use crate::node::*;

#[inline]
fn one(node: &mut Node, f: &mut dyn FnMut(&mut Node)) {
    f(node)
}

#[inline]
fn opt(node: &mut Option<Box<Node>>, f: &mut dyn FnMut(&mut Node)) {
    if let Some(node) = node {
        f(&mut **node)
    }
}

#[inline]
fn list(nodes: &mut [Node], f: &mut dyn FnMut(&mut Node)) {
    for node in nodes.iter_mut() {
        f(node)
    }
}

#[inline]
fn holes(nodes: &mut [Option<Node>], f: &mut dyn FnMut(&mut Node)) {
    for node in nodes.iter_mut().flatten() {
        f(node)
    }
}

fn function(func: &mut Function, f: &mut dyn FnMut(&mut Node)) {
    opt(&mut func.id, f);
    opt(&mut func.type_parameters, f);
    list(&mut func.params, f);
    opt(&mut func.return_type, f);
    one(&mut func.body, f);
}

fn class(class: &mut Class, f: &mut dyn FnMut(&mut Node)) {
    list(&mut class.decorators, f);
    opt(&mut class.id, f);
    opt(&mut class.type_parameters, f);
    opt(&mut class.super_class, f);
    opt(&mut class.super_type_parameters, f);
    if let Some(implements) = &mut class.implements {
        list(implements, f);
    }
    one(&mut class.body, f);
}

/// Call `f` on every direct child of `node`.
pub fn for_each_child_mut(node: &mut Node, f: &mut dyn FnMut(&mut Node)) {
    use NodeKind::*;
    match &mut node.kind {
        Program { body, directives, .. } | BlockStatement { body, directives } => {
            list(directives, f);
            list(body, f);
        }
        Directive { value } => one(value, f),
        Identifier { type_annotation, .. } => opt(type_annotation, f),

        // Statements
        ExpressionStatement { expression } => one(expression, f),
        WithStatement { object, body } => {
            one(object, f);
            one(body, f);
        }
        ReturnStatement { argument } => opt(argument, f),
        LabeledStatement { label, body } => {
            one(label, f);
            one(body, f);
        }
        BreakStatement { label } | ContinueStatement { label } => opt(label, f),
        IfStatement { test, consequent, alternate } => {
            one(test, f);
            one(consequent, f);
            opt(alternate, f);
        }
        SwitchStatement { discriminant, cases } => {
            one(discriminant, f);
            list(cases, f);
        }
        SwitchCase { test, consequent } => {
            opt(test, f);
            list(consequent, f);
        }
        ThrowStatement { argument } => one(argument, f),
        TryStatement { block, handler, guarded_handlers, finalizer } => {
            one(block, f);
            opt(handler, f);
            list(guarded_handlers, f);
            opt(finalizer, f);
        }
        CatchClause { param, body } => {
            one(param, f);
            one(body, f);
        }
        WhileStatement { test, body } => {
            one(test, f);
            one(body, f);
        }
        DoWhileStatement { body, test } => {
            one(body, f);
            one(test, f);
        }
        ForStatement { init, test, update, body } => {
            opt(init, f);
            opt(test, f);
            opt(update, f);
            one(body, f);
        }
        ForInStatement { left, right, body } | ForOfStatement { left, right, body } => {
            one(left, f);
            one(right, f);
            one(body, f);
        }
        FunctionDeclaration(func) | FunctionExpression(func) | ArrowFunctionExpression(func) => function(func, f),
        VariableDeclaration { declarations, .. } => list(declarations, f),
        VariableDeclarator { id, init } => {
            one(id, f);
            opt(init, f);
        }

        // Expressions
        Decorator { expression } => one(expression, f),
        YieldExpression { argument, .. } => opt(argument, f),
        AwaitExpression { argument, .. } => one(argument, f),
        ArrayExpression { elements, type_annotation } => {
            holes(elements, f);
            opt(type_annotation, f);
        }
        ObjectExpression { properties, type_annotation } => {
            list(properties, f);
            opt(type_annotation, f);
        }
        ObjectProperty { key, value, decorators, .. } => {
            list(decorators, f);
            one(key, f);
            one(value, f);
        }
        ObjectMethod { key, decorators, function: func, .. } | ClassMethod { key, decorators, function: func, .. } => {
            list(decorators, f);
            one(key, f);
            function(func, f);
        }
        SpreadProperty { argument }
        | RestProperty { argument }
        | SpreadElement { argument }
        | UnaryExpression { argument, .. }
        | UpdateExpression { argument, .. } => one(argument, f),
        BinaryExpression { left, right, .. } | LogicalExpression { left, right, .. } => {
            one(left, f);
            one(right, f);
        }
        AssignmentExpression { left, right, type_annotation, .. }
        | AssignmentPattern { left, right, type_annotation } => {
            one(left, f);
            one(right, f);
            opt(type_annotation, f);
        }
        MemberExpression { object, property, .. } => {
            one(object, f);
            one(property, f);
        }
        BindExpression { object, callee } => {
            opt(object, f);
            one(callee, f);
        }
        ConditionalExpression { test, consequent, alternate } => {
            one(test, f);
            one(consequent, f);
            one(alternate, f);
        }
        CallExpression { callee, arguments } | NewExpression { callee, arguments } => {
            one(callee, f);
            list(arguments, f);
        }
        SequenceExpression { expressions } => list(expressions, f),
        DoExpression { body } => one(body, f),
        TemplateLiteral { expressions, quasis } => {
            // Quasis and expressions interleave in the source; walk them in
            // that order.
            let mut exprs = expressions.iter_mut();
            for quasi in quasis.iter_mut() {
                f(quasi);
                if let Some(expr) = exprs.next() {
                    f(expr);
                }
            }
        }
        TaggedTemplateExpression { tag, quasi } => {
            one(tag, f);
            one(quasi, f);
        }
        MetaProperty { meta, property } => {
            one(meta, f);
            one(property, f);
        }

        // Patterns
        ObjectPattern { properties, type_annotation, .. } => {
            list(properties, f);
            opt(type_annotation, f);
        }
        ArrayPattern { elements, type_annotation, .. } => {
            holes(elements, f);
            opt(type_annotation, f);
        }
        RestElement { argument, type_annotation, .. } => {
            one(argument, f);
            opt(type_annotation, f);
        }

        // Classes
        ClassBody { body } => list(body, f),
        ClassProperty { key, value, decorators, type_annotation, .. } => {
            list(decorators, f);
            one(key, f);
            opt(type_annotation, f);
            opt(value, f);
        }
        ClassDeclaration(c) | ClassExpression(c) => class(c, f),

        // Modules
        ImportDeclaration { specifiers, source, .. } => {
            list(specifiers, f);
            one(source, f);
        }
        ImportSpecifier { imported, local } => {
            one(imported, f);
            one(local, f);
        }
        ImportDefaultSpecifier { local } | ImportNamespaceSpecifier { local } => one(local, f),
        ExportNamedDeclaration { declaration, specifiers, source, .. } => {
            opt(declaration, f);
            list(specifiers, f);
            opt(source, f);
        }
        ExportDefaultDeclaration { declaration } => one(declaration, f),
        ExportAllDeclaration { source } => one(source, f),
        ExportSpecifier { local, exported } => {
            one(local, f);
            one(exported, f);
        }
        ExportDefaultSpecifier { exported } | ExportNamespaceSpecifier { exported } => one(exported, f),

        // JSX
        JsxAttribute { name, value } => {
            one(name, f);
            opt(value, f);
        }
        JsxClosingElement { name } => one(name, f),
        JsxElement { opening_element, closing_element, children } => {
            one(opening_element, f);
            list(children, f);
            opt(closing_element, f);
        }
        JsxExpressionContainer { expression } => one(expression, f),
        JsxSpreadAttribute { argument } => one(argument, f),
        JsxMemberExpression { object, property } => {
            one(object, f);
            one(property, f);
        }
        JsxNamespacedName { namespace, name } => {
            one(namespace, f);
            one(name, f);
        }
        JsxOpeningElement { name, attributes, .. } => {
            one(name, f);
            list(attributes, f);
        }

        // Flow
        TypeAlias { id, type_parameters, right } => {
            one(id, f);
            opt(type_parameters, f);
            one(right, f);
        }
        InterfaceDeclaration { id, type_parameters, extends, body }
        | DeclareClass { id, type_parameters, extends, body } => {
            one(id, f);
            opt(type_parameters, f);
            list(extends, f);
            one(body, f);
        }
        InterfaceExtends { id, type_parameters }
        | ClassImplements { id, type_parameters }
        | GenericTypeAnnotation { id, type_parameters } => {
            one(id, f);
            opt(type_parameters, f);
        }
        DeclareFunction { id } | DeclareVariable { id } => one(id, f),
        DeclareModule { id, body } => {
            one(id, f);
            one(body, f);
        }
        TypeCastExpression { expression, type_annotation, .. } => {
            one(expression, f);
            one(type_annotation, f);
        }
        TypeAnnotation { type_annotation } | NullableTypeAnnotation { type_annotation } => one(type_annotation, f),
        TypeParameterDeclaration { params } | TypeParameterInstantiation { params } => list(params, f),
        QualifiedTypeIdentifier { qualification, id } => {
            one(qualification, f);
            one(id, f);
        }
        TypeofTypeAnnotation { argument } => one(argument, f),
        TupleTypeAnnotation { types } | UnionTypeAnnotation { types } | IntersectionTypeAnnotation { types } => {
            list(types, f)
        }
        ArrayTypeAnnotation { element_type } => one(element_type, f),
        FunctionTypeAnnotation { type_parameters, params, rest, return_type } => {
            opt(type_parameters, f);
            list(params, f);
            opt(rest, f);
            one(return_type, f);
        }
        FunctionTypeParam { name, type_annotation, .. } => {
            one(name, f);
            one(type_annotation, f);
        }
        ObjectTypeAnnotation { properties, indexers, call_properties } => {
            list(properties, f);
            list(indexers, f);
            list(call_properties, f);
        }
        ObjectTypeProperty { key, value, .. } => {
            one(key, f);
            one(value, f);
        }
        ObjectTypeIndexer { id, key, value, .. } => {
            one(id, f);
            one(key, f);
            one(value, f);
        }
        ObjectTypeCallProperty { value, .. } => one(value, f),

        // Leaves
        DirectiveLiteral { .. }
        | RegExpLiteral { .. }
        | NullLiteral
        | StringLiteral { .. }
        | BooleanLiteral { .. }
        | NumericLiteral { .. }
        | EmptyStatement
        | DebuggerStatement
        | Super
        | ThisExpression
        | TemplateElement { .. }
        | JsxEmptyExpression
        | JsxIdentifier { .. }
        | JsxText { .. }
        | ExistentialTypeParam
        | AnyTypeAnnotation
        | VoidTypeAnnotation
        | BooleanTypeAnnotation
        | MixedTypeAnnotation
        | NumberTypeAnnotation
        | StringTypeAnnotation
        | StringLiteralTypeAnnotation { .. }
        | NumericLiteralTypeAnnotation { .. }
        | BooleanLiteralTypeAnnotation { .. }
        | NullLiteralTypeAnnotation
        | ThisTypeAnnotation => {}
    }
}

/// Visit `node` and all of its descendants in pre-order.
pub fn walk_mut(node: &mut Node, f: &mut dyn FnMut(&mut Node)) {
    f(node);
    for_each_child_mut(node, &mut |child| walk_mut(child, f));
}

#[cfg(test)]
mod tests {
    use super::*;
    use esfront_core::text::SourceLocation;

    fn leaf(id: u32, kind: NodeKind) -> Node {
        Node::new(NodeId(id), kind, 0, 0, SourceLocation::default())
    }

    fn ident(id: u32, name: &str) -> Node {
        leaf(id, NodeKind::Identifier { name: name.into(), type_annotation: None, optional: false })
    }

    #[test]
    fn test_walk_visits_all_nodes_in_order() {
        let binary = leaf(
            3,
            NodeKind::BinaryExpression {
                operator: "+".into(),
                left: Box::new(ident(1, "a")),
                right: Box::new(ident(2, "b")),
            },
        );
        let mut stmt = leaf(4, NodeKind::ExpressionStatement { expression: Box::new(binary) });

        let mut seen = Vec::new();
        walk_mut(&mut stmt, &mut |n| seen.push(n.id.0));
        assert_eq!(seen, vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_array_holes_are_skipped() {
        let mut array = leaf(
            3,
            NodeKind::ArrayExpression { elements: vec![None, Some(ident(1, "x")), None], type_annotation: None },
        );
        let mut count = 0;
        for_each_child_mut(&mut array, &mut |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_walk_can_mutate() {
        let mut seq = leaf(3, NodeKind::SequenceExpression { expressions: vec![ident(1, "a"), ident(2, "b")] });
        walk_mut(&mut seq, &mut |n| n.start = 7);
        if let NodeKind::SequenceExpression { expressions } = &seq.kind {
            assert!(expressions.iter().all(|e| e.start == 7));
        }
        assert_eq!(seq.start, 7);
    }
}
