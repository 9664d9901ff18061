//! Parser integration tests.
//!
//! Trees are checked through their JSON form, the same shape consumers see.

use esfront_parser::{parse, ParseOptions, Plugin};
use serde_json::Value;

/// Helper: parse and serialize the whole file.
fn parse_with(source: &str, options: &ParseOptions) -> Value {
    match parse(source, options) {
        Ok(file) => serde_json::to_value(&file).unwrap(),
        Err(err) => panic!("failed to parse {:?}: {}", source, err),
    }
}

fn parse_script(source: &str) -> Value {
    parse_with(source, &ParseOptions::default())
}

fn parse_module(source: &str) -> Value {
    parse_with(source, &ParseOptions::module())
}

fn parse_flow(source: &str) -> Value {
    parse_with(source, &ParseOptions::module().with_plugin(Plugin::Flow))
}

fn parse_jsx(source: &str) -> Value {
    parse_with(source, &ParseOptions::default().with_plugin(Plugin::Jsx))
}

/// Helper: the error message for a source that must not parse.
fn error_with(source: &str, options: &ParseOptions) -> String {
    match parse(source, options) {
        Ok(_) => panic!("expected {:?} to fail", source),
        Err(err) => err.to_string(),
    }
}

fn script_error(source: &str) -> String {
    error_with(source, &ParseOptions::default())
}

fn first_statement(file: &Value) -> &Value {
    &file["program"]["body"][0]
}

fn first_expression(file: &Value) -> &Value {
    &first_statement(file)["expression"]
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_parse_var_declaration() {
    let file = parse_script("var a = 1;");
    let decl = first_statement(&file);
    assert_eq!(decl["type"], "VariableDeclaration");
    assert_eq!(decl["kind"], "var");
    assert_eq!(decl["declarations"][0]["id"]["name"], "a");
    assert_eq!(decl["declarations"][0]["init"]["value"], 1.0);
    assert_eq!(decl["start"], 0);
    assert_eq!(decl["end"], 10);
    assert_eq!(file["end"], 10);
}

#[test]
fn test_parse_statement_kinds() {
    let file = parse_script(
        "if (a) b; else c;\nfor (var i = 0; i < 1; i++) {}\nfor (k in o);\nfor (v of list);\n\
         while (x) break;\ndo {} while (y)\nswitch (z) { case 1: default: }\n\
         try {} catch (e) {} finally {}\nlbl: for (;;) continue lbl;\ndebugger;",
    );
    let kinds: Vec<&str> =
        file["program"]["body"].as_array().unwrap().iter().map(|s| s["type"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "IfStatement",
            "ForStatement",
            "ForInStatement",
            "ForOfStatement",
            "WhileStatement",
            "DoWhileStatement",
            "SwitchStatement",
            "TryStatement",
            "LabeledStatement",
            "DebuggerStatement",
        ]
    );
}

#[test]
fn test_parse_directives() {
    let file = parse_script("\"use strict\";\nfoo();");
    let directives = file["program"]["directives"].as_array().unwrap();
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0]["value"]["value"], "use strict");
    assert_eq!(file["program"]["body"].as_array().unwrap().len(), 1);
}

#[test]
fn test_parenthesized_string_is_not_a_directive() {
    let file = parse_script("(\"use strict\"); with (a) {}");
    assert!(file["program"]["directives"].as_array().unwrap().is_empty());
    assert_eq!(file["program"]["body"][1]["type"], "WithStatement");
}

#[test]
fn test_parse_class() {
    let file = parse_script("class A extends B { constructor() { super(); } static m() {} get x() { return 1; } }");
    let class = first_statement(&file);
    assert_eq!(class["type"], "ClassDeclaration");
    assert_eq!(class["superClass"]["name"], "B");
    let members = class["body"]["body"].as_array().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["kind"], "constructor");
    assert_eq!(members[1]["kind"], "method");
    assert_eq!(members[1]["static"], true);
    assert_eq!(members[2]["kind"], "get");
}

#[test]
fn test_parse_decorated_class() {
    let file = parse_script("@dec class A {}");
    let class = first_statement(&file);
    assert_eq!(class["type"], "ClassDeclaration");
    assert_eq!(class["decorators"].as_array().unwrap().len(), 1);
    assert_eq!(class["decorators"][0]["expression"]["name"], "dec");
}

#[test]
fn test_parse_module_items() {
    let file = parse_module("import a, { b as c } from \"m\";\nexport default 1;\nexport { c };\nexport * from \"n\";\nexport { d } from \"o\";");
    let body = file["program"]["body"].as_array().unwrap();
    assert_eq!(body[0]["type"], "ImportDeclaration");
    assert_eq!(body[0]["specifiers"][0]["type"], "ImportDefaultSpecifier");
    assert_eq!(body[0]["specifiers"][1]["imported"]["name"], "b");
    assert_eq!(body[0]["specifiers"][1]["local"]["name"], "c");
    assert_eq!(body[1]["type"], "ExportDefaultDeclaration");
    assert_eq!(body[2]["type"], "ExportNamedDeclaration");
    assert_eq!(body[3]["type"], "ExportAllDeclaration");
    assert_eq!(body[3]["source"]["value"], "n");
    assert_eq!(body[4]["specifiers"][0]["exported"]["name"], "d");
    assert_eq!(body[4]["source"]["value"], "o");
    assert_eq!(file["program"]["sourceType"], "module");
}

#[test]
fn test_shebang_is_skipped() {
    let file = parse_script("#!/usr/bin/env node\nfoo");
    assert_eq!(file["program"]["body"].as_array().unwrap().len(), 1);
    assert_eq!(first_expression(&file)["loc"]["start"]["line"], 2);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_binary_precedence() {
    let file = parse_script("a + b * c");
    let expr = first_expression(&file);
    assert_eq!(expr["type"], "BinaryExpression");
    assert_eq!(expr["operator"], "+");
    assert_eq!(expr["right"]["operator"], "*");
}

#[test]
fn test_logical_precedence() {
    let file = parse_script("a || b && c");
    let expr = first_expression(&file);
    assert_eq!(expr["type"], "LogicalExpression");
    assert_eq!(expr["operator"], "||");
    assert_eq!(expr["right"]["operator"], "&&");
}

#[test]
fn test_exponent_is_right_associative() {
    let file = parse_script("a ** b ** c");
    let expr = first_expression(&file);
    assert_eq!(expr["left"]["name"], "a");
    assert_eq!(expr["right"]["operator"], "**");
}

#[test]
fn test_unary_exponent_requires_parens() {
    assert!(script_error("-a ** b").starts_with("Illegal expression."));
    let file = parse_script("(-a) ** b");
    assert_eq!(first_expression(&file)["operator"], "**");
}

#[test]
fn test_arrow_functions() {
    let file = parse_script("(a, b) => a + b");
    let arrow = first_expression(&file);
    assert_eq!(arrow["type"], "ArrowFunctionExpression");
    assert_eq!(arrow["params"].as_array().unwrap().len(), 2);
    assert_eq!(arrow["expression"], true);

    let file = parse_script("async (x) => await x");
    let arrow = first_expression(&file);
    assert_eq!(arrow["async"], true);
    assert_eq!(arrow["body"]["type"], "AwaitExpression");
}

#[test]
fn test_parenthesized_list_without_arrow() {
    let file = parse_script("(a, b)");
    let seq = first_expression(&file);
    assert_eq!(seq["type"], "SequenceExpression");
    assert_eq!(seq["expressions"].as_array().unwrap().len(), 2);
    assert_eq!(seq["extra"]["parenthesized"], true);
}

#[test]
fn test_template_literal() {
    let file = parse_script("`a${b}c`");
    let tmpl = first_expression(&file);
    assert_eq!(tmpl["type"], "TemplateLiteral");
    assert_eq!(tmpl["quasis"].as_array().unwrap().len(), 2);
    assert_eq!(tmpl["expressions"][0]["name"], "b");
    assert_eq!(tmpl["quasis"][0]["value"]["cooked"], "a");
    assert_eq!(tmpl["quasis"][1]["tail"], true);
}

#[test]
fn test_numeric_literals() {
    let file = parse_script("0x1F; 0b101; 0o17; 1e3;");
    let values: Vec<f64> = file["program"]["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["expression"]["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![31.0, 5.0, 15.0, 1000.0]);
    assert_eq!(first_expression(&file)["extra"]["raw"], "0x1F");
}

#[test]
fn test_regexp_literal() {
    let file = parse_script("x = /ab+c/gi");
    let re = &first_expression(&file)["right"];
    assert_eq!(re["type"], "RegExpLiteral");
    assert_eq!(re["pattern"], "ab+c");
    assert_eq!(re["flags"], "gi");
}

#[test]
fn test_parenthesized_extra() {
    let file = parse_script("(a)");
    let expr = first_expression(&file);
    assert_eq!(expr["extra"]["parenthesized"], true);
    assert_eq!(expr["extra"]["parenStart"], 0);
}

#[test]
fn test_destructuring_assignment() {
    let file = parse_script("var { a, b: [c] = d } = f;");
    let pattern = &first_statement(&file)["declarations"][0]["id"];
    assert_eq!(pattern["type"], "ObjectPattern");
    assert_eq!(pattern["properties"][0]["shorthand"], true);
    assert_eq!(pattern["properties"][1]["value"]["type"], "AssignmentPattern");
    assert_eq!(pattern["properties"][1]["value"]["left"]["type"], "ArrayPattern");
}

#[test]
fn test_shorthand_default_needs_assignment_target() {
    let file = parse_script("({a = 1} = b)");
    let left = &first_expression(&file)["left"];
    assert_eq!(left["type"], "ObjectPattern");
    assert_eq!(left["properties"][0]["value"]["type"], "AssignmentPattern");

    let file = parse_script("[{a = 1}, b.c] = d");
    let left = &first_expression(&file)["left"];
    assert_eq!(left["type"], "ArrayPattern");
    assert_eq!(left["elements"][0]["type"], "ObjectPattern");
    assert_eq!(left["elements"][1]["type"], "MemberExpression");

    let file = parse_script("for ({a = 1} of b);");
    assert_eq!(first_statement(&file)["left"]["type"], "ObjectPattern");

    assert_eq!(script_error("({a = 1})"), "Unexpected token (1:4)");
    assert_eq!(script_error("x = [{a = 1}, 2]"), "Unexpected token (1:8)");
    assert_eq!(script_error("f({a = 1})"), "Unexpected token (1:5)");
}

#[test]
fn test_return_does_not_continue_past_newline() {
    let file = parse_script("function f(){return\n1}");
    let body = &first_statement(&file)["body"]["body"];
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["type"], "ReturnStatement");
    assert!(body[0]["argument"].is_null());
    assert_eq!(body[1]["type"], "ExpressionStatement");
    assert_eq!(body[1]["expression"]["value"], 1.0);
}

#[test]
fn test_update_operators_and_newlines() {
    let file = parse_script("a++\nb");
    let body = file["program"]["body"].as_array().unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["expression"]["type"], "UpdateExpression");
    assert_eq!(body[0]["expression"]["prefix"], false);
    assert_eq!(body[1]["expression"]["name"], "b");

    let file = parse_script("a\n++b");
    let body = file["program"]["body"].as_array().unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["expression"]["name"], "a");
    assert_eq!(body[1]["expression"]["type"], "UpdateExpression");
    assert_eq!(body[1]["expression"]["prefix"], true);
    assert_eq!(body[1]["expression"]["argument"]["name"], "b");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_carries_location() {
    assert_eq!(script_error("var a = ;"), "Unexpected token (1:8)");
    assert_eq!(script_error("a\n  )"), "Unexpected token (2:2)");
    assert_eq!(script_error("\"abc"), "Unterminated string constant (1:0)");
}

#[test]
fn test_error_has_structured_position() {
    let err = parse("a\n  )", &ParseOptions::default()).unwrap_err();
    assert_eq!(err.pos(), 4);
    assert_eq!(err.loc().line, 2);
    assert_eq!(err.loc().column, 2);
    assert!(err.is_syntax_error());
}

#[test]
fn test_strict_mode_errors() {
    assert_eq!(script_error("\"use strict\"; with (a) {}"), "'with' in strict mode (1:14)");
    assert!(parse("\"use strict\"; 010", &ParseOptions::default()).is_err());
    assert!(parse("010", &ParseOptions::default()).is_ok());
}

#[test]
fn test_use_strict_applies_to_its_function_only() {
    assert_eq!(script_error("function a() { \"use strict\"; 010 } function b() { 010 }"), "Invalid number (1:29)");
    let file = parse_script("function a() { \"use strict\"; } function b() { 010 }");
    assert_eq!(file["program"]["body"][1]["body"]["body"][0]["expression"]["value"], 8.0);
}

#[test]
fn test_octal_before_use_strict_directive() {
    assert_eq!(script_error("function a(){ '\\01'; 'use strict'; }"), "Octal literal in strict mode (1:15)");
    assert!(parse("function a(){ '\\01'; }", &ParseOptions::default()).is_ok());
}

#[test]
fn test_return_outside_function() {
    assert_eq!(script_error("return 1"), "'return' outside of function (1:0)");
    let options = ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() };
    assert!(parse("return 1", &options).is_ok());
}

#[test]
fn test_import_requires_module() {
    assert_eq!(
        script_error("import a from \"a\""),
        "'import' and 'export' may appear only with 'sourceType: module' (1:0)"
    );
}

#[test]
fn test_duplicate_label() {
    assert_eq!(script_error("a: a: ;"), "Label 'a' is already declared (1:3)");
}

#[test]
fn test_parenthesized_pattern() {
    assert!(script_error("({a}) = 0").starts_with("You're trying to assign to a parenthesized expression"));
}

#[test]
fn test_deep_nesting_is_rejected() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}{}", "[".repeat(1000), "]".repeat(1000));
            parse(&source, &ParseOptions::default()).map(|_| ())
        })
        .unwrap();
    let err = handle.join().unwrap().unwrap_err();
    assert!(!err.is_syntax_error());
    assert!(err.to_string().starts_with("Maximum nesting depth exceeded"));
}

// ============================================================================
// Comments, tokens and positions
// ============================================================================

#[test]
fn test_comment_attachment() {
    let file = parse_script("// lead\nvar a; /* trail */");
    assert_eq!(file["comments"].as_array().unwrap().len(), 2);
    let decl = first_statement(&file);
    assert_eq!(decl["leadingComments"][0]["value"], " lead");
    assert_eq!(decl["leadingComments"][0]["type"], "CommentLine");
    assert_eq!(decl["trailingComments"][0]["value"], " trail ");
    assert_eq!(decl["trailingComments"][0]["type"], "CommentBlock");
}

#[test]
fn test_inner_comments() {
    let file = parse_script("function f() { /* c */ }");
    let block = &first_statement(&file)["body"];
    assert_eq!(block["type"], "BlockStatement");
    assert_eq!(block["innerComments"][0]["value"], " c ");
    assert!(block["leadingComments"].is_null());
    assert!(block["trailingComments"].is_null());
}

#[test]
fn test_comment_attachment_is_stable() {
    let source = "/* a */ function f(/* b */ x) { /* c */ }\n// d\nvar y = [/* e */]; // f";
    assert_eq!(parse_script(source), parse_script(source));
}

#[test]
fn test_token_list() {
    let file = parse_script("a; // c");
    let tokens = file["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0]["type"]["label"], "name");
    assert_eq!(tokens[0]["value"], "a");
    assert_eq!(tokens[1]["type"]["label"], ";");
    assert_eq!(tokens[2]["type"], "CommentLine");
    assert_eq!(tokens[3]["type"]["label"], "eof");
}

#[test]
fn test_crlf_is_normalized() {
    let file = parse_script("a\r\nb");
    let second = &file["program"]["body"][1];
    assert_eq!(second["start"], 2);
    assert_eq!(second["loc"]["start"]["line"], 2);
    assert_eq!(second["loc"]["start"]["column"], 0);
}

// ============================================================================
// Flow
// ============================================================================

#[test]
fn test_flow_variable_annotation() {
    let file = parse_flow("var a: number = 1;");
    let id = &first_statement(&file)["declarations"][0]["id"];
    assert_eq!(id["typeAnnotation"]["type"], "TypeAnnotation");
    assert_eq!(id["typeAnnotation"]["typeAnnotation"]["type"], "NumberTypeAnnotation");
    assert_eq!(id["end"], 13);
}

#[test]
fn test_flow_type_alias() {
    let file = parse_flow("type T = string | number;");
    let alias = first_statement(&file);
    assert_eq!(alias["type"], "TypeAlias");
    assert_eq!(alias["id"]["name"], "T");
    assert_eq!(alias["right"]["type"], "UnionTypeAnnotation");
    assert_eq!(alias["right"]["types"].as_array().unwrap().len(), 2);
}

#[test]
fn test_flow_function_signature() {
    let file = parse_flow("function f(x?: string, ...rest: Array<number>): void {}");
    let func = first_statement(&file);
    assert_eq!(func["params"][0]["optional"], true);
    assert_eq!(func["params"][0]["typeAnnotation"]["typeAnnotation"]["type"], "StringTypeAnnotation");
    assert_eq!(func["params"][1]["type"], "RestElement");
    assert_eq!(func["params"][1]["typeAnnotation"]["typeAnnotation"]["type"], "GenericTypeAnnotation");
    assert_eq!(func["returnType"]["typeAnnotation"]["type"], "VoidTypeAnnotation");
}

#[test]
fn test_flow_type_cast_and_arrow() {
    let file = parse_flow("(x: any);");
    assert_eq!(first_expression(&file)["type"], "TypeCastExpression");

    let file = parse_flow("(x: number) => x;");
    let arrow = first_expression(&file);
    assert_eq!(arrow["type"], "ArrowFunctionExpression");
    assert_eq!(arrow["params"][0]["typeAnnotation"]["typeAnnotation"]["type"], "NumberTypeAnnotation");

    let file = parse_flow("(x): string => x;");
    assert_eq!(first_expression(&file)["returnType"]["typeAnnotation"]["type"], "StringTypeAnnotation");
}

#[test]
fn test_flow_declarations() {
    let file = parse_flow("interface I { m(): void }\ndeclare var x: number;\ndeclare function f(a: string): void;");
    let body = file["program"]["body"].as_array().unwrap();
    assert_eq!(body[0]["type"], "InterfaceDeclaration");
    assert_eq!(body[1]["type"], "DeclareVariable");
    assert_eq!(body[2]["type"], "DeclareFunction");
}

#[test]
fn test_flow_import_export_kinds() {
    let file = parse_flow("import type { T } from \"m\";\nexport type U = number;\nexport const v = 1;");
    let body = file["program"]["body"].as_array().unwrap();
    assert_eq!(body[0]["importKind"], "type");
    assert_eq!(body[1]["exportKind"], "type");
    assert_eq!(body[2]["exportKind"], "value");
}

#[test]
fn test_flow_class_members() {
    let file = parse_flow("class A<T> extends B<T> implements I { p: T; m(): T { return this.p; } }");
    let class = first_statement(&file);
    assert_eq!(class["typeParameters"]["params"].as_array().unwrap().len(), 1);
    assert_eq!(class["superTypeParameters"]["params"].as_array().unwrap().len(), 1);
    assert_eq!(class["implements"].as_array().unwrap().len(), 1);
    assert_eq!(class["body"]["body"][0]["type"], "ClassProperty");
    assert_eq!(class["body"]["body"][1]["type"], "ClassMethod");
}

#[test]
fn test_flow_grouped_function_type_error() {
    let err = error_with("var a: (string) => void;", &ParseOptions::module().with_plugin(Plugin::Flow));
    assert!(err.starts_with("Unexpected token =>."));
    assert!(err.ends_with("(1:7)"));
}

#[test]
fn test_flow_type_is_plain_identifier_without_plugin() {
    let file = parse_script("type = 1;");
    assert_eq!(first_expression(&file)["left"]["name"], "type");
}

// ============================================================================
// JSX
// ============================================================================

#[test]
fn test_jsx_self_closing() {
    let file = parse_jsx("<div />");
    let elem = first_expression(&file);
    assert_eq!(elem["type"], "JSXElement");
    assert_eq!(elem["openingElement"]["selfClosing"], true);
    assert_eq!(elem["openingElement"]["name"]["name"], "div");
    assert!(elem["closingElement"].is_null());
    assert!(elem["children"].as_array().unwrap().is_empty());
}

#[test]
fn test_jsx_attributes_and_children() {
    let file = parse_jsx("<a href=\"x &amp; y\" class=\"k\" {...rest}>hi {name}</a>");
    let elem = first_expression(&file);
    let attrs = elem["openingElement"]["attributes"].as_array().unwrap();
    assert_eq!(attrs[0]["value"]["value"], "x & y");
    assert!(attrs[0]["value"]["extra"].is_null());
    assert_eq!(attrs[1]["name"]["name"], "class");
    assert_eq!(attrs[2]["type"], "JSXSpreadAttribute");
    let children = elem["children"].as_array().unwrap();
    assert_eq!(children[0]["type"], "JSXText");
    assert_eq!(children[0]["value"], "hi ");
    assert_eq!(children[1]["type"], "JSXExpressionContainer");
    assert_eq!(children[1]["expression"]["name"], "name");
    assert_eq!(elem["closingElement"]["name"]["name"], "a");
}

#[test]
fn test_jsx_qualified_names() {
    let file = parse_jsx("<a:b c-d=\"1\"></a:b>");
    let opening = &first_expression(&file)["openingElement"];
    assert_eq!(opening["name"]["type"], "JSXNamespacedName");
    assert_eq!(opening["attributes"][0]["name"]["name"], "c-d");

    let file = parse_jsx("<A.B.C></A.B.C>");
    let name = &first_expression(&file)["openingElement"]["name"];
    assert_eq!(name["type"], "JSXMemberExpression");
    assert_eq!(name["property"]["name"], "C");
    assert_eq!(name["object"]["type"], "JSXMemberExpression");
}

#[test]
fn test_jsx_nested_elements() {
    let file = parse_jsx("var x = <ul>\n  <li>one</li>\n</ul>;");
    let elem = &first_statement(&file)["declarations"][0]["init"];
    let children = elem["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0]["value"], "\n  ");
    assert_eq!(children[1]["type"], "JSXElement");
    assert_eq!(children[1]["children"][0]["value"], "one");
    assert_eq!(elem["closingElement"]["loc"]["start"]["line"], 3);
}

#[test]
fn test_jsx_entities() {
    let file = parse_jsx("<a>&#x41;&#66;&nbsp;&bogus;</a>");
    assert_eq!(first_expression(&file)["children"][0]["value"], "AB\u{a0}&bogus;");
}

#[test]
fn test_jsx_empty_expression() {
    let file = parse_jsx("<a>{}</a>");
    let empty = &first_expression(&file)["children"][0]["expression"];
    assert_eq!(empty["type"], "JSXEmptyExpression");
    assert_eq!(empty["start"], 4);
    assert_eq!(empty["end"], 4);
}

#[test]
fn test_jsx_errors() {
    let options = ParseOptions::default().with_plugin(Plugin::Jsx);
    assert_eq!(error_with("<a></b>", &options), "Expected corresponding JSX closing tag for <a> (1:3)");
    assert_eq!(error_with("<a/><b/>", &options), "Adjacent JSX elements must be wrapped in an enclosing tag (1:4)");
    assert_eq!(
        error_with("<a attr={} />", &options),
        "JSX attributes must only be assigned a non-empty expression (1:8)"
    );
    assert_eq!(error_with("<a>text", &options), "Unterminated JSX contents (1:3)");
}

#[test]
fn test_jsx_with_flow() {
    let options = ParseOptions::module().with_plugin(Plugin::Flow).with_plugin(Plugin::Jsx);
    let file = parse_with("var x: Array<number> = <div/>;", &options);
    let decl = &first_statement(&file)["declarations"][0];
    assert_eq!(decl["id"]["typeAnnotation"]["typeAnnotation"]["type"], "GenericTypeAnnotation");
    assert_eq!(decl["init"]["type"], "JSXElement");
}

#[test]
fn test_less_than_without_jsx() {
    let file = parse_script("a < b > c");
    assert_eq!(first_expression(&file)["type"], "BinaryExpression");
}
