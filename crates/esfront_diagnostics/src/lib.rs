//! esfront_diagnostics: Error types and message texts for the parser.
//!
//! Every grammar violation surfaces as a [`SyntaxError`] whose message ends in
//! a ` (line:column)` suffix and which also carries the structured position
//! and byte offset, so consumers can report without re-deriving location.

use esfront_core::text::{line_info, Position, TextPos};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A fatal syntax error. There is no recovery: the parse that produced it
/// returns no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(esfront::syntax_error))]
pub struct SyntaxError {
    /// Message text including the ` (line:column)` suffix.
    pub message: String,
    /// Where the error was raised.
    pub loc: Position,
    /// Byte offset of the error in the normalized input.
    pub pos: TextPos,
    #[label("here")]
    span: SourceSpan,
}

impl SyntaxError {
    /// Build an error for `pos` in `input`, appending the location suffix.
    pub fn at(input: &str, pos: TextPos, message: &str) -> Self {
        let loc = line_info(input, pos);
        Self {
            message: format!("{} ({}:{})", message, loc.line, loc.column),
            loc,
            pos,
            span: SourceSpan::new((pos as usize).into(), 0),
        }
    }

    /// The message without the location suffix.
    pub fn bare_message(&self) -> &str {
        match self.message.rfind(" (") {
            Some(idx) => &self.message[..idx],
            None => &self.message,
        }
    }
}

/// The error type of every tokenizer and parser routine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    /// The recursion guard tripped. Not a grammar violation, so speculative
    /// parses never swallow it.
    #[error("Maximum nesting depth exceeded ({}:{})", loc.line, loc.column)]
    #[diagnostic(code(esfront::nesting_too_deep))]
    NestingTooDeep { pos: TextPos, loc: Position },
}

impl ParseError {
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }

    /// Byte offset the error refers to.
    pub fn pos(&self) -> TextPos {
        match self {
            ParseError::Syntax(err) => err.pos,
            ParseError::NestingTooDeep { pos, .. } => *pos,
        }
    }

    /// Line/column the error refers to.
    pub fn loc(&self) -> Position {
        match self {
            ParseError::Syntax(err) => err.loc,
            ParseError::NestingTooDeep { loc, .. } => *loc,
        }
    }
}

/// Result alias used throughout the tokenizer and parser.
pub type PResult<T> = Result<T, ParseError>;

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Message texts. Templates use `{0}`, `{1}` placeholders for
/// [`format_message`].
pub mod messages {
    // ========================================================================
    // Tokenizer errors
    // ========================================================================
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token";
    pub const UNEXPECTED_CHARACTER_0: &str = "Unexpected character '{0}'";
    pub const UNTERMINATED_COMMENT: &str = "Unterminated comment";
    pub const UNTERMINATED_REGEXP: &str = "Unterminated regular expression";
    pub const INVALID_REGEXP_FLAG: &str = "Invalid regular expression flag";
    pub const EXPECTED_NUMBER_IN_RADIX_0: &str = "Expected number in radix {0}";
    pub const IDENTIFIER_AFTER_NUMBER: &str = "Identifier directly after number";
    pub const INVALID_NUMBER: &str = "Invalid number";
    pub const CODE_POINT_OUT_OF_BOUNDS: &str = "Code point out of bounds";
    pub const UNTERMINATED_STRING: &str = "Unterminated string constant";
    pub const UNTERMINATED_TEMPLATE: &str = "Unterminated template";
    pub const OCTAL_IN_STRICT_MODE: &str = "Octal literal in strict mode";
    pub const BAD_ESCAPE_SEQUENCE: &str = "Bad character escape sequence";
    pub const EXPECTING_UNICODE_ESCAPE: &str = "Expecting Unicode escape sequence \\uXXXX";
    pub const INVALID_UNICODE_ESCAPE: &str = "Invalid Unicode escape";

    // ========================================================================
    // Expression errors
    // ========================================================================
    pub const PROTO_REDEFINITION: &str = "Redefinition of __proto__ property";
    pub const PARENTHESIZED_PATTERN: &str =
        "You're trying to assign to a parenthesized expression, eg. instead of `({a}) = 0` use `({a} = 0)`";
    pub const PARENTHESIZED_ARRAY_PATTERN: &str =
        "You're trying to assign to a parenthesized expression, eg. instead of `([a]) = 0` use `([a] = 0)`";
    pub const ILLEGAL_EXPONENT_LHS: &str =
        "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.";
    pub const DELETE_LOCAL_IN_STRICT: &str = "Deleting local variable in strict mode";
    pub const SUPER_OUTSIDE_METHOD: &str = "'super' outside of function or class";
    pub const SUPER_CALL_OUTSIDE_CONSTRUCTOR: &str = "super() outside of class constructor";
    pub const BIND_ON_NON_MEMBER: &str = "Binding should be performed on object property.";
    pub const TRAILING_DECORATORS_PROPERTY: &str = "You have trailing decorators with no property";
    pub const GETTER_ARITY: &str = "getter should have no params";
    pub const SETTER_ARITY: &str = "setter should have exactly one param";
    pub const BINDING_YIELD_IN_STRICT: &str = "Binding yield in strict mode";
    pub const KEYWORD_0_IS_RESERVED: &str = "The keyword '{0}' is reserved";
    pub const AWAIT_IN_ASYNC: &str = "invalid use of await inside of an async function";
    pub const META_PROPERTY_0_1: &str = "The only valid meta property for {0} is {0}.{1}";

    // ========================================================================
    // Pattern errors
    // ========================================================================
    pub const PATTERN_GETTER_SETTER: &str = "Object pattern can't contain getter or setter";
    pub const PATTERN_METHOD: &str = "Object pattern can't contain methods";
    pub const DEFAULT_VALUE_OPERATOR: &str = "Only '=' operator can be used for specifying default value.";
    pub const ASSIGNING_TO_RVALUE: &str = "Assigning to rvalue";
    pub const BINDING_RVALUE: &str = "Binding rvalue";
    pub const BINDING_MEMBER_EXPRESSION: &str = "Binding member expression";
    pub const ARGUMENT_NAME_CLASH: &str = "Argument name clash in strict mode";
    pub const BINDING_0_IN_STRICT: &str = "Binding {0} in strict mode";
    pub const ASSIGNING_TO_0_IN_STRICT: &str = "Assigning to {0} in strict mode";
    pub const BINDING_0: &str = "Binding {0}";

    // ========================================================================
    // Statement errors
    // ========================================================================
    pub const IMPORT_EXPORT_TOP_LEVEL: &str = "'import' and 'export' may only appear at the top level";
    pub const IMPORT_EXPORT_MODULE: &str = "'import' and 'export' may appear only with 'sourceType: module'";
    pub const LEADING_DECORATORS: &str = "Leading decorators must be attached to a class declaration";
    pub const UNSYNTACTIC_0: &str = "Unsyntactic {0}";
    pub const MULTIPLE_DEFAULTS: &str = "Multiple default clauses";
    pub const NEWLINE_AFTER_THROW: &str = "Illegal newline after throw";
    pub const MISSING_CATCH_OR_FINALLY: &str = "Missing catch or finally clause";
    pub const RETURN_OUTSIDE_FUNCTION: &str = "'return' outside of function";
    pub const WITH_IN_STRICT: &str = "'with' in strict mode";
    pub const LABEL_0_ALREADY_DECLARED: &str = "Label '{0}' is already declared";
    pub const COMPLEX_BINDING_WITHOUT_INIT: &str = "Complex binding patterns require an initialization value";
    pub const DUPLICATE_CONSTRUCTOR: &str = "Duplicate constructor in the same class";
    pub const CONSTRUCTOR_GET_SET: &str = "Constructor can't have get/set modifier";
    pub const CONSTRUCTOR_GENERATOR: &str = "Constructor can't be a generator";
    pub const CONSTRUCTOR_ASYNC: &str = "Constructor can't be an async function";
    pub const STATIC_PROTOTYPE: &str = "Classes may not have static property named prototype";
    pub const DUPLICATE_CONSTRUCTOR_CALL: &str = "Duplicate constructor call in the same class";
    pub const DECORATED_CONSTRUCTOR: &str = "You can't attach decorators to a class constructor";
    pub const TRAILING_DECORATORS_METHOD: &str = "You have trailing decorators with no method";
    pub const EXPORT_DECORATORS: &str = "You can only use decorators on an export when exporting a class";

    // ========================================================================
    // Flow errors
    // ========================================================================
    pub const GROUPED_FUNCTION_TYPE: &str = "Unexpected token =>. It looks like you are trying to write a function \
        type, but you ended up writing a grouped type followed by an =>, which is a syntax error. Remember, \
        function type parameters are named so function types look like (name1: type1, name2: type2) => \
        returnType. You probably wrote (type1) => returnType";
    pub const UNEXPECTED_TYPE_CAST: &str = "Unexpected type cast";

    // ========================================================================
    // JSX errors
    // ========================================================================
    pub const UNTERMINATED_JSX: &str = "Unterminated JSX contents";
    pub const JSX_EMPTY_ATTRIBUTE: &str = "JSX attributes must only be assigned a non-empty expression";
    pub const JSX_BAD_ATTRIBUTE_VALUE: &str = "JSX value should be either an expression or a quoted JSX text";
    pub const JSX_CLOSING_TAG_0: &str = "Expected corresponding JSX closing tag for <{0}>";
    pub const JSX_ADJACENT_ELEMENTS: &str = "Adjacent JSX elements must be wrapped in an enclosing tag";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_suffix() {
        let err = SyntaxError::at("var a = ;\n", 8, messages::UNEXPECTED_TOKEN);
        assert_eq!(err.message, "Unexpected token (1:8)");
        assert_eq!(err.loc, Position::new(1, 8));
        assert_eq!(err.pos, 8);
        assert_eq!(err.bare_message(), "Unexpected token");
        assert_eq!(err.to_string(), "Unexpected token (1:8)");
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message(messages::LABEL_0_ALREADY_DECLARED, &["outer"]), "Label 'outer' is already declared");
        assert_eq!(format_message(messages::META_PROPERTY_0_1, &["new", "target"]), "The only valid meta property for new is new.target");
    }

    #[test]
    fn test_parse_error_kinds() {
        let syntax: ParseError = SyntaxError::at("x", 0, messages::UNEXPECTED_TOKEN).into();
        assert!(syntax.is_syntax_error());
        let deep = ParseError::NestingTooDeep { pos: 3, loc: Position::new(1, 3) };
        assert!(!deep.is_syntax_error());
        assert_eq!(deep.pos(), 3);
        assert_eq!(deep.to_string(), "Maximum nesting depth exceeded (1:3)");
    }
}
