//! Tokenizer integration tests.
//!
//! Drives the tokenizer the way the parser does (`next_token` once, then
//! `next` until end of input) and checks kinds, values and errors.

use esfront_ast::{CommentKind, SourceType, TokenKind, TokenOrComment, TokenValue};
use esfront_tokenizer::{TokenContext, Tokenizer};

/// Helper: read every token of a script, returning (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, TokenValue)> {
    scan_with(source, SourceType::Script).unwrap_or_else(|err| panic!("{}", err))
}

fn scan_with(source: &str, source_type: SourceType) -> Result<Vec<(TokenKind, TokenValue)>, String> {
    let mut tok = Tokenizer::new(source, source_type, true);
    tok.skip_shebang();
    let mut tokens = Vec::new();
    tok.next_token().map_err(|e| e.to_string())?;
    while !tok.is(TokenKind::Eof) {
        tokens.push((tok.state.kind, tok.state.value.clone()));
        tok.next().map_err(|e| e.to_string())?;
    }
    Ok(tokens)
}

/// Helper: only the token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

fn scan_error(source: &str) -> String {
    match scan_with(source, SourceType::Script) {
        Ok(tokens) => panic!("expected an error, got {:?}", tokens),
        Err(message) => message,
    }
}

fn str_value(s: &str) -> TokenValue {
    TokenValue::Str(s.to_string())
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  ").is_empty());
}

#[test]
fn test_punctuation() {
    use TokenKind::*;
    assert_eq!(
        scan_kinds("( ) [ ] { } ; , : :: . ... ? @ =>"),
        vec![ParenL, ParenR, BracketL, BracketR, BraceL, BraceR, Semi, Comma, Colon, DoubleColon, Dot, Ellipsis, Question, At, Arrow]
    );
}

#[test]
fn test_operators() {
    use TokenKind::*;
    let tokens = scan_all("a += b ** c >>>= d !== e || f && g | h ^ i & j << k % l");
    let ops: Vec<_> = tokens.iter().filter(|(k, _)| *k != Name).cloned().collect();
    assert_eq!(
        ops,
        vec![
            (Assign, str_value("+=")),
            (Exponent, str_value("**")),
            (Assign, str_value(">>>=")),
            (Equality, str_value("!==")),
            (LogicalOr, str_value("||")),
            (LogicalAnd, str_value("&&")),
            (BitwiseOr, str_value("|")),
            (BitwiseXor, str_value("^")),
            (BitwiseAnd, str_value("&")),
            (BitShift, str_value("<<")),
            (Modulo, str_value("%")),
        ]
    );
    assert_eq!(scan_kinds("a **= 2"), vec![Name, Assign, Num]);
    assert_eq!(scan_kinds("i++ <= --j"), vec![Name, IncDec, Relational, IncDec, Name]);
    assert_eq!(scan_kinds("!~x"), vec![Prefix, Prefix, Name]);
}

#[test]
fn test_identifiers_and_keywords() {
    let tokens = scan_all("var let_ = this; typeof x");
    assert_eq!(tokens[0], (TokenKind::Var, str_value("var")));
    assert_eq!(tokens[1], (TokenKind::Name, str_value("let_")));
    assert_eq!(tokens[3], (TokenKind::This, str_value("this")));
    assert_eq!(tokens[5], (TokenKind::Typeof, str_value("typeof")));
    // Contextual words stay names.
    assert_eq!(scan_kinds("async await of"), vec![TokenKind::Name; 3]);
}

#[test]
fn test_unicode_escape_in_identifier() {
    let tokens = scan_all("\\u0061b \\u{62}");
    assert_eq!(tokens[0], (TokenKind::Name, str_value("ab")));
    assert_eq!(tokens[1], (TokenKind::Name, str_value("b")));
    // An escaped keyword is a plain name.
    assert_eq!(scan_all("\\u0069f")[0], (TokenKind::Name, str_value("if")));
    assert_eq!(scan_error("a\\x"), "Expecting Unicode escape sequence \\uXXXX (1:2)");
    assert_eq!(scan_error("\\u0031a"), "Invalid Unicode escape (1:0)");
}

#[test]
fn test_numbers() {
    let num = |s: &str| scan_all(s)[0].1.as_num();
    assert_eq!(num("42"), Some(42.0));
    assert_eq!(num("3.14"), Some(3.14));
    assert_eq!(num(".5"), Some(0.5));
    assert_eq!(num("1e3"), Some(1000.0));
    assert_eq!(num("2E-2"), Some(0.02));
    assert_eq!(num("0xFF"), Some(255.0));
    assert_eq!(num("0o17"), Some(15.0));
    assert_eq!(num("0b101"), Some(5.0));
    assert_eq!(num("017"), Some(15.0));
    assert_eq!(num("0"), Some(0.0));
}

#[test]
fn test_number_errors() {
    assert_eq!(scan_error("09"), "Invalid number (1:0)");
    assert_eq!(scan_error("1e"), "Invalid number (1:0)");
    assert_eq!(scan_error("0x"), "Expected number in radix 16 (1:2)");
    assert_eq!(scan_error("3in x"), "Identifier directly after number (1:1)");
}

#[test]
fn test_legacy_octal_in_strict_module() {
    let err = scan_with("010", SourceType::Module).unwrap_err();
    assert_eq!(err, "Invalid number (1:0)");
    let err = scan_with("'\\07'", SourceType::Module).unwrap_err();
    assert_eq!(err, "Octal literal in strict mode (1:1)");
}

#[test]
fn test_strings() {
    let value = |s: &str| scan_all(s)[0].1.clone();
    assert_eq!(value("'abc'"), str_value("abc"));
    assert_eq!(value("\"a\\nb\""), str_value("a\nb"));
    assert_eq!(value("'\\x41\\u0042\\u{1F600}'"), str_value("AB\u{1F600}"));
    assert_eq!(value("'\\101'"), str_value("A"));
    assert_eq!(value("'\\0'"), str_value("\0"));
    assert_eq!(value("'a\\\nb'"), str_value("ab"));
    assert_eq!(value("'\\q'"), str_value("q"));
    assert_eq!(value("'é'"), str_value("é"));
}

#[test]
fn test_string_errors() {
    assert_eq!(scan_error("'abc"), "Unterminated string constant (1:0)");
    assert_eq!(scan_error("x = 'a\nb'"), "Unterminated string constant (1:4)");
    assert_eq!(scan_error("'\\u{110000}'"), "Code point out of bounds (1:4)");
    assert_eq!(scan_error("'\\xZ1'"), "Bad character escape sequence (1:3)");
}

#[test]
fn test_regexp_vs_division() {
    use TokenKind::*;
    assert_eq!(scan_kinds("a / b / c"), vec![Name, Slash, Name, Slash, Name]);
    let tokens = scan_all("x = /ab[/]c/gi");
    assert_eq!(tokens[2], (Regexp, TokenValue::Regex { pattern: "ab[/]c".into(), flags: "gi".into() }));
    assert_eq!(scan_kinds("(a) / 2"), vec![ParenL, Name, ParenR, Slash, Num]);
    assert_eq!(scan_kinds("if (a) /re/"), vec![If, ParenL, Name, ParenR, Regexp]);
    assert_eq!(scan_kinds("x /= 2"), vec![Name, Assign, Num]);
}

#[test]
fn test_regexp_errors() {
    assert_eq!(scan_error("/abc"), "Unterminated regular expression (1:1)");
    assert_eq!(scan_error("/a\n/"), "Unterminated regular expression (1:1)");
    assert_eq!(scan_error("/a/x"), "Invalid regular expression flag (1:1)");
}

#[test]
fn test_template_literal() {
    use TokenKind::*;
    let tokens = scan_all("`a${b}c`");
    assert_eq!(
        tokens,
        vec![
            (BackQuote, TokenValue::None),
            (Template, str_value("a")),
            (DollarBraceL, TokenValue::None),
            (Name, str_value("b")),
            (BraceR, TokenValue::None),
            (Template, str_value("c")),
            (BackQuote, TokenValue::None),
        ]
    );
    assert_eq!(scan_all("`a\\u0041 `")[1], (Template, str_value("aA ")));
    assert_eq!(scan_error("`abc"), "Unterminated template (1:1)");
    assert_eq!(scan_error("`\\01`"), "Octal literal in strict mode (1:1)");
}

#[test]
fn test_template_line_counting() {
    let mut tok = Tokenizer::new("`a\nb` x", SourceType::Script, false);
    tok.next_token().unwrap();
    while !tok.is(TokenKind::Name) {
        tok.next().unwrap();
    }
    assert_eq!(tok.state.start_loc.line, 2);
    assert_eq!(tok.state.start_loc.column, 3);
}

#[test]
fn test_template_cooks_line_terminators() {
    use TokenKind::*;
    assert_eq!(scan_all("`a\rb`")[1], (Template, str_value("a\nb")));
    assert_eq!(scan_all("`a\r\nb`")[1], (Template, str_value("a\nb")));
    assert_eq!(scan_all("`a\nb`")[1], (Template, str_value("a\nb")));
}

#[test]
fn test_comments_are_recorded() {
    let mut tok = Tokenizer::new("/* a */ x // b\ny", SourceType::Script, false);
    tok.next_token().unwrap();
    while !tok.is(TokenKind::Eof) {
        tok.next().unwrap();
    }
    let comments = tok.comments();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].kind, CommentKind::CommentBlock);
    assert_eq!(comments[0].value, " a ");
    assert_eq!((comments[0].start, comments[0].end), (0, 7));
    assert_eq!(comments[1].kind, CommentKind::CommentLine);
    assert_eq!(comments[1].value, " b");
    // The token list interleaves comments in source order.
    let starts: Vec<_> = tok.tokens().iter().map(TokenOrComment::start).collect();
    assert_eq!(starts, vec![0, 8, 10, 15]);
}

#[test]
fn test_block_comment_line_counting() {
    let mut tok = Tokenizer::new("/*\n\n*/ x", SourceType::Script, false);
    tok.next_token().unwrap();
    assert_eq!(tok.state.start_loc.line, 3);
    assert_eq!(tok.state.start_loc.column, 3);
    assert_eq!(scan_error("/* open"), "Unterminated comment (1:0)");
}

#[test]
fn test_html_comments() {
    assert_eq!(scan_kinds("a <!-- b\nc"), vec![TokenKind::Name, TokenKind::Name]);
    assert_eq!(scan_kinds("a\n--> b\nc"), vec![TokenKind::Name, TokenKind::Name]);
    // Not at the start of a line, `-->` is a decrement and a comparison.
    assert_eq!(scan_kinds("a --> b"), vec![TokenKind::Name, TokenKind::IncDec, TokenKind::Relational, TokenKind::Name]);
    let err = scan_with("a <!-- b", SourceType::Module).unwrap_err();
    assert_eq!(err, "Unexpected token (1:2)");
}

#[test]
fn test_shebang() {
    let mut tok = Tokenizer::new("#!/usr/bin/env node\nx", SourceType::Script, false);
    tok.skip_shebang();
    tok.next_token().unwrap();
    assert_eq!(tok.state.value, str_value("x"));
    assert_eq!(tok.comments()[0].value, "/usr/bin/env node");
}

#[test]
fn test_unexpected_character() {
    assert_eq!(scan_error("a # b"), "Unexpected character '#' (1:2)");
}

#[test]
fn test_whitespace_kinds() {
    assert_eq!(scan_kinds("a\u{a0}\u{3000}\u{feff}b\u{2028}c"), vec![TokenKind::Name; 3]);
    let mut tok = Tokenizer::new("a\r\nb\rc", SourceType::Script, false);
    tok.next_token().unwrap();
    tok.next().unwrap();
    assert_eq!(tok.state.start_loc.line, 2);
    tok.next().unwrap();
    assert_eq!(tok.state.start_loc.line, 3);
}

#[test]
fn test_brace_contexts() {
    let mut tok = Tokenizer::new("x = {", SourceType::Script, false);
    tok.next_token().unwrap();
    tok.next().unwrap();
    tok.next().unwrap();
    assert_eq!(tok.cur_context(), TokenContext::BraceExpression);

    let mut tok = Tokenizer::new("{", SourceType::Script, false);
    tok.next_token().unwrap();
    assert_eq!(tok.cur_context(), TokenContext::BraceStatement);
    assert_eq!(tok.state.context.len(), 2);
}

#[test]
fn test_set_strict_rereads_literal() {
    let mut tok = Tokenizer::new("'\\07'", SourceType::Script, false);
    tok.next_token().unwrap();
    assert!(tok.state.contains_octal);
    let err = tok.set_strict(true).unwrap_err();
    assert_eq!(err.to_string(), "Octal literal in strict mode (1:1)");
}

#[test]
fn test_error_carries_position() {
    let mut tok = Tokenizer::new("a\n  'x", SourceType::Script, false);
    tok.next_token().unwrap();
    let err = tok.next().unwrap_err();
    assert_eq!(err.pos(), 4);
    assert_eq!(err.loc().line, 2);
    assert_eq!(err.loc().column, 2);
}
