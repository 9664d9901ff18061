//! Keyword and reserved-word tables.

/// ECMAScript 2015 keywords. Escaped spellings of these never become keyword
/// tokens.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "break" | "case" | "catch" | "continue" | "debugger" | "default" | "do" | "else" | "finally" | "for"
            | "function" | "if" | "return" | "switch" | "throw" | "try" | "var" | "while" | "with" | "null"
            | "true" | "false" | "instanceof" | "typeof" | "void" | "delete" | "new" | "in" | "this"
            | "let" | "const" | "class" | "extends" | "export" | "import" | "yield" | "super"
    )
}

/// Words that may not be used as identifiers in strict mode code.
pub fn is_strict_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "implements" | "interface" | "let" | "package" | "private" | "protected" | "public" | "static" | "yield"
    )
}

/// Names that may not be bound in strict mode code.
pub fn is_strict_bind_reserved_word(word: &str) -> bool {
    matches!(word, "eval" | "arguments")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert!(is_keyword("typeof"));
        assert!(is_keyword("let"));
        assert!(!is_keyword("async"));
        assert!(is_strict_reserved_word("yield"));
        assert!(!is_strict_reserved_word("eval"));
        assert!(is_strict_bind_reserved_word("arguments"));
    }
}
