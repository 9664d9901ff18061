//! TokenKind - the fixed registry of lexical categories.
//!
//! Each kind carries static metadata (label, keyword text, precedence and
//! context flags) that the parser consults instead of matching on individual
//! kinds. The registry is immutable; [`TokenKind::spec`] is a `const fn`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

bitflags::bitflags! {
    /// Static properties of a token kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        const NONE              = 0;
        /// An expression may follow this token (so `/` starts a regexp).
        const BEFORE_EXPR       = 1 << 0;
        /// This token can start an expression.
        const STARTS_EXPR       = 1 << 1;
        const RIGHT_ASSOCIATIVE = 1 << 2;
        const IS_LOOP           = 1 << 3;
        /// `=` and compound assignment operators.
        const IS_ASSIGN         = 1 << 4;
        const PREFIX            = 1 << 5;
        const POSTFIX           = 1 << 6;
    }
}

/// Metadata describing one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpec {
    pub label: &'static str,
    pub keyword: Option<&'static str>,
    pub flags: TokenFlags,
    /// Binary operator precedence, if this is a binary operator.
    pub binop: Option<u8>,
}

impl TokenSpec {
    const fn new(label: &'static str) -> Self {
        Self { label, keyword: None, flags: TokenFlags::NONE, binop: None }
    }

    const fn kw(name: &'static str) -> Self {
        Self { label: name, keyword: Some(name), flags: TokenFlags::NONE, binop: None }
    }

    const fn with(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    const fn binop(mut self, prec: u8) -> Self {
        self.binop = Some(prec);
        self
    }
}

const BE: TokenFlags = TokenFlags::BEFORE_EXPR;
const SE: TokenFlags = TokenFlags::STARTS_EXPR;
const BE_SE: TokenFlags = TokenFlags::BEFORE_EXPR.union(TokenFlags::STARTS_EXPR);
const PREFIX_OP: TokenFlags = BE_SE.union(TokenFlags::PREFIX);

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========================================================================
    // Literals and names
    // ========================================================================
    Num,
    Regexp,
    String,
    Name,
    Eof,

    // ========================================================================
    // Punctuation
    // ========================================================================
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    ParenL,
    ParenR,
    Comma,
    Semi,
    Colon,
    DoubleColon,
    Dot,
    Question,
    Arrow,
    Template,
    Ellipsis,
    BackQuote,
    DollarBraceL,
    At,

    // ========================================================================
    // Operators
    // ========================================================================
    Eq,
    Assign,
    IncDec,
    Prefix,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    BitShift,
    PlusMin,
    Modulo,
    Star,
    Slash,
    Exponent,

    // ========================================================================
    // JSX
    // ========================================================================
    JsxName,
    JsxText,
    JsxTagStart,
    JsxTagEnd,

    // ========================================================================
    // Keywords
    // ========================================================================
    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    Return,
    Switch,
    Throw,
    Try,
    Var,
    Let,
    Const,
    While,
    With,
    New,
    This,
    Super,
    Class,
    Extends,
    Export,
    Import,
    Yield,
    Null,
    True,
    False,
    In,
    Instanceof,
    Typeof,
    Void,
    Delete,
}

impl TokenKind {
    /// The static metadata for this kind.
    pub const fn spec(self) -> TokenSpec {
        use TokenKind::*;
        match self {
            Num => TokenSpec::new("num").with(SE),
            Regexp => TokenSpec::new("regexp").with(SE),
            String => TokenSpec::new("string").with(SE),
            Name => TokenSpec::new("name").with(SE),
            Eof => TokenSpec::new("eof"),

            BracketL => TokenSpec::new("[").with(BE_SE),
            BracketR => TokenSpec::new("]"),
            BraceL => TokenSpec::new("{").with(BE_SE),
            BraceR => TokenSpec::new("}"),
            ParenL => TokenSpec::new("(").with(BE_SE),
            ParenR => TokenSpec::new(")"),
            Comma => TokenSpec::new(",").with(BE),
            Semi => TokenSpec::new(";").with(BE),
            Colon => TokenSpec::new(":").with(BE),
            DoubleColon => TokenSpec::new("::").with(BE),
            Dot => TokenSpec::new("."),
            Question => TokenSpec::new("?").with(BE),
            Arrow => TokenSpec::new("=>").with(BE),
            Template => TokenSpec::new("template"),
            Ellipsis => TokenSpec::new("...").with(BE),
            BackQuote => TokenSpec::new("`").with(BE),
            DollarBraceL => TokenSpec::new("${").with(BE_SE),
            At => TokenSpec::new("@"),

            Eq => TokenSpec::new("=").with(BE.union(TokenFlags::IS_ASSIGN)),
            Assign => TokenSpec::new("_=").with(BE.union(TokenFlags::IS_ASSIGN)),
            IncDec => TokenSpec::new("++/--").with(SE.union(TokenFlags::PREFIX).union(TokenFlags::POSTFIX)),
            Prefix => TokenSpec::new("prefix").with(PREFIX_OP),
            LogicalOr => TokenSpec::new("||").with(BE).binop(1),
            LogicalAnd => TokenSpec::new("&&").with(BE).binop(2),
            BitwiseOr => TokenSpec::new("|").with(BE).binop(3),
            BitwiseXor => TokenSpec::new("^").with(BE).binop(4),
            BitwiseAnd => TokenSpec::new("&").with(BE).binop(5),
            Equality => TokenSpec::new("==/!=").with(BE).binop(6),
            Relational => TokenSpec::new("</>").with(BE).binop(7),
            BitShift => TokenSpec::new("<</>>").with(BE).binop(8),
            PlusMin => TokenSpec::new("+/-").with(PREFIX_OP).binop(9),
            Modulo => TokenSpec::new("%").with(BE).binop(10),
            Star => TokenSpec::new("*").with(BE).binop(10),
            Slash => TokenSpec::new("/").with(BE).binop(10),
            Exponent => TokenSpec::new("**").with(BE.union(TokenFlags::RIGHT_ASSOCIATIVE)).binop(11),

            JsxName => TokenSpec::new("jsxName"),
            JsxText => TokenSpec::new("jsxText").with(BE),
            JsxTagStart => TokenSpec::new("jsxTagStart"),
            JsxTagEnd => TokenSpec::new("jsxTagEnd"),

            Break => TokenSpec::kw("break"),
            Case => TokenSpec::kw("case").with(BE),
            Catch => TokenSpec::kw("catch"),
            Continue => TokenSpec::kw("continue"),
            Debugger => TokenSpec::kw("debugger"),
            Default => TokenSpec::kw("default").with(BE),
            Do => TokenSpec::kw("do").with(BE.union(TokenFlags::IS_LOOP)),
            Else => TokenSpec::kw("else").with(BE),
            Finally => TokenSpec::kw("finally"),
            For => TokenSpec::kw("for").with(TokenFlags::IS_LOOP),
            Function => TokenSpec::kw("function").with(SE),
            If => TokenSpec::kw("if"),
            Return => TokenSpec::kw("return").with(BE),
            Switch => TokenSpec::kw("switch"),
            Throw => TokenSpec::kw("throw").with(BE),
            Try => TokenSpec::kw("try"),
            Var => TokenSpec::kw("var"),
            Let => TokenSpec::kw("let"),
            Const => TokenSpec::kw("const"),
            While => TokenSpec::kw("while").with(TokenFlags::IS_LOOP),
            With => TokenSpec::kw("with"),
            New => TokenSpec::kw("new").with(BE_SE),
            This => TokenSpec::kw("this").with(SE),
            Super => TokenSpec::kw("super").with(SE),
            Class => TokenSpec::kw("class"),
            Extends => TokenSpec::kw("extends").with(BE),
            Export => TokenSpec::kw("export"),
            Import => TokenSpec::kw("import"),
            Yield => TokenSpec::kw("yield").with(BE_SE),
            Null => TokenSpec::kw("null").with(SE),
            True => TokenSpec::kw("true").with(SE),
            False => TokenSpec::kw("false").with(SE),
            In => TokenSpec::kw("in").with(BE).binop(7),
            Instanceof => TokenSpec::kw("instanceof").with(BE).binop(7),
            Typeof => TokenSpec::kw("typeof").with(PREFIX_OP),
            Void => TokenSpec::kw("void").with(PREFIX_OP),
            Delete => TokenSpec::kw("delete").with(PREFIX_OP),
        }
    }

    /// Look up the keyword kind for `word`.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "break" => Break,
            "case" => Case,
            "catch" => Catch,
            "continue" => Continue,
            "debugger" => Debugger,
            "default" => Default,
            "do" => Do,
            "else" => Else,
            "finally" => Finally,
            "for" => For,
            "function" => Function,
            "if" => If,
            "return" => Return,
            "switch" => Switch,
            "throw" => Throw,
            "try" => Try,
            "var" => Var,
            "let" => Let,
            "const" => Const,
            "while" => While,
            "with" => With,
            "new" => New,
            "this" => This,
            "super" => Super,
            "class" => Class,
            "extends" => Extends,
            "export" => Export,
            "import" => Import,
            "yield" => Yield,
            "null" => Null,
            "true" => True,
            "false" => False,
            "in" => In,
            "instanceof" => Instanceof,
            "typeof" => Typeof,
            "void" => Void,
            "delete" => Delete,
            _ => return None,
        })
    }

    #[inline]
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    #[inline]
    pub fn keyword_text(self) -> Option<&'static str> {
        self.spec().keyword
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self.spec().keyword.is_some()
    }

    #[inline]
    pub fn before_expr(self) -> bool {
        self.spec().flags.contains(TokenFlags::BEFORE_EXPR)
    }

    #[inline]
    pub fn starts_expr(self) -> bool {
        self.spec().flags.contains(TokenFlags::STARTS_EXPR)
    }

    #[inline]
    pub fn right_associative(self) -> bool {
        self.spec().flags.contains(TokenFlags::RIGHT_ASSOCIATIVE)
    }

    #[inline]
    pub fn is_loop(self) -> bool {
        self.spec().flags.contains(TokenFlags::IS_LOOP)
    }

    #[inline]
    pub fn is_assign(self) -> bool {
        self.spec().flags.contains(TokenFlags::IS_ASSIGN)
    }

    #[inline]
    pub fn is_prefix(self) -> bool {
        self.spec().flags.contains(TokenFlags::PREFIX)
    }

    #[inline]
    pub fn is_postfix(self) -> bool {
        self.spec().flags.contains(TokenFlags::POSTFIX)
    }

    #[inline]
    pub fn binop(self) -> Option<u8> {
        self.spec().binop
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Token types serialize as the registry entry, the way token lists are
/// emitted alongside the tree.
impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let spec = self.spec();
        let mut s = serializer.serialize_struct("TokenType", 11)?;
        s.serialize_field("label", spec.label)?;
        s.serialize_field("keyword", &spec.keyword)?;
        s.serialize_field("beforeExpr", &spec.flags.contains(TokenFlags::BEFORE_EXPR))?;
        s.serialize_field("startsExpr", &spec.flags.contains(TokenFlags::STARTS_EXPR))?;
        s.serialize_field("rightAssociative", &spec.flags.contains(TokenFlags::RIGHT_ASSOCIATIVE))?;
        s.serialize_field("isLoop", &spec.flags.contains(TokenFlags::IS_LOOP))?;
        s.serialize_field("isAssign", &spec.flags.contains(TokenFlags::IS_ASSIGN))?;
        s.serialize_field("prefix", &spec.flags.contains(TokenFlags::PREFIX))?;
        s.serialize_field("postfix", &spec.flags.contains(TokenFlags::POSTFIX))?;
        s.serialize_field("binop", &spec.binop)?;
        s.serialize_field("updateContext", &None::<()>)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table() {
        assert_eq!(TokenKind::LogicalOr.binop(), Some(1));
        assert_eq!(TokenKind::PlusMin.binop(), Some(9));
        assert_eq!(TokenKind::Star.binop(), Some(10));
        assert_eq!(TokenKind::Exponent.binop(), Some(11));
        assert!(TokenKind::Exponent.right_associative());
        assert_eq!(TokenKind::In.binop(), Some(7));
        assert_eq!(TokenKind::Eq.binop(), None);
    }

    #[test]
    fn test_flags() {
        assert!(TokenKind::PlusMin.is_prefix());
        assert!(TokenKind::IncDec.is_postfix());
        assert!(!TokenKind::IncDec.before_expr());
        assert!(TokenKind::Return.before_expr());
        assert!(TokenKind::Do.is_loop());
        assert!(TokenKind::Assign.is_assign());
        assert!(!TokenKind::Dot.before_expr());
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("typeof"), Some(TokenKind::Typeof));
        assert_eq!(TokenKind::keyword("async"), None);
        assert_eq!(TokenKind::Typeof.keyword_text(), Some("typeof"));
        assert!(TokenKind::Let.is_keyword());
        assert!(!TokenKind::Name.is_keyword());
    }

    #[test]
    fn test_serialize_registry_entry() {
        let json = serde_json::to_value(TokenKind::Slash).unwrap();
        assert_eq!(json["label"], "/");
        assert_eq!(json["beforeExpr"], true);
        assert_eq!(json["binop"], 10);
        assert!(json["keyword"].is_null());
    }
}
