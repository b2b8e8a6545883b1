use std::fmt;

/// Source location of a token's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Unknown,
    EndOfFile,
    Identifier,

    // Keywords
    KwdPackage,
    KwdImport,
    KwdExport,
    KwdInline,
    KwdForceInline,
    KwdCompileTime,
    KwdFunc,
    KwdVar,
    KwdConst,
    KwdType,
    KwdSelf,
    KwdDefer,
    KwdAsync,
    KwdAwait,
    KwdReturn,

    // Symbols
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngular,
    RAngular,
    Semicolon,
    Colon,
    Dot,
    Comma,
    Ampersand,
    Star,
    Plus,
    Minus,
    Divide,
    Percent,
    Negate,
    BitOr,
    Backslash,
    Equals,
    Xor,
    BitNeg,

    // Literals
    StringLiteral,
    CharLiteral,
    IntegralLiteral,
    FloatLiteral,

    // Compound operators
    Arrow,
    Elvis,
    NEquals,
    PlusEquals,
    MinusEquals,
    DivideEquals,
    MulEquals,
    BitOrEquals,
    BitAndEquals,
    BitXorEquals,
    BitNegEquals,
    BitShiftLeft,
    BitShiftRight,
    LEqual,
    GEqual,
    BoolEqual,
}

/// Every kind in declaration order.
pub const ALL_KINDS: &[TokenKind] = &[
    TokenKind::Unknown,
    TokenKind::EndOfFile,
    TokenKind::Identifier,
    TokenKind::KwdPackage,
    TokenKind::KwdImport,
    TokenKind::KwdExport,
    TokenKind::KwdInline,
    TokenKind::KwdForceInline,
    TokenKind::KwdCompileTime,
    TokenKind::KwdFunc,
    TokenKind::KwdVar,
    TokenKind::KwdConst,
    TokenKind::KwdType,
    TokenKind::KwdSelf,
    TokenKind::KwdDefer,
    TokenKind::KwdAsync,
    TokenKind::KwdAwait,
    TokenKind::KwdReturn,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::LAngular,
    TokenKind::RAngular,
    TokenKind::Semicolon,
    TokenKind::Colon,
    TokenKind::Dot,
    TokenKind::Comma,
    TokenKind::Ampersand,
    TokenKind::Star,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Divide,
    TokenKind::Percent,
    TokenKind::Negate,
    TokenKind::BitOr,
    TokenKind::Backslash,
    TokenKind::Equals,
    TokenKind::Xor,
    TokenKind::BitNeg,
    TokenKind::StringLiteral,
    TokenKind::CharLiteral,
    TokenKind::IntegralLiteral,
    TokenKind::FloatLiteral,
    TokenKind::Arrow,
    TokenKind::Elvis,
    TokenKind::NEquals,
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::DivideEquals,
    TokenKind::MulEquals,
    TokenKind::BitOrEquals,
    TokenKind::BitAndEquals,
    TokenKind::BitXorEquals,
    TokenKind::BitNegEquals,
    TokenKind::BitShiftLeft,
    TokenKind::BitShiftRight,
    TokenKind::LEqual,
    TokenKind::GEqual,
    TokenKind::BoolEqual,
];

/// Reserved words. Only whole identifier runs are matched against these.
pub const KEYWORDS: &[TokenKind] = &[
    TokenKind::KwdPackage,
    TokenKind::KwdImport,
    TokenKind::KwdExport,
    TokenKind::KwdInline,
    TokenKind::KwdForceInline,
    TokenKind::KwdCompileTime,
    TokenKind::KwdFunc,
    TokenKind::KwdVar,
    TokenKind::KwdConst,
    TokenKind::KwdType,
    TokenKind::KwdSelf,
    TokenKind::KwdDefer,
    TokenKind::KwdAsync,
    TokenKind::KwdAwait,
    TokenKind::KwdReturn,
];

/// Two-character operators. The lexer tries these before [`SYMBOLS`].
pub const COMPOUND_SYMBOLS: &[TokenKind] = &[
    TokenKind::Arrow,
    TokenKind::Elvis,
    TokenKind::NEquals,
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::DivideEquals,
    TokenKind::MulEquals,
    TokenKind::BitOrEquals,
    TokenKind::BitAndEquals,
    TokenKind::BitXorEquals,
    TokenKind::BitNegEquals,
    TokenKind::BitShiftLeft,
    TokenKind::BitShiftRight,
    TokenKind::LEqual,
    TokenKind::GEqual,
    TokenKind::BoolEqual,
];

/// Single-character symbols.
pub const SYMBOLS: &[TokenKind] = &[
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::LAngular,
    TokenKind::RAngular,
    TokenKind::Semicolon,
    TokenKind::Colon,
    TokenKind::Dot,
    TokenKind::Comma,
    TokenKind::Ampersand,
    TokenKind::Star,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Divide,
    TokenKind::Percent,
    TokenKind::Negate,
    TokenKind::BitOr,
    TokenKind::Backslash,
    TokenKind::Equals,
    TokenKind::Xor,
    TokenKind::BitNeg,
];

impl TokenKind {
    /// Canonical source text of the kind. Kinds without fixed text
    /// render as a bracketed description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "<unknown>",
            Self::EndOfFile => "<eof>",
            Self::Identifier => "<identifier>",
            Self::KwdPackage => "package",
            Self::KwdImport => "import",
            Self::KwdExport => "export",
            Self::KwdInline => "inline",
            Self::KwdForceInline => "forceinline",
            Self::KwdCompileTime => "compiletime",
            Self::KwdFunc => "func",
            Self::KwdVar => "var",
            Self::KwdConst => "const",
            Self::KwdType => "type",
            Self::KwdSelf => "self",
            Self::KwdDefer => "defer",
            Self::KwdAsync => "async",
            Self::KwdAwait => "await",
            Self::KwdReturn => "return",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LAngular => "<",
            Self::RAngular => ">",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Comma => ",",
            Self::Ampersand => "&",
            Self::Star => "*",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Divide => "/",
            Self::Percent => "%",
            Self::Negate => "!",
            Self::BitOr => "|",
            Self::Backslash => "\\",
            Self::Equals => "=",
            Self::Xor => "^",
            Self::BitNeg => "~",
            Self::StringLiteral => "<string literal>",
            Self::CharLiteral => "<char literal>",
            Self::IntegralLiteral => "<int literal>",
            Self::FloatLiteral => "<float literal>",
            Self::Arrow => "->",
            Self::Elvis => "?:",
            Self::NEquals => "!=",
            Self::PlusEquals => "+=",
            Self::MinusEquals => "-=",
            Self::DivideEquals => "/=",
            Self::MulEquals => "*=",
            Self::BitOrEquals => "|=",
            Self::BitAndEquals => "&=",
            Self::BitXorEquals => "^=",
            Self::BitNegEquals => "~=",
            Self::BitShiftLeft => "<<",
            Self::BitShiftRight => ">>",
            Self::LEqual => "<=",
            Self::GEqual => ">=",
            Self::BoolEqual => "==",
        }
    }

    /// Stable upper-case name, as printed by the token dump.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::EndOfFile => "END_OF_FILE",
            Self::Identifier => "IDENTIFIER",
            Self::KwdPackage => "KWD_PACKAGE",
            Self::KwdImport => "KWD_IMPORT",
            Self::KwdExport => "KWD_EXPORT",
            Self::KwdInline => "KWD_INLINE",
            Self::KwdForceInline => "KWD_FORCEINLINE",
            Self::KwdCompileTime => "KWD_COMPILETIME",
            Self::KwdFunc => "KWD_FUNC",
            Self::KwdVar => "KWD_VAR",
            Self::KwdConst => "KWD_CONST",
            Self::KwdType => "KWD_TYPE",
            Self::KwdSelf => "KWD_SELF",
            Self::KwdDefer => "KWD_DEFER",
            Self::KwdAsync => "KWD_ASYNC",
            Self::KwdAwait => "KWD_AWAIT",
            Self::KwdReturn => "KWD_RETURN",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::LAngular => "LANGULAR",
            Self::RAngular => "RANGULAR",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::Dot => "DOT",
            Self::Comma => "COMMA",
            Self::Ampersand => "AMPERSAND",
            Self::Star => "STAR",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Divide => "DIVIDE",
            Self::Percent => "PERCENT",
            Self::Negate => "NEGATE",
            Self::BitOr => "BITOR",
            Self::Backslash => "BACKSLASH",
            Self::Equals => "EQUALS",
            Self::Xor => "XOR",
            Self::BitNeg => "BITNEG",
            Self::StringLiteral => "STRING_LITERAL",
            Self::CharLiteral => "CHAR_LITERAL",
            Self::IntegralLiteral => "INTEGRAL_LITERAL",
            Self::FloatLiteral => "FLOAT_LITERAL",
            Self::Arrow => "ARROW",
            Self::Elvis => "ELVIS",
            Self::NEquals => "NEQUALS",
            Self::PlusEquals => "PLUS_EQUALS",
            Self::MinusEquals => "MINUS_EQUALS",
            Self::DivideEquals => "DIVIDE_EQUALS",
            Self::MulEquals => "MUL_EQUALS",
            Self::BitOrEquals => "BITOR_EQUALS",
            Self::BitAndEquals => "BITAND_EQUALS",
            Self::BitXorEquals => "BITXOR_EQUALS",
            Self::BitNegEquals => "BITNEG_EQUALS",
            Self::BitShiftLeft => "BITSHIFT_LEFT",
            Self::BitShiftRight => "BITSHIFT_RIGHT",
            Self::LEqual => "LEQUAL",
            Self::GEqual => "GEQUAL",
            Self::BoolEqual => "BOOL_EQUAL",
        }
    }

    /// Look up a kind by its fixed source text (keyword, symbol, or
    /// compound operator). Descriptive texts like `<eof>` never match.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Self::keyword(text)
            .or_else(|| find(COMPOUND_SYMBOLS, text))
            .or_else(|| find(SYMBOLS, text))
    }

    /// Look up a kind by its [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_KINDS.iter().copied().find(|k| k.name() == name)
    }

    /// Keyword for a complete identifier run, if reserved.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        find(KEYWORDS, text)
    }

    /// Compound operator spelled by the two characters `a` `b`.
    #[must_use]
    pub fn compound(a: u8, b: u8) -> Option<Self> {
        COMPOUND_SYMBOLS.iter().copied().find(|k| {
            let text = k.as_str().as_bytes();
            text[0] == a && text[1] == b
        })
    }

    /// Single-character symbol for `c`.
    #[must_use]
    pub fn symbol(c: u8) -> Option<Self> {
        SYMBOLS
            .iter()
            .copied()
            .find(|k| k.as_str().as_bytes() == [c])
    }

    #[must_use]
    pub fn is_keyword(self) -> bool {
        KEYWORDS.contains(&self)
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::StringLiteral | Self::CharLiteral | Self::IntegralLiteral | Self::FloatLiteral
        )
    }

    /// Kinds whose lexeme is shown by the token dump.
    #[must_use]
    pub const fn has_lexeme(self) -> bool {
        matches!(self, Self::Identifier) || self.is_literal()
    }
}

fn find(table: &[TokenKind], text: &str) -> Option<TokenKind> {
    table.iter().copied().find(|k| k.as_str() == text)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token with its kind, optional lexeme, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<String>,
    pub span: Span,
}

impl Token {
    /// Text used when naming this token in a diagnostic: the lexeme if
    /// there is one, otherwise the kind's canonical text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.lexeme.as_deref().unwrap_or_else(|| self.kind.as_str())
    }
}

/// Ordered tokens of one file, terminated by a single end-of-file token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    pub path: String,
    pub tokens: Vec<Token>,
    source: String,
}

impl TokenStream {
    #[must_use]
    pub const fn new(path: String, source: String, tokens: Vec<Token>) -> Self {
        Self {
            path,
            tokens,
            source,
        }
    }

    /// Raw text of a 1-based source line, empty if out of range.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &str {
        line_of(&self.source, line)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

// The lexer skips a leading byte-order mark, so quoted lines do too.
pub(crate) fn line_of(source: &str, line: usize) -> &str {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    line.checked_sub(1)
        .and_then(|index| source.lines().nth(index))
        .unwrap_or("")
}
