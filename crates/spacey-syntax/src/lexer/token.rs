//! Token definitions for the JavaScript lexer.

/// A span in the source code, representing a range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `offset` falls inside `[start, end)`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the source text covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// Whether a line terminator appeared between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            newline_before: false,
        }
    }

    /// Marks whether a line terminator precedes this token.
    pub fn with_newline_before(mut self, newline_before: bool) -> Self {
        self.newline_before = newline_before;
        self
    }
}

/// The different kinds of tokens in JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    /// Digits and `n` suffix as written
    BigInt(String),
    /// Cooked string value
    String(String),
    /// Template literal chunk. `tail` is true when the chunk ends with a
    /// backtick rather than `${`.
    Template { cooked: String, tail: bool },
    RegExp { pattern: String, flags: String },
    True,
    False,
    Null,

    Identifier(String),
    /// `#name`, stored without the `#`
    PrivateIdentifier(String),

    // Reserved and contextual words, see `WORDS`
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Return,
    Static,
    Super,
    Switch,
    This,
    Throw,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,
    Async,

    // Punctuators, named after their glyphs
    // Grouping and separators
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    Ellipsis,
    Semicolon,
    Comma,
    Colon,
    Question,
    QuestionDot,
    Arrow,

    // Comparison
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    EqualEqual,
    NotEqual,
    StrictEqual,
    StrictNotEqual,

    // Arithmetic, bitwise and logical
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Ampersand,
    Pipe,
    Caret,
    Bang,
    Tilde,
    AmpersandAmpersand,
    PipePipe,
    QuestionQuestion,

    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    StarStarEqual,
    LeftShiftEqual,
    RightShiftEqual,
    UnsignedRightShiftEqual,
    AmpersandEqual,
    PipeEqual,
    CaretEqual,
    AmpersandAmpersandEqual,
    PipePipeEqual,
    QuestionQuestionEqual,

    Eof,
    /// Invalid token (unterminated literal, stray character)
    Invalid,
}

/// Words the scanner turns into dedicated tokens.
const WORDS: &[(&str, TokenKind)] = &[
    ("await", TokenKind::Await),
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("catch", TokenKind::Catch),
    ("class", TokenKind::Class),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("debugger", TokenKind::Debugger),
    ("default", TokenKind::Default),
    ("delete", TokenKind::Delete),
    ("do", TokenKind::Do),
    ("else", TokenKind::Else),
    ("enum", TokenKind::Enum),
    ("export", TokenKind::Export),
    ("extends", TokenKind::Extends),
    ("false", TokenKind::False),
    ("finally", TokenKind::Finally),
    ("for", TokenKind::For),
    ("function", TokenKind::Function),
    ("if", TokenKind::If),
    ("import", TokenKind::Import),
    ("in", TokenKind::In),
    ("instanceof", TokenKind::Instanceof),
    ("let", TokenKind::Let),
    ("new", TokenKind::New),
    ("null", TokenKind::Null),
    ("return", TokenKind::Return),
    ("static", TokenKind::Static),
    ("super", TokenKind::Super),
    ("switch", TokenKind::Switch),
    ("this", TokenKind::This),
    ("throw", TokenKind::Throw),
    ("true", TokenKind::True),
    ("try", TokenKind::Try),
    ("typeof", TokenKind::Typeof),
    ("var", TokenKind::Var),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
    ("with", TokenKind::With),
    ("yield", TokenKind::Yield),
    ("async", TokenKind::Async),
];

impl TokenKind {
    /// The token for a reserved or contextual word, including the
    /// `true`, `false` and `null` literals.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        WORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| kind.clone())
    }

    /// The source text of a word token.
    pub fn keyword_text(&self) -> Option<&'static str> {
        WORDS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(text, _)| *text)
    }

    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        !matches!(self, TokenKind::True | TokenKind::False | TokenKind::Null)
            && self.keyword_text().is_some()
    }

    /// Returns true if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::String(_)
                | TokenKind::Template { .. }
                | TokenKind::RegExp { .. }
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Contextual keywords that may still be used as binding or reference
    /// names in sloppy code.
    pub fn contextual_name(&self) -> Option<&'static str> {
        match self {
            TokenKind::Async => Some("async"),
            TokenKind::Let => Some("let"),
            TokenKind::Static => Some("static"),
            TokenKind::Yield => Some("yield"),
            TokenKind::Await => Some("await"),
            _ => None,
        }
    }

    /// Whether a `/` following this token starts a regular expression
    /// rather than a division operator.
    pub fn allows_regex_after(&self) -> bool {
        !matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::PrivateIdentifier(_)
                | TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::String(_)
                | TokenKind::RegExp { .. }
                | TokenKind::Template { tail: true, .. }
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(0, 10);
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 10);
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 15);
        assert_eq!(span.len(), 10);
    }

    #[test]
    fn test_span_is_empty() {
        assert!(Span::new(5, 5).is_empty());
        assert!(!Span::new(5, 10).is_empty());
    }

    #[test]
    fn test_span_contains() {
        let span = Span::new(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(!span.contains(4));
    }

    #[test]
    fn test_span_slice() {
        assert_eq!(Span::new(4, 7).slice("let foo = 1"), "foo");
    }

    #[test]
    fn test_token_new_has_no_newline() {
        let token = Token::new(TokenKind::Number(42.0), Span::new(0, 2));
        assert_eq!(token.kind, TokenKind::Number(42.0));
        assert!(!token.newline_before);
        assert!(token.with_newline_before(true).newline_before);
    }

    #[test]
    fn test_keyword_table() {
        assert_eq!(TokenKind::keyword("export"), Some(TokenKind::Export));
        assert_eq!(TokenKind::keyword("null"), Some(TokenKind::Null));
        assert_eq!(TokenKind::keyword("exports"), None);
        assert_eq!(TokenKind::Instanceof.keyword_text(), Some("instanceof"));
        assert_eq!(TokenKind::True.keyword_text(), Some("true"));
        assert_eq!(TokenKind::Plus.keyword_text(), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::Import.is_keyword());
        assert!(TokenKind::Export.is_keyword());
        assert!(TokenKind::Async.is_keyword());
        assert!(!TokenKind::Identifier("x".to_string()).is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
        assert!(!TokenKind::Null.is_keyword());
    }

    #[test]
    fn test_is_literal() {
        assert!(TokenKind::Number(42.0).is_literal());
        assert!(
            TokenKind::Template {
                cooked: "t".to_string(),
                tail: true
            }
            .is_literal()
        );
        assert!(!TokenKind::Plus.is_literal());
    }

    #[test]
    fn test_contextual_names() {
        assert_eq!(TokenKind::Async.contextual_name(), Some("async"));
        assert_eq!(TokenKind::Let.contextual_name(), Some("let"));
        assert_eq!(TokenKind::Import.contextual_name(), None);
    }

    #[test]
    fn test_regex_context() {
        assert!(TokenKind::Equal.allows_regex_after());
        assert!(TokenKind::Return.allows_regex_after());
        assert!(TokenKind::LeftParen.allows_regex_after());
        assert!(!TokenKind::Identifier("a".to_string()).allows_regex_after());
        assert!(!TokenKind::RightParen.allows_regex_after());
        assert!(
            TokenKind::Template {
                cooked: String::new(),
                tail: false
            }
            .allows_regex_after()
        );
    }
}
