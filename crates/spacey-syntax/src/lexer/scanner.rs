//! The scanner that produces tokens from source text.
//!
//! The scanner works on byte offsets so every token span maps straight back
//! into the original source. It is cheap to clone, which is how the parser
//! peeks ahead and backtracks.

use super::{Span, Token, TokenKind};

/// A scanner that tokenizes JavaScript source code.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    regex_allowed: bool,
    shebang: Option<Span>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    ///
    /// A `#!` line at offset 0 is skipped and reported by [`Scanner::shebang`].
    pub fn new(source: &'a str) -> Self {
        let shebang = source.starts_with("#!").then(|| {
            let end = source
                .find(['\n', '\r', '\u{2028}', '\u{2029}'])
                .unwrap_or(source.len());
            Span::new(0, end)
        });

        Self {
            source,
            pos: shebang.map_or(0, |span| span.end),
            regex_allowed: true,
            shebang,
        }
    }

    /// The source text being scanned.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The span of the leading `#!` line, if any.
    pub fn shebang(&self) -> Option<Span> {
        self.shebang
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        let newline_before = self.skip_whitespace_and_comments();

        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start))
                .with_newline_before(newline_before);
        };

        let kind = match ch {
            // Single-character tokens
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,

            // Multi-character tokens
            '.' => self.scan_dot(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' if self.regex_allowed => self.scan_regex(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),
            '^' => self.scan_caret(),
            '?' => self.scan_question(),

            // String literals
            '"' | '\'' => self.scan_string(ch),

            // Template literals
            '`' => self.scan_template(),

            // Numbers
            '0'..='9' => self.scan_number(ch),

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(start),

            // Private identifiers
            '#' => self.scan_private_identifier(),

            _ => TokenKind::Invalid,
        };

        self.regex_allowed = kind.allows_regex_after();
        Token::new(kind, Span::new(start, self.pos)).with_newline_before(newline_before)
    }

    /// Rescans a template continuation starting at the `}` that closes a
    /// `${...}` substitution.
    pub fn rescan_template_continuation(&mut self, brace_start: usize) -> Token {
        self.pos = brace_start + 1;
        let kind = self.scan_template();
        self.regex_allowed = kind.allows_regex_after();
        Token::new(kind, Span::new(brace_start, self.pos))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skips trivia and reports whether a line terminator was crossed.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        let mut newline = false;
        loop {
            match self.peek() {
                Some(ch) if is_line_terminator(ch) => {
                    newline = true;
                    self.advance();
                }
                Some(ch) if ch.is_whitespace() || ch == '\u{feff}' => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        self.pos += 2;
                        while let Some(ch) = self.peek() {
                            if is_line_terminator(ch) {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        self.pos += 2;
                        let mut prev = ' ';
                        while let Some(ch) = self.advance() {
                            if is_line_terminator(ch) {
                                newline = true;
                            }
                            if prev == '*' && ch == '/' {
                                break;
                            }
                            prev = ch;
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }
        newline
    }

    fn scan_dot(&mut self) -> TokenKind {
        match self.peek() {
            Some('.') if self.peek_next() == Some('.') => {
                self.pos += 2;
                TokenKind::Ellipsis
            }
            Some('0'..='9') => self.scan_decimal(String::from("0.")),
            _ => TokenKind::Dot,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        if self.eat('+') {
            TokenKind::PlusPlus
        } else if self.eat('=') {
            TokenKind::PlusEqual
        } else {
            TokenKind::Plus
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        if self.eat('-') {
            TokenKind::MinusMinus
        } else if self.eat('=') {
            TokenKind::MinusEqual
        } else {
            TokenKind::Minus
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        if self.eat('*') {
            if self.eat('=') {
                TokenKind::StarStarEqual
            } else {
                TokenKind::StarStar
            }
        } else if self.eat('=') {
            TokenKind::StarEqual
        } else {
            TokenKind::Star
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::SlashEqual
        } else {
            TokenKind::Slash
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::PercentEqual
        } else {
            TokenKind::Percent
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.eat('<') {
            if self.eat('=') {
                TokenKind::LeftShiftEqual
            } else {
                TokenKind::LeftShift
            }
        } else if self.eat('=') {
            TokenKind::LessThanEqual
        } else {
            TokenKind::LessThan
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.eat('>') {
            if self.eat('>') {
                if self.eat('=') {
                    TokenKind::UnsignedRightShiftEqual
                } else {
                    TokenKind::UnsignedRightShift
                }
            } else if self.eat('=') {
                TokenKind::RightShiftEqual
            } else {
                TokenKind::RightShift
            }
        } else if self.eat('=') {
            TokenKind::GreaterThanEqual
        } else {
            TokenKind::GreaterThan
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        if self.eat('=') {
            if self.eat('=') {
                TokenKind::StrictEqual
            } else {
                TokenKind::EqualEqual
            }
        } else if self.eat('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Equal
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.eat('=') {
            if self.eat('=') {
                TokenKind::StrictNotEqual
            } else {
                TokenKind::NotEqual
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.eat('&') {
            if self.eat('=') {
                TokenKind::AmpersandAmpersandEqual
            } else {
                TokenKind::AmpersandAmpersand
            }
        } else if self.eat('=') {
            TokenKind::AmpersandEqual
        } else {
            TokenKind::Ampersand
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        if self.eat('|') {
            if self.eat('=') {
                TokenKind::PipePipeEqual
            } else {
                TokenKind::PipePipe
            }
        } else if self.eat('=') {
            TokenKind::PipeEqual
        } else {
            TokenKind::Pipe
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::CaretEqual
        } else {
            TokenKind::Caret
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        if self.eat('?') {
            if self.eat('=') {
                TokenKind::QuestionQuestionEqual
            } else {
                TokenKind::QuestionQuestion
            }
        } else if self.peek() == Some('.')
            && !matches!(self.peek_next(), Some('0'..='9'))
        {
            // `a?.5:b` is a conditional, not an optional chain
            self.advance();
            TokenKind::QuestionDot
        } else {
            TokenKind::Question
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid,
                Some(ch) if ch == quote => break,
                Some('\n' | '\r') => return TokenKind::Invalid,
                Some('\\') => {
                    if !self.scan_escape(&mut value) {
                        return TokenKind::Invalid;
                    }
                }
                Some(ch) => value.push(ch),
            }
        }

        TokenKind::String(value)
    }

    /// Scans a template chunk after its opening backtick or `}`.
    fn scan_template(&mut self) -> TokenKind {
        let mut cooked = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid,
                Some('`') => return TokenKind::Template { cooked, tail: true },
                Some('$') if self.peek() == Some('{') => {
                    self.advance();
                    return TokenKind::Template {
                        cooked,
                        tail: false,
                    };
                }
                Some('\\') => {
                    if !self.scan_escape(&mut cooked) {
                        return TokenKind::Invalid;
                    }
                }
                Some('\r') => {
                    // Template values normalize CRLF and CR to LF
                    self.eat('\n');
                    cooked.push('\n');
                }
                Some(ch) => cooked.push(ch),
            }
        }
    }

    /// Decodes one escape sequence after a backslash. Returns false on EOF
    /// or a malformed escape.
    fn scan_escape(&mut self, value: &mut String) -> bool {
        let Some(escaped) = self.advance() else {
            return false;
        };
        match escaped {
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' if !matches!(self.peek(), Some('0'..='9')) => value.push('\0'),
            'x' => match self.scan_hex_digits(2).and_then(char::from_u32) {
                Some(ch) => value.push(ch),
                None => return false,
            },
            'u' => match self.scan_unicode_escape() {
                Some(ch) => value.push(ch),
                None => return false,
            },
            // Line continuation
            '\r' => {
                self.eat('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
        true
    }

    fn scan_unicode_escape(&mut self) -> Option<char> {
        if self.eat('{') {
            let start = self.pos;
            while self.peek().is_some_and(|ch| ch.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.source[start..self.pos];
            if !self.eat('}') {
                return None;
            }
            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
        } else {
            let code = self.scan_hex_digits(4)?;
            // Lone surrogates have no `char`; keep the replacement character
            Some(char::from_u32(code).unwrap_or('\u{fffd}'))
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let start = self.pos;
        for _ in 0..count {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    self.advance();
                }
                _ => return None,
            }
        }
        u32::from_str_radix(&self.source[start..self.pos], 16).ok()
    }

    fn scan_regex(&mut self) -> TokenKind {
        let mut pattern = String::new();
        let mut in_class = false;

        loop {
            match self.advance() {
                None => return TokenKind::Invalid,
                Some(ch) if is_line_terminator(ch) => return TokenKind::Invalid,
                Some('\\') => {
                    pattern.push('\\');
                    match self.advance() {
                        Some(ch) if !is_line_terminator(ch) => pattern.push(ch),
                        _ => return TokenKind::Invalid,
                    }
                }
                Some('[') => {
                    in_class = true;
                    pattern.push('[');
                }
                Some(']') => {
                    in_class = false;
                    pattern.push(']');
                }
                Some('/') if !in_class => break,
                Some(ch) => pattern.push(ch),
            }
        }

        let flags_start = self.pos;
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }
        let flags = self.source[flags_start..self.pos].to_string();

        TokenKind::RegExp { pattern, flags }
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        // Handle hex, octal, binary
        if first == '0' {
            match self.peek() {
                Some('x' | 'X') => return self.scan_radix_number(16, "0x"),
                Some('o' | 'O') => return self.scan_radix_number(8, "0o"),
                Some('b' | 'B') => return self.scan_radix_number(2, "0b"),
                _ => {}
            }
        }

        let mut value = String::from(first);
        self.scan_digits(&mut value);

        // BigInt suffix
        if self.eat('n') {
            return TokenKind::BigInt(value);
        }

        // Fractional part
        if self.peek() == Some('.') {
            self.advance();
            value.push('.');
        }

        self.scan_decimal(value)
    }

    /// Scans the fractional digits and exponent of a decimal literal.
    fn scan_decimal(&mut self, mut value: String) -> TokenKind {
        self.scan_digits(&mut value);

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            value.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                value.push(sign);
                self.advance();
            }
            self.scan_digits(&mut value);
        }

        match value.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Invalid,
        }
    }

    fn scan_digits(&mut self, value: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                if ch != '_' {
                    value.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_radix_number(&mut self, radix: u32, prefix: &str) -> TokenKind {
        self.advance(); // consume 'x', 'o' or 'b'
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) || ch == '_' {
                if ch != '_' {
                    value.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }

        if self.eat('n') {
            return TokenKind::BigInt(format!("{prefix}{value}"));
        }

        match u64::from_str_radix(&value, radix) {
            Ok(n) => TokenKind::Number(n as f64),
            Err(_) => TokenKind::Invalid,
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }

        let name = &self.source[start..self.pos];

        TokenKind::keyword(name).unwrap_or_else(|| TokenKind::Identifier(name.to_string()))
    }

    fn scan_private_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }

        if start == self.pos {
            TokenKind::Invalid
        } else {
            TokenKind::PrivateIdentifier(self.source[start..self.pos].to_string())
        }
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_'
        || ch == '$'
        || ch == '\u{200c}'
        || ch == '\u{200d}'
        || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

/// Checks if a character is an ECMAScript line terminator.
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source).map(|token| token.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut scanner = Scanner::new("{ } ( )");
        assert!(matches!(scanner.next_token().kind, TokenKind::LeftBrace));
        assert!(matches!(scanner.next_token().kind, TokenKind::RightBrace));
        assert!(matches!(scanner.next_token().kind, TokenKind::LeftParen));
        assert!(matches!(scanner.next_token().kind, TokenKind::RightParen));
    }

    #[test]
    fn test_numbers() {
        let mut scanner = Scanner::new("42 3.14 0xff 0b1010 .5 1e3 10n");
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 42.0));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 3.14));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 255.0));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 10.0));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 0.5));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 1000.0));
        assert!(matches!(scanner.next_token().kind, TokenKind::BigInt(s) if s == "10"));
    }

    #[test]
    fn test_strings() {
        let mut scanner = Scanner::new(r#""hello" 'world' "\x41B\u{43}""#);
        assert!(matches!(scanner.next_token().kind, TokenKind::String(s) if s == "hello"));
        assert!(matches!(scanner.next_token().kind, TokenKind::String(s) if s == "world"));
        assert!(matches!(scanner.next_token().kind, TokenKind::String(s) if s == "ABC"));
    }

    #[test]
    fn test_unterminated_string_is_invalid() {
        assert_eq!(kinds("'abc"), vec![TokenKind::Invalid]);
        assert_eq!(kinds("'a\nb'")[0], TokenKind::Invalid);
    }

    #[test]
    fn test_keywords() {
        let mut scanner = Scanner::new("function const let var import export");
        assert!(matches!(scanner.next_token().kind, TokenKind::Function));
        assert!(matches!(scanner.next_token().kind, TokenKind::Const));
        assert!(matches!(scanner.next_token().kind, TokenKind::Let));
        assert!(matches!(scanner.next_token().kind, TokenKind::Var));
        assert!(matches!(scanner.next_token().kind, TokenKind::Import));
        assert!(matches!(scanner.next_token().kind, TokenKind::Export));
    }

    #[test]
    fn test_identifiers() {
        let mut scanner = Scanner::new("foo _bar $baz");
        assert!(matches!(scanner.next_token().kind, TokenKind::Identifier(s) if s == "foo"));
        assert!(matches!(scanner.next_token().kind, TokenKind::Identifier(s) if s == "_bar"));
        assert!(matches!(scanner.next_token().kind, TokenKind::Identifier(s) if s == "$baz"));
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens: Vec<Token> = Scanner::new("é = ab").collect();
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[2].span, Span::new(5, 7));
    }

    #[test]
    fn test_single_line_comments() {
        let mut scanner = Scanner::new("42 // this is a comment\n43");
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 42.0));
        let token = scanner.next_token();
        assert!(matches!(token.kind, TokenKind::Number(n) if n == 43.0));
        assert!(token.newline_before);
    }

    #[test]
    fn test_multi_line_comments() {
        let mut scanner = Scanner::new("1 /* comment */ 2 /* multi\nline\ncomment */ 3");
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 1.0));
        let two = scanner.next_token();
        assert!(matches!(two.kind, TokenKind::Number(n) if n == 2.0));
        assert!(!two.newline_before);
        let three = scanner.next_token();
        assert!(matches!(three.kind, TokenKind::Number(n) if n == 3.0));
        assert!(three.newline_before);
    }

    #[test]
    fn test_division_vs_comment() {
        let mut scanner = Scanner::new("6 / 2");
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 6.0));
        assert!(matches!(scanner.next_token().kind, TokenKind::Slash));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == 2.0));
    }

    #[test]
    fn test_regex_after_operator() {
        let tokens = kinds("x = /a[/]b/gi; y = a / b");
        assert_eq!(
            tokens[2],
            TokenKind::RegExp {
                pattern: "a[/]b".to_string(),
                flags: "gi".to_string()
            }
        );
        assert_eq!(tokens[7], TokenKind::Slash);
    }

    #[test]
    fn test_template_chunks() {
        let mut scanner = Scanner::new("`a${b}c`");
        let head = scanner.next_token();
        assert_eq!(
            head.kind,
            TokenKind::Template {
                cooked: "a".to_string(),
                tail: false
            }
        );
        assert!(matches!(scanner.next_token().kind, TokenKind::Identifier(s) if s == "b"));
        let brace = scanner.next_token();
        assert_eq!(brace.kind, TokenKind::RightBrace);
        let tail = scanner.rescan_template_continuation(brace.span.start);
        assert_eq!(
            tail.kind,
            TokenKind::Template {
                cooked: "c".to_string(),
                tail: true
            }
        );
        assert_eq!(tail.span, Span::new(5, 8));
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_shebang_is_skipped() {
        let mut scanner = Scanner::new("#!/usr/bin/env node\nlet a");
        assert_eq!(scanner.shebang(), Some(Span::new(0, 19)));
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Let);
        assert_eq!(token.span.start, 20);
        assert!(token.newline_before);
    }

    #[test]
    fn test_optional_chain_vs_conditional() {
        assert_eq!(
            kinds("a?.b")[1],
            TokenKind::QuestionDot,
            "optional chaining"
        );
        assert_eq!(kinds("a?.5:1")[1], TokenKind::Question);
    }

    #[test]
    fn test_clone_does_not_advance_original() {
        let mut scanner = Scanner::new("a b");
        let mut lookahead = scanner.clone();
        lookahead.next_token();
        assert!(matches!(lookahead.next_token().kind, TokenKind::Identifier(s) if s == "b"));
        assert!(matches!(scanner.next_token().kind, TokenKind::Identifier(s) if s == "a"));
    }
}
