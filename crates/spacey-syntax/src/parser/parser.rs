//! The main parser implementation.
//!
//! Statement, expression, pattern and module grammar live in sibling files
//! as further `impl Parser` blocks; this file holds the parser state and
//! the token-level helpers they share.

use crate::ast::*;
use crate::lexer::{Scanner, Span, Token, TokenKind};
use crate::{ParseError, Result};

/// A recursive descent parser for JavaScript.
pub struct Parser<'a> {
    pub(super) source: &'a str,
    pub(super) scanner: Scanner<'a>,
    pub(super) current: Token,
    pub(super) previous: Token,
    pub(super) context: Context,
}

/// Grammar parameters that change while descending into functions and
/// `for` heads.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Context {
    pub in_function: bool,
    pub in_async: bool,
    pub in_generator: bool,
    /// Set while parsing a `for` initializer, where `in` ends the expression
    pub no_in: bool,
}

/// Saved parser position for backtracking.
pub(super) struct Snapshot<'a> {
    scanner: Scanner<'a>,
    current: Token,
    previous: Token,
    context: Context,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self {
            source,
            scanner,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            context: Context::default(),
        }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut body = Vec::new();
        let mut in_prologue = true;

        while !self.is_at_end() {
            let mut statement = self.parse_module_item()?;
            if in_prologue {
                in_prologue = self.mark_directive(&mut statement);
            }
            body.push(statement);
        }

        Ok(Program {
            body,
            shebang: self.scanner.shebang(),
            span: Span::new(0, self.source.len()),
        })
    }

    /// Sets `directive` on a string-literal expression statement. Returns
    /// false once the prologue has ended.
    pub(super) fn mark_directive(&self, statement: &mut Statement) -> bool {
        let Statement::Expression(expression_statement) = statement else {
            return false;
        };
        let Expression::Literal(Literal {
            value: LiteralValue::String(_),
            span,
        }) = &expression_statement.expression
        else {
            return false;
        };
        // Raw text between the quotes
        let raw = &self.source[span.start + 1..span.end - 1];
        expression_statement.directive = Some(raw.to_string());
        true
    }

    // ==================== Token helpers ====================

    pub(super) fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.scanner.next_token());
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "Expected {:?}, found {:?}",
                kind, self.current.kind
            )))
        }
    }

    pub(super) fn check_identifier(&self, name: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(s) if s == name)
    }

    /// Looks at the token after the current one without consuming anything.
    pub(super) fn peek(&self) -> Token {
        self.scanner.clone().next_token()
    }

    pub(super) fn is_at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end.max(start))
    }

    /// Applies automatic semicolon insertion.
    pub(super) fn consume_semicolon(&mut self) -> Result<()> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        if self.check(&TokenKind::RightBrace) || self.is_at_end() || self.current.newline_before
        {
            return Ok(());
        }
        Err(self.unexpected())
    }

    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current.span.start, self.source)
    }

    pub(super) fn unexpected(&self) -> ParseError {
        match &self.current.kind {
            TokenKind::Eof => self.error("Unexpected end of input"),
            TokenKind::Invalid => self.error(format!(
                "Invalid or unexpected token `{}`",
                self.current.span.slice(self.source)
            )),
            _ => self.error(format!(
                "Unexpected token `{}`",
                self.current.span.slice(self.source)
            )),
        }
    }

    // ==================== Identifiers ====================

    /// Name of the current token when it can be a binding or reference.
    pub(super) fn identifier_name(&self) -> Option<String> {
        match &self.current.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::Yield if self.context.in_generator => None,
            TokenKind::Await if self.context.in_async => None,
            kind => kind.contextual_name().map(str::to_string),
        }
    }

    pub(super) fn is_identifier(&self) -> bool {
        self.identifier_name().is_some()
    }

    pub(super) fn expect_identifier(&mut self) -> Result<Identifier> {
        match self.identifier_name() {
            Some(name) => {
                let id = Identifier::new(name, self.current.span);
                self.advance();
                Ok(id)
            }
            None => Err(self.error(format!(
                "Expected identifier, found {:?}",
                self.current.kind
            ))),
        }
    }

    /// Any IdentifierName, reserved words included (`a.default`,
    /// `{delete(){}}`, `export {a as default}`).
    pub(super) fn expect_identifier_name(&mut self) -> Result<Identifier> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            kind if kind.keyword_text().is_some() => self.current.span.slice(self.source).to_string(),
            _ => {
                return Err(self.error(format!(
                    "Expected property name, found {:?}",
                    self.current.kind
                )));
            }
        };
        let id = Identifier::new(name, self.current.span);
        self.advance();
        Ok(id)
    }

    // ==================== Backtracking ====================

    pub(super) fn snapshot(&self) -> Snapshot<'a> {
        Snapshot {
            scanner: self.scanner.clone(),
            current: self.current.clone(),
            previous: self.previous.clone(),
            context: self.context,
        }
    }

    pub(super) fn restore(&mut self, snapshot: Snapshot<'a>) {
        self.scanner = snapshot.scanner;
        self.current = snapshot.current;
        self.previous = snapshot.previous;
        self.context = snapshot.context;
    }

    /// Runs `f` with a modified context, restoring the previous one after.
    pub(super) fn with_context<T>(
        &mut self,
        context: Context,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = std::mem::replace(&mut self.context, context);
        let result = f(self);
        self.context = saved;
        result
    }

    /// Runs `f` with `in` re-enabled as a binary operator.
    pub(super) fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let context = Context {
            no_in: false,
            ..self.context
        };
        self.with_context(context, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to parse and get first statement
    fn parse_stmt(src: &str) -> Statement {
        let mut parser = Parser::new(src);
        let program = parser.parse_program().unwrap();
        program.body.into_iter().next().unwrap()
    }

    // Helper to parse and check it succeeds
    fn parse_ok(src: &str) -> Program {
        let mut parser = Parser::new(src);
        parser.parse_program().unwrap()
    }

    // Helper to parse and check it fails
    fn parse_err(src: &str) -> ParseError {
        let mut parser = Parser::new(src);
        parser.parse_program().unwrap_err()
    }

    #[test]
    fn test_parse_variable_declaration() {
        let program = parse_ok("let x = 42;");
        assert_eq!(program.body.len(), 1);
        assert_eq!(program.body[0].span(), Span::new(0, 11));
    }

    #[test]
    fn test_directive_prologue() {
        let program = parse_ok("'use strict';\n\"use module\"\nfoo()");
        let directives: Vec<&str> = program.directives().collect();
        assert_eq!(directives, vec!["use strict", "use module"]);
        assert!(matches!(
            program.first_non_directive(),
            Some(Statement::Expression(ExpressionStatement {
                directive: None,
                ..
            }))
        ));
    }

    #[test]
    fn test_directive_prologue_ends_at_first_statement() {
        let program = parse_ok("foo();\n'use module'");
        assert_eq!(program.directives().count(), 0);
    }

    #[test]
    fn test_string_expression_is_not_directive() {
        let program = parse_ok("'use module' + 1");
        assert_eq!(program.directives().count(), 0);
    }

    #[test]
    fn test_asi() {
        let program = parse_ok("let a = 1\nlet b = 2\na\n++b");
        assert_eq!(program.body.len(), 4);
    }

    #[test]
    fn test_asi_requires_newline() {
        let err = parse_err("let a = 1 let b = 2");
        assert!(err.message.contains("Unexpected token"));
        assert_eq!(err.offset, 10);
    }

    #[test]
    fn test_return_asi() {
        let statement = parse_stmt("function f() { return\n1 }");
        let Statement::FunctionDeclaration(function) = statement else {
            panic!("expected function");
        };
        assert!(matches!(
            &function.body.body[0],
            Statement::Return(ReturnStatement { argument: None, .. })
        ));
    }

    #[test]
    fn test_shebang_recorded() {
        let program = parse_ok("#!/usr/bin/env node\nlet a");
        assert_eq!(program.shebang, Some(Span::new(0, 19)));
        assert_eq!(program.body[0].span().start, 20);
    }

    #[test]
    fn test_error_position() {
        let err = parse_err("let a = 1;\nlet = ;");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_keywords_as_property_names() {
        parse_ok("a.default; a.new; ({ delete: 1, if: 2, class: 3 }); a.import");
    }

    #[test]
    fn test_contextual_keywords_as_identifiers() {
        parse_ok("var async = 1, of = 2, get = 3, set = 4, let_ = 5; async + of;");
    }
}
