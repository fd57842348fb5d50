//! Statement parsing.

use super::parser::{Context, Parser};
use crate::Result;
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Parses a top-level item: a statement or an import/export declaration.
    pub(super) fn parse_module_item(&mut self) -> Result<Statement> {
        match &self.current.kind {
            TokenKind::Import
                if !matches!(self.peek().kind, TokenKind::LeftParen | TokenKind::Dot) =>
            {
                self.parse_import_declaration()
            }
            TokenKind::Export => self.parse_export_declaration(),
            _ => self.parse_statement(),
        }
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        match &self.current.kind {
            TokenKind::Var | TokenKind::Const => {
                let declaration = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                Ok(Statement::VariableDeclaration(VariableDeclaration {
                    span: self.span_from(declaration.span.start),
                    ..declaration
                }))
            }
            TokenKind::Let if self.is_let_declaration() => {
                let declaration = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                Ok(Statement::VariableDeclaration(VariableDeclaration {
                    span: self.span_from(declaration.span.start),
                    ..declaration
                }))
            }
            TokenKind::Function => {
                let start = self.current.span.start;
                let function = self.parse_function(start, false, true)?;
                self.named_function_declaration(function)
            }
            TokenKind::Async if self.is_async_function() => {
                let start = self.current.span.start;
                self.advance(); // consume 'async'
                let function = self.parse_function(start, true, true)?;
                self.named_function_declaration(function)
            }
            TokenKind::Class => Ok(Statement::ClassDeclaration(self.parse_class(true)?)),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                let jump = self.parse_jump_statement()?;
                Ok(Statement::Break(jump))
            }
            TokenKind::Continue => {
                let jump = self.parse_jump_statement()?;
                Ok(Statement::Continue(jump))
            }
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Debugger => {
                let span = self.current.span;
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::Debugger(span))
            }
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                let span = self.current.span;
                self.advance();
                Ok(Statement::Empty(span))
            }
            TokenKind::Export => Err(self.error("Unexpected token 'export' outside module scope")),
            _ if self.is_identifier() && matches!(self.peek().kind, TokenKind::Colon) => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn named_function_declaration(&self, function: Function) -> Result<Statement> {
        if function.id.is_none() {
            return Err(crate::ParseError::new(
                "Function statements require a function name",
                function.span.start,
                self.source,
            ));
        }
        Ok(Statement::FunctionDeclaration(function))
    }

    /// `let` starts a declaration only when a binding follows it.
    fn is_let_declaration(&self) -> bool {
        let next = self.peek();
        matches!(
            next.kind,
            TokenKind::Identifier(_)
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::Async
                | TokenKind::Yield
                | TokenKind::Await
                | TokenKind::Static
                | TokenKind::Let
        )
    }

    /// `async function` with no line break in between.
    pub(super) fn is_async_function(&self) -> bool {
        let next = self.peek();
        matches!(next.kind, TokenKind::Function) && !next.newline_before
    }

    /// Parses `var|let|const` declarators without the trailing semicolon.
    pub(super) fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration> {
        let start = self.current.span.start;
        let kind = match &self.current.kind {
            TokenKind::Var => VariableKind::Var,
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            _ => return Err(self.error("Expected variable keyword")),
        };
        self.advance();

        let mut declarations = Vec::new();

        loop {
            let declarator_start = self.current.span.start;
            let id = self.parse_binding_target()?;
            let init = if self.eat(&TokenKind::Equal) {
                Some(self.parse_assignment()?)
            } else {
                None
            };

            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.span_from(declarator_start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start),
        })
    }

    /// Parses `function [*] [name] (params) { body }` starting at the
    /// `function` keyword. `start` may point at a preceding `async`.
    pub(super) fn parse_function(
        &mut self,
        start: usize,
        is_async: bool,
        is_declaration: bool,
    ) -> Result<Function> {
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star);

        // Function expression names are bound inside their own context
        let id = if is_declaration {
            if self.is_identifier() {
                Some(self.expect_identifier()?)
            } else {
                None
            }
        } else {
            let inner = Context {
                in_function: true,
                in_async: is_async,
                in_generator: is_generator,
                no_in: false,
            };
            self.with_context(inner, |parser| {
                if parser.is_identifier() {
                    parser.expect_identifier().map(Some)
                } else {
                    Ok(None)
                }
            })?
        };

        self.parse_function_rest(start, id, is_async, is_generator)
    }

    /// Parses parameters and body of a function or method.
    pub(super) fn parse_function_rest(
        &mut self,
        start: usize,
        id: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
    ) -> Result<Function> {
        let context = Context {
            in_function: true,
            in_async: is_async,
            in_generator: is_generator,
            no_in: false,
        };

        self.with_context(context, |parser| {
            let params_start = parser.current.span.start;
            parser.expect(&TokenKind::LeftParen)?;
            let params = parser.parse_parameters()?;
            parser.expect(&TokenKind::RightParen)?;
            let params_span = parser.span_from(params_start);

            let body = parser.parse_function_body()?;

            Ok(Function {
                id,
                params,
                body,
                is_async,
                is_generator,
                params_span,
                span: parser.span_from(start),
            })
        })
    }

    /// Parses a formal parameter list up to (not including) `)`.
    pub(super) fn parse_parameters(&mut self) -> Result<Vec<Pattern>> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RightParen) {
            if self.check(&TokenKind::Ellipsis) {
                params.push(self.parse_rest_element()?);
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parses a `{ ... }` function body, recording its directive prologue.
    pub(super) fn parse_function_body(&mut self) -> Result<BlockStatement> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBrace)?;

        let mut body = Vec::new();
        let mut in_prologue = true;

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let mut statement = self.parse_statement()?;
            if in_prologue {
                in_prologue = self.mark_directive(&mut statement);
            }
            body.push(statement);
        }

        self.expect(&TokenKind::RightBrace)?;

        Ok(BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    /// Parses a class declaration or expression.
    pub(super) fn parse_class(&mut self, is_declaration: bool) -> Result<Class> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Class)?;

        let id = if self.is_identifier() {
            Some(self.expect_identifier()?)
        } else if is_declaration && !self.check(&TokenKind::LeftBrace) {
            return Err(self.unexpected());
        } else {
            None
        };

        let super_class = if self.eat(&TokenKind::Extends) {
            Some(Box::new(self.parse_left_hand_side()?))
        } else {
            None
        };

        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            body.push(self.parse_class_member()?);
        }

        self.expect(&TokenKind::RightBrace)?;

        Ok(Class {
            id,
            super_class,
            body,
            span: self.span_from(start),
        })
    }

    /// True when the current contextual word (`static`, `async`, `get`,
    /// `set`) is a modifier rather than the member name itself.
    pub(super) fn is_member_modifier(&self) -> bool {
        let next = self.peek();
        !matches!(
            next.kind,
            TokenKind::LeftParen
                | TokenKind::Equal
                | TokenKind::Semicolon
                | TokenKind::RightBrace
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Eof
        )
    }

    fn parse_class_member(&mut self) -> Result<ClassMember> {
        let start = self.current.span.start;

        let is_static = self.check(&TokenKind::Static) && self.is_member_modifier();
        if is_static {
            self.advance();
            if self.check(&TokenKind::LeftBrace) {
                let block = self.with_context(
                    Context {
                        in_function: true,
                        ..Context::default()
                    },
                    |parser| parser.parse_block(),
                )?;
                return Ok(ClassMember::StaticBlock(block));
            }
        }

        let is_async = self.check(&TokenKind::Async)
            && self.is_member_modifier()
            && !self.peek().newline_before;
        if is_async {
            self.advance();
        }

        let is_generator = self.eat(&TokenKind::Star);

        let mut kind = MethodKind::Method;
        let is_accessor = self.check_identifier("get") || self.check_identifier("set");
        if !is_async && !is_generator && is_accessor && self.is_member_modifier() {
            kind = if self.check_identifier("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.advance();
        }

        let key = self.parse_property_key()?;

        if self.check(&TokenKind::LeftParen) {
            if kind == MethodKind::Method
                && !is_static
                && matches!(&key, PropertyKey::Identifier(id) if id.name == "constructor")
            {
                kind = MethodKind::Constructor;
            }
            let value =
                self.parse_function_rest(key.span().start, None, is_async, is_generator)?;
            return Ok(ClassMember::Method(MethodDefinition {
                key,
                value,
                kind,
                is_static,
                span: self.span_from(start),
            }));
        }

        // Class field
        let value = if self.eat(&TokenKind::Equal) {
            let context = Context {
                in_function: true,
                ..Context::default()
            };
            Some(self.with_context(context, |parser| parser.parse_assignment())?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(ClassMember::Property(ClassProperty {
            key,
            value,
            is_static,
            span: self.span_from(start),
        }))
    }

    fn parse_if_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'if'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        }))
    }

    fn parse_switch_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'switch'
        self.expect(&TokenKind::LeftParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::LeftBrace)?;

        let mut cases = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let case_start = self.current.span.start;
            let test = if self.eat(&TokenKind::Case) {
                Some(self.parse_expression()?)
            } else if self.eat(&TokenKind::Default) {
                None
            } else {
                return Err(self.error("Expected 'case' or 'default'"));
            };
            self.expect(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_statement()?);
            }

            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }

        self.expect(&TokenKind::RightBrace)?;

        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases,
            span: self.span_from(start),
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'while'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While(WhileStatement {
            test,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'do'
        let body = Box::new(self.parse_statement()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        // A semicolon after do-while is always optional
        self.eat(&TokenKind::Semicolon);

        Ok(Statement::DoWhile(DoWhileStatement {
            body,
            test,
            span: self.span_from(start),
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'for'
        let is_await = self.eat(&TokenKind::Await);
        self.expect(&TokenKind::LeftParen)?;

        let no_in = Context {
            no_in: true,
            ..self.context
        };

        // Check for for-in/for-of with variable declaration
        let is_declaration = matches!(self.current.kind, TokenKind::Var | TokenKind::Const)
            || (self.check(&TokenKind::Let) && self.is_let_declaration());

        let init = if is_declaration {
            let declaration =
                self.with_context(no_in, |parser| parser.parse_variable_declaration())?;

            if self.check(&TokenKind::In) || self.check_identifier("of") {
                let left = ForInLeft::Declaration(declaration);
                return self.parse_for_in_of_rest(start, left, is_await);
            }

            Some(ForInit::Declaration(declaration))
        } else if self.check(&TokenKind::Semicolon) {
            None
        } else {
            let expression = self.with_context(no_in, |parser| parser.parse_expression())?;

            if self.check(&TokenKind::In) || self.check_identifier("of") {
                let left = ForInLeft::Pattern(self.expression_to_pattern(expression)?);
                return self.parse_for_in_of_rest(start, left, is_await);
            }

            Some(ForInit::Expression(expression))
        };

        self.expect(&TokenKind::Semicolon)?;

        // Parse test
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        // Parse update
        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RightParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        }))
    }

    /// Parses `in expr) body` or `of expr) body` after the left side.
    fn parse_for_in_of_rest(
        &mut self,
        start: usize,
        left: ForInLeft,
        is_await: bool,
    ) -> Result<Statement> {
        let is_of = self.check_identifier("of");
        self.advance(); // consume 'in' or 'of'
        let right = if is_of {
            self.parse_assignment()?
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        let span = self.span_from(start);

        if is_of {
            Ok(Statement::ForOf(ForOfStatement {
                left,
                right,
                body,
                is_await,
                span,
            }))
        } else {
            Ok(Statement::ForIn(ForInStatement {
                left,
                right,
                body,
                span,
            }))
        }
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'return'

        let argument = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RightBrace)
            || self.is_at_end()
            || self.current.newline_before
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(Statement::Return(ReturnStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    /// Parses `break` or `continue` with an optional label on the same line.
    fn parse_jump_statement(&mut self) -> Result<JumpStatement> {
        let start = self.current.span.start;
        self.advance(); // consume 'break' or 'continue'

        let label = if self.is_identifier() && !self.current.newline_before {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(JumpStatement {
            label,
            span: self.span_from(start),
        })
    }

    fn parse_throw_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'throw'
        if self.current.newline_before {
            return Err(self.error("Illegal newline after throw"));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(Statement::Throw(ThrowStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    fn parse_try_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'try'
        let block = self.parse_block()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span.start;
            self.advance();
            let param = if self.eat(&TokenKind::LeftParen) {
                let param = self.parse_binding_target()?;
                self.expect(&TokenKind::RightParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("Missing catch or finally after try"));
        }

        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        }))
    }

    fn parse_with_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        self.advance(); // consume 'with'
        self.expect(&TokenKind::LeftParen)?;
        let object = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::With(WithStatement {
            object,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_labeled_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        let label = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::Labeled(LabeledStatement {
            label,
            body,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_block(&mut self) -> Result<BlockStatement> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBrace)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        self.expect(&TokenKind::RightBrace)?;

        Ok(BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let start = self.current.span.start;
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(Statement::Expression(ExpressionStatement {
            expression,
            directive: None,
            span: self.span_from(start),
        }))
    }
}
