//! Expression parsing.
//!
//! Precedence climbs from comma expressions down to primaries:
//!
//! | Level | Operators |
//! |-------|-----------|
//! | sequence | `,` |
//! | assignment | `=` `+=` ... `??=`, arrows, `yield` |
//! | conditional | `?:` |
//! | logical | `\|\|` `??`, then `&&` |
//! | bitwise | `\|`, `^`, `&` |
//! | equality | `==` `!=` `===` `!==` |
//! | relational | `<` `>` `<=` `>=` `instanceof` `in` |
//! | shift | `<<` `>>` `>>>` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | exponent | `**` (right associative) |
//! | unary | `!` `~` `+` `-` `typeof` `void` `delete` `await` `++x` |
//! | postfix | `x++` `x--` |
//! | call/member | `a.b` `a?.b` `a[b]` `a()` `` a`t` `` `new` |

use super::parser::{Context, Parser};
use crate::Result;
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Parses a full expression, including the comma operator.
    pub fn parse_expression(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let first = self.parse_assignment()?;

        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.eat(&TokenKind::Comma) {
            expressions.push(self.parse_assignment()?);
        }

        Ok(Expression::Sequence(SequenceExpression {
            expressions,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_assignment(&mut self) -> Result<Expression> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        if self.check(&TokenKind::Yield) && self.context.in_generator {
            return self.parse_yield();
        }

        let start = self.current.span.start;
        let left = self.parse_conditional()?;

        let Some(operator) = assignment_operator(&self.current.kind) else {
            return Ok(left);
        };

        let target = if operator == AssignmentOperator::Assign {
            self.expression_to_pattern(left)?
        } else {
            match left {
                Expression::Identifier(id) => Pattern::Identifier(id),
                member @ Expression::Member(_) => Pattern::Expression(Box::new(member)),
                _ => return Err(self.error("Invalid left-hand side in assignment")),
            }
        };

        self.advance(); // consume operator
        let right = self.parse_assignment()?;

        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(target),
            right: Box::new(right),
            span: self.span_from(start),
        }))
    }

    /// Attempts to parse an arrow function, rewinding when the tokens turn
    /// out to be something else (a parenthesized expression, a call to a
    /// function named `async`, ...).
    fn try_parse_arrow(&mut self) -> Result<Option<Expression>> {
        let start = self.current.span.start;

        let async_prefix = self.check(&TokenKind::Async) && {
            let next = self.peek();
            !next.newline_before
                && (matches!(next.kind, TokenKind::LeftParen | TokenKind::Identifier(_))
                    || next.kind.contextual_name().is_some())
        };
        let candidate = async_prefix
            || self.check(&TokenKind::LeftParen)
            || (self.is_identifier() && matches!(self.peek().kind, TokenKind::Arrow));
        if !candidate {
            return Ok(None);
        }

        let snapshot = self.snapshot();
        if async_prefix {
            self.advance(); // consume 'async'
        }

        let params = match self.parse_arrow_params(async_prefix) {
            Ok(params) if self.check(&TokenKind::Arrow) && !self.current.newline_before => params,
            _ => {
                self.restore(snapshot);
                return Ok(None);
            }
        };

        self.advance(); // consume '=>'
        let body = self.parse_arrow_body(async_prefix)?;

        Ok(Some(Expression::Arrow(ArrowFunctionExpression {
            params,
            body,
            is_async: async_prefix,
            span: self.span_from(start),
        })))
    }

    fn parse_arrow_params(&mut self, is_async: bool) -> Result<Vec<Pattern>> {
        if self.is_identifier() {
            return Ok(vec![Pattern::Identifier(self.expect_identifier()?)]);
        }

        let context = Context {
            in_async: is_async || self.context.in_async,
            no_in: false,
            ..self.context
        };
        self.with_context(context, |parser| {
            parser.expect(&TokenKind::LeftParen)?;
            let params = parser.parse_parameters()?;
            parser.expect(&TokenKind::RightParen)?;
            Ok(params)
        })
    }

    fn parse_arrow_body(&mut self, is_async: bool) -> Result<ArrowBody> {
        let is_block = self.check(&TokenKind::LeftBrace);
        let context = Context {
            in_function: true,
            in_async: is_async,
            in_generator: false,
            no_in: !is_block && self.context.no_in,
        };

        self.with_context(context, |parser| {
            if is_block {
                Ok(ArrowBody::Block(parser.parse_function_body()?))
            } else {
                Ok(ArrowBody::Expression(Box::new(parser.parse_assignment()?)))
            }
        })
    }

    fn parse_yield(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        self.advance(); // consume 'yield'

        let delegate = !self.current.newline_before && self.eat(&TokenKind::Star);
        let has_argument = delegate
            || (!self.current.newline_before
                && !matches!(
                    self.current.kind,
                    TokenKind::RightParen
                        | TokenKind::RightBracket
                        | TokenKind::RightBrace
                        | TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::Colon
                        | TokenKind::Eof
                ));

        let argument = if has_argument {
            Some(Box::new(self.parse_assignment()?))
        } else {
            None
        };

        Ok(Expression::Yield(YieldExpression {
            argument,
            delegate,
            span: self.span_from(start),
        }))
    }

    /// Parse conditional (ternary) expression: test ? consequent : alternate
    fn parse_conditional(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let test = self.parse_logical_or()?;

        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }

        let consequent = self.with_in(|parser| parser.parse_assignment())?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;

        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        }))
    }

    /// Parses one left-associative binary precedence level.
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> Result<Expression>,
        operator: fn(&TokenKind, bool) -> Option<BinaryOperator>,
    ) -> Result<Expression> {
        let start = self.current.span.start;
        let mut left = operand(self)?;

        while let Some(op) = operator(&self.current.kind, self.context.no_in) {
            self.advance();
            let right = operand(self)?;
            let node = BinaryExpression {
                operator: op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
            left = if matches!(
                op,
                BinaryOperator::LogicalAnd
                    | BinaryOperator::LogicalOr
                    | BinaryOperator::NullishCoalescing
            ) {
                Expression::Logical(node)
            } else {
                Expression::Binary(node)
            };
        }

        Ok(left)
    }

    fn parse_logical_or(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_logical_and, |kind, _| match kind {
            TokenKind::PipePipe => Some(BinaryOperator::LogicalOr),
            TokenKind::QuestionQuestion => Some(BinaryOperator::NullishCoalescing),
            _ => None,
        })
    }

    fn parse_logical_and(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_bitwise_or, |kind, _| match kind {
            TokenKind::AmpersandAmpersand => Some(BinaryOperator::LogicalAnd),
            _ => None,
        })
    }

    fn parse_bitwise_or(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_bitwise_xor, |kind, _| match kind {
            TokenKind::Pipe => Some(BinaryOperator::BitwiseOr),
            _ => None,
        })
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_bitwise_and, |kind, _| match kind {
            TokenKind::Caret => Some(BinaryOperator::BitwiseXor),
            _ => None,
        })
    }

    fn parse_bitwise_and(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_equality, |kind, _| match kind {
            TokenKind::Ampersand => Some(BinaryOperator::BitwiseAnd),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_relational, |kind, _| match kind {
            TokenKind::EqualEqual => Some(BinaryOperator::Equal),
            TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
            TokenKind::StrictEqual => Some(BinaryOperator::StrictEqual),
            TokenKind::StrictNotEqual => Some(BinaryOperator::StrictNotEqual),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_shift, |kind, no_in| match kind {
            TokenKind::LessThan => Some(BinaryOperator::LessThan),
            TokenKind::GreaterThan => Some(BinaryOperator::GreaterThan),
            TokenKind::LessThanEqual => Some(BinaryOperator::LessThanEqual),
            TokenKind::GreaterThanEqual => Some(BinaryOperator::GreaterThanEqual),
            TokenKind::Instanceof => Some(BinaryOperator::InstanceOf),
            TokenKind::In if !no_in => Some(BinaryOperator::In),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_additive, |kind, _| match kind {
            TokenKind::LeftShift => Some(BinaryOperator::LeftShift),
            TokenKind::RightShift => Some(BinaryOperator::RightShift),
            TokenKind::UnsignedRightShift => Some(BinaryOperator::UnsignedRightShift),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_multiplicative, |kind, _| match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Subtract),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        self.parse_binary_level(Self::parse_exponent, |kind, _| match kind {
            TokenKind::Star => Some(BinaryOperator::Multiply),
            TokenKind::Slash => Some(BinaryOperator::Divide),
            TokenKind::Percent => Some(BinaryOperator::Modulo),
            _ => None,
        })
    }

    fn parse_exponent(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let base = self.parse_unary()?;

        if !self.eat(&TokenKind::StarStar) {
            return Ok(base);
        }

        let exponent = self.parse_exponent()?;
        Ok(Expression::Binary(BinaryExpression {
            operator: BinaryOperator::Exponent,
            left: Box::new(base),
            right: Box::new(exponent),
            span: self.span_from(start),
        }))
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        let start = self.current.span.start;

        // Check for prefix increment/decrement
        let update = match self.current.kind {
            TokenKind::PlusPlus => Some(UpdateOperator::Increment),
            TokenKind::MinusMinus => Some(UpdateOperator::Decrement),
            _ => None,
        };
        if let Some(operator) = update {
            self.advance();
            let argument = self.parse_unary()?;
            self.check_update_target(&argument)?;
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span: self.span_from(start),
            }));
        }

        let operator = match &self.current.kind {
            TokenKind::Bang => Some(UnaryOperator::LogicalNot),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Typeof => Some(UnaryOperator::Typeof),
            TokenKind::Void => Some(UnaryOperator::Void),
            TokenKind::Delete => Some(UnaryOperator::Delete),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            _ => None,
        };

        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        if self.is_await_expression() {
            self.advance(); // consume 'await'
            let argument = self.parse_unary()?;
            return Ok(Expression::Await(AwaitExpression {
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        self.parse_postfix()
    }

    /// `await` is an operator inside async functions and, for top-level
    /// await, outside of any function when an operand follows.
    fn is_await_expression(&self) -> bool {
        if !self.check(&TokenKind::Await) {
            return false;
        }
        if self.context.in_async {
            return true;
        }
        if self.context.in_function {
            return false;
        }
        let next = self.peek();
        !next.newline_before
            && (matches!(
                next.kind,
                TokenKind::Identifier(_)
                    | TokenKind::Number(_)
                    | TokenKind::BigInt(_)
                    | TokenKind::String(_)
                    | TokenKind::Template { .. }
                    | TokenKind::RegExp { .. }
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Null
                    | TokenKind::This
                    | TokenKind::Super
                    | TokenKind::Function
                    | TokenKind::Class
                    | TokenKind::New
                    | TokenKind::Import
                    | TokenKind::LeftParen
                    | TokenKind::LeftBracket
                    | TokenKind::LeftBrace
                    | TokenKind::Bang
                    | TokenKind::Tilde
                    | TokenKind::Typeof
                    | TokenKind::Void
                    | TokenKind::Delete
                    | TokenKind::Await
            ) || next.kind.contextual_name().is_some())
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let expression = self.parse_left_hand_side()?;

        if self.current.newline_before {
            return Ok(expression);
        }

        let operator = match self.current.kind {
            TokenKind::PlusPlus => UpdateOperator::Increment,
            TokenKind::MinusMinus => UpdateOperator::Decrement,
            _ => return Ok(expression),
        };
        self.check_update_target(&expression)?;
        self.advance();

        Ok(Expression::Update(UpdateExpression {
            operator,
            argument: Box::new(expression),
            prefix: false,
            span: self.span_from(start),
        }))
    }

    fn check_update_target(&self, target: &Expression) -> Result<()> {
        match target {
            Expression::Identifier(_) | Expression::Member(_) => Ok(()),
            _ => Err(self.error("Invalid left-hand side expression in update operation")),
        }
    }

    /// Parses member accesses, calls, optional chains and tagged templates.
    pub(super) fn parse_left_hand_side(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let mut expression = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    expression = self.member(start, expression, property, false);
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    if self.check(&TokenKind::LeftParen) {
                        let arguments = self.parse_arguments()?;
                        expression = Expression::Call(CallExpression {
                            callee: Box::new(expression),
                            arguments,
                            optional: true,
                            span: self.span_from(start),
                        });
                    } else if self.check(&TokenKind::LeftBracket) {
                        let property = self.parse_computed_member()?;
                        expression = self.member(start, expression, property, true);
                    } else {
                        let property = self.parse_member_name()?;
                        expression = self.member(start, expression, property, true);
                    }
                }
                TokenKind::LeftBracket => {
                    let property = self.parse_computed_member()?;
                    expression = self.member(start, expression, property, false);
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call(CallExpression {
                        callee: Box::new(expression),
                        arguments,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::Template { .. } => {
                    let quasi = self.parse_template_literal()?;
                    expression = Expression::TaggedTemplate(TaggedTemplateExpression {
                        tag: Box::new(expression),
                        quasi,
                        span: self.span_from(start),
                    });
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    fn member(
        &self,
        start: usize,
        object: Expression,
        property: MemberProperty,
        optional: bool,
    ) -> Expression {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property,
            optional,
            span: self.span_from(start),
        })
    }

    fn parse_member_name(&mut self) -> Result<MemberProperty> {
        if let TokenKind::PrivateIdentifier(name) = &self.current.kind {
            let id = Identifier::new(name.clone(), self.current.span);
            self.advance();
            return Ok(MemberProperty::Private(id));
        }
        Ok(MemberProperty::Identifier(self.expect_identifier_name()?))
    }

    fn parse_computed_member(&mut self) -> Result<MemberProperty> {
        self.expect(&TokenKind::LeftBracket)?;
        let property = self.with_in(|parser| parser.parse_expression())?;
        self.expect(&TokenKind::RightBracket)?;
        Ok(MemberProperty::Expression(Box::new(property)))
    }

    /// Parses `new Callee(args)`, `new Callee` and `new.target`.
    fn parse_new(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let keyword = self.current.span;
        self.advance(); // consume 'new'

        if self.eat(&TokenKind::Dot) {
            let property = self.expect_identifier_name()?;
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier::new("new", keyword),
                property,
                span: self.span_from(start),
            }));
        }

        let callee_start = self.current.span.start;
        let mut callee = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        // Member accesses bind tighter than the constructor call
        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    callee = self.member(callee_start, callee, property, false);
                }
                TokenKind::LeftBracket => {
                    let property = self.parse_computed_member()?;
                    callee = self.member(callee_start, callee, property, false);
                }
                TokenKind::Template { .. } => {
                    let quasi = self.parse_template_literal()?;
                    callee = Expression::TaggedTemplate(TaggedTemplateExpression {
                        tag: Box::new(callee),
                        quasi,
                        span: self.span_from(callee_start),
                    });
                }
                _ => break,
            }
        }

        let arguments = if self.check(&TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expression::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span: self.span_from(start),
        }))
    }

    /// Parses a parenthesized argument list, spreads included.
    fn parse_arguments(&mut self) -> Result<Vec<Expression>> {
        self.expect(&TokenKind::LeftParen)?;

        let arguments = self.with_in(|parser| {
            let mut arguments = Vec::new();
            while !parser.check(&TokenKind::RightParen) {
                arguments.push(parser.parse_spread_or_assignment()?);
                if !parser.eat(&TokenKind::Comma) {
                    break;
                }
            }
            Ok(arguments)
        })?;

        self.expect(&TokenKind::RightParen)?;
        Ok(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> Result<Expression> {
        if !self.check(&TokenKind::Ellipsis) {
            return self.parse_assignment();
        }

        let start = self.current.span.start;
        self.advance(); // consume '...'
        let argument = self.parse_assignment()?;
        Ok(Expression::Spread(SpreadElement {
            argument: Box::new(argument),
            span: self.span_from(start),
        }))
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let span = self.current.span;

        let literal = match &self.current.kind {
            TokenKind::Number(n) => Some(LiteralValue::Number(*n)),
            TokenKind::String(s) => Some(LiteralValue::String(s.clone())),
            TokenKind::BigInt(s) => Some(LiteralValue::BigInt(s.clone())),
            TokenKind::RegExp { pattern, flags } => Some(LiteralValue::RegExp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            TokenKind::True => Some(LiteralValue::Boolean(true)),
            TokenKind::False => Some(LiteralValue::Boolean(false)),
            TokenKind::Null => Some(LiteralValue::Null),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expression::Literal(Literal { value, span }));
        }

        match &self.current.kind {
            TokenKind::Template { .. } => Ok(Expression::Template(self.parse_template_literal()?)),
            TokenKind::This => {
                self.advance();
                Ok(Expression::This(span))
            }
            TokenKind::Super => {
                self.advance();
                Ok(Expression::Super(span))
            }
            TokenKind::Function => {
                let function = self.parse_function(span.start, false, false)?;
                Ok(Expression::Function(function))
            }
            TokenKind::Async if self.is_async_function() => {
                self.advance(); // consume 'async'
                let function = self.parse_function(span.start, true, false)?;
                Ok(Expression::Function(function))
            }
            TokenKind::Class => Ok(Expression::Class(self.parse_class(false)?)),
            TokenKind::LeftParen => {
                self.advance();
                let expression = self.with_in(|parser| parser.parse_expression())?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expression)
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Import => self.parse_import_expression(),
            TokenKind::New => self.parse_new(),
            _ if self.is_identifier() => Ok(Expression::Identifier(self.expect_identifier()?)),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses `import(source)` or `import.meta` starting at `import`.
    fn parse_import_expression(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        let keyword = self.current.span;
        self.advance(); // consume 'import'

        if self.eat(&TokenKind::Dot) {
            let property = self.expect_identifier_name()?;
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier::new("import", keyword),
                property,
                span: self.span_from(start),
            }));
        }

        self.expect(&TokenKind::LeftParen)?;
        let source = self.with_in(|parser| parser.parse_assignment())?;
        self.eat(&TokenKind::Comma);
        self.expect(&TokenKind::RightParen)?;

        Ok(Expression::Import(ImportExpression {
            source: Box::new(source),
            keyword,
            span: self.span_from(start),
        }))
    }

    /// Parses a template literal whose first chunk is the current token.
    pub(super) fn parse_template_literal(&mut self) -> Result<TemplateLiteral> {
        let start = self.current.span.start;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        loop {
            let TokenKind::Template { cooked, tail } = &self.current.kind else {
                return Err(self.unexpected());
            };
            let tail = *tail;
            quasis.push(TemplateElement {
                cooked: cooked.clone(),
                tail,
                span: self.current.span,
            });
            self.advance();

            if tail {
                break;
            }

            expressions.push(self.with_in(|parser| parser.parse_expression())?);

            if !self.check(&TokenKind::RightBrace) {
                return Err(self.error("Unterminated template substitution"));
            }
            self.current = self
                .scanner
                .rescan_template_continuation(self.current.span.start);
        }

        Ok(TemplateLiteral {
            quasis,
            expressions,
            span: self.span_from(start),
        })
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBracket)?;

        let elements = self.with_in(|parser| {
            let mut elements = Vec::new();
            while !parser.check(&TokenKind::RightBracket) {
                if parser.eat(&TokenKind::Comma) {
                    elements.push(None);
                    continue;
                }
                elements.push(Some(parser.parse_spread_or_assignment()?));
                if !parser.eat(&TokenKind::Comma) {
                    break;
                }
            }
            Ok(elements)
        })?;

        self.expect(&TokenKind::RightBracket)?;

        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_object_literal(&mut self) -> Result<Expression> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBrace)?;

        let properties = self.with_in(|parser| {
            let mut properties = Vec::new();
            while !parser.check(&TokenKind::RightBrace) {
                properties.push(parser.parse_object_member()?);
                if !parser.eat(&TokenKind::Comma) {
                    break;
                }
            }
            Ok(properties)
        })?;

        self.expect(&TokenKind::RightBrace)?;

        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.span_from(start),
        }))
    }

    fn parse_object_member(&mut self) -> Result<ObjectMember> {
        let start = self.current.span.start;

        if self.eat(&TokenKind::Ellipsis) {
            let argument = self.parse_assignment()?;
            return Ok(ObjectMember::Spread(SpreadElement {
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        let is_async = self.check(&TokenKind::Async)
            && self.is_member_modifier()
            && !self.peek().newline_before;
        if is_async {
            self.advance();
        }

        let is_generator = self.eat(&TokenKind::Star);

        let mut kind = PropertyKind::Init;
        let is_accessor = self.check_identifier("get") || self.check_identifier("set");
        if !is_async && !is_generator && is_accessor && self.is_member_modifier() {
            kind = if self.check_identifier("get") {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.advance();
        }

        // Only identifier references may be written in shorthand form
        let shorthand_allowed = self.is_identifier();
        let key = self.parse_property_key()?;

        if is_async || is_generator || kind != PropertyKind::Init || self.check(&TokenKind::LeftParen)
        {
            let function =
                self.parse_function_rest(key.span().start, None, is_async, is_generator)?;
            return Ok(ObjectMember::Property(Property {
                key,
                value: Expression::Function(function),
                kind,
                method: kind == PropertyKind::Init,
                shorthand: false,
                span: self.span_from(start),
            }));
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assignment()?;
            return Ok(ObjectMember::Property(Property {
                key,
                value,
                kind,
                method: false,
                shorthand: false,
                span: self.span_from(start),
            }));
        }

        let PropertyKey::Identifier(id) = &key else {
            return Err(self.unexpected());
        };
        if !shorthand_allowed {
            return Err(self.unexpected());
        }

        // `{a = 1}` is only valid as a destructuring target
        let value = if self.eat(&TokenKind::Equal) {
            let right = self.parse_assignment()?;
            Expression::Assignment(AssignmentExpression {
                operator: AssignmentOperator::Assign,
                left: Box::new(Pattern::Identifier(id.clone())),
                right: Box::new(right),
                span: self.span_from(id.span.start),
            })
        } else {
            Expression::Identifier(id.clone())
        };

        Ok(ObjectMember::Property(Property {
            key,
            value,
            kind,
            method: false,
            shorthand: true,
            span: self.span_from(start),
        }))
    }

    /// Parses an object or class member key.
    pub(super) fn parse_property_key(&mut self) -> Result<PropertyKey> {
        let span = self.current.span;

        let literal = match &self.current.kind {
            TokenKind::String(s) => Some(LiteralValue::String(s.clone())),
            TokenKind::Number(n) => Some(LiteralValue::Number(*n)),
            TokenKind::BigInt(s) => Some(LiteralValue::BigInt(s.clone())),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(PropertyKey::Literal(Literal { value, span }));
        }

        match &self.current.kind {
            TokenKind::LeftBracket => {
                self.advance();
                let key = self.with_in(|parser| parser.parse_assignment())?;
                self.expect(&TokenKind::RightBracket)?;
                Ok(PropertyKey::Computed(Box::new(key)))
            }
            TokenKind::PrivateIdentifier(name) => {
                let id = Identifier::new(name.clone(), span);
                self.advance();
                Ok(PropertyKey::Private(id))
            }
            _ => Ok(PropertyKey::Identifier(self.expect_identifier_name()?)),
        }
    }
}

/// Maps a token to its assignment operator.
fn assignment_operator(kind: &TokenKind) -> Option<AssignmentOperator> {
    let operator = match kind {
        TokenKind::Equal => AssignmentOperator::Assign,
        TokenKind::PlusEqual => AssignmentOperator::AddAssign,
        TokenKind::MinusEqual => AssignmentOperator::SubtractAssign,
        TokenKind::StarEqual => AssignmentOperator::MultiplyAssign,
        TokenKind::SlashEqual => AssignmentOperator::DivideAssign,
        TokenKind::PercentEqual => AssignmentOperator::ModuloAssign,
        TokenKind::StarStarEqual => AssignmentOperator::ExponentAssign,
        TokenKind::LeftShiftEqual => AssignmentOperator::LeftShiftAssign,
        TokenKind::RightShiftEqual => AssignmentOperator::RightShiftAssign,
        TokenKind::UnsignedRightShiftEqual => AssignmentOperator::UnsignedRightShiftAssign,
        TokenKind::AmpersandEqual => AssignmentOperator::BitwiseAndAssign,
        TokenKind::PipeEqual => AssignmentOperator::BitwiseOrAssign,
        TokenKind::CaretEqual => AssignmentOperator::BitwiseXorAssign,
        TokenKind::AmpersandAmpersandEqual => AssignmentOperator::LogicalAndAssign,
        TokenKind::PipePipeEqual => AssignmentOperator::LogicalOrAssign,
        TokenKind::QuestionQuestionEqual => AssignmentOperator::NullishCoalescingAssign,
        _ => return None,
    };
    Some(operator)
}
