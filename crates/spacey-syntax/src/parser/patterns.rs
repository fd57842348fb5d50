//! Binding patterns and assignment-target conversion.

use super::parser::Parser;
use crate::Result;
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Parses a binding identifier or a destructuring pattern.
    pub(super) fn parse_binding_target(&mut self) -> Result<Pattern> {
        match &self.current.kind {
            TokenKind::LeftBracket => self.parse_array_binding(),
            TokenKind::LeftBrace => self.parse_object_binding(),
            _ => Ok(Pattern::Identifier(self.expect_identifier()?)),
        }
    }

    /// Parses a binding target with an optional `= default`.
    pub(super) fn parse_binding_element(&mut self) -> Result<Pattern> {
        let start = self.current.span.start;
        let target = self.parse_binding_target()?;

        if !self.eat(&TokenKind::Equal) {
            return Ok(target);
        }

        let right = self.with_in(|parser| parser.parse_assignment())?;
        Ok(Pattern::Assignment(AssignmentPattern {
            left: Box::new(target),
            right: Box::new(right),
            span: self.span_from(start),
        }))
    }

    /// Parses `...target`.
    pub(super) fn parse_rest_element(&mut self) -> Result<Pattern> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Ellipsis)?;
        let argument = self.parse_binding_target()?;
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span: self.span_from(start),
        }))
    }

    fn parse_array_binding(&mut self) -> Result<Pattern> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RightBracket) {
            if self.eat(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            if self.check(&TokenKind::Ellipsis) {
                elements.push(Some(self.parse_rest_element()?));
                break;
            }
            elements.push(Some(self.parse_binding_element()?));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightBracket)?;

        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: self.span_from(start),
        }))
    }

    fn parse_object_binding(&mut self) -> Result<Pattern> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            let property_start = self.current.span.start;

            if self.check(&TokenKind::Ellipsis) {
                let Pattern::Rest(rest) = self.parse_rest_element()? else {
                    return Err(self.unexpected());
                };
                properties.push(ObjectPatternProperty::Rest(rest));
                break;
            }

            let shorthand_allowed = self.is_identifier();
            let key = self.parse_property_key()?;

            let (value, shorthand) = if self.eat(&TokenKind::Colon) {
                (self.parse_binding_element()?, false)
            } else {
                let PropertyKey::Identifier(id) = &key else {
                    return Err(self.unexpected());
                };
                if !shorthand_allowed {
                    return Err(self.unexpected());
                }
                let target = Pattern::Identifier(id.clone());
                let value = if self.eat(&TokenKind::Equal) {
                    let right = self.with_in(|parser| parser.parse_assignment())?;
                    Pattern::Assignment(AssignmentPattern {
                        left: Box::new(target),
                        right: Box::new(right),
                        span: self.span_from(property_start),
                    })
                } else {
                    target
                };
                (value, true)
            };

            properties.push(ObjectPatternProperty::Property(PatternProperty {
                key,
                value,
                shorthand,
                span: self.span_from(property_start),
            }));

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightBrace)?;

        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: self.span_from(start),
        }))
    }

    /// Reinterprets an already-parsed expression as an assignment target,
    /// as in `[a, b] = pair` or `for ({x} of list)`.
    pub(super) fn expression_to_pattern(&self, expression: Expression) -> Result<Pattern> {
        match expression {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            member @ Expression::Member(_) => Ok(Pattern::Expression(Box::new(member))),
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in array.elements {
                    let pattern = match element {
                        None => None,
                        Some(Expression::Spread(spread)) => Some(Pattern::Rest(RestElement {
                            argument: Box::new(self.expression_to_pattern(*spread.argument)?),
                            span: spread.span,
                        })),
                        Some(element) => Some(self.expression_to_pattern(element)?),
                    };
                    elements.push(pattern);
                }
                Ok(Pattern::Array(ArrayPattern {
                    elements,
                    span: array.span,
                }))
            }
            Expression::Object(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                for member in object.properties {
                    let property = match member {
                        ObjectMember::Property(property)
                            if property.kind == PropertyKind::Init && !property.method =>
                        {
                            ObjectPatternProperty::Property(PatternProperty {
                                key: property.key,
                                value: self.expression_to_pattern(property.value)?,
                                shorthand: property.shorthand,
                                span: property.span,
                            })
                        }
                        ObjectMember::Spread(spread) => ObjectPatternProperty::Rest(RestElement {
                            argument: Box::new(self.expression_to_pattern(*spread.argument)?),
                            span: spread.span,
                        }),
                        ObjectMember::Property(_) => {
                            return Err(self.error("Invalid destructuring assignment target"));
                        }
                    };
                    properties.push(property);
                }
                Ok(Pattern::Object(ObjectPattern {
                    properties,
                    span: object.span,
                }))
            }
            Expression::Assignment(assignment)
                if assignment.operator == AssignmentOperator::Assign =>
            {
                Ok(Pattern::Assignment(AssignmentPattern {
                    left: assignment.left,
                    right: assignment.right,
                    span: assignment.span,
                }))
            }
            _ => Err(self.error("Invalid left-hand side in assignment")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::Parser;

    fn first_declarator(src: &str) -> VariableDeclarator {
        let mut parser = Parser::new(src);
        let program = parser.parse_program().unwrap();
        match program.body.into_iter().next() {
            Some(Statement::VariableDeclaration(mut declaration)) => declaration.declarations.remove(0),
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_object_binding_shorthand_default() {
        let declarator = first_declarator("let { a = 1, b: { c } } = obj;");
        let Pattern::Object(pattern) = &declarator.id else {
            panic!("expected object pattern");
        };
        assert!(matches!(
            &pattern.properties[0],
            ObjectPatternProperty::Property(PatternProperty {
                shorthand: true,
                value: Pattern::Assignment(_),
                ..
            })
        ));
        assert_eq!(declarator.id.bound_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_array_binding_holes_and_rest() {
        let declarator = first_declarator("const [, a, , ...rest] = list;");
        let Pattern::Array(pattern) = &declarator.id else {
            panic!("expected array pattern");
        };
        assert_eq!(pattern.elements.len(), 4);
        assert!(pattern.elements[0].is_none());
        assert!(matches!(pattern.elements[3], Some(Pattern::Rest(_))));
    }

    #[test]
    fn test_member_assignment_target() {
        let mut parser = Parser::new("a.b = 1; [c.d, e[0]] = f;");
        assert!(parser.parse_program().is_ok());
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("a + b = 1;");
        assert!(parser.parse_program().is_err());
        let mut parser = Parser::new("({ m() {} } = x);");
        assert!(parser.parse_program().is_err());
    }
}
