//! Binding and assignment patterns.

use super::{Expression, Identifier, PropertyKey, Span};

/// A binding or assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `a`
    Identifier(Identifier),
    /// `{a, b: c, ...rest}`
    Object(ObjectPattern),
    /// `[a, , b, ...rest]`
    Array(ArrayPattern),
    /// `a = 1` inside a pattern or parameter list
    Assignment(AssignmentPattern),
    /// `...rest`
    Rest(RestElement),
    /// A member expression used as an assignment target
    Expression(Box<Expression>),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.span,
            Pattern::Object(pattern) => pattern.span,
            Pattern::Array(pattern) => pattern.span,
            Pattern::Assignment(pattern) => pattern.span,
            Pattern::Rest(rest) => rest.span,
            Pattern::Expression(expression) => expression.span(),
        }
    }

    /// Every identifier this pattern binds, in source order.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_bound_names(&mut names);
        names
    }

    /// Appends the bound names to `names`.
    pub fn collect_bound_names(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Identifier(id) => names.push(id.name.clone()),
            Pattern::Object(pattern) => {
                for property in &pattern.properties {
                    match property {
                        ObjectPatternProperty::Property(property) => {
                            property.value.collect_bound_names(names)
                        }
                        ObjectPatternProperty::Rest(rest) => rest.argument.collect_bound_names(names),
                    }
                }
            }
            Pattern::Array(pattern) => {
                for element in pattern.elements.iter().flatten() {
                    element.collect_bound_names(names);
                }
            }
            Pattern::Assignment(pattern) => pattern.left.collect_bound_names(names),
            Pattern::Rest(rest) => rest.argument.collect_bound_names(names),
            Pattern::Expression(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatternProperty {
    Property(PatternProperty),
    Rest(RestElement),
}

/// `key: value` (or shorthand `key`) inside an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    /// The elements (None represents a hole)
    pub elements: Vec<Option<Pattern>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPattern {
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestElement {
    pub argument: Box<Pattern>,
    pub span: Span,
}
