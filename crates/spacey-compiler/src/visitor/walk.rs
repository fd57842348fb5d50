//! Generic recursive descent used by the default [`Visitor`] handlers.

use super::{AstPath, NodeRef, Visitor};
use crate::error::Result;
use spacey_syntax::ast::*;

/// Routes the node on top of `path` to the matching handler.
pub fn dispatch<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, path: &mut AstPath<'a>) -> Result<()> {
    match path.get_value() {
        NodeRef::Statement(statement) => match statement {
            Statement::Import(_) => visitor.visit_import_declaration(path),
            Statement::ExportNamed(_) => visitor.visit_export_named_declaration(path),
            Statement::ExportDefault(_) => visitor.visit_export_default_declaration(path),
            Statement::ExportAll(_) => visitor.visit_export_all_declaration(path),
            _ => visitor.visit_statement(path),
        },
        NodeRef::Expression(expression) => match expression {
            Expression::Identifier(_) => visitor.visit_identifier(path),
            Expression::Import(_) => visitor.visit_import_expression(path),
            _ => visitor.visit_expression(path),
        },
        NodeRef::Pattern(_) => visitor.visit_pattern(path),
        _ => visitor.visit_node(path),
    }
}

/// Visits every child of the node on top of `path`.
pub fn children<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, path: &mut AstPath<'a>) -> Result<()> {
    let mut walker = Walker { visitor, path };
    match walker.path.get_value() {
        NodeRef::Program(program) => walker.statements(&program.body, "body"),
        NodeRef::Statement(statement) => walker.statement_children(statement),
        NodeRef::Block(block) => walker.statements(&block.body, "body"),
        NodeRef::CatchClause(clause) => {
            if let Some(param) = &clause.param {
                walker.pattern(param, "param")?;
            }
            walker.node(NodeRef::Block(&clause.body), "body")
        }
        NodeRef::Function(function) => {
            walker.patterns(&function.params, "params")?;
            walker.statements(&function.body.body, "body")
        }
        NodeRef::Class(class) => walker.class_children(class),
        NodeRef::Expression(expression) => walker.expression_children(expression),
        NodeRef::Property(property) => {
            walker.property_key(&property.key)?;
            walker.expression(&property.value, "value")
        }
        NodeRef::Pattern(pattern) => walker.pattern_children(pattern),
    }
}

struct Walker<'v, 'p, 'a, V: ?Sized> {
    visitor: &'v mut V,
    path: &'p mut AstPath<'a>,
}

impl<'a, V: Visitor<'a> + ?Sized> Walker<'_, '_, 'a, V> {
    fn node(&mut self, node: NodeRef<'a>, key: &'static str) -> Result<()> {
        self.path
            .call(&mut *self.visitor, node, key, <V as Visitor<'a>>::visit_without_reset)
    }

    fn statement(&mut self, statement: &'a Statement, key: &'static str) -> Result<()> {
        self.node(NodeRef::Statement(statement), key)
    }

    fn statements(&mut self, statements: &'a [Statement], key: &'static str) -> Result<()> {
        statements
            .iter()
            .try_for_each(|statement| self.statement(statement, key))
    }

    fn expression(&mut self, expression: &'a Expression, key: &'static str) -> Result<()> {
        self.node(NodeRef::Expression(expression), key)
    }

    fn expressions(&mut self, expressions: &'a [Expression], key: &'static str) -> Result<()> {
        expressions
            .iter()
            .try_for_each(|expression| self.expression(expression, key))
    }

    fn optional_expression(&mut self, expression: &'a Option<Expression>, key: &'static str) -> Result<()> {
        match expression {
            Some(expression) => self.expression(expression, key),
            None => Ok(()),
        }
    }

    fn pattern(&mut self, pattern: &'a Pattern, key: &'static str) -> Result<()> {
        self.node(NodeRef::Pattern(pattern), key)
    }

    fn patterns(&mut self, patterns: &'a [Pattern], key: &'static str) -> Result<()> {
        patterns
            .iter()
            .try_for_each(|pattern| self.pattern(pattern, key))
    }

    /// Only computed keys contain references.
    fn property_key(&mut self, key: &'a PropertyKey) -> Result<()> {
        match key {
            PropertyKey::Computed(expression) => self.expression(expression, "key"),
            _ => Ok(()),
        }
    }

    fn variable_declaration(&mut self, declaration: &'a VariableDeclaration) -> Result<()> {
        for declarator in &declaration.declarations {
            self.pattern(&declarator.id, "id")?;
            self.optional_expression(&declarator.init, "init")?;
        }
        Ok(())
    }

    fn for_in_left(&mut self, left: &'a ForInLeft) -> Result<()> {
        match left {
            ForInLeft::Declaration(declaration) => self.variable_declaration(declaration),
            ForInLeft::Pattern(pattern) => self.pattern(pattern, "left"),
        }
    }

    fn statement_children(&mut self, statement: &'a Statement) -> Result<()> {
        match statement {
            Statement::VariableDeclaration(declaration) => self.variable_declaration(declaration),
            Statement::FunctionDeclaration(function) => {
                self.node(NodeRef::Function(function), "function")
            }
            Statement::ClassDeclaration(class) => self.node(NodeRef::Class(class), "class"),
            Statement::Expression(statement) => {
                self.expression(&statement.expression, "expression")
            }
            Statement::Block(block) => self.statements(&block.body, "body"),
            Statement::If(statement) => {
                self.expression(&statement.test, "test")?;
                self.statement(&statement.consequent, "consequent")?;
                match &statement.alternate {
                    Some(alternate) => self.statement(alternate, "alternate"),
                    None => Ok(()),
                }
            }
            Statement::Switch(statement) => {
                self.expression(&statement.discriminant, "discriminant")?;
                for case in &statement.cases {
                    self.optional_expression(&case.test, "test")?;
                    self.statements(&case.consequent, "consequent")?;
                }
                Ok(())
            }
            Statement::While(statement) => {
                self.expression(&statement.test, "test")?;
                self.statement(&statement.body, "body")
            }
            Statement::DoWhile(statement) => {
                self.statement(&statement.body, "body")?;
                self.expression(&statement.test, "test")
            }
            Statement::For(statement) => {
                match &statement.init {
                    Some(ForInit::Declaration(declaration)) => {
                        self.variable_declaration(declaration)?
                    }
                    Some(ForInit::Expression(expression)) => self.expression(expression, "init")?,
                    None => {}
                }
                self.optional_expression(&statement.test, "test")?;
                self.optional_expression(&statement.update, "update")?;
                self.statement(&statement.body, "body")
            }
            Statement::ForIn(statement) => {
                self.for_in_left(&statement.left)?;
                self.expression(&statement.right, "right")?;
                self.statement(&statement.body, "body")
            }
            Statement::ForOf(statement) => {
                self.for_in_left(&statement.left)?;
                self.expression(&statement.right, "right")?;
                self.statement(&statement.body, "body")
            }
            Statement::Return(statement) => self.optional_expression(&statement.argument, "argument"),
            Statement::Throw(statement) => self.expression(&statement.argument, "argument"),
            Statement::Try(statement) => {
                self.node(NodeRef::Block(&statement.block), "block")?;
                if let Some(handler) = &statement.handler {
                    self.node(NodeRef::CatchClause(handler), "handler")?;
                }
                match &statement.finalizer {
                    Some(finalizer) => self.node(NodeRef::Block(finalizer), "finalizer"),
                    None => Ok(()),
                }
            }
            Statement::With(statement) => {
                self.expression(&statement.object, "object")?;
                self.statement(&statement.body, "body")
            }
            Statement::Labeled(statement) => self.statement(&statement.body, "body"),
            Statement::ExportNamed(export) => match &export.declaration {
                Some(declaration) => self.statement(declaration, "declaration"),
                None => Ok(()),
            },
            Statement::ExportDefault(export) => match &export.declaration {
                DefaultDeclaration::Function(function) => {
                    self.node(NodeRef::Function(function), "declaration")
                }
                DefaultDeclaration::Class(class) => self.node(NodeRef::Class(class), "declaration"),
                DefaultDeclaration::Expression(expression) => {
                    self.expression(expression, "declaration")
                }
            },
            Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Debugger(_)
            | Statement::Empty(_)
            | Statement::Import(_)
            | Statement::ExportAll(_) => Ok(()),
        }
    }

    fn class_children(&mut self, class: &'a Class) -> Result<()> {
        if let Some(super_class) = &class.super_class {
            self.expression(super_class, "superClass")?;
        }
        for member in &class.body {
            match member {
                ClassMember::Method(method) => {
                    self.property_key(&method.key)?;
                    self.node(NodeRef::Function(&method.value), "value")?;
                }
                ClassMember::Property(property) => {
                    self.property_key(&property.key)?;
                    self.optional_expression(&property.value, "value")?;
                }
                ClassMember::StaticBlock(block) => self.node(NodeRef::Block(block), "body")?,
            }
        }
        Ok(())
    }

    fn expression_children(&mut self, expression: &'a Expression) -> Result<()> {
        match expression {
            Expression::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.expression(element, "elements")?;
                }
                Ok(())
            }
            Expression::Object(object) => {
                for member in &object.properties {
                    match member {
                        ObjectMember::Property(property) => {
                            self.node(NodeRef::Property(property), "properties")?
                        }
                        ObjectMember::Spread(spread) => self.expression(&spread.argument, "argument")?,
                    }
                }
                Ok(())
            }
            Expression::Template(template) => self.expressions(&template.expressions, "expressions"),
            Expression::TaggedTemplate(tagged) => {
                self.expression(&tagged.tag, "tag")?;
                self.expressions(&tagged.quasi.expressions, "expressions")
            }
            Expression::Binary(binary) | Expression::Logical(binary) => {
                self.expression(&binary.left, "left")?;
                self.expression(&binary.right, "right")
            }
            Expression::Unary(unary) => self.expression(&unary.argument, "argument"),
            Expression::Assignment(assignment) => {
                self.pattern(&assignment.left, "left")?;
                self.expression(&assignment.right, "right")
            }
            Expression::Call(call) => {
                self.expression(&call.callee, "callee")?;
                self.expressions(&call.arguments, "arguments")
            }
            Expression::Member(member) => {
                self.expression(&member.object, "object")?;
                match &member.property {
                    MemberProperty::Expression(property) => self.expression(property, "property"),
                    MemberProperty::Identifier(_) | MemberProperty::Private(_) => Ok(()),
                }
            }
            Expression::Conditional(conditional) => {
                self.expression(&conditional.test, "test")?;
                self.expression(&conditional.consequent, "consequent")?;
                self.expression(&conditional.alternate, "alternate")
            }
            Expression::Function(function) => self.node(NodeRef::Function(function), "function"),
            Expression::Arrow(arrow) => {
                self.patterns(&arrow.params, "params")?;
                match &arrow.body {
                    ArrowBody::Expression(body) => self.expression(body, "body"),
                    ArrowBody::Block(block) => self.statements(&block.body, "body"),
                }
            }
            Expression::Class(class) => self.node(NodeRef::Class(class), "class"),
            Expression::New(new) => {
                self.expression(&new.callee, "callee")?;
                self.expressions(&new.arguments, "arguments")
            }
            // `a++` writes `a`; it is not a read
            Expression::Update(update) => match &*update.argument {
                Expression::Identifier(_) => Ok(()),
                argument => self.expression(argument, "argument"),
            },
            Expression::Sequence(sequence) => self.expressions(&sequence.expressions, "expressions"),
            Expression::Spread(spread) => self.expression(&spread.argument, "argument"),
            Expression::Yield(expression) => match &expression.argument {
                Some(argument) => self.expression(argument, "argument"),
                None => Ok(()),
            },
            Expression::Await(expression) => self.expression(&expression.argument, "argument"),
            Expression::Import(import) => self.expression(&import.source, "source"),
            Expression::Literal(_)
            | Expression::Identifier(_)
            | Expression::This(_)
            | Expression::Super(_)
            | Expression::MetaProperty(_) => Ok(()),
        }
    }

    fn pattern_children(&mut self, pattern: &'a Pattern) -> Result<()> {
        match pattern {
            Pattern::Identifier(_) => Ok(()),
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(property) => {
                            self.property_key(&property.key)?;
                            self.pattern(&property.value, "value")?;
                        }
                        ObjectPatternProperty::Rest(rest) => self.pattern(&rest.argument, "argument")?,
                    }
                }
                Ok(())
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.pattern(element, "elements")?;
                }
                Ok(())
            }
            Pattern::Assignment(assignment) => {
                self.pattern(&assignment.left, "left")?;
                self.expression(&assignment.right, "right")
            }
            Pattern::Rest(rest) => self.pattern(&rest.argument, "argument"),
            Pattern::Expression(expression) => self.expression(expression, "expression"),
        }
    }
}
