//! Reusable AST traversal with path context.
//!
//! A [`Visitor`] receives an [`AstPath`] whose top frame is the node being
//! visited. Every handler defaults to [`walk::children`], so an
//! implementation only overrides the node kinds it cares about and calls
//! back into the walker (or [`AstPath::call`]) to keep descending.
//!
//! ```rust
//! use spacey_compiler::visitor::{AstPath, NodeRef, Visitor};
//! use spacey_compiler::Result;
//! use spacey_syntax::ast::Expression;
//!
//! #[derive(Default)]
//! struct CountIdentifiers(usize);
//!
//! impl<'a> Visitor<'a> for CountIdentifiers {
//!     type Options = ();
//!
//!     fn reset(&mut self, _options: ()) {
//!         self.0 = 0;
//!     }
//!
//!     fn visit_identifier(&mut self, path: &mut AstPath<'a>) -> Result<()> {
//!         if let NodeRef::Expression(Expression::Identifier(_)) = path.get_value() {
//!             self.0 += 1;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let program = spacey_syntax::parse("let a = b + c(d);").unwrap();
//! let mut visitor = CountIdentifiers::default();
//! visitor.visit(&program, ()).unwrap();
//! assert_eq!(visitor.0, 3);
//! ```

mod path;
mod shadow;
pub mod walk;

pub use path::AstPath;
pub use shadow::{ShadowedMap, is_shadowed};

use crate::error::Result;
use spacey_syntax::ast::*;
use spacey_syntax::lexer::Span;

/// A borrowed reference to any node the walker pushes onto the path.
///
/// The set is closed: dispatch is a `match` over this enum rather than a
/// lookup by node-type name.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    /// A block that is not itself a statement: `try`/`catch`/`finally`
    /// bodies and class static blocks
    Block(&'a BlockStatement),
    CatchClause(&'a CatchClause),
    Function(&'a Function),
    Class(&'a Class),
    Expression(&'a Expression),
    /// Object literal property
    Property(&'a Property),
    Pattern(&'a Pattern),
}

impl<'a> NodeRef<'a> {
    /// The node's source span.
    pub fn span(&self) -> Span {
        match self {
            NodeRef::Program(program) => program.span,
            NodeRef::Statement(statement) => statement.span(),
            NodeRef::Block(block) => block.span,
            NodeRef::CatchClause(clause) => clause.span,
            NodeRef::Function(function) => function.span,
            NodeRef::Class(class) => class.span,
            NodeRef::Expression(expression) => expression.span(),
            NodeRef::Property(property) => property.span,
            NodeRef::Pattern(pattern) => pattern.span(),
        }
    }

    /// Identity of the referenced node, stable for the life of the AST.
    pub fn id(&self) -> NodeId {
        let (address, kind) = match self {
            NodeRef::Program(node) => (*node as *const Program as usize, 0),
            NodeRef::Statement(node) => (*node as *const Statement as usize, 1),
            NodeRef::Block(node) => (*node as *const BlockStatement as usize, 2),
            NodeRef::CatchClause(node) => (*node as *const CatchClause as usize, 3),
            NodeRef::Function(node) => (*node as *const Function as usize, 4),
            NodeRef::Class(node) => (*node as *const Class as usize, 5),
            NodeRef::Expression(node) => (*node as *const Expression as usize, 6),
            NodeRef::Property(node) => (*node as *const Property as usize, 7),
            NodeRef::Pattern(node) => (*node as *const Pattern as usize, 8),
        };
        NodeId { address, kind }
    }
}

/// Address-based node identity used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    address: usize,
    kind: u8,
}

/// A traversal over one [`Program`].
///
/// `reset` reinitialises per-traversal state so a single visitor can be
/// reused across many compiles.
pub trait Visitor<'a> {
    /// Per-traversal inputs handed to [`reset`](Self::reset).
    type Options;

    /// Reinitialises per-traversal state.
    fn reset(&mut self, options: Self::Options);

    /// Resets and walks `program`.
    fn visit(&mut self, program: &'a Program, options: Self::Options) -> Result<()> {
        self.reset(options);
        let mut path = AstPath::new(program);
        self.visit_without_reset(&mut path)
    }

    /// Dispatches the node on top of `path` to its handler.
    fn visit_without_reset(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::dispatch(self, path)
    }

    /// Program, blocks, catch clauses, functions, classes and properties.
    fn visit_node(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_statement(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_expression(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_pattern(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    /// An identifier in expression position.
    fn visit_identifier(&mut self, _path: &mut AstPath<'a>) -> Result<()> {
        Ok(())
    }

    fn visit_import_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_export_named_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_export_default_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    fn visit_export_all_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }

    /// `import(specifier)`.
    fn visit_import_expression(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)
    }
}
