//! Instruments reads of imported bindings and joins exported ones.
//!
//! Every unshadowed reference to an imported name goes through the
//! runtime's TDZ guard, `<rt>.a("x",x)`, which throws while the binding is
//! still uninitialised. Exported declarations whose value only exists
//! after they run (`let`, `const`, `var`, classes, `export default expr`)
//! are followed by `<rt>.j([...])` so importers observe the new value.

use crate::error::Result;
use crate::import_export::quote;
use crate::magic_string::MagicString;
use crate::visitor::{AstPath, NodeRef, ShadowedMap, Visitor, is_shadowed, walk};
use rustc_hash::FxHashSet;
use spacey_syntax::ast::*;

/// Inputs for one traversal of [`TemporalVisitor`].
#[derive(Debug, Default)]
pub struct TemporalOptions {
    pub magic_string: MagicString,
    /// Sorted byte offsets where a binding name may be referenced
    pub possible_indexes: Vec<usize>,
    pub runtime_name: String,
    pub temporal_bindings: FxHashSet<String>,
}

/// The TDZ instrumentation pass.
#[derive(Debug, Default)]
pub struct TemporalVisitor {
    changed: bool,
    magic_string: MagicString,
    possible_indexes: Vec<usize>,
    runtime_name: String,
    temporal_bindings: FxHashSet<String>,
    shadowed_map: ShadowedMap,
}

impl TemporalVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Takes the edited source back out of the visitor.
    pub fn take_magic_string(&mut self) -> MagicString {
        std::mem::take(&mut self.magic_string)
    }

    /// Whether any candidate offset falls inside `span`.
    fn has_candidate(&self, span: Span) -> bool {
        let index = self.possible_indexes.partition_point(|&offset| offset < span.start);
        self.possible_indexes
            .get(index)
            .is_some_and(|&offset| offset < span.end)
    }

    fn walk_candidates(&mut self, path: &mut AstPath<'_>) -> Result<()> {
        if self.has_candidate(path.get_value().span()) {
            walk::children(self, path)
        } else {
            Ok(())
        }
    }

    fn guarded_read(&self, name: &str) -> String {
        format!("{}.a({},{name})", self.runtime_name, quote(name))
    }

    fn join(&mut self, offset: usize, names: &[String]) {
        if names.is_empty() {
            return;
        }
        let names: Vec<String> = names.iter().map(|name| quote(name)).collect();
        self.changed = true;
        self.magic_string.append_right(
            offset,
            format!(";{}.j([{}]);", self.runtime_name, names.join(",")),
        );
    }
}

/// Whether the current node heads the callee of a `new` expression,
/// directly or as the object of a member chain (`new a.b.c()`).
fn in_new_callee(path: &AstPath<'_>) -> bool {
    for (node, key) in path.ancestor_keys() {
        match (node, key) {
            (NodeRef::Expression(Expression::Member(_)), "object") => continue,
            (NodeRef::Expression(Expression::New(_)), "callee") => return true,
            _ => return false,
        }
    }
    false
}

impl<'a> Visitor<'a> for TemporalVisitor {
    type Options = TemporalOptions;

    fn reset(&mut self, options: TemporalOptions) {
        self.changed = false;
        self.magic_string = options.magic_string;
        self.possible_indexes = options.possible_indexes;
        self.runtime_name = options.runtime_name;
        self.temporal_bindings = options.temporal_bindings;
        self.shadowed_map.clear();
    }

    fn visit_node(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        match path.get_value() {
            NodeRef::Program(_) => walk::children(self, path),
            _ => self.walk_candidates(path),
        }
    }

    fn visit_statement(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        self.walk_candidates(path)
    }

    fn visit_expression(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        self.walk_candidates(path)
    }

    fn visit_pattern(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        self.walk_candidates(path)
    }

    fn visit_identifier(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Expression(Expression::Identifier(id)) = path.get_value() else {
            return Ok(());
        };
        if !self.temporal_bindings.contains(&id.name)
            || is_shadowed(path, &id.name, &mut self.shadowed_map)?
        {
            return Ok(());
        }

        let read = self.guarded_read(&id.name);
        match path.parent() {
            Some(NodeRef::Property(property)) if property.shorthand => {
                self.magic_string.prepend_left(id.span.end, format!(":{read}"));
            }
            _ if in_new_callee(path) => {
                self.magic_string
                    .overwrite(id.span.start, id.span.end, format!("({read})"))?;
            }
            _ => self.magic_string.overwrite(id.span.start, id.span.end, read)?,
        }

        self.changed = true;
        Ok(())
    }

    fn visit_import_declaration(&mut self, _path: &mut AstPath<'a>) -> Result<()> {
        Ok(())
    }

    fn visit_export_all_declaration(&mut self, _path: &mut AstPath<'a>) -> Result<()> {
        Ok(())
    }

    fn visit_export_default_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::ExportDefault(export)) = path.get_value() else {
            return Ok(());
        };

        let declaration = match &export.declaration {
            DefaultDeclaration::Function(function) => NodeRef::Function(function),
            DefaultDeclaration::Class(class) => {
                self.join(export.span.end, &["default".to_string()]);
                NodeRef::Class(class)
            }
            DefaultDeclaration::Expression(expression) => {
                self.join(export.span.end, &["default".to_string()]);
                NodeRef::Expression(expression)
            }
        };

        path.call(self, declaration, "declaration", Self::visit_without_reset)
    }

    fn visit_export_named_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::ExportNamed(export)) = path.get_value() else {
            return Ok(());
        };

        let mut initees: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !initees.iter().any(|seen| seen == name) {
                initees.push(name.to_string());
            }
        };

        match export.declaration.as_deref() {
            Some(declaration) => {
                match declaration {
                    Statement::ClassDeclaration(Class { id: Some(id), .. }) => push(&id.name),
                    Statement::VariableDeclaration(variables) => {
                        variables.bound_names().iter().for_each(|name| push(name))
                    }
                    _ => {}
                }
                self.join(declaration.span().end, &initees);
                path.call(
                    self,
                    NodeRef::Statement(declaration),
                    "declaration",
                    Self::visit_without_reset,
                )
            }
            None => {
                for specifier in &export.specifiers {
                    push(&specifier.exported.name);
                }
                self.join(export.span.end, &initees);
                Ok(())
            }
        }
    }
}
