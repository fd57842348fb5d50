use super::{AstPath, NodeId, NodeRef};
use crate::error::{CompileError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use spacey_syntax::ast::*;

/// Per-traversal cache of the names each scope node declares.
///
/// Functions are cached twice: as seen from their parameter list, and as
/// seen from their body.
#[derive(Debug, Default)]
pub struct ShadowedMap {
    scopes: FxHashMap<(NodeId, bool), Option<FxHashSet<String>>>,
}

impl ShadowedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every cached scope. Node ids are addresses, so the cache
    /// must not outlive the AST it was built from.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    fn declares(&mut self, node: NodeRef<'_>, in_params: bool, name: &str) -> bool {
        self.scopes
            .entry((node.id(), in_params))
            .or_insert_with(|| scope_names(node, in_params))
            .as_ref()
            .is_some_and(|names| names.contains(name))
    }
}

/// True when a scope between the current node and the program declares
/// `name`, so the reference does not resolve to the module-level binding.
///
/// Returns [`CompileError::ShadowResolution`] when the path does not end
/// at a program node.
pub fn is_shadowed(path: &AstPath<'_>, name: &str, map: &mut ShadowedMap) -> Result<bool> {
    for (node, key) in path.ancestor_keys() {
        if let NodeRef::Program(_) = node {
            return Ok(false);
        }
        // The discriminant is outside the scope of the cases
        if key == "discriminant" {
            continue;
        }
        if map.declares(node, key == "params", name) {
            return Ok(true);
        }
    }
    Err(CompileError::ShadowResolution(name.to_string()))
}

/// Names declared by `node` if it introduces a scope. Parameter defaults
/// see a function's name and parameters but not its body declarations.
fn scope_names(node: NodeRef<'_>, in_params: bool) -> Option<FxHashSet<String>> {
    let mut names = Vec::new();

    match node {
        NodeRef::Function(function) => {
            if let Some(id) = &function.id {
                names.push(id.name.clone());
            }
            for param in &function.params {
                param.collect_bound_names(&mut names);
            }
            if !in_params {
                collect_var_names(&function.body.body, &mut names);
                collect_lexical_names(&function.body.body, &mut names);
            }
        }
        NodeRef::Expression(Expression::Arrow(arrow)) => {
            for param in &arrow.params {
                param.collect_bound_names(&mut names);
            }
            if let (false, ArrowBody::Block(block)) = (in_params, &arrow.body) {
                collect_var_names(&block.body, &mut names);
                collect_lexical_names(&block.body, &mut names);
            }
        }
        NodeRef::Class(class) => names.extend(class.id.iter().map(|id| id.name.clone())),
        NodeRef::Block(block) | NodeRef::Statement(Statement::Block(block)) => {
            collect_lexical_names(&block.body, &mut names);
        }
        NodeRef::Statement(Statement::Switch(switch)) => {
            for case in &switch.cases {
                collect_lexical_names(&case.consequent, &mut names);
            }
        }
        NodeRef::Statement(Statement::For(ForStatement {
            init: Some(ForInit::Declaration(declaration)),
            ..
        }))
        | NodeRef::Statement(Statement::ForIn(ForInStatement {
            left: ForInLeft::Declaration(declaration),
            ..
        }))
        | NodeRef::Statement(Statement::ForOf(ForOfStatement {
            left: ForInLeft::Declaration(declaration),
            ..
        })) => names.extend(declaration.bound_names()),
        NodeRef::CatchClause(clause) => {
            if let Some(param) = &clause.param {
                param.collect_bound_names(&mut names);
            }
        }
        _ => return None,
    }

    Some(names.into_iter().collect())
}

/// `let`, `const`, class and function declarations directly in `body`.
fn collect_lexical_names(body: &[Statement], names: &mut Vec<String>) {
    for statement in body {
        match statement {
            Statement::VariableDeclaration(declaration)
                if declaration.kind != VariableKind::Var =>
            {
                names.extend(declaration.bound_names());
            }
            Statement::FunctionDeclaration(Function { id: Some(id), .. })
            | Statement::ClassDeclaration(Class { id: Some(id), .. }) => {
                names.push(id.name.clone());
            }
            _ => {}
        }
    }
}

/// `var` declarations hoisted out of nested statements, stopping at
/// function boundaries.
fn collect_var_names(body: &[Statement], names: &mut Vec<String>) {
    for statement in body {
        collect_statement_var_names(statement, names);
    }
}

fn collect_statement_var_names(statement: &Statement, names: &mut Vec<String>) {
    let var_names = |declaration: &VariableDeclaration, names: &mut Vec<String>| {
        if declaration.kind == VariableKind::Var {
            names.extend(declaration.bound_names());
        }
    };

    match statement {
        Statement::VariableDeclaration(declaration) => var_names(declaration, names),
        Statement::FunctionDeclaration(Function { id: Some(id), .. }) => {
            names.push(id.name.clone())
        }
        Statement::Block(block) => collect_var_names(&block.body, names),
        Statement::If(statement) => {
            collect_statement_var_names(&statement.consequent, names);
            if let Some(alternate) = &statement.alternate {
                collect_statement_var_names(alternate, names);
            }
        }
        Statement::For(statement) => {
            if let Some(ForInit::Declaration(declaration)) = &statement.init {
                var_names(declaration, names);
            }
            collect_statement_var_names(&statement.body, names);
        }
        Statement::ForIn(ForInStatement { left, body, .. })
        | Statement::ForOf(ForOfStatement { left, body, .. }) => {
            if let ForInLeft::Declaration(declaration) = left {
                var_names(declaration, names);
            }
            collect_statement_var_names(body, names);
        }
        Statement::While(WhileStatement { body, .. })
        | Statement::DoWhile(DoWhileStatement { body, .. })
        | Statement::With(WithStatement { body, .. })
        | Statement::Labeled(LabeledStatement { body, .. }) => {
            collect_statement_var_names(body, names)
        }
        Statement::Try(statement) => {
            collect_var_names(&statement.block.body, names);
            if let Some(handler) = &statement.handler {
                collect_var_names(&handler.body.body, names);
            }
            if let Some(finalizer) = &statement.finalizer {
                collect_var_names(&finalizer.body, names);
            }
        }
        Statement::Switch(statement) => {
            for case in &statement.cases {
                collect_var_names(&case.consequent, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::Visitor;

    /// Records whether each reference to `a` is shadowed.
    #[derive(Default)]
    struct ShadowRecorder {
        map: ShadowedMap,
        results: Vec<bool>,
    }

    impl<'a> Visitor<'a> for ShadowRecorder {
        type Options = ();

        fn reset(&mut self, _options: ()) {
            self.map.clear();
            self.results.clear();
        }

        fn visit_identifier(&mut self, path: &mut AstPath<'a>) -> Result<()> {
            if let NodeRef::Expression(Expression::Identifier(id)) = path.get_value() {
                if id.name == "a" {
                    let shadowed = is_shadowed(path, "a", &mut self.map)?;
                    self.results.push(shadowed);
                }
            }
            Ok(())
        }
    }

    fn shadowing(source: &str) -> Vec<bool> {
        let program = spacey_syntax::parse(source).unwrap();
        let mut visitor = ShadowRecorder::default();
        visitor.visit(&program, ()).unwrap();
        visitor.results
    }

    #[test]
    fn test_module_level_reference() {
        assert_eq!(shadowing("import a from 'm'; a; { a }"), vec![false, false]);
    }

    #[test]
    fn test_function_scopes() {
        assert_eq!(shadowing("function f(a) { a } function g() { a }"), vec![true, false]);
        assert_eq!(shadowing("function f() { if (x) { var a } a }"), vec![true]);
        assert_eq!(shadowing("(function a() { a })"), vec![true]);
        assert_eq!(shadowing("({ a }) => a; (b = a) => b"), vec![true, false]);
        assert_eq!(shadowing("x => { let a; a }"), vec![true]);
    }

    #[test]
    fn test_block_scopes() {
        assert_eq!(shadowing("{ let a; a } a"), vec![true, false]);
        assert_eq!(shadowing("for (const a of b) a; a"), vec![true, false]);
        assert_eq!(shadowing("try {} catch ([a]) { a } finally { a }"), vec![true, false]);
        assert_eq!(shadowing("switch (x) { case 1: let a; default: a }"), vec![true]);
        assert_eq!(shadowing("switch (a) { case a: let a }"), vec![false, true]);
        assert_eq!(shadowing("(class a { m() { a } })"), vec![true]);
    }

    #[test]
    fn test_parameter_defaults_do_not_see_the_body() {
        assert_eq!(shadowing("function f(x = a) { let a }"), vec![false]);
        assert_eq!(shadowing("function f(x = a) { var a; a }"), vec![false, true]);
        assert_eq!(shadowing("function f(a, x = a) {}"), vec![true]);
        assert_eq!(shadowing("function a(x = a) {}"), vec![true]);
        assert_eq!(shadowing("(x = a) => { const a = 1 }"), vec![false]);
        assert_eq!(shadowing("(a, x = () => a) => {}"), vec![true]);
    }

    #[test]
    fn test_nested_function_var_does_not_leak() {
        assert_eq!(shadowing("function f() { function g() { var a } a }"), vec![false]);
    }

    #[test]
    fn test_path_without_program_ancestor_is_an_error() {
        let program = spacey_syntax::parse("a").unwrap();
        let path = AstPath::new(&program);
        let mut map = ShadowedMap::new();
        assert_eq!(
            is_shadowed(&path, "a", &mut map),
            Err(CompileError::ShadowResolution("a".to_string()))
        );
    }
}
