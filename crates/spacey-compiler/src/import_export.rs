//! Rewrites `import`/`export` declarations and `import()` into runtime calls.
//!
//! Declarations are blanked in place (keeping their line terminators) and
//! the runtime calls that replace them are gathered into a prelude that is
//! inserted before the first non-directive statement:
//!
//! | Source | Prelude / in-place text |
//! |--------|-------------------------|
//! | `import a, {b as c} from "m"` | `let a,c;_.w("m",[["default",function(v){a=v}],["b",function(v){c=v}]]);` |
//! | `import * as ns from "m"` | `let ns;_.w("m",[["*",function(v){ns=v}]]);` |
//! | `import "m"` | `_.w("m");` |
//! | `export let a = 1` | `_.x([["a",function(){return a}]]);`, `let a = 1` left in place |
//! | `export default expr` | getter for `_default`, `const _default=expr` in place |
//! | `export {a as b} from "m"` | `_.r("m",[["a","b"]]);` |
//! | `export * as ns from "m"` | `_.r("m",[["*","ns"]]);` |
//! | `import(x)` | `_.i(x)` in place |

use crate::error::{CompileError, Result};
use crate::magic_string::MagicString;
use crate::visitor::{AstPath, NodeRef, Visitor, walk};
use rustc_hash::FxHashSet;
use serde::Serialize;
use spacey_syntax::ast::*;

/// One local binding introduced by an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    pub local: String,
    pub specifier: String,
    /// Exported name in the source module; `"*"` for a namespace
    pub imported: String,
}

/// Inputs for one traversal of [`ImportExportVisitor`].
#[derive(Debug, Default)]
pub struct ImportExportOptions {
    pub magic_string: MagicString,
    pub runtime_name: String,
    /// Module code; static declarations are rejected otherwise
    pub esm: bool,
    /// Declare generated bindings with `var`
    pub var: bool,
}

/// What a traversal produced.
#[derive(Debug, Default)]
pub struct ImportExportOutput {
    pub magic_string: MagicString,
    /// Local names bound by import declarations
    pub temporal_bindings: FxHashSet<String>,
    /// Import bindings in source order
    pub imports: Vec<ImportBinding>,
    pub changed: bool,
}

/// The import/export rewrite pass.
#[derive(Debug, Default)]
pub struct ImportExportVisitor {
    magic_string: MagicString,
    runtime_name: String,
    esm: bool,
    var: bool,
    changed: bool,
    /// `(exported, local)` pairs
    export_getters: Vec<(String, String)>,
    hoisted: Vec<String>,
    temporal_bindings: FxHashSet<String>,
    imports: Vec<ImportBinding>,
}

impl ImportExportVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands back the edited source and the collected bindings.
    pub fn finish(&mut self) -> ImportExportOutput {
        ImportExportOutput {
            magic_string: std::mem::take(&mut self.magic_string),
            temporal_bindings: std::mem::take(&mut self.temporal_bindings),
            imports: std::mem::take(&mut self.imports),
            changed: self.changed,
        }
    }

    fn require_esm(&self, offset: usize) -> Result<()> {
        if self.esm {
            Ok(())
        } else {
            Err(CompileError::ModuleSyntaxInScript { offset })
        }
    }

    fn default_name(&self) -> String {
        format!("{}default", self.runtime_name)
    }

    /// Removes `start..end`, leaving its line breaks behind.
    fn blank(&mut self, start: usize, end: usize) -> Result<()> {
        self.changed = true;
        self.magic_string.overwrite_preserving_lines(start, end, "")
    }

    fn prelude(&self) -> String {
        let mut prelude = String::new();

        if !self.export_getters.is_empty() {
            let getters: Vec<String> = self
                .export_getters
                .iter()
                .map(|(exported, local)| {
                    format!("[{},function(){{return {local}}}]", quote(exported))
                })
                .collect();
            prelude.push_str(&format!("{}.x([{}]);", self.runtime_name, getters.join(",")));
        }

        for code in &self.hoisted {
            prelude.push_str(code);
        }

        prelude
    }
}

impl<'a> Visitor<'a> for ImportExportVisitor {
    type Options = ImportExportOptions;

    fn reset(&mut self, options: ImportExportOptions) {
        self.magic_string = options.magic_string;
        self.runtime_name = options.runtime_name;
        self.esm = options.esm;
        self.var = options.var;
        self.changed = false;
        self.export_getters.clear();
        self.hoisted.clear();
        self.temporal_bindings.clear();
        self.imports.clear();
    }

    fn visit_node(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        walk::children(self, path)?;

        if let NodeRef::Program(program) = path.get_value() {
            let prelude = self.prelude();
            if let (false, Some(first)) = (prelude.is_empty(), program.first_non_directive()) {
                self.magic_string.prepend_right(first.span().start, prelude);
            }
        }
        Ok(())
    }

    fn visit_import_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::Import(import)) = path.get_value() else {
            return Ok(());
        };
        self.require_esm(import.span.start)?;

        let mut locals = Vec::with_capacity(import.specifiers.len());
        let mut setters = Vec::with_capacity(import.specifiers.len());

        for specifier in &import.specifiers {
            let local = &specifier.local().name;
            setters.push(format!(
                "[{},function(v){{{local}=v}}]",
                quote(specifier.imported_name())
            ));
            locals.push(local.as_str());
            self.temporal_bindings.insert(local.clone());
            self.imports.push(ImportBinding {
                local: local.clone(),
                specifier: import.source.value.clone(),
                imported: specifier.imported_name().to_string(),
            });
        }

        let mut code = String::new();
        if !locals.is_empty() {
            let keyword = if self.var { "var" } else { "let" };
            code.push_str(&format!("{keyword} {};", locals.join(",")));
        }

        let source = quote(&import.source.value);
        if setters.is_empty() {
            code.push_str(&format!("{}.w({source});", self.runtime_name));
        } else {
            code.push_str(&format!(
                "{}.w({source},[{}]);",
                self.runtime_name,
                setters.join(",")
            ));
        }

        self.hoisted.push(code);
        self.blank(import.span.start, import.span.end)
    }

    fn visit_export_named_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::ExportNamed(export)) = path.get_value() else {
            return Ok(());
        };
        self.require_esm(export.span.start)?;

        if let Some(declaration) = &export.declaration {
            for name in export.declared_names() {
                self.export_getters.push((name.clone(), name));
            }
            self.blank(export.span.start, declaration.span().start)?;
            return walk::children(self, path);
        }

        match &export.source {
            None => {
                for specifier in &export.specifiers {
                    self.export_getters
                        .push((specifier.exported.name.clone(), specifier.local.name.clone()));
                }
            }
            Some(source) => {
                let pairs: Vec<String> = export
                    .specifiers
                    .iter()
                    .map(|specifier| {
                        format!(
                            "[{},{}]",
                            quote(&specifier.local.name),
                            quote(&specifier.exported.name)
                        )
                    })
                    .collect();
                self.hoisted.push(format!(
                    "{}.r({},[{}]);",
                    self.runtime_name,
                    quote(&source.value),
                    pairs.join(",")
                ));
            }
        }

        self.blank(export.span.start, export.span.end)
    }

    fn visit_export_default_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::ExportDefault(export)) = path.get_value() else {
            return Ok(());
        };
        self.require_esm(export.span.start)?;

        let keyword_end = export.default_keyword.end;
        let local = match &export.declaration {
            DefaultDeclaration::Function(function) => {
                self.blank(export.span.start, keyword_end)?;
                match &function.id {
                    Some(id) => id.name.clone(),
                    None => {
                        let name = self.default_name();
                        self.magic_string
                            .prepend_right(function.params_span.start, format!(" {name}"));
                        name
                    }
                }
            }
            DefaultDeclaration::Class(Class { id: Some(id), .. }) => {
                self.blank(export.span.start, keyword_end)?;
                id.name.clone()
            }
            DefaultDeclaration::Class(_) | DefaultDeclaration::Expression(_) => {
                let name = self.default_name();
                let keyword = if self.var { "var" } else { "const" };
                self.changed = true;
                self.magic_string.overwrite_preserving_lines(
                    export.span.start,
                    keyword_end,
                    format!("{keyword} {name}="),
                )?;
                name
            }
        };

        self.export_getters.push(("default".to_string(), local));
        walk::children(self, path)
    }

    fn visit_export_all_declaration(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Statement(Statement::ExportAll(export)) = path.get_value() else {
            return Ok(());
        };
        self.require_esm(export.span.start)?;

        let exported = export
            .exported
            .as_ref()
            .map_or("*", |exported| exported.name.as_str());
        self.hoisted.push(format!(
            "{}.r({},[[\"*\",{}]]);",
            self.runtime_name,
            quote(&export.source.value),
            quote(exported)
        ));

        self.blank(export.span.start, export.span.end)
    }

    fn visit_import_expression(&mut self, path: &mut AstPath<'a>) -> Result<()> {
        let NodeRef::Expression(Expression::Import(import)) = path.get_value() else {
            return Ok(());
        };

        self.changed = true;
        self.magic_string.overwrite(
            import.keyword.start,
            import.keyword.end,
            format!("{}.i", self.runtime_name),
        )?;
        walk::children(self, path)
    }
}

/// A JSON string literal, which is also a valid JavaScript string literal.
pub(crate) fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(source: &str, esm: bool, var: bool) -> Result<(String, Vec<String>)> {
        let program = spacey_syntax::parse(source)?;
        let mut visitor = ImportExportVisitor::new();
        visitor.visit(
            &program,
            ImportExportOptions {
                magic_string: MagicString::new(source),
                runtime_name: "_".to_string(),
                esm,
                var,
            },
        )?;
        let output = visitor.finish();
        let mut bindings: Vec<String> = output.temporal_bindings.into_iter().collect();
        bindings.sort();
        Ok((output.magic_string.to_string(), bindings))
    }

    fn module(source: &str) -> String {
        rewrite(source, true, false).unwrap().0
    }

    #[test]
    fn test_import_forms() {
        let (code, bindings) =
            rewrite("import a, { b as c } from \"m\";\nc(a);", true, false).unwrap();
        assert_eq!(
            code,
            "let a,c;_.w(\"m\",[[\"default\",function(v){a=v}],[\"b\",function(v){c=v}]]);\nc(a);"
        );
        assert_eq!(bindings, vec!["a", "c"]);

        assert_eq!(
            module("import * as ns from 'm'"),
            "let ns;_.w(\"m\",[[\"*\",function(v){ns=v}]]);"
        );
        assert_eq!(module("import 'm'"), "_.w(\"m\");");
        assert_eq!(module("import {} from 'm'"), "_.w(\"m\");");
    }

    #[test]
    fn test_var_option() {
        let (code, _) = rewrite("import a from 'a'", true, true).unwrap();
        assert!(code.starts_with("var a;"));
        let (code, _) = rewrite("export default 1", true, true).unwrap();
        assert!(code.ends_with("var _default= 1"));
    }

    #[test]
    fn test_export_declarations() {
        assert_eq!(
            module("export const a = 1, { b } = o;"),
            "_.x([[\"a\",function(){return a}],[\"b\",function(){return b}]]);const a = 1, { b } = o;"
        );
        assert_eq!(
            module("export function f() {}\nexport class K {}"),
            "_.x([[\"f\",function(){return f}],[\"K\",function(){return K}]]);function f() {}\nclass K {}"
        );
    }

    #[test]
    fn test_export_default_forms() {
        assert_eq!(
            module("export default function () {}"),
            "_.x([[\"default\",function(){return _default}]]); function _default() {}"
        );
        assert_eq!(
            module("export default function named() {}"),
            "_.x([[\"default\",function(){return named}]]); function named() {}"
        );
        assert_eq!(
            module("export default (a, b);"),
            "_.x([[\"default\",function(){return _default}]]);const _default= (a, b);"
        );
        assert_eq!(
            module("export default class {}"),
            "_.x([[\"default\",function(){return _default}]]);const _default= class {}"
        );
    }

    #[test]
    fn test_export_specifiers_and_reexports() {
        assert_eq!(
            module("let a;\nexport { a as b };"),
            "_.x([[\"b\",function(){return a}]]);let a;\n"
        );
        assert_eq!(
            module("export { a, b as c } from 'm';\nexport * from 'n';\nexport * as ns from 'o';"),
            "_.r(\"m\",[[\"a\",\"a\"],[\"b\",\"c\"]]);_.r(\"n\",[[\"*\",\"*\"]]);_.r(\"o\",[[\"*\",\"ns\"]]);\n\n"
        );
    }

    #[test]
    fn test_prelude_follows_directives_and_shebang() {
        assert_eq!(
            module("#!/usr/bin/env node\n'use strict';\nimport a from 'a'"),
            "#!/usr/bin/env node\n'use strict';\nlet a;_.w(\"a\",[[\"default\",function(v){a=v}]]);"
        );
    }

    #[test]
    fn test_preserves_line_breaks() {
        let code = module("import {\r\n  a,\r\n  b\r\n} from 'm'\r\nexport\ndefault a");
        assert_eq!(code.matches("\r\n").count(), 4);
        assert!(code.ends_with("\r\nconst _default=\n a"));
    }

    #[test]
    fn test_dynamic_import() {
        assert_eq!(rewrite("import('a').then(f)", false, false).unwrap().0, "_.i('a').then(f)");
        assert_eq!(module("export default import(x)"), "_.x([[\"default\",function(){return _default}]]);const _default= _.i(x)");
    }

    #[test]
    fn test_module_syntax_in_script() {
        assert_eq!(
            rewrite("a;\nimport 'a'", false, false),
            Err(CompileError::ModuleSyntaxInScript { offset: 3 })
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
    }
}
