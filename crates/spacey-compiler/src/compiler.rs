//! The compile pipeline: parse, classify, rewrite, instrument, render.

use crate::classify::is_module;
use crate::error::{CompileError, Result};
use crate::import_export::{ImportBinding, ImportExportOptions, ImportExportVisitor};
use crate::magic_string::MagicString;
use crate::options::CompileOptions;
use crate::temporal::{TemporalOptions, TemporalVisitor};
use crate::visitor::Visitor;
use regex::Regex;
use rustc_hash::{FxHashSet, FxHasher};
use serde::Serialize;
use spacey_syntax::lexer::is_line_terminator;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use tracing::{debug, trace};

/// An identifier-shaped run of characters.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{XID_Start}$_][\p{XID_Continue}$\x{200C}\x{200D}]*")
        .expect("identifier pattern is valid")
});

/// The result of compiling one source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    /// The rewritten source
    pub code: String,
    /// Whether the source was treated as a module
    pub esm: bool,
    /// Whether `code` differs from the input
    pub changed: bool,
    /// Identifier the generated code uses for the runtime object
    pub runtime_name: String,
    /// Sorted byte offsets of identifiers that may read an imported binding
    pub possible_indexes: Vec<usize>,
    /// Imported local names, sorted
    pub temporal_bindings: Vec<String>,
    /// Where each imported local comes from, in source order
    pub imports: Vec<ImportBinding>,
    /// Version 3 source map, when requested
    pub source_map: Option<String>,
}

/// A reusable compiler.
///
/// The visitors keep their allocations between calls, so compiling many
/// files with one `Compiler` is cheaper than calling [`compile`](crate::compile)
/// repeatedly.
#[derive(Debug, Default)]
pub struct Compiler {
    import_export: ImportExportVisitor,
    temporal: TemporalVisitor,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `source` according to `options`.
    pub fn compile(&mut self, source: &str, options: &CompileOptions) -> Result<CompileOutput> {
        let program = spacey_syntax::parse(source)?;
        let esm = options.esm.unwrap_or_else(|| is_module(&program, options));

        if !esm {
            if let Some(statement) = program.body.iter().find(|s| s.is_module_declaration()) {
                return Err(CompileError::ModuleSyntaxInScript {
                    offset: statement.span().start,
                });
            }
        }

        let runtime_name = options
            .runtime_name
            .clone()
            .unwrap_or_else(|| default_runtime_name(source));
        debug!(
            filename = options.filename.as_deref().unwrap_or("<anonymous>"),
            esm,
            runtime_name = %runtime_name,
            "compiling"
        );

        let mut magic_string = MagicString::new(source);
        let mut changed = false;
        let mut temporal_bindings = FxHashSet::default();
        let mut imports = Vec::new();

        if esm || source.contains("import") {
            self.import_export.visit(
                &program,
                ImportExportOptions {
                    magic_string,
                    runtime_name: runtime_name.clone(),
                    esm,
                    var: options.var,
                },
            )?;
            let output = self.import_export.finish();
            magic_string = output.magic_string;
            temporal_bindings = output.temporal_bindings;
            imports = output.imports;
            changed = output.changed;
        }

        let mut possible_indexes = Vec::new();
        if esm {
            possible_indexes = find_possible_indexes(source, &temporal_bindings);
            trace!(candidates = possible_indexes.len(), "instrumenting temporal bindings");

            self.temporal.visit(
                &program,
                TemporalOptions {
                    magic_string,
                    possible_indexes: possible_indexes.clone(),
                    runtime_name: runtime_name.clone(),
                    temporal_bindings: temporal_bindings.clone(),
                },
            )?;
            changed |= self.temporal.changed();
            magic_string = self.temporal.take_magic_string();
        }

        let code = magic_string.to_string();
        let source_map = options
            .source_map
            .then(|| identity_source_map(source, options.filename.as_deref()));

        let mut temporal_bindings: Vec<String> = temporal_bindings.into_iter().collect();
        temporal_bindings.sort_unstable();

        debug!(changed, bindings = temporal_bindings.len(), "compiled");

        Ok(CompileOutput {
            code,
            esm,
            changed,
            runtime_name,
            possible_indexes,
            temporal_bindings,
            imports,
            source_map,
        })
    }
}

/// `_` followed by three hex digits derived from the source, bumped until
/// the name does not occur in the source.
fn default_runtime_name(source: &str) -> String {
    let mut hasher = FxHasher::default();
    source.hash(&mut hasher);
    let mut seed = hasher.finish() & 0xfff;

    loop {
        let name = format!("_{seed:03x}");
        if !source.contains(&name) {
            return name;
        }
        seed = seed.wrapping_add(1);
    }
}

/// Start offsets of identifier-shaped words naming a temporal binding.
fn find_possible_indexes(source: &str, bindings: &FxHashSet<String>) -> Vec<usize> {
    if bindings.is_empty() {
        return Vec::new();
    }
    IDENTIFIER
        .find_iter(source)
        .filter(|found| bindings.contains(found.as_str()))
        .map(|found| found.start())
        .collect()
}

/// Number of line breaks in `text`, counting `\r\n` once.
pub fn line_break_count(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }
        if is_line_terminator(ch) {
            count += 1;
        }
    }
    count
}

/// Edits never move a line, so every generated line maps to the start of
/// the same original line.
fn identity_source_map(source: &str, filename: Option<&str>) -> String {
    let lines = line_break_count(source) + 1;
    let mut mappings = String::from("AAAA");
    for _ in 1..lines {
        mappings.push_str(";AACA");
    }

    serde_json::json!({
        "version": 3,
        "sources": [filename.unwrap_or("<anonymous>")],
        "names": [],
        "mappings": mappings,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_break_count() {
        assert_eq!(line_break_count(""), 0);
        assert_eq!(line_break_count("a\r\nb\nc\rd\u{2028}"), 4);
        assert_eq!(line_break_count("\r\r\n"), 2);
    }

    #[test]
    fn test_default_runtime_name_avoids_source_text() {
        let name = default_runtime_name("a");
        assert_eq!(name.len(), 4);
        assert!(name.starts_with('_'));
        assert_eq!(name, default_runtime_name("a"));

        let clash = format!("var {name};");
        assert!(!clash.contains(&default_runtime_name(&clash)));
    }

    #[test]
    fn test_possible_indexes() {
        let bindings: FxHashSet<String> = ["a".to_string(), "é".to_string()].into_iter().collect();
        assert_eq!(find_possible_indexes("ab + a.a + $a + é", &bindings), vec![5, 7, 16]);
        assert!(find_possible_indexes("a", &FxHashSet::default()).is_empty());
    }

    #[test]
    fn test_source_map() {
        let map: serde_json::Value =
            serde_json::from_str(&identity_source_map("a\r\nb\nc", Some("m.js"))).unwrap();
        assert_eq!(map["version"], 3);
        assert_eq!(map["sources"][0], "m.js");
        assert_eq!(map["mappings"], "AAAA;AACA;AACA");
    }

    #[test]
    fn test_compiler_is_reusable() {
        let mut compiler = Compiler::new();
        let options = CompileOptions {
            runtime_name: Some("_".to_string()),
            ..CompileOptions::default()
        };

        let first = compiler.compile("import a from 'a'; a;", &options).unwrap();
        assert_eq!(first.temporal_bindings, vec!["a"]);

        let second = compiler.compile("let b = 1;", &options).unwrap();
        assert!(!second.esm);
        assert!(!second.changed);
        assert!(second.temporal_bindings.is_empty());
        assert_eq!(second.code, "let b = 1;");
    }
}
