//! Module/script classification.

use crate::options::{CompileOptions, SourceType};
use spacey_syntax::ast::Program;

/// Decides whether `program` is module code.
///
/// An explicit `type` wins. Otherwise a `"use module"` or `"use script"`
/// directive decides, then the `hint`, and finally the presence of
/// `import`/`export` declarations.
pub fn is_module(program: &Program, options: &CompileOptions) -> bool {
    match options.source_type {
        Some(SourceType::Module) => return true,
        Some(SourceType::Script) => return false,
        Some(SourceType::Unambiguous) | None => {}
    }

    for directive in program.directives() {
        match directive {
            "use module" => return true,
            "use script" => return false,
            _ => {}
        }
    }

    match options.hint {
        Some(SourceType::Module) => true,
        Some(SourceType::Script) => false,
        Some(SourceType::Unambiguous) | None => program.has_module_syntax(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: &str, source_type: Option<SourceType>, hint: Option<SourceType>) -> bool {
        let program = spacey_syntax::parse(source).unwrap();
        let options = CompileOptions {
            source_type,
            hint,
            ..CompileOptions::default()
        };
        is_module(&program, &options)
    }

    #[test]
    fn test_explicit_type_wins() {
        assert!(classify("'use script'; 1 + 2", Some(SourceType::Module), None));
        assert!(!classify("import 'a'", Some(SourceType::Script), Some(SourceType::Module)));
    }

    #[test]
    fn test_directives_beat_hint() {
        let unambiguous = Some(SourceType::Unambiguous);
        assert!(classify("\"use module\";1+2", unambiguous, None));
        assert!(classify("'use module';1+2", unambiguous, Some(SourceType::Module)));
        assert!(!classify("\"use script\";1+2", unambiguous, None));
        assert!(!classify("'use script';1+2", unambiguous, Some(SourceType::Module)));
    }

    #[test]
    fn test_hint_then_syntax() {
        assert!(classify("1+2", None, Some(SourceType::Module)));
        assert!(!classify("1+2", None, None));
        assert!(classify("import 'a'", None, None));
        assert!(!classify("import('a')", None, None));
    }

    #[test]
    fn test_directive_after_statement_is_ignored() {
        assert!(!classify("foo();\n'use module'", None, None));
    }

    #[test]
    fn test_shebang_does_not_hide_directive() {
        assert!(classify("#!/usr/bin/env node\n'use module'\n1", None, None));
    }
}
