//! The embedder's side of loading: reading, resolving and running code.

use crate::error::{LoaderError, Result};
use crate::module::Module;
use crate::runtime::Runtime;
use spacey_compiler::CompileOutput;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions tried, in order, when a relative specifier has none.
pub const EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// Services the loader needs from its embedder.
///
/// `read_source` and `resolve` default to the file system; only
/// `execute` has to be provided.
pub trait Host: Send + Sync {
    /// Reads the source text of `filename`.
    fn read_source(&self, filename: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(filename)?)
    }

    /// Resolves `specifier` as written in `parent` to a filename.
    fn resolve(&self, specifier: &str, parent: &Path) -> Result<PathBuf> {
        resolve_relative(specifier, parent)
    }

    /// Runs compiled code in the scope of `module`.
    ///
    /// Generated runtime calls (`a`, `j`, `x`, `w`, `r`, `i`) are
    /// forwarded to `runtime`. Nested loads may happen before this returns.
    fn execute(&self, module: &Arc<Module>, output: &CompileOutput, runtime: &Runtime) -> Result<()>;
}

/// Resolves `./` and `../` specifiers against the directory of `parent`,
/// trying [`EXTENSIONS`] when the exact path does not exist.
pub fn resolve_relative(specifier: &str, parent: &Path) -> Result<PathBuf> {
    let not_found = || LoaderError::module_not_found(specifier, parent.display().to_string());

    if !(specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')) {
        return Err(not_found());
    }

    let base = parent.parent().unwrap_or(Path::new("."));
    let candidate = base.join(specifier);
    if candidate.is_file() {
        return Ok(candidate.canonicalize().unwrap_or(candidate));
    }

    for extension in EXTENSIONS {
        let mut with_extension = candidate.clone().into_os_string();
        with_extension.push(".");
        with_extension.push(extension);
        let with_extension = PathBuf::from(with_extension);
        if with_extension.is_file() {
            return Ok(with_extension.canonicalize().unwrap_or(with_extension));
        }
    }

    Err(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/util.mjs"), "").unwrap();
        fs::write(dir.path().join("main.js"), "").unwrap();
        let parent = dir.path().join("main.js");

        let resolved = resolve_relative("./lib/util", &parent).unwrap();
        assert_eq!(resolved, dir.path().join("lib/util.mjs").canonicalize().unwrap());

        let resolved = resolve_relative("../main.js", &dir.path().join("lib/util.mjs")).unwrap();
        assert_eq!(resolved, parent.canonicalize().unwrap());
    }

    #[test]
    fn test_bare_and_missing_specifiers() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("main.js");

        assert!(matches!(
            resolve_relative("lodash", &parent),
            Err(LoaderError::ModuleNotFound { .. })
        ));
        assert!(matches!(
            resolve_relative("./missing", &parent),
            Err(LoaderError::ModuleNotFound { .. })
        ));
    }
}
