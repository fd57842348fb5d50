//! Loader configuration read from `package.json`.
//!
//! ```json
//! {
//!   "type": "module",
//!   "esm": { "hint": "module", "var": true, "cleanupOnFailure": false }
//! }
//! ```

use crate::error::Result;
use serde::Deserialize;
use spacey_compiler::{CompileOptions, SourceType};
use std::path::Path;
use tracing::debug;

/// Settings shared by every load of one [`Loader`](crate::Loader).
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Base options for every compile; `filename` is filled in per load
    pub options: CompileOptions,
    /// Unregister a module whose load failed
    pub cleanup_on_failure: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            options: CompileOptions::default(),
            cleanup_on_failure: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(rename = "type")]
    type_field: Option<String>,
    esm: Option<EsmSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EsmSection {
    #[serde(flatten)]
    options: CompileOptions,
    cleanup_on_failure: Option<bool>,
}

impl LoaderConfig {
    /// Parses the contents of a `package.json`.
    ///
    /// `"type": "module"` makes every file a module. Any other value keeps
    /// unambiguous detection, so CommonJS packages may still opt in per
    /// file. An `"esm"` object overrides individual options.
    pub fn from_package_json(content: &str) -> Result<Self> {
        let package: PackageJson = serde_json::from_str(content)?;
        let mut config = Self::default();

        if package.type_field.as_deref() == Some("module") {
            config.options.source_type = Some(SourceType::Module);
        }

        if let Some(EsmSection {
            options,
            cleanup_on_failure,
        }) = package.esm
        {
            config.options = CompileOptions {
                source_type: options.source_type.or(config.options.source_type),
                ..options
            };
            if let Some(cleanup) = cleanup_on_failure {
                config.cleanup_on_failure = cleanup;
            }
        }

        Ok(config)
    }

    /// Reads the nearest `package.json` above `path`, or the defaults when
    /// there is none.
    pub fn find(path: &Path) -> Result<Self> {
        let mut current = path.parent();

        while let Some(dir) = current {
            let package = dir.join("package.json");
            if package.is_file() {
                debug!(package = %package.display(), "using package configuration");
                let content = std::fs::read_to_string(&package)?;
                return Self::from_package_json(&content);
            }
            current = dir.parent();
        }

        Ok(Self::default())
    }

    /// Compile options for `filename`. `.mjs` files are always modules and
    /// `.cjs` files always scripts unless a type was configured.
    pub fn compile_options(&self, filename: &Path) -> CompileOptions {
        let mut options = self.options.clone();
        options.filename = Some(filename.display().to_string());

        if options.source_type.is_none() {
            options.source_type = match filename.extension().and_then(|e| e.to_str()) {
                Some("mjs") => Some(SourceType::Module),
                Some("cjs") => Some(SourceType::Script),
                _ => None,
            };
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_package_type() {
        let config = LoaderConfig::from_package_json(r#"{"name":"a","type":"module"}"#).unwrap();
        assert_eq!(config.options.source_type, Some(SourceType::Module));
        assert!(config.cleanup_on_failure);

        let config = LoaderConfig::from_package_json(r#"{"type":"commonjs"}"#).unwrap();
        assert_eq!(config.options.source_type, None);
    }

    #[test]
    fn test_esm_section() {
        let config = LoaderConfig::from_package_json(
            r#"{
                "type": "module",
                "esm": { "hint": "script", "var": true, "cleanupOnFailure": false }
            }"#,
        )
        .unwrap();

        assert_eq!(config.options.source_type, Some(SourceType::Module));
        assert_eq!(config.options.hint, Some(SourceType::Script));
        assert!(config.options.var);
        assert!(!config.cleanup_on_failure);

        let config =
            LoaderConfig::from_package_json(r#"{"type":"module","esm":{"type":"unambiguous"}}"#)
                .unwrap();
        assert_eq!(config.options.source_type, Some(SourceType::Unambiguous));
    }

    #[test]
    fn test_invalid_package_json() {
        assert!(matches!(
            LoaderConfig::from_package_json("{"),
            Err(crate::LoaderError::Json(_))
        ));
    }

    #[test]
    fn test_find_walks_parent_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"type":"module"}"#).unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();

        let config = LoaderConfig::find(&dir.path().join("src/nested/main.js")).unwrap();
        assert_eq!(config.options.source_type, Some(SourceType::Module));
    }

    #[test]
    fn test_find_without_package_json() {
        let dir = TempDir::new().unwrap();
        let config = LoaderConfig::find(&dir.path().join("main.js")).unwrap();
        // A package.json above the temp directory would be picked up
        if !dir.path().ancestors().skip(1).any(|p| p.join("package.json").is_file()) {
            assert_eq!(config, LoaderConfig::default());
        }
    }

    #[test]
    fn test_compile_options_by_extension() {
        let config = LoaderConfig::default();
        let options = config.compile_options(Path::new("/app/a.mjs"));
        assert_eq!(options.source_type, Some(SourceType::Module));
        assert_eq!(options.filename.as_deref(), Some("/app/a.mjs"));

        assert_eq!(
            config.compile_options(Path::new("/app/a.cjs")).source_type,
            Some(SourceType::Script)
        );
        assert_eq!(config.compile_options(Path::new("/app/a.js")).source_type, None);
    }
}
