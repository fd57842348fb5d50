//! Compile options.

use serde::{Deserialize, Serialize};

/// How a source unit should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Always module code
    Module,
    /// Always script code
    Script,
    /// Decide from directives, the hint, then syntax
    Unambiguous,
}

impl SourceType {
    /// Parses `module`, `script`, `unambiguous` and the `commonjs` alias
    /// used by `package.json`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "module" => Some(SourceType::Module),
            "script" | "commonjs" => Some(SourceType::Script),
            "unambiguous" => Some(SourceType::Unambiguous),
            _ => None,
        }
    }

    /// The lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Module => "module",
            SourceType::Script => "script",
            SourceType::Unambiguous => "unambiguous",
        }
    }
}

/// Options for [`crate::compile`].
///
/// Deserializes from the camelCase JSON used in `package.json`:
///
/// ```rust
/// use spacey_compiler::{CompileOptions, SourceType};
///
/// let options: CompileOptions =
///     serde_json::from_str(r#"{"type": "unambiguous", "hint": "module", "var": true}"#).unwrap();
/// assert_eq!(options.source_type, Some(SourceType::Unambiguous));
/// assert!(options.var);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Explicit source type; `None` behaves like `Unambiguous`
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    /// Fallback used when neither the type nor a directive decides
    pub hint: Option<SourceType>,
    /// Emit `var` instead of `let`/`const` for generated bindings
    pub var: bool,
    /// Overrides the module/script classification
    pub esm: Option<bool>,
    /// Identifier of the runtime object in generated code
    pub runtime_name: Option<String>,
    /// Emit a line-for-line source map
    pub source_map: bool,
    /// Recorded in the source map
    pub filename: Option<String>,
}

impl CompileOptions {
    /// Options with an explicit source type.
    pub fn with_type(source_type: SourceType) -> Self {
        Self {
            source_type: Some(source_type),
            ..Self::default()
        }
    }
}
