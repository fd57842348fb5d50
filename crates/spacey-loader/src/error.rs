//! Error types for module loading

use spacey_compiler::CompileError;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while loading or running a module
#[derive(Debug, Error)]
pub enum LoaderError {
    /// `load` was called on a module that already finished loading
    #[error("Module already loaded: {0}")]
    AlreadyLoaded(String),

    /// An imported binding was read before the exporting module initialised it
    #[error("ReferenceError: Cannot access '{0}' before initialization")]
    TemporalAccess(String),

    /// The source failed to compile
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Module not found
    #[error("Cannot find module '{specifier}' imported from {parent}")]
    ModuleNotFound {
        /// The specifier as written
        specifier: String,
        /// The importing file
        parent: String,
    },

    /// The host failed while running compiled code
    #[error("{0}")]
    Execution(String),
}

impl LoaderError {
    /// Create an already-loaded error
    pub fn already_loaded(id: impl Into<String>) -> Self {
        Self::AlreadyLoaded(id.into())
    }

    /// Create a temporal dead zone error
    pub fn temporal_access(name: impl Into<String>) -> Self {
        Self::TemporalAccess(name.into())
    }

    /// Create a module not found error
    pub fn module_not_found(specifier: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            specifier: specifier.into(),
            parent: parent.into(),
        }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            LoaderError::already_loaded("/app/a.js").to_string(),
            "Module already loaded: /app/a.js"
        );
        assert_eq!(
            LoaderError::temporal_access("count").to_string(),
            "ReferenceError: Cannot access 'count' before initialization"
        );
        assert_eq!(
            LoaderError::module_not_found("./b", "/app/a.js").to_string(),
            "Cannot find module './b' imported from /app/a.js"
        );
    }

    #[test]
    fn test_compile_errors_convert() {
        let error: LoaderError = CompileError::ModuleSyntaxInScript { offset: 0 }.into();
        assert!(matches!(error, LoaderError::Compile(_)));
    }
}
