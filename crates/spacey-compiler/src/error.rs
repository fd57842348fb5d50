//! Compiler errors.

use spacey_syntax::ParseError;
use thiserror::Error;

/// Errors produced while compiling a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The parser rejected the source
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `import`/`export` declarations in code classified as script
    #[error("SyntaxError: Cannot use import or export outside a module (offset {offset})")]
    ModuleSyntaxInScript { offset: usize },

    /// Two edits touched the same bytes, or an edit was out of range
    #[error("Cannot edit source range {start}..{end}: it overlaps a previous edit or is out of bounds")]
    EditConflict { start: usize, end: usize },

    /// Scope resolution walked off the path without reaching the program
    #[error("Internal compiler error: could not resolve the scope of `{0}`")]
    ShadowResolution(String),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
