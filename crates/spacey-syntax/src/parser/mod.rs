//! Parser for JavaScript source code.
//!
//! Transforms the scanner's token stream into the span-carrying AST in
//! [`crate::ast`].
//!
//! ## Structure
//!
//! - `parser` - parser state, token helpers and backtracking
//! - `statements` - statements, functions and classes
//! - `expressions` - operators, literals, calls and templates
//! - `patterns` - binding patterns and assignment targets
//! - `modules` - `import` and `export` declarations
//!
//! ## Usage
//!
//! ```rust
//! use spacey_syntax::parser::Parser;
//!
//! let mut parser = Parser::new("import { a } from 'm';\nexport let b = a;");
//! let program = parser.parse_program().expect("Should parse");
//! assert!(program.has_module_syntax());
//! ```

mod expressions;
mod modules;
#[allow(clippy::module_inception)]
mod parser;
mod patterns;
mod statements;

pub use parser::Parser;
