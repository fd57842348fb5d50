// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-compiler
//!
//! Source-to-source compiler that lets `import`/`export` code run on a
//! loader that only knows mutable, object-based module definitions.
//!
//! ## Overview
//!
//! - Classifies a source unit as module or script
//! - Rewrites import/export declarations into runtime calls
//! - Guards reads of imported bindings against the temporal dead zone
//! - Edits text in place, so line numbers, comments, CRLF line endings and
//!   shebangs survive
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_compiler::{CompileOptions, compile};
//!
//! let options = CompileOptions {
//!     runtime_name: Some("_".to_string()),
//!     ..CompileOptions::default()
//! };
//! let output = compile("import a from \"a\";\nexport default a;", &options).unwrap();
//! assert!(output.esm);
//! assert_eq!(
//!     output.code,
//!     "_.x([[\"default\",function(){return _default}]]);\
//!      let a;_.w(\"a\",[[\"default\",function(v){a=v}]]);\n\
//!      const _default= _.a(\"a\",a);;_.j([\"default\"]);"
//! );
//! ```

#![warn(clippy::all)]

pub mod classify;
pub mod compiler;
pub mod error;
pub mod import_export;
pub mod magic_string;
pub mod options;
pub mod temporal;
pub mod visitor;

pub use classify::is_module;
pub use compiler::{CompileOutput, Compiler, line_break_count};
pub use error::{CompileError, Result};
pub use import_export::ImportBinding;
pub use magic_string::MagicString;
pub use options::{CompileOptions, SourceType};

/// Compiles `source` with a fresh [`Compiler`].
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput> {
    Compiler::new().compile(source, options)
}
