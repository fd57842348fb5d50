// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-syntax
//!
//! Lexer, parser and AST for ECMAScript source with module syntax.
//!
//! Every node carries a byte-offset [`lexer::Span`] into the original
//! source, so callers can rewrite the text in place without disturbing
//! anything they did not touch. A leading `#!` line is skipped and recorded
//! as [`ast::Program::shebang`].
//!
//! ## Quick Start
//!
//! ```rust
//! let program = spacey_syntax::parse("'use strict';\nexport const a = 1;").unwrap();
//! assert_eq!(program.directives().collect::<Vec<_>>(), vec!["use strict"]);
//! assert!(program.has_module_syntax());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod lexer;
pub mod parser;

use thiserror::Error;

/// A syntax error with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SyntaxError: {message} ({line}:{column})")]
pub struct ParseError {
    /// Human-readable description
    pub message: String,
    /// Byte offset into the source
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl ParseError {
    /// Creates an error at `offset`, computing line and column from `source`.
    pub fn new(message: impl Into<String>, offset: usize, source: &str) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);

        let mut line = 1;
        let mut line_start = 0;
        let mut chars = before.char_indices().peekable();
        while let Some((index, ch)) = chars.next() {
            if ch == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
                continue;
            }
            if lexer::is_line_terminator(ch) {
                line += 1;
                line_start = index + ch.len_utf8();
            }
        }
        let column = before[line_start..].chars().count() + 1;

        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

/// Result alias used throughout the parser.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses `source` into a [`ast::Program`].
pub fn parse(source: &str) -> Result<ast::Program> {
    parser::Parser::new(source).parse_program()
}
