//! Offset-keyed edit buffer over the original source.
//!
//! Edits never move the original text: insertions attach to a byte offset
//! and overwrites replace a byte range. Rendering walks the original once
//! and splices the edits in, so every line terminator outside an
//! overwritten range stays where it was.
//!
//! Each offset has two sides. Text inserted on the *left* side belongs to
//! whatever precedes the offset, text on the *right* side to the character
//! at the offset. Left-side text is always rendered before right-side text.
//!
//! ```rust
//! use spacey_compiler::MagicString;
//!
//! let mut s = MagicString::new("let x = a;");
//! s.overwrite(8, 9, "f(a)").unwrap();
//! s.prepend_right(0, "/*1*/");
//! assert_eq!(s.to_string(), "/*1*/let x = f(a);");
//! ```

use crate::error::{CompileError, Result};
use spacey_syntax::lexer::is_line_terminator;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Default, Clone)]
struct Insertions {
    left: Vec<String>,
    right: Vec<String>,
}

#[derive(Debug, Clone)]
struct Overwrite {
    end: usize,
    content: String,
}

/// An edit overlay for one source text.
#[derive(Debug, Default, Clone)]
pub struct MagicString {
    original: String,
    insertions: BTreeMap<usize, Insertions>,
    overwrites: BTreeMap<usize, Overwrite>,
}

impl MagicString {
    /// Wraps `original` with an empty edit list.
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            insertions: BTreeMap::new(),
            overwrites: BTreeMap::new(),
        }
    }

    /// The unedited source.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// True once any edit has been recorded.
    pub fn has_changed(&self) -> bool {
        !self.insertions.is_empty() || !self.overwrites.is_empty()
    }

    /// Inserts on the left side of `offset`. Later calls land farther from
    /// the character at `offset`.
    pub fn prepend_left(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.insertions
            .entry(offset)
            .or_default()
            .left
            .insert(0, text.into());
        self
    }

    /// Inserts on the left side of `offset`, after earlier left-side text.
    pub fn append_left(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.insertions
            .entry(offset)
            .or_default()
            .left
            .push(text.into());
        self
    }

    /// Inserts on the right side of `offset`, before earlier right-side text.
    pub fn prepend_right(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.insertions
            .entry(offset)
            .or_default()
            .right
            .insert(0, text.into());
        self
    }

    /// Inserts on the right side of `offset`. Later calls land closer to
    /// the character at `offset`.
    pub fn append_right(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.insertions
            .entry(offset)
            .or_default()
            .right
            .push(text.into());
        self
    }

    /// Replaces `start..end` with `text`.
    ///
    /// Fails if the range is empty, out of bounds, not on character
    /// boundaries, or overlaps an earlier overwrite. Insertions at `start`
    /// and `end` survive; insertions strictly inside the range are dropped.
    pub fn overwrite(&mut self, start: usize, end: usize, text: impl Into<String>) -> Result<()> {
        let conflict = CompileError::EditConflict { start, end };

        if start >= end
            || end > self.original.len()
            || !self.original.is_char_boundary(start)
            || !self.original.is_char_boundary(end)
        {
            return Err(conflict);
        }

        if let Some((_, previous)) = self.overwrites.range(..end).next_back() {
            if previous.end > start {
                return Err(conflict);
            }
        }

        self.overwrites.insert(
            start,
            Overwrite {
                end,
                content: text.into(),
            },
        );
        Ok(())
    }

    /// Like [`overwrite`](Self::overwrite), but appends every line
    /// terminator found in the replaced range so the line count is
    /// unchanged.
    pub fn overwrite_preserving_lines(
        &mut self,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> Result<()> {
        let mut content = text.into();
        if let Some(replaced) = self.original.get(start..end) {
            content.push_str(&line_terminators(replaced));
        }
        self.overwrite(start, end, content)
    }

    fn render(&self, out: &mut String) {
        let mut cursor = 0;
        let mut overwrites = self.overwrites.iter().peekable();

        for (&offset, insertion) in &self.insertions {
            while let Some(&(&start, ref edit)) = overwrites.peek() {
                if start >= offset {
                    break;
                }
                out.push_str(&self.original[cursor..start]);
                out.push_str(&edit.content);
                cursor = edit.end;
                overwrites.next();
            }

            // Inside an overwritten range
            if offset < cursor || offset > self.original.len() {
                continue;
            }

            out.push_str(&self.original[cursor..offset]);
            cursor = offset;
            for text in insertion.left.iter().chain(&insertion.right) {
                out.push_str(text);
            }
        }

        for (&start, edit) in overwrites {
            out.push_str(&self.original[cursor..start]);
            out.push_str(&edit.content);
            cursor = edit.end;
        }

        out.push_str(&self.original[cursor..]);
    }
}

impl fmt::Display for MagicString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.original.len() + 64);
        self.render(&mut out);
        f.write_str(&out)
    }
}

/// The line terminators of `text`, in order, with `\r\n` kept as a pair.
pub fn line_terminators(text: &str) -> String {
    let mut terminators = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
            terminators.push_str("\r\n");
        } else if is_line_terminator(ch) {
            terminators.push(ch);
        }
    }

    terminators
}
