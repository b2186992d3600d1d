//! In-memory host buffer: text, point, and the syntax tree kept in sync with
//! every edit.
//!
//! All mutation funnels through [`Buffer::apply`], which verifies the
//! [`Edit`], splices the text, tells tree-sitter about the edit and reparses
//! incrementally. Each applied edit bumps the buffer revision;
//! [`NodeRef`](crate::cursor::NodeRef)s taken at an older revision no longer
//! resolve.

use crate::edit::{Edit, EditError, EditResult};
use crate::ts::{language_from_name, SyntaxTree, TreeSitterError};
use ast_grep_language::SupportLang;
use std::fmt;
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;
use tree_sitter::{InputEdit, Node, Point};

pub struct Buffer {
    text: String,
    syntax: SyntaxTree,
    point: usize,
    revision: u64,
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("language", &self.syntax.language())
            .field("len", &self.text.len())
            .field("point", &self.point)
            .field("revision", &self.revision)
            .finish()
    }
}

impl Buffer {
    /// Parse `text` with `language` and place point at the start.
    pub fn new(text: impl Into<String>, language: SupportLang) -> Result<Self, TreeSitterError> {
        let text = text.into();
        let syntax = SyntaxTree::parse(language, &text)?;
        Ok(Self {
            text,
            syntax,
            point: 0,
            revision: 0,
        })
    }

    /// Same as [`Buffer::new`], looking the grammar up by name.
    pub fn with_language_name(
        text: impl Into<String>,
        language: &str,
    ) -> Result<Self, TreeSitterError> {
        Self::new(text, language_from_name(language)?)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn language(&self) -> SupportLang {
        self.syntax.language()
    }

    /// Monotonic counter bumped by every applied edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_syntax_errors(&self) -> bool {
        self.syntax.has_errors()
    }

    pub fn point(&self) -> usize {
        self.point
    }

    /// Move point, clamping to the buffer and to a character boundary.
    pub fn set_point(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.point = offset;
    }

    pub fn root_node(&self) -> Node<'_> {
        self.syntax.root_node()
    }

    /// Source text spanned by a node of the current snapshot.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        self.text.get(node.byte_range()).unwrap_or_default()
    }

    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    /// Apply a single verified edit and reparse.
    pub fn apply(&mut self, edit: &Edit) -> Result<EditResult, EditError> {
        let already_applied = edit.validate(&self.text)? == edit.new_text;
        if already_applied {
            return Ok(EditResult::AlreadyApplied);
        }

        self.splice(edit);
        self.syntax.reparse(&self.text)?;
        self.revision += 1;

        tracing::trace!(
            byte_start = edit.byte_start,
            byte_end = edit.byte_end,
            inserted = edit.new_text.len(),
            revision = self.revision,
            "edit applied"
        );

        Ok(EditResult::Applied {
            byte_start: edit.byte_start,
            bytes_removed: edit.byte_end - edit.byte_start,
            bytes_inserted: edit.new_text.len(),
        })
    }

    pub fn insert_text(&mut self, offset: usize, text: &str) -> Result<EditResult, EditError> {
        self.apply(&Edit::insert(offset, text))
    }

    /// Remove `[start, end)` and return the removed text.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<String, EditError> {
        let removed = self
            .text
            .get(start..end)
            .ok_or(EditError::InvalidByteRange {
                byte_start: start,
                byte_end: end,
                len: self.text.len(),
            })?
            .to_string();
        let _ = self.apply(&Edit::delete(start, end, &removed))?;
        Ok(removed)
    }

    /// Offset of the first byte of the line containing `offset`.
    pub fn line_start_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text[..offset].rfind('\n').map_or(0, |i| i + 1)
    }

    /// Offset of the line terminator of the line containing `offset`, or the
    /// buffer length on the last line.
    pub fn line_end_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i)
    }

    /// Offset just past the last content byte of the line containing
    /// `offset`: the line end, less a `\r` in front of the terminator.
    pub fn line_content_end_of(&self, offset: usize) -> usize {
        let end = self.line_end_of(offset);
        if self.text[..end].ends_with('\r') {
            end - 1
        } else {
            end
        }
    }

    /// Line terminator used by the text: `"\r\n"` if any line ends that way.
    pub fn line_ending(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indentation_of(&self, offset: usize) -> &str {
        let start = self.line_start_of(offset);
        let line = &self.text[start..self.line_end_of(offset)];
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..indent_len]
    }

    /// Offset of the first non-whitespace byte on the line of `offset`.
    pub fn first_non_blank_of(&self, offset: usize) -> usize {
        self.line_start_of(offset) + self.indentation_of(offset).len()
    }

    pub fn line_is_blank(&self, offset: usize) -> bool {
        let start = self.line_start_of(offset);
        self.text[start..self.line_end_of(offset)].trim().is_empty()
    }

    /// Remove the line containing `offset` together with its terminator.
    ///
    /// On the last line (no terminator) the preceding terminator is removed
    /// instead. Returns the removed byte range.
    pub fn delete_whole_line(&mut self, offset: usize) -> Result<Range<usize>, EditError> {
        let start = self.line_start_of(offset);
        let end = self.line_end_of(offset);

        let range = if end < self.text.len() {
            start..end + 1
        } else if start > 0 {
            start - 1..end
        } else {
            start..end
        };

        self.delete_range(range.start, range.end)?;
        Ok(range)
    }

    /// Replace the leading whitespace of the line containing `offset` with
    /// `indent`. Returns the change in buffer length.
    pub fn reindent(&mut self, offset: usize, indent: &str) -> Result<isize, EditError> {
        let start = self.line_start_of(offset);
        let current = self.indentation_of(offset).to_string();
        if current == indent {
            return Ok(0);
        }

        let edit = Edit::new(start, start + current.len(), indent, &current);
        let delta = edit.len_delta();
        let _ = self.apply(&edit)?;
        Ok(delta)
    }

    /// Write the text to `path` atomically: a temp file in the same directory
    /// is synced and then renamed over the target.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            Some(_) => Path::new("."),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path has no parent directory",
                ))
            }
        };

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(self.text.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        tracing::debug!(path = %path.display(), bytes = self.text.len(), "buffer saved");
        Ok(())
    }

    /// Splice text, record the edit on the tree, and move point along.
    /// Caller reparses.
    fn splice(&mut self, edit: &Edit) {
        let start_position = position_of(&self.text, edit.byte_start);
        let old_end_position = position_of(&self.text, edit.byte_end);
        let new_end_position = advance(start_position, &edit.new_text);

        self.text
            .replace_range(edit.byte_start..edit.byte_end, &edit.new_text);
        self.syntax.edit(&InputEdit {
            start_byte: edit.byte_start,
            old_end_byte: edit.byte_end,
            new_end_byte: edit.byte_start + edit.new_text.len(),
            start_position,
            old_end_position,
            new_end_position,
        });

        if self.point >= edit.byte_end {
            self.point = (self.point as isize + edit.len_delta()) as usize;
        } else if self.point > edit.byte_start {
            self.point = edit.byte_start;
        }
    }
}

fn position_of(text: &str, offset: usize) -> Point {
    let before = &text[..offset];
    let row = before.matches('\n').count();
    let column = before.rfind('\n').map_or(offset, |i| offset - i - 1);
    Point::new(row, column)
}

fn advance(start: Point, inserted: &str) -> Point {
    match inserted.rfind('\n') {
        None => Point::new(start.row, start.column + inserted.len()),
        Some(last) => Point::new(
            start.row + inserted.matches('\n').count(),
            inserted.len() - last - 1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rust(text: &str) -> Buffer {
        Buffer::with_language_name(text, "rust").unwrap()
    }

    #[test]
    fn line_queries() {
        let buffer = rust("fn a() {}\n    \nfn b() {}");
        assert_eq!(buffer.line_start_of(12), 10);
        assert_eq!(buffer.line_end_of(12), 14);
        assert!(buffer.line_is_blank(11));
        assert!(!buffer.line_is_blank(3));
        assert_eq!(buffer.line_end_of(17), buffer.len());
    }

    #[test]
    fn crlf_line_content_stops_before_carriage_return() {
        let buffer = rust("fn a() {\r\n    x();\r\n}");
        assert_eq!(buffer.line_end_of(14), 19);
        assert_eq!(buffer.line_content_end_of(14), 18);
        assert_eq!(buffer.line_ending(), "\r\n");

        let unix = rust("fn a() {\n    x();\n}");
        assert_eq!(unix.line_content_end_of(13), unix.line_end_of(13));
        assert_eq!(unix.line_ending(), "\n");
    }

    #[test]
    fn indentation_and_first_non_blank() {
        let buffer = rust("fn a() {\n    x();\n}");
        assert_eq!(buffer.indentation_of(15), "    ");
        assert_eq!(buffer.first_non_blank_of(15), 13);
    }

    #[test]
    fn apply_reparses_and_bumps_revision() {
        let mut buffer = rust("fn a() {}");
        let before = buffer.revision();

        let result = buffer.insert_text(9, "\nfn b() {}").unwrap();
        assert!(matches!(result, EditResult::Applied { .. }));
        assert_eq!(buffer.text(), "fn a() {}\nfn b() {}");
        assert_eq!(buffer.revision(), before + 1);
        assert_eq!(buffer.root_node().named_child_count(), 2);
    }

    #[test]
    fn apply_idempotent_edit_does_not_bump_revision() {
        let mut buffer = rust("fn a() {}");
        let result = buffer.apply(&Edit::new(3, 4, "a", "a")).unwrap();
        assert_eq!(result, EditResult::AlreadyApplied);
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn point_follows_edits() {
        let mut buffer = rust("fn a() {}\nfn b() {}");
        buffer.set_point(13);
        buffer.delete_range(0, 10).unwrap();
        assert_eq!(buffer.point(), 3);

        buffer.set_point(5);
        buffer.delete_range(3, 8).unwrap();
        assert_eq!(buffer.point(), 3);
    }

    #[test]
    fn set_point_clamps() {
        let mut buffer = Buffer::with_language_name("\"é\"", "json").unwrap();
        buffer.set_point(2);
        assert_eq!(buffer.point(), 1);
        buffer.set_point(99);
        assert_eq!(buffer.point(), buffer.len());
    }

    #[test]
    fn delete_whole_line_takes_terminator() {
        let mut buffer = rust("fn a() {}\n   \nfn b() {}");
        let removed = buffer.delete_whole_line(11).unwrap();
        assert_eq!(removed, 10..14);
        assert_eq!(buffer.text(), "fn a() {}\nfn b() {}");
    }

    #[test]
    fn delete_whole_last_line_takes_previous_terminator() {
        let mut buffer = rust("fn a() {}\n   ");
        let removed = buffer.delete_whole_line(11).unwrap();
        assert_eq!(removed, 9..13);
        assert_eq!(buffer.text(), "fn a() {}");
    }

    #[test]
    fn reindent_replaces_leading_whitespace() {
        let mut buffer = rust("fn a() {\nx();\n}");
        let delta = buffer.reindent(10, "    ").unwrap();
        assert_eq!(delta, 4);
        assert_eq!(buffer.text(), "fn a() {\n    x();\n}");
        assert_eq!(buffer.reindent(10, "    ").unwrap(), 0);
    }

    #[test]
    fn save_replaces_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        std::fs::write(&path, "old").unwrap();

        let mut buffer = rust("fn a() {}");
        buffer.insert_text(9, "\n").unwrap();
        buffer.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fn a() {}\n");
    }

    #[test]
    fn positions_for_multiline_insert() {
        assert_eq!(advance(Point::new(2, 4), "ab"), Point::new(2, 6));
        assert_eq!(advance(Point::new(2, 4), "ab\ncd\nefg"), Point::new(4, 3));
        assert_eq!(position_of("ab\ncd", 4), Point::new(1, 1));
    }
}
