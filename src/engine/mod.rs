//! The structural navigation and editing engine.
//!
//! An [`Engine`] owns one buffer together with its cursor and kill ring. Every
//! public operation starts from [`Engine::current`], which lazily resolves the
//! topmost node at point, and every buffer edit ends by re-deriving the cursor
//! from point, so no node outlives the tree snapshot it came from.

pub mod motion;
pub mod structural;

pub use structural::{EditOutcome, Placement};

use crate::buffer::Buffer;
use crate::clipboard::KillRing;
use crate::config::Config;
use crate::cursor::{Cursor, Highlighter, NoHighlight, NodeRef};
use crate::edit::{Edit, EditError, EditResult};
use crate::nav::topmost_node_at;
use crate::ts::TreeSitterError;
use std::ops::Range;
use tree_sitter::Node;

#[derive(Debug)]
pub struct Engine {
    buffer: Buffer,
    cursor: Cursor,
    kill_ring: KillRing,
    keep_empty_lines: bool,
}

impl Engine {
    /// Engine with default settings and no highlighting.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            kill_ring: KillRing::default(),
            keep_empty_lines: false,
        }
    }

    /// Parse `text` with the configured grammar and apply the settings.
    ///
    /// `highlighter` is only installed when highlighting is enabled.
    pub fn from_config(
        text: impl Into<String>,
        config: &Config,
        highlighter: Box<dyn Highlighter>,
    ) -> Result<Self, TreeSitterError> {
        let buffer = Buffer::with_language_name(text, &config.engine.language)?;
        if buffer.has_syntax_errors() {
            tracing::warn!(
                language = %config.engine.language,
                "buffer has syntax errors; node boundaries may not match the source"
            );
        }
        let highlighter: Box<dyn Highlighter> = if config.highlight.enabled {
            highlighter
        } else {
            Box::new(NoHighlight)
        };

        Ok(Self {
            buffer,
            cursor: Cursor::new(highlighter),
            kill_ring: KillRing::new(config.engine.kill_ring_capacity),
            keep_empty_lines: config.engine.keep_empty_lines,
        })
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.cursor = Cursor::new(highlighter);
        self
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn point(&self) -> usize {
        self.buffer.point()
    }

    /// Configured default for forward deletes.
    pub fn keep_empty_lines(&self) -> bool {
        self.keep_empty_lines
    }

    /// Move point; the cursor is re-derived from it on next use.
    pub fn set_point(&mut self, offset: usize) {
        self.buffer.set_point(offset);
        self.kill_ring.break_sequence();
        self.cursor.invalidate();
    }

    /// Current node, resolved from point if absent or stale.
    ///
    /// Resolution stores the node and refreshes the highlight but leaves
    /// point where it is. Returns `None` when nothing non-empty covers point.
    pub fn current(&mut self) -> Option<NodeRef> {
        let revision = self.buffer.revision();
        if let Some(node) = self.cursor.current_at(revision) {
            return Some(node.clone());
        }

        let node = topmost_node_at(self.buffer.root_node(), self.buffer.point());
        if node.byte_range().is_empty() {
            self.cursor.invalidate();
            return None;
        }

        let node_ref = NodeRef::capture(node, revision);
        tracing::debug!(
            kind = node_ref.kind,
            start = node_ref.byte_start,
            end = node_ref.byte_end,
            "cursor resolved from point"
        );
        self.cursor.set(node_ref.clone());
        Some(node_ref)
    }

    /// Forget the current node; called by the mode layer after edits made
    /// outside the engine.
    pub fn invalidate_cursor(&mut self) {
        self.cursor.invalidate();
    }

    /// Apply an edit coming from outside the engine and drop the cursor.
    pub fn apply_external_edit(&mut self, edit: &Edit) -> Result<EditResult, EditError> {
        let result = self.buffer.apply(edit)?;
        self.kill_ring.break_sequence();
        self.cursor.invalidate();
        Ok(result)
    }

    /// Select `node`: store it, move point to its start, refresh the highlight.
    fn set_current(&mut self, node: NodeRef) {
        self.buffer.set_point(node.byte_start);
        self.cursor.set(node);
    }

    /// Put point at `offset` and re-derive the cursor there.
    ///
    /// With `span`, a node starting at point and exactly `span` bytes long is
    /// preferred over the topmost node, which keeps a known follower selected
    /// even when it now shares its start with an ancestor.
    fn settle(&mut self, offset: usize, span: Option<usize>) {
        self.buffer.set_point(offset);
        let point = self.buffer.point();
        let revision = self.buffer.revision();

        let node_ref = {
            let root = self.buffer.root_node();
            let node = span
                .and_then(|len| node_spanning(root, point..point + len))
                .unwrap_or_else(|| topmost_node_at(root, point));
            (!node.byte_range().is_empty()).then(|| NodeRef::capture(node, revision))
        };

        match node_ref {
            Some(node_ref) => self.set_current(node_ref),
            None => self.cursor.invalidate(),
        }
    }
}

/// Outermost non-root node covering exactly `range`.
fn node_spanning(root: Node<'_>, range: Range<usize>) -> Option<Node<'_>> {
    let mut node = root.descendant_for_byte_range(range.start, range.end)?;
    if node.byte_range() != range {
        return None;
    }
    while let Some(parent) = node.parent() {
        if parent == root || parent.byte_range() != range {
            break;
        }
        node = parent;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{HighlightEvent, RecordingHighlighter};

    fn json(text: &str) -> Engine {
        Engine::new(Buffer::with_language_name(text, "json").unwrap())
    }

    #[test]
    fn current_resolves_lazily_without_moving_point() {
        let mut engine = Engine::new(
            Buffer::with_language_name("fn main() {\n    foo();\n}", "rust").unwrap(),
        );
        engine.set_point(17);

        let current = engine.current().unwrap();
        assert_eq!(current.kind, "expression_statement");
        assert_eq!(current.range(), 16..22);
        assert_eq!(engine.point(), 17);
        assert_eq!(engine.cursor().region(), Some(16..22));
    }

    #[test]
    fn empty_buffer_has_no_current() {
        let mut engine = json("");
        assert!(engine.current().is_none());
        assert!(engine.cursor().region().is_none());
    }

    #[test]
    fn external_edit_invalidates_cursor() {
        let recorder = RecordingHighlighter::new();
        let mut engine = json("[1, 2]").with_highlighter(Box::new(recorder.clone()));
        engine.set_point(4);
        engine.current().unwrap();

        engine.apply_external_edit(&Edit::insert(5, ", 3")).unwrap();
        assert!(engine.cursor().current().is_none());
        assert_eq!(recorder.last(), Some(HighlightEvent::Clear));

        let current = engine.current().unwrap();
        assert_eq!(current.range(), 4..5);
        assert_eq!(current.revision, engine.buffer().revision());
    }

    #[test]
    fn highlight_disabled_by_config() {
        let recorder = RecordingHighlighter::new();
        let mut config = Config::default();
        config.engine.language = "json".to_string();
        config.highlight.enabled = false;

        let mut engine = Engine::from_config("[1]", &config, Box::new(recorder.clone())).unwrap();
        engine.set_point(1);
        engine.current().unwrap();
        assert!(recorder.events().is_empty());
        assert_eq!(engine.cursor().region(), Some(1..2));
    }

    #[test]
    fn node_spanning_prefers_outermost_non_root() {
        let buffer = Buffer::with_language_name("[1]", "json").unwrap();
        let root = buffer.root_node();
        let node = node_spanning(root, 0..3).unwrap();
        assert_eq!(node.kind(), "array");
        assert!(node_spanning(root, 0..2).is_none());
    }
}
