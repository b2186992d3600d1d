//! Cursor state: the selected node and the highlighted region derived from it.
//!
//! The cursor never holds a [`tree_sitter::Node`] directly. It stores a
//! [`NodeRef`] stamped with the buffer revision it was taken at; once the
//! buffer changes, the reference stops resolving and the cursor has to be
//! re-derived from point.

use crate::buffer::Buffer;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use tree_sitter::Node;

/// Revision-stamped handle to a node of one particular tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub id: usize,
    pub byte_start: usize,
    pub byte_end: usize,
    pub kind: &'static str,
    pub revision: u64,
}

impl NodeRef {
    pub fn capture(node: Node<'_>, revision: u64) -> Self {
        Self {
            id: node.id(),
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            kind: node.kind(),
            revision,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    /// Find the referenced node in `buffer`'s current tree.
    ///
    /// Returns `None` if the buffer has been edited since the reference was
    /// taken.
    pub fn resolve<'b>(&self, buffer: &'b Buffer) -> Option<Node<'b>> {
        if self.revision != buffer.revision() {
            return None;
        }

        let mut node = buffer
            .root_node()
            .descendant_for_byte_range(self.byte_start, self.byte_end)?;
        loop {
            if node.id() == self.id {
                return Some(node);
            }
            let parent = node.parent()?;
            if parent.byte_range() != self.range() {
                return None;
            }
            node = parent;
        }
    }
}

/// Highlight contract rendered by the mode layer.
pub trait Highlighter {
    fn set_highlight(&mut self, start: usize, end: usize);
    fn clear_highlight(&mut self);
}

/// Highlighter for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn set_highlight(&mut self, _start: usize, _end: usize) {}
    fn clear_highlight(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightEvent {
    Set { start: usize, end: usize },
    Clear,
}

/// Records every highlight call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHighlighter {
    events: Rc<RefCell<Vec<HighlightEvent>>>,
}

impl RecordingHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HighlightEvent> {
        self.events.borrow().clone()
    }

    pub fn last(&self) -> Option<HighlightEvent> {
        self.events.borrow().last().copied()
    }
}

impl Highlighter for RecordingHighlighter {
    fn set_highlight(&mut self, start: usize, end: usize) {
        self.events
            .borrow_mut()
            .push(HighlightEvent::Set { start, end });
    }

    fn clear_highlight(&mut self) {
        self.events.borrow_mut().push(HighlightEvent::Clear);
    }
}

/// Per-buffer selected node plus its highlighted region.
///
/// Whenever `current` is set, `region` equals its byte range.
pub struct Cursor {
    current: Option<NodeRef>,
    region: Option<Range<usize>>,
    highlighter: Box<dyn Highlighter>,
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(Box::new(NoHighlight))
    }
}

impl Cursor {
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self {
            current: None,
            region: None,
            highlighter,
        }
    }

    pub fn current(&self) -> Option<&NodeRef> {
        self.current.as_ref()
    }

    /// Current node if it was taken at `revision`.
    pub fn current_at(&self, revision: u64) -> Option<&NodeRef> {
        self.current.as_ref().filter(|node| node.revision == revision)
    }

    pub fn region(&self) -> Option<Range<usize>> {
        self.region.clone()
    }

    /// Store `node` and replace the highlight with its range.
    pub fn set(&mut self, node: NodeRef) {
        let range = node.range();
        self.highlighter.set_highlight(range.start, range.end);
        self.region = Some(range);
        self.current = Some(node);
    }

    /// Forget the node and clear the highlight.
    pub fn invalidate(&mut self) {
        if self.current.is_some() || self.region.is_some() {
            self.highlighter.clear_highlight();
        }
        self.current = None;
        self.region = None;
    }
}
