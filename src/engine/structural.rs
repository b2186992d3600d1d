//! Structural edits: multi-node delete, yank and paste.
//!
//! Ranges always run from the current node to the `count`-th sibling in the
//! direction of the operation, clamped at the end of the sibling list.
//! Every edit finishes by re-deriving the cursor from point.

use crate::buffer::Buffer;
use crate::clipboard::KillDirection;
use crate::edit::EditError;
use crate::engine::Engine;
use crate::nav::nth_sibling;
use crate::ts::{next_named_sibling, prev_named_sibling};
use serde::Serialize;
use std::ops::Range;

/// What a structural edit did. Offsets of `Deleted` refer to the text before
/// the edit; `Pasted` refers to the text after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[must_use = "EditOutcome reports whether anything happened"]
pub enum EditOutcome {
    Deleted { byte_start: usize, byte_end: usize },
    Yanked { byte_start: usize, byte_end: usize },
    Pasted { byte_start: usize, byte_end: usize },
    /// No current node, or nothing to paste
    Nothing,
}

impl EditOutcome {
    pub fn did_anything(&self) -> bool {
        !matches!(self, EditOutcome::Nothing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Before,
    After,
}

impl Engine {
    /// Delete the current node and up to `count - 1` following siblings.
    ///
    /// The sibling after the deleted range (if any) becomes current. Unless
    /// `keep_empty_lines` is set, a line left holding only whitespace is
    /// removed as well; that line does not enter the kill ring.
    pub fn delete_forward(
        &mut self,
        count: usize,
        keep_empty_lines: bool,
    ) -> Result<EditOutcome, EditError> {
        let Some(current) = self.current() else {
            return Ok(EditOutcome::Nothing);
        };
        let Some((range, follower)) = current.resolve(&self.buffer).map(|node| {
            let last = nth_sibling(node, next_named_sibling, count.max(1));
            let follower = last.next_named_sibling().map(|n| n.byte_range());
            (node.start_byte()..last.end_byte(), follower)
        }) else {
            return Ok(EditOutcome::Nothing);
        };

        let removed = self.buffer.delete_range(range.start, range.end)?;
        self.kill_ring.kill(&removed, KillDirection::Forward);
        tracing::debug!(start = range.start, end = range.end, "deleted forward");

        let mut tracked = follower
            .as_ref()
            .map(|next| next.start - (range.end - range.start));
        if !keep_empty_lines {
            tracked = self.remove_blank_line(range.start, tracked)?;
        }

        let point = tracked.unwrap_or_else(|| self.buffer.point().min(range.start));
        self.settle(point, follower.map(|next| next.len()));

        Ok(EditOutcome::Deleted {
            byte_start: range.start,
            byte_end: range.end,
        })
    }

    /// Delete the current node and up to `count - 1` preceding siblings.
    ///
    /// Always removes a line left blank by the deletion; forward deletion
    /// makes that optional, backward deletion never has.
    pub fn delete_backward(&mut self, count: usize) -> Result<EditOutcome, EditError> {
        let Some(current) = self.current() else {
            return Ok(EditOutcome::Nothing);
        };
        let Some((range, predecessor)) = current.resolve(&self.buffer).map(|node| {
            let first = nth_sibling(node, prev_named_sibling, count.max(1));
            let predecessor = first.prev_named_sibling().map(|n| n.byte_range());
            (first.start_byte()..node.end_byte(), predecessor)
        }) else {
            return Ok(EditOutcome::Nothing);
        };

        let removed = self.buffer.delete_range(range.start, range.end)?;
        self.kill_ring.kill(&removed, KillDirection::Backward);
        tracing::debug!(start = range.start, end = range.end, "deleted backward");

        let tracked = predecessor.as_ref().map(|prev| prev.start);
        let tracked = self.remove_blank_line(range.start, tracked)?;

        let point = tracked.unwrap_or_else(|| self.buffer.point().min(range.start));
        self.settle(point, predecessor.map(|prev| prev.len()));

        Ok(EditOutcome::Deleted {
            byte_start: range.start,
            byte_end: range.end,
        })
    }

    /// Copy the current node and up to `count - 1` following siblings into a
    /// new kill-ring entry.
    pub fn yank(&mut self, count: usize) -> EditOutcome {
        let Some(current) = self.current() else {
            return EditOutcome::Nothing;
        };
        let Some(range) = current.resolve(&self.buffer).map(|node| {
            let last = nth_sibling(node, next_named_sibling, count.max(1));
            node.start_byte()..last.end_byte()
        }) else {
            return EditOutcome::Nothing;
        };

        let Some(text) = self.buffer.slice(range.clone()) else {
            return EditOutcome::Nothing;
        };
        self.kill_ring.copy(text);
        tracing::debug!(start = range.start, end = range.end, "yanked");

        EditOutcome::Yanked {
            byte_start: range.start,
            byte_end: range.end,
        }
    }

    /// Insert `count` copies of the newest kill-ring entry next to the
    /// current node.
    ///
    /// Block-style nodes get newline-separated copies aligned with the node's
    /// line; inline nodes get space-separated copies. Point lands at the start
    /// of the pasted text.
    pub fn paste(&mut self, count: usize, placement: Placement) -> Result<EditOutcome, EditError> {
        let Some(text) = self.kill_ring.top().map(str::to_string) else {
            return Ok(EditOutcome::Nothing);
        };
        let Some(current) = self.current() else {
            return Ok(EditOutcome::Nothing);
        };
        if current.resolve(&self.buffer).is_none() {
            return Ok(EditOutcome::Nothing);
        }

        self.kill_ring.break_sequence();
        let (start, end) = (current.byte_start, current.byte_end);
        let copies = count.max(1);

        let pasted = if is_block(&self.buffer, start, end) {
            let indent = self.buffer.indentation_of(start).to_string();
            let eol = self.buffer.line_ending();
            let separator = format!("{eol}{indent}");
            let body = vec![reindent_snippet(&text, &indent); copies].join(separator.as_str());
            match placement {
                Placement::After => {
                    let _ = self.buffer.insert_text(end, &format!("{eol}{body}"))?;
                    let shift = self.buffer.reindent(end + eol.len(), &indent)?;
                    let content = (end as isize + eol.len() as isize + shift) as usize;
                    content..content + body.len()
                }
                Placement::Before => {
                    let inserted = format!("{body}{eol}");
                    let _ = self.buffer.insert_text(start, &inserted)?;
                    self.buffer.reindent(start + inserted.len(), &indent)?;
                    start..start + body.len()
                }
            }
        } else {
            let body = vec![text; copies].join(" ");
            match placement {
                Placement::After => {
                    let _ = self.buffer.insert_text(end, &format!(" {body}"))?;
                    end + 1..end + 1 + body.len()
                }
                Placement::Before => {
                    let _ = self.buffer.insert_text(start, &format!("{body} "))?;
                    start..start + body.len()
                }
            }
        };

        tracing::debug!(start = pasted.start, end = pasted.end, ?placement, copies, "pasted");
        self.settle(pasted.start, None);

        Ok(EditOutcome::Pasted {
            byte_start: pasted.start,
            byte_end: pasted.end,
        })
    }

    /// Remove the line at `at` if the last edit left it blank, shifting
    /// `tracked` past the removal.
    fn remove_blank_line(
        &mut self,
        at: usize,
        tracked: Option<usize>,
    ) -> Result<Option<usize>, EditError> {
        if self.buffer.is_empty() || !self.buffer.line_is_blank(at) {
            return Ok(tracked);
        }

        let removed = self.buffer.delete_whole_line(at)?;
        tracing::debug!(start = removed.start, end = removed.end, "removed blank line");
        Ok(tracked.map(|offset| shift_past(offset, &removed)))
    }
}

/// A node pastes as a block if it spans several lines, or exactly covers its
/// line from the first non-blank byte to the end of its content.
pub fn is_block(buffer: &Buffer, start: usize, end: usize) -> bool {
    let multi_line = buffer
        .slice(start..end)
        .is_some_and(|text| text.contains('\n'));
    let whole_line =
        start == buffer.first_non_blank_of(start) && end == buffer.line_content_end_of(start);
    multi_line || whole_line
}

/// Re-base the continuation lines of `text` onto `indent`, preserving their
/// indentation relative to each other. The first line is left alone.
fn reindent_snippet(text: &str, indent: &str) -> String {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    let base = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let mut out = first.to_string();
    for line in rest {
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(&line[base..]);
        }
    }
    out
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn shift_past(offset: usize, removed: &Range<usize>) -> usize {
    if offset >= removed.end {
        offset - removed.len()
    } else if offset > removed.start {
        removed.start
    } else {
        offset
    }
}
