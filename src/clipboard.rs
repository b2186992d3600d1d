//! Kill ring: the clipboard shared by structural delete, yank and paste.
//!
//! Consecutive deletes coalesce into a single entry, the way an editor's kill
//! commands do. A yank always starts a fresh entry and ends the current kill
//! sequence, so a delete right after a yank never merges into it.

use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 60;

/// Which side of the previous kill a new kill lands on when coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillDirection {
    /// Text removed after point; appended to the newest entry
    Forward,
    /// Text removed before point; prepended to the newest entry
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastOp {
    Kill,
    Copy,
}

#[derive(Debug, Clone)]
pub struct KillRing {
    entries: VecDeque<String>,
    capacity: usize,
    last: Option<LastOp>,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl KillRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            last: None,
        }
    }

    /// Record deleted text, coalescing with an immediately preceding kill.
    pub fn kill(&mut self, text: &str, direction: KillDirection) {
        if self.last == Some(LastOp::Kill) {
            if let Some(top) = self.entries.front_mut() {
                match direction {
                    KillDirection::Forward => top.push_str(text),
                    KillDirection::Backward => top.insert_str(0, text),
                }
                tracing::trace!(len = top.len(), "kill coalesced");
                return;
            }
        }

        self.push(text.to_string());
        self.last = Some(LastOp::Kill);
    }

    /// Record copied text as a new, independent entry.
    pub fn copy(&mut self, text: &str) {
        self.push(text.to_string());
        self.last = Some(LastOp::Copy);
    }

    /// End the current kill sequence; the next kill starts a new entry.
    pub fn break_sequence(&mut self) {
        self.last = None;
    }

    /// Newest entry.
    pub fn top(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, text: String) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(text);
    }
}
