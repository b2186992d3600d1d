use crate::ts::TreeSitterError;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: byte-span replacement with verification.
///
/// Every buffer mutation (structural delete, paste, reindent, blank-line
/// cleanup) compiles down to this single primitive and is applied through
/// [`Buffer::apply`](crate::buffer::Buffer::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until it is applied to a buffer"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (faster for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at byte {byte_start}")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in buffer of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("byte offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },

    #[error(transparent)]
    Syntax(#[from] TreeSitterError),
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for success/already-applied"]
pub enum EditResult {
    /// Edit was applied; the buffer revision moved forward
    Applied {
        byte_start: usize,
        bytes_removed: usize,
        bytes_inserted: usize,
    },
    /// Edit was already applied (current text matches new_text)
    AlreadyApplied,
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl AsRef<str>,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before.as_ref()),
        }
    }

    /// Pure insertion at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text, "")
    }

    /// Removal of `[byte_start, byte_end)`, verified against `removed`.
    pub fn delete(byte_start: usize, byte_end: usize, removed: impl AsRef<str>) -> Self {
        Self::new(byte_start, byte_end, "", removed)
    }

    /// Validate the edit against the current buffer contents.
    ///
    /// Returns the current text at [byte_start, byte_end) if validation succeeds.
    pub(crate) fn validate<'a>(&self, content: &'a str) -> Result<&'a str, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }

        for offset in [self.byte_start, self.byte_end] {
            if !content.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        let current_text = &content[self.byte_start..self.byte_end];

        // Check if already applied (idempotency)
        if current_text == self.new_text {
            return Ok(current_text);
        }

        if !self.expected_before.matches(current_text) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected: format!("{:?}", self.expected_before),
                found: current_text.to_string(),
            });
        }

        Ok(current_text)
    }

    /// Signed change in buffer length once applied.
    pub fn len_delta(&self) -> isize {
        self.new_text.len() as isize - (self.byte_end - self.byte_start) as isize
    }
}
