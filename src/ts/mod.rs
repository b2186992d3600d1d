//! Tree-sitter integration: grammar loading, incremental parsing, and the
//! node accessors the navigation engine consumes.
//!
//! The tree itself is treated as a read-only oracle. Every [`tree_sitter::Node`]
//! borrows the [`SyntaxTree`] snapshot that produced it, so a node can never
//! be carried across a reparse.

pub mod errors;
pub mod node;
pub mod parser;

pub use errors::TreeSitterError;
pub use node::{
    next_named_sibling, node_at, nth_named_child, parent, prev_named_sibling, StepFn,
};
pub use parser::{language_from_name, supported_languages, SyntaxTree};
