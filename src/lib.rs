//! treenav: structural navigation and editing over tree-sitter syntax trees
//!
//! Point-based movement between syntax nodes (siblings, visible parent,
//! visible child) plus node-wise delete, yank and paste, for any grammar
//! shipped with `ast-grep-language`.
//!
//! # Architecture
//!
//! All text changes compile down to a single primitive: [`Edit`], a verified
//! byte-span replacement applied by [`Buffer`], which reparses incrementally
//! and bumps its revision. The [`Engine`] never holds a tree node across an
//! edit; it keeps a [`NodeRef`] stamped with the revision it was taken at and
//! re-derives the current node from point whenever that stamp is stale.
//!
//! # Example
//!
//! ```
//! use treenav::{Buffer, Engine, Move};
//!
//! let buffer = Buffer::with_language_name(r#"["a", ["b", "c"], "d"]"#, "json").unwrap();
//! let mut engine = Engine::new(buffer);
//! engine.set_point(1);
//!
//! assert_eq!(engine.move_next_sibling(2), Move::new(2, 0));
//! assert_eq!(engine.point(), 18);
//! ```

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod cursor;
pub mod edit;
pub mod engine;
pub mod mode;
pub mod nav;
pub mod ts;

// Re-exports
pub use buffer::Buffer;
pub use clipboard::{KillDirection, KillRing};
pub use command::{Command, CommandOutcome, CommandParseError, Predicate};
pub use config::{load_from_path, load_from_str, Config, ConfigError};
pub use cursor::{Cursor, HighlightEvent, Highlighter, NoHighlight, NodeRef, RecordingHighlighter};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use engine::{EditOutcome, Engine, Placement};
pub use mode::{Frontend, Mode, ModeEvent, ModeMachine};
pub use nav::Move;
pub use ts::{language_from_name, supported_languages, SyntaxTree, TreeSitterError};
