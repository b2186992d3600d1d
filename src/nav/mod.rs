//! Tree navigation primitives: topmost-node resolution, saturating sibling
//! walks, wrapper-transparent vertical steps, and the [`Move`] accumulator.

pub mod movement;
pub mod resolver;
pub mod sibling;
pub mod vertical;

pub use movement::Move;
pub use resolver::topmost_node_at;
pub use sibling::{has_sibling, nth_sibling};
pub use vertical::{ascend_to_visible_parent, descend_to_visible_child, visible_parent};
