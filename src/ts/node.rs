//! Node accessors used by the navigation layer.
//!
//! These are thin, free-function views over [`tree_sitter::Node`] so they can
//! be passed around as [`StepFn`] values by the steppers and the movement
//! driver.

use tree_sitter::Node;

/// A single structural step from one node to a neighbour.
pub type StepFn = for<'t> fn(Node<'t>) -> Option<Node<'t>>;

/// Smallest node (anonymous tokens included) covering `offset`.
pub fn node_at(root: Node<'_>, offset: usize) -> Node<'_> {
    root.descendant_for_byte_range(offset, offset)
        .unwrap_or(root)
}

pub fn parent(node: Node<'_>) -> Option<Node<'_>> {
    node.parent()
}

pub fn prev_named_sibling(node: Node<'_>) -> Option<Node<'_>> {
    node.prev_named_sibling()
}

pub fn next_named_sibling(node: Node<'_>) -> Option<Node<'_>> {
    node.next_named_sibling()
}

/// The `index`-th named child, counting from zero.
pub fn nth_named_child(node: Node<'_>, index: usize) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let child = node.named_children(&mut cursor).nth(index);
    child
}
