//! Parent/child movement that looks through pass-through wrappers.
//!
//! A wrapper is a node whose only named child begins at the same byte as the
//! wrapper itself (an expression statement around a call, a document around
//! its single value). From the caller's point of view the wrapper and its
//! child are one level, so both directions skip over such chains.

use crate::nav::sibling::has_sibling;
use tree_sitter::Node;

/// First visible named child of `node`, or `None` if it has no named children.
///
/// Descends through single-child, same-start layers. A wrapper chain that
/// bottoms out in a leaf has no visible child, so it yields `None`.
pub fn descend_to_visible_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut parent = node;
    let mut child = parent.named_child(0)?;

    while !has_sibling(child) && child.start_byte() == parent.start_byte() {
        match child.named_child(0) {
            Some(grandchild) => {
                parent = child;
                child = grandchild;
            }
            None => return None,
        }
    }

    Some(child)
}

/// Nearest visible ancestor level of `node`.
///
/// Climbs until either an intermediate node that starts somewhere other than
/// its parent is reached, or a parent with siblings is found. At the root the
/// root itself is returned, which the movement driver treats as no progress.
pub fn ascend_to_visible_parent(node: Node<'_>) -> Node<'_> {
    let initial = node;
    let mut current = node;

    while let Some(parent) = current.parent() {
        if current.start_byte() != parent.start_byte() && current != initial {
            return current;
        }
        if has_sibling(parent) {
            return parent;
        }
        current = parent;
    }

    current
}

/// [`ascend_to_visible_parent`] shaped as a step function.
pub fn visible_parent(node: Node<'_>) -> Option<Node<'_>> {
    Some(ascend_to_visible_parent(node))
}
