use crate::ts::StepFn;
use tree_sitter::Node;

/// Walk `n` nodes along `step` (the start counts as the first), saturating at
/// the edge of the sibling list.
///
/// Never fails: when `step` runs out before `n` is exhausted, the last node
/// actually reached is returned.
pub fn nth_sibling<'t>(node: Node<'t>, step: StepFn, n: usize) -> Node<'t> {
    let mut current = node;
    for taken in 1..n {
        match step(current) {
            Some(next) => current = next,
            None => {
                tracing::trace!(requested = n, reached = taken, "sibling walk saturated");
                break;
            }
        }
    }
    current
}

/// True iff a previous or next named sibling exists.
pub fn has_sibling(node: Node<'_>) -> bool {
    node.prev_named_sibling().is_some() || node.next_named_sibling().is_some()
}
