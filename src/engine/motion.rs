use crate::cursor::NodeRef;
use crate::engine::Engine;
use crate::nav::{descend_to_visible_child, visible_parent, Move};
use crate::ts::{next_named_sibling, prev_named_sibling, StepFn};
use tree_sitter::Node;

impl Engine {
    /// Step from the current node up to `count` times.
    ///
    /// Stops early when `step` finds no neighbour or returns the node it was
    /// given. The cursor moves to the last node reached only if at least one
    /// step succeeded; the returned [`Move`] is the net displacement, and
    /// [`Move::NONE`] signals that nothing moved.
    pub fn move_with_count(&mut self, step: StepFn, unit: Move, count: usize) -> Move {
        self.kill_ring.break_sequence();
        let Some(start) = self.current() else {
            return Move::NONE;
        };
        let Some(mut node) = start.resolve(&self.buffer) else {
            return Move::NONE;
        };

        let mut total = Move::NONE;
        for _ in 0..count {
            match step(node) {
                Some(next) if next != node => {
                    total += unit;
                    node = next;
                }
                _ => break,
            }
        }

        if total.is_none() {
            tracing::debug!(requested = count, "no movement");
            return Move::NONE;
        }
        if total.magnitude() < count {
            tracing::debug!(requested = count, moved = %total, "movement saturated");
        }

        let target = NodeRef::capture(node, self.buffer.revision());
        self.set_current(target);
        total
    }

    pub fn move_prev_sibling(&mut self, count: usize) -> Move {
        self.move_with_count(prev_named_sibling, Move::PREV_SIBLING, count)
    }

    pub fn move_next_sibling(&mut self, count: usize) -> Move {
        self.move_with_count(next_named_sibling, Move::NEXT_SIBLING, count)
    }

    pub fn move_parent(&mut self, count: usize) -> Move {
        self.move_with_count(visible_parent, Move::PARENT, count)
    }

    pub fn move_child(&mut self, count: usize) -> Move {
        self.move_with_count(descend_to_visible_child, Move::CHILD, count)
    }

    /// Current node is the root of the tree.
    pub fn at_root(&mut self) -> bool {
        self.probe(|node| node.parent().is_none())
    }

    /// Current node is a top-level form (its parent is the root).
    pub fn at_tree_root(&mut self) -> bool {
        self.probe(|node| node.parent().is_some_and(|p| p.parent().is_none()))
    }

    /// No previous sibling to move to.
    pub fn at_first(&mut self) -> bool {
        self.probe(|node| prev_named_sibling(node).is_none())
    }

    /// No next sibling to move to.
    pub fn at_last(&mut self) -> bool {
        self.probe(|node| next_named_sibling(node).is_none())
    }

    /// First top-level form.
    pub fn at_initial(&mut self) -> bool {
        self.at_tree_root() && self.at_first()
    }

    /// Last top-level form.
    pub fn at_final(&mut self) -> bool {
        self.at_tree_root() && self.at_last()
    }

    /// Evaluate `check` on the current node without moving anything.
    fn probe(&mut self, check: impl FnOnce(Node<'_>) -> bool) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        current.resolve(&self.buffer).is_some_and(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn engine(lang: &str, text: &str, point: usize) -> Engine {
        let mut engine = Engine::new(Buffer::with_language_name(text, lang).unwrap());
        engine.set_point(point);
        engine
    }

    #[test]
    fn next_sibling_moves_point_and_highlight() {
        let mut engine = engine("json", "[1, 2, 3]", 1);
        assert_eq!(engine.move_next_sibling(1), Move::new(1, 0));
        assert_eq!(engine.point(), 4);
        assert_eq!(engine.cursor().region(), Some(4..5));
    }

    #[test]
    fn count_saturates() {
        let mut engine = engine("json", "[1, 2, 3]", 1);
        assert_eq!(engine.move_next_sibling(5), Move::new(2, 0));
        assert_eq!(engine.point(), 7);
    }

    #[test]
    fn failed_move_leaves_cursor_untouched() {
        let mut engine = engine("json", "[1, 2, 3]", 7);
        engine.current().unwrap();
        let before = engine.cursor().current().cloned();

        assert!(engine.move_next_sibling(1).is_none());
        assert_eq!(engine.cursor().current().cloned(), before);
        assert_eq!(engine.point(), 7);
    }

    #[test]
    fn parent_at_root_fails() {
        let mut engine = engine("json", "[1]", 0);
        assert!(engine.at_root());
        assert!(engine.move_parent(1).is_none());
    }

    #[test]
    fn zero_count_is_no_movement() {
        let mut engine = engine("json", "[1, 2]", 1);
        assert!(engine.move_next_sibling(0).is_none());
    }

    #[test]
    fn predicates_do_not_move() {
        let mut engine = engine(
            "rust",
            "fn a() {}\nfn b() {}\nfn c() {}",
            10,
        );

        assert!(engine.at_tree_root());
        assert!(!engine.at_root());
        assert!(!engine.at_first());
        assert!(!engine.at_last());
        assert!(!engine.at_initial());
        assert!(!engine.at_final());
        assert_eq!(engine.point(), 10);

        engine.move_prev_sibling(1);
        assert!(engine.at_initial());
        engine.move_next_sibling(2);
        assert!(engine.at_final());
    }

    #[test]
    fn nested_node_is_not_tree_root() {
        let mut engine = engine("json", r#"["a", ["b", "c"], "d"]"#, 6);
        assert!(!engine.at_tree_root());
        assert!(!engine.at_first());
        assert!(!engine.at_last());
    }
}
