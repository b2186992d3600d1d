use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Net displacement achieved by a movement: sibling steps and depth steps.
///
/// Moves add component-wise and [`Move::NONE`] is the identity, so a
/// movement reports failure simply by accumulating nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub horizontal: isize,
    pub vertical: isize,
}

impl Move {
    pub const NONE: Move = Move::new(0, 0);
    pub const PREV_SIBLING: Move = Move::new(-1, 0);
    pub const NEXT_SIBLING: Move = Move::new(1, 0);
    pub const PARENT: Move = Move::new(0, -1);
    pub const CHILD: Move = Move::new(0, 1);

    pub const fn new(horizontal: isize, vertical: isize) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// True when no movement occurred.
    pub fn is_none(&self) -> bool {
        *self == Move::NONE
    }

    /// Total number of unit steps taken in either direction.
    pub fn magnitude(&self) -> usize {
        self.horizontal.unsigned_abs() + self.vertical.unsigned_abs()
    }
}

impl Add for Move {
    type Output = Move;

    fn add(self, rhs: Move) -> Move {
        Move::new(
            self.horizontal + rhs.horizontal,
            self.vertical + rhs.vertical,
        )
    }
}

impl AddAssign for Move {
    fn add_assign(&mut self, rhs: Move) {
        *self = *self + rhs;
    }
}

impl Sum for Move {
    fn sum<I: Iterator<Item = Move>>(iter: I) -> Move {
        iter.fold(Move::NONE, Add::add)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.horizontal, self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_and_addition() {
        let m = Move::NEXT_SIBLING + Move::NEXT_SIBLING + Move::CHILD;
        assert_eq!(m, Move::new(2, 1));
        assert_eq!(m + Move::NONE, m);
        assert_eq!(Move::PARENT + Move::CHILD, Move::NONE);
        assert!((Move::PREV_SIBLING + Move::NEXT_SIBLING).is_none());
    }

    #[test]
    fn commutative_sum() {
        let steps = [Move::PARENT, Move::NEXT_SIBLING, Move::PARENT];
        let forward: Move = steps.iter().copied().sum();
        let backward: Move = steps.iter().rev().copied().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.magnitude(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(Move::new(-2, 1).to_string(), "(-2, 1)");
    }
}
