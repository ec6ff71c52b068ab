//! Node handles into the tree's [`Slab`](slab::Slab).

use core::fmt;

/// A stable, non-owning handle to a node of a [`BalancedTree`](crate::BalancedTree).
///
/// Handles stay valid for as long as their node is in the tree. Rotations move nodes around
/// without reallocating them, so a handle keeps pointing at the same key across rebalancing.
/// Once a node is removed its slot may be reused by a later insertion, and a stale handle to
/// that slot then refers to whatever key was inserted there.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(slot: usize) -> NodeId {
        NodeId(slot)
    }

    /// Returns the slab slot backing this handle.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use slab::Slab;

    use super::*;

    #[test]
    fn vacated_slots_are_reused() {
        let mut slab = Slab::new();

        let a = NodeId::new(slab.insert('a'));
        let b = NodeId::new(slab.insert('b'));
        assert_eq!(slab.len(), 2);

        assert_eq!(slab.remove(a.index()), 'a');
        assert!(!slab.contains(a.index()));

        let c = NodeId::new(slab.insert('c'));
        assert_eq!(c, a);
        assert_eq!(slab[c.index()], 'c');
        assert_eq!(slab[b.index()], 'b');
        assert_eq!(format!("{c:?}"), "#0");
    }
}
