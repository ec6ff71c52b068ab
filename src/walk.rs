use core::fmt;

use crate::{BalancedTree, Dir, NodeId};

/// A read-only handle to one node of a [`BalancedTree`].
///
/// Handles borrow the tree, so the shape they describe cannot change under them. They exist for
/// rendering: a caller walks from [`BalancedTree::root`] through [`left`](Self::left) and
/// [`right`](Self::right) and lays nodes out however it likes.
pub struct NodeRef<'tree, K> {
    tree: &'tree BalancedTree<K>,
    id: NodeId,
}

impl<'tree, K> NodeRef<'tree, K> {
    pub(crate) fn new(tree: &'tree BalancedTree<K>, id: NodeId) -> NodeRef<'tree, K> {
        NodeRef { tree, id }
    }

    /// Returns the stable identifier of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'tree K {
        self.tree.key(self.id)
    }

    /// Returns the strategy-specific metric: the subtree height for AVL trees, the priority for
    /// treaps and `0` for splay trees.
    pub fn metric(&self) -> u32 {
        self.tree.metric(self.id)
    }

    pub fn left(&self) -> Option<NodeRef<'tree, K>> {
        self.child(Dir::Left)
    }

    pub fn right(&self) -> Option<NodeRef<'tree, K>> {
        self.child(Dir::Right)
    }

    pub fn parent(&self) -> Option<NodeRef<'tree, K>> {
        self.tree
            .parent(self.id)
            .map(|id| NodeRef::new(self.tree, id))
    }

    fn child(&self, dir: Dir) -> Option<NodeRef<'tree, K>> {
        self.tree
            .child(self.id, dir)
            .map(|id| NodeRef::new(self.tree, id))
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.left(self.id).is_none() && self.tree.right(self.id).is_none()
    }

    /// Returns the number of nodes on the longest downward path from this node, counting itself.
    ///
    /// This is measured, not read from the metric, so it works for every strategy. It takes time
    /// linear in the size of the subtree.
    pub fn height(&self) -> usize {
        // Splay trees can degenerate into long paths, so walk with an explicit stack.
        let mut max = 0;
        let mut stack = vec![(self.id, 1)];

        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);

            for dir in [Dir::Left, Dir::Right] {
                if let Some(child) = self.tree.child(node, dir) {
                    stack.push((child, depth + 1));
                }
            }
        }

        max
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key())
            .field("metric", &self.metric())
            .finish()
    }
}
