//! Rotation-balanced binary search trees.
//!
//! One node arena and one rotation primitive are shared by three balancing strategies:
//! height-balanced AVL trees, self-adjusting splay trees and randomized treaps. A small prefix
//! [`Trie`] for words rides along.

// Conventions used in comments:
// - A rotation "at" a pivot moves the pivot one level down in some direction `dir` and promotes
//   the pivot's child on the `!dir` side into the pivot's old slot.
// - `x` is the node being moved, `p` its parent and `g` its grandparent.
// - Heights count nodes: a leaf has height 1 and a missing subtree height 0.
//
// The invariants holding between operations, for every strategy:
// 1. The root has no parent.
// 2. Every non-root node is exactly one of its parent's children.
// 3. An in-order walk yields strictly increasing keys.
//
// Per strategy, the node metric means:
// - AVL: subtree height, and sibling subtrees differ in height by at most one.
// - Treap: a priority fixed at creation; no child has a greater priority than its parent.
// - Splay: nothing (always 0). The most recently accessed key is at the root.

use core::{cmp::Ordering, fmt, mem, ops::Not};
use std::borrow::Borrow;

use arbitrary::Arbitrary;

mod arena;
mod avl;
mod debug;
pub mod error;
mod iter;
mod nav;
mod splay;
mod treap;
pub mod trie;
mod walk;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

use slab::Slab;
use nav::Locate;

pub use arena::NodeId;
pub use error::WordError;
pub use iter::Iter;
pub use treap::PRIORITY_RANGE;
pub use trie::{Trie, Word};
pub use walk::NodeRef;

/// The balancing discipline of a [`BalancedTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Arbitrary)]
pub enum Strategy {
    /// Height-balanced: rotations after every structural change keep sibling heights within one.
    Avl,
    /// Self-adjusting: every access rotates the touched node to the root.
    Splay,
    /// Randomized: nodes carry random priorities kept in max-heap order.
    Treap,
}

/// A binary search tree of unique keys, balanced by one of the [`Strategy`] variants.
pub struct BalancedTree<K> {
    nodes: Slab<Node<K>>,
    root: Link,
    len: usize,
    strategy: Strategy,
    // Only treaps draw priorities.
    priorities: Option<treap::Priorities>,
}

pub(crate) struct Node<K> {
    links: Links,
    key: K,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Debug)]
struct Links {
    parent: Link,
    children: [Link; 2],
    metric: u32,
}

type Link = Option<NodeId>;

/// Where [`BalancedTree::insert_leaf`] put a key.
pub(crate) enum Placed {
    New(NodeId),
    Existing(NodeId),
}

impl<K> BalancedTree<K> {
    /// Returns a new empty tree balanced by `strategy`.
    pub fn new(strategy: Strategy) -> BalancedTree<K> {
        BalancedTree {
            nodes: Slab::new(),
            root: None,
            len: 0,
            strategy,
            priorities: (strategy == Strategy::Treap).then(treap::Priorities::from_entropy),
        }
    }

    /// Returns a new empty AVL tree.
    pub fn avl() -> BalancedTree<K> {
        BalancedTree::new(Strategy::Avl)
    }

    /// Returns a new empty splay tree.
    pub fn splay() -> BalancedTree<K> {
        BalancedTree::new(Strategy::Splay)
    }

    /// Returns a new empty treap whose priorities come from OS entropy.
    pub fn treap() -> BalancedTree<K> {
        BalancedTree::new(Strategy::Treap)
    }

    /// Returns a new empty treap whose priorities are drawn from a generator seeded with `seed`.
    ///
    /// Two treaps built with the same seed and the same sequence of operations have identical
    /// shapes.
    pub fn treap_with_seed(seed: u64) -> BalancedTree<K> {
        BalancedTree {
            nodes: Slab::new(),
            root: None,
            len: 0,
            strategy: Strategy::Treap,
            priorities: Some(treap::Priorities::seeded(seed)),
        }
    }

    /// Returns the balancing strategy of this tree.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns `true` if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of keys in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns a read-only handle to the root node, if any.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    /// Returns a read-only handle to the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node of this tree. A handle to a removed node
    /// whose slot has since been reused by another insertion is not detected: it silently
    /// refers to the newer key.
    pub fn node(&self, id: NodeId) -> NodeRef<'_, K> {
        assert!(self.nodes.contains(id.index()), "dangling node id {id:?}");
        NodeRef::new(self, id)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Inserts `key`, returning `true` if it was not already present.
    ///
    /// For a splay tree the new or pre-existing node ends up at the root.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        match self.strategy {
            Strategy::Avl => self.avl_insert(key),
            Strategy::Splay => self.splay_insert(key),
            Strategy::Treap => self.treap_insert(key, None),
        }
    }

    /// Inserts `key` with a caller-chosen treap priority.
    ///
    /// Only treaps use the priority; the other strategies behave exactly like
    /// [`insert`](Self::insert). The priority of an already-present key is not changed.
    pub fn insert_with_priority(&mut self, key: K, priority: u32) -> bool
    where
        K: Ord,
    {
        match self.strategy {
            Strategy::Treap => self.treap_insert(key, Some(priority)),
            _ => self.insert(key),
        }
    }

    /// Looks up `key`, returning `true` on a hit.
    ///
    /// AVL trees and treaps are left untouched. A splay tree splays the found node to the root,
    /// or on a miss the last node visited by the descent.
    pub fn search<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        match self.strategy {
            Strategy::Splay => self.splay_search(key),
            Strategy::Avl | Strategy::Treap => self.contains(key),
        }
    }

    /// Removes `key`, returning `true` if it was present.
    ///
    /// Removing an absent key leaves the tree exactly as it was.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        match self.strategy {
            Strategy::Avl => self.avl_delete(key),
            Strategy::Splay => self.splay_delete(key),
            Strategy::Treap => self.treap_delete(key),
        }
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Ord + fmt::Debug,
    {
        assert_eq!(self.nodes.len(), self.len, "arena and length disagree");

        let Some(root) = self.root else {
            assert_eq!(self.len, 0);
            return;
        };

        assert_eq!(self.parent(root), None, "root has a parent");

        let mut seen = 0;
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            seen += 1;

            let metric = self.metric(node);

            for dir in [Dir::Left, Dir::Right] {
                let Some(child) = self.child(node, dir) else {
                    continue;
                };

                // Ensure child's parent link points to this node.
                assert_eq!(
                    self.parent(child),
                    Some(node),
                    "child {child:?} of {node:?} has a stale parent link"
                );

                match (dir, self.key(child).cmp(self.key(node))) {
                    (Dir::Left, Ordering::Less) | (Dir::Right, Ordering::Greater) => (),
                    _ => panic!(
                        "{:?} is on the wrong side of {:?}",
                        self.key(child),
                        self.key(node)
                    ),
                }

                if self.strategy == Strategy::Treap {
                    assert!(
                        self.metric(child) <= metric,
                        "heap order broken between {:?} and {:?}",
                        self.key(node),
                        self.key(child)
                    );
                }

                stack.push(child);
            }

            match self.strategy {
                Strategy::Avl => {
                    let left = self.height(self.left(node));
                    let right = self.height(self.right(node));
                    assert_eq!(metric, 1 + left.max(right), "stale height at {node:?}");
                    assert!(
                        left.abs_diff(right) <= 1,
                        "{:?} is out of balance ({left} vs {right})",
                        self.key(node)
                    );
                }
                Strategy::Splay => assert_eq!(metric, 0),
                Strategy::Treap => (),
            }
        }

        assert_eq!(seen, self.len, "unreachable nodes in the arena");

        // The per-edge side check above is local; a full in-order pass catches keys that sit
        // on the correct side of their parent but the wrong side of an ancestor.
        let mut keys = self.iter();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key, "in-order walk is not increasing at {key:?}");
                prev = key;
            }
        }
    }

    // Support methods ========================================================

    #[inline]
    fn links(&self, node: NodeId) -> &Links {
        &self.nodes[node.index()].links
    }

    #[inline]
    fn links_mut(&mut self, node: NodeId) -> &mut Links {
        &mut self.nodes[node.index()].links
    }

    #[inline]
    pub(crate) fn key(&self, node: NodeId) -> &K {
        &self.nodes[node.index()].key
    }

    #[inline]
    pub(crate) fn metric(&self, node: NodeId) -> u32 {
        self.links(node).metric
    }

    #[inline]
    pub(crate) fn parent(&self, node: NodeId) -> Link {
        self.links(node).parent
    }

    #[inline]
    pub(crate) fn child(&self, node: NodeId, dir: Dir) -> Link {
        self.links(node).children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self, node: NodeId) -> Link {
        self.child(node, Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self, node: NodeId) -> Link {
        self.child(node, Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, node: NodeId, parent: Link) -> Link {
        mem::replace(&mut self.links_mut(node).parent, parent)
    }

    #[inline]
    fn set_child(&mut self, node: NodeId, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.links_mut(node).children[dir as usize], child)
    }

    #[inline]
    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        if let Some(node) = opt_node {
            self.set_parent(node, parent);
        }
    }

    /// Returns which child of `parent` the node `child` is.
    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.left(parent) == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(
                self.right(parent),
                Some(child),
                "`child` must be a child of `parent`"
            );
            Dir::Right
        }
    }

    // Points the slot that held `old_child` (a child of `parent`, or the root if `parent` is
    // `None`) at `new_child`, and fixes `new_child`'s parent link.
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old_child);
                self.set_child(parent, dir, new_child);
            }
            None => self.root = new_child,
        }

        self.maybe_set_parent(new_child, parent);
    }

    /// Returns the height of a possibly-missing subtree from the stored AVL metric.
    #[inline]
    pub(crate) fn height(&self, node: Link) -> u32 {
        node.map(|n| self.metric(n)).unwrap_or(0)
    }

    pub(crate) fn update_height(&mut self, node: NodeId) {
        let height = 1 + self
            .height(self.left(node))
            .max(self.height(self.right(node)));
        self.links_mut(node).metric = height;
    }

    /// Returns `height(left) - height(right)`.
    pub(crate) fn balance_factor(&self, node: NodeId) -> i64 {
        i64::from(self.height(self.left(node))) - i64::from(self.height(self.right(node)))
    }

    // Rotates at `pivot`, moving it down towards `dir` and promoting its `!dir` child.
    //
    // Returns the promoted node, which now roots the local subtree. Under the AVL strategy the
    // heights of the two rotated nodes are refreshed; ancestors are the caller's business.
    //
    // Panics if `pivot` has no `!dir` child.
    pub(crate) fn rotate(&mut self, pivot: NodeId, dir: Dir) -> NodeId {
        let up = self
            .child(pivot, !dir)
            .expect("rotation requires a child on the promoted side");

        // - `pivot` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of `pivot`.
        let across = self.child(up, dir);
        let parent = self.parent(pivot);

        self.set_child(pivot, !dir, across);
        self.maybe_set_parent(across, Some(pivot));

        self.set_child(up, dir, Some(pivot));
        self.set_parent(pivot, Some(up));

        self.replace_child_or_set_root(parent, pivot, Some(up));

        if self.strategy == Strategy::Avl {
            self.update_height(pivot);
            self.update_height(up);
        }

        up
    }

    /// Promotes the right child of `pivot`. Returns the new local subtree root.
    pub(crate) fn rotate_left(&mut self, pivot: NodeId) -> NodeId {
        self.rotate(pivot, Dir::Left)
    }

    /// Promotes the left child of `pivot`. Returns the new local subtree root.
    pub(crate) fn rotate_right(&mut self, pivot: NodeId) -> NodeId {
        self.rotate(pivot, Dir::Right)
    }

    fn alloc(&mut self, key: K, parent: Link) -> NodeId {
        let metric = match self.strategy {
            Strategy::Avl => 1,
            Strategy::Splay | Strategy::Treap => 0,
        };

        self.len += 1;
        NodeId::new(self.nodes.insert(Node {
            links: Links {
                parent,
                children: [None; 2],
                metric,
            },
            key,
        }))
    }

    /// Places `key` in a new leaf at its search position, or finds the node already holding it.
    ///
    /// No rebalancing is done.
    pub(crate) fn insert_leaf(&mut self, key: K) -> Placed
    where
        K: Ord,
    {
        match self.locate(&key) {
            None => {
                // Tree is empty. Set `key` as the root and return.
                let node = self.alloc(key, None);
                self.root = Some(node);
                Placed::New(node)
            }

            Some(Locate::Found(node)) => Placed::Existing(node),

            Some(Locate::Vacant { parent, dir }) => {
                let node = self.alloc(key, Some(parent));
                self.set_child(parent, dir, Some(node));
                Placed::New(node)
            }
        }
    }

    /// Unlinks and frees a node with at most one child, elevating that child into its slot.
    ///
    /// Returns the removed node's former parent.
    pub(crate) fn splice(&mut self, node: NodeId) -> Link {
        let parent = self.parent(node);

        let child = match (self.left(node), self.right(node)) {
            (Some(_), Some(_)) => unreachable!("spliced node must have at most one child"),
            (Some(child), None) | (None, Some(child)) => Some(child),
            (None, None) => None,
        };

        self.replace_child_or_set_root(parent, node, child);

        drop(self.nodes.remove(node.index()));
        self.len -= 1;

        parent
    }

    /// Exchanges the keys held by two distinct nodes, leaving their links alone.
    pub(crate) fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        let (a, b) = self
            .nodes
            .get2_mut(a.index(), b.index())
            .expect("swap_keys requires two distinct live nodes");
        mem::swap(&mut a.key, &mut b.key);
    }
}

impl<K> Default for BalancedTree<K> {
    fn default() -> Self {
        BalancedTree::avl()
    }
}

impl<'tree, K> IntoIterator for &'tree BalancedTree<K> {
    type Item = &'tree K;
    type IntoIter = Iter<'tree, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
