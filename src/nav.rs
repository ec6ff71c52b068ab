use core::cmp::Ordering;
use std::borrow::Borrow;

use crate::{BalancedTree, Dir, NodeId};

/// The outcome of a descent by key.
pub(crate) enum Locate {
    /// The node holding the key.
    Found(NodeId),
    /// The key is absent. `parent` is the last node visited and `dir` names its empty child slot
    /// where the key would be attached.
    Vacant { parent: NodeId, dir: Dir },
}

impl<K> BalancedTree<K> {
    /// Decides the next move of a descent towards `key` from `node`: `None` on a match, else the
    /// side to go down.
    #[inline]
    pub(crate) fn step<Q>(&self, node: NodeId, key: &Q) -> Option<Dir>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key.cmp(self.key(node).borrow()) {
            Ordering::Less => Some(Dir::Left),
            Ordering::Equal => None,
            Ordering::Greater => Some(Dir::Right),
        }
    }

    /// Descends from the root towards `key`.
    ///
    /// Returns `None` only if the tree is empty.
    pub(crate) fn locate<Q>(&self, key: &Q) -> Option<Locate>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root?;

        loop {
            let Some(dir) = self.step(cur, key) else {
                return Some(Locate::Found(cur));
            };

            match self.child(cur, dir) {
                Some(child) => cur = child,
                None => return Some(Locate::Vacant { parent: cur, dir }),
            }
        }
    }

    /// Returns `true` if `key` is in the tree. Never changes the tree's shape.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        matches!(self.locate(key), Some(Locate::Found(_)))
    }

    /// Returns the keys a descent towards `key` visits, root first.
    ///
    /// The last element is `key` itself on a hit, or the node under whose empty slot `key` would
    /// be inserted on a miss. The tree is not modified, even for splay trees.
    pub fn access_path<Q>(&self, key: &Q) -> Vec<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Vec::new();
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            path.push(self.key(cur));
            opt_cur = self.step(cur, key).and_then(|dir| self.child(cur, dir));
        }

        path
    }

    /// Returns the minimum node in the subtree rooted at `root`.
    pub(crate) fn min_in_subtree(&self, root: NodeId) -> NodeId {
        self.extreme_in_subtree(root, Dir::Left)
    }

    /// Returns the maximum node in the subtree rooted at `root`.
    pub(crate) fn max_in_subtree(&self, root: NodeId) -> NodeId {
        self.extreme_in_subtree(root, Dir::Right)
    }

    fn extreme_in_subtree(&self, root: NodeId, dir: Dir) -> NodeId {
        let mut cur = root;
        while let Some(next) = self.child(cur, dir) {
            cur = next;
        }
        cur
    }

    /// Returns the minimum key of the tree.
    pub fn first(&self) -> Option<&K> {
        self.root.map(|root| self.key(self.min_in_subtree(root)))
    }

    /// Returns the maximum key of the tree.
    pub fn last(&self) -> Option<&K> {
        self.root.map(|root| self.key(self.max_in_subtree(root)))
    }
}
