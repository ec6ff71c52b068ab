//! Move-to-root by splaying.
//!
//! Every access, hit or miss, ends by rotating the touched node to the root. Zig-zig steps
//! rotate the grandparent before the parent and zig-zag steps rotate the parent before the
//! grandparent; the order is what gives splay trees their amortized logarithmic bound.

use std::borrow::Borrow;

use crate::{nav::Locate, BalancedTree, NodeId, Placed};

impl<K> BalancedTree<K> {
    /// Rotates `node` up until it is the root.
    pub(crate) fn splay_to_root(&mut self, node: NodeId) {
        while let Some(parent) = self.parent(node) {
            let node_dir = self.which_child(parent, node);

            match self.parent(parent) {
                // Zig: the parent is the root.
                None => {
                    self.rotate(parent, !node_dir);
                }

                Some(grandparent) => {
                    let parent_dir = self.which_child(grandparent, parent);

                    if node_dir == parent_dir {
                        // Zig-zig: both links lean the same way.
                        self.rotate(grandparent, !parent_dir);
                        self.rotate(parent, !node_dir);
                    } else {
                        // Zig-zag: the links bend.
                        self.rotate(parent, !node_dir);
                        self.rotate(grandparent, !parent_dir);
                    }
                }
            }
        }

        debug_assert_eq!(self.root, Some(node));
    }

    pub(crate) fn splay_insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let (node, inserted) = match self.insert_leaf(key) {
            Placed::New(node) => (node, true),
            Placed::Existing(node) => (node, false),
        };

        self.splay_to_root(node);
        inserted
    }

    pub(crate) fn splay_search<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.locate(key) {
            None => false,

            Some(Locate::Found(node)) => {
                self.splay_to_root(node);
                true
            }

            // On a miss the last node on the access path is splayed instead.
            Some(Locate::Vacant { parent, .. }) => {
                self.splay_to_root(parent);
                false
            }
        }
    }

    pub(crate) fn splay_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(Locate::Found(node)) = self.locate(key) else {
            return false;
        };

        // With two children the node takes its predecessor's key and the predecessor's node,
        // which has no right child, is the one unlinked.
        let removed = match (self.left(node), self.right(node)) {
            (Some(left), Some(_)) => {
                let predecessor = self.max_in_subtree(left);
                self.swap_keys(node, predecessor);
                predecessor
            }
            _ => node,
        };

        if let Some(parent) = self.splice(removed) {
            self.splay_to_root(parent);
        }

        true
    }
}
