//! Height-balanced rebalancing.
//!
//! Every node's metric holds the height of its subtree. After a leaf is attached or a node is
//! spliced out, the heights on the path back to the root are refreshed and any node whose
//! balance factor left `-1..=1` is repaired by a single or double rotation.

use std::borrow::Borrow;

use crate::{nav::Locate, BalancedTree, Link, NodeId, Placed};

impl<K: Ord> BalancedTree<K> {
    pub(crate) fn avl_insert(&mut self, key: K) -> bool {
        match self.insert_leaf(key) {
            Placed::New(node) => {
                self.rebalance_inserted(node);
                true
            }
            Placed::Existing(_) => false,
        }
    }

    // Walks from the parent of the new leaf `node` up to the root, refreshing heights.
    //
    // The first unbalanced ancestor is repaired with one single or double rotation, chosen by
    // comparing the inserted key with the key of the heavy child. The repaired subtree regains
    // its pre-insertion height, so no further rotations are needed, but heights above it are
    // still refreshed.
    fn rebalance_inserted(&mut self, node: NodeId) {
        let mut fixed = false;
        let mut opt_cur = self.parent(node);

        while let Some(cur) = opt_cur {
            self.update_height(cur);

            let mut top = cur;

            if !fixed {
                let bf = self.balance_factor(cur);

                if bf > 1 {
                    let left = self.left(cur).expect("left-heavy node has a left child");

                    // Left-Right: the new key went into the left child's right subtree.
                    if self.key(node) > self.key(left) {
                        self.rotate_left(left);
                    }

                    top = self.rotate_right(cur);
                    fixed = true;
                } else if bf < -1 {
                    let right = self.right(cur).expect("right-heavy node has a right child");

                    // Right-Left: the new key went into the right child's left subtree.
                    if self.key(node) < self.key(right) {
                        self.rotate_right(right);
                    }

                    top = self.rotate_left(cur);
                    fixed = true;
                }
            }

            opt_cur = self.parent(top);
        }
    }

    pub(crate) fn avl_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(Locate::Found(node)) = self.locate(key) else {
            return false;
        };

        // A node with two children trades keys with its successor, which by definition has no
        // left child, and the successor's node is removed instead.
        let removed = match (self.left(node), self.right(node)) {
            (Some(_), Some(right)) => {
                let successor = self.min_in_subtree(right);
                self.swap_keys(node, successor);
                successor
            }
            _ => node,
        };

        let parent = self.splice(removed);
        self.rebalance_removed(parent);

        true
    }

    // Walks from `start` up to the root, refreshing heights and repairing every unbalanced node
    // on the way. Unlike insertion, a repair may shorten the subtree, so the walk can rotate at
    // any number of levels.
    //
    // The heavy child's own balance picks the case. A perfectly balanced heavy child takes the
    // single rotation.
    fn rebalance_removed(&mut self, start: Link) {
        let mut opt_cur = start;

        while let Some(cur) = opt_cur {
            self.update_height(cur);

            let bf = self.balance_factor(cur);

            let top = if bf > 1 {
                let left = self.left(cur).expect("left-heavy node has a left child");

                if self.balance_factor(left) < 0 {
                    self.rotate_left(left);
                }

                self.rotate_right(cur)
            } else if bf < -1 {
                let right = self.right(cur).expect("right-heavy node has a right child");

                if self.balance_factor(right) > 0 {
                    self.rotate_right(right);
                }

                self.rotate_left(cur)
            } else {
                cur
            };

            opt_cur = self.parent(top);
        }
    }
}
