use crate::{BalancedTree, Dir, Link};

enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the keys of a [`BalancedTree`].
///
/// Follows parent links instead of keeping a stack, so it allocates nothing.
pub struct Iter<'tree, K> {
    tree: &'tree BalancedTree<K>,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'tree, K> Iter<'tree, K> {
    pub(crate) fn new(tree: &'tree BalancedTree<K>) -> Self {
        Iter {
            tree,

            front_cur: tree.root,
            front_from: CameFrom::Parent,
            len: tree.len(),
        }
    }
}

impl<'tree, K> Iterator for Iter<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree = self.tree;
        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    cur = tree.min_in_subtree(cur);

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    return Some(tree.key(cur));
                }

                CameFrom::Here => {
                    if let Some(right) = tree.right(cur) {
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    } else if let Some(parent) = tree.parent(cur) {
                        self.front_from = match tree.which_child(parent, cur) {
                            Dir::Left => CameFrom::LeftChild,
                            Dir::Right => CameFrom::RightChild,
                        };
                        cur = parent;
                    } else {
                        unreachable!("iterator outlived the last element")
                    }
                }

                CameFrom::RightChild => {
                    // Ascend until we find the successor element.
                    while let Some(parent) = tree.parent(cur) {
                        match tree.which_child(parent, cur) {
                            Dir::Left => {
                                cur = parent;
                                break;
                            }
                            Dir::Right => cur = parent,
                        }
                    }

                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::LeftChild;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
