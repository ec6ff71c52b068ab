//! Randomized balancing by heap-ordered priorities.

use core::ops::RangeInclusive;
use std::borrow::Borrow;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{nav::Locate, BalancedTree, Placed};

/// The range treap priorities are drawn from, uniformly.
pub const PRIORITY_RANGE: RangeInclusive<u32> = 1..=100;

/// Source of treap priorities.
pub(crate) struct Priorities {
    rng: StdRng,
}

impl Priorities {
    pub(crate) fn from_entropy() -> Priorities {
        Priorities {
            rng: StdRng::from_entropy(),
        }
    }

    pub(crate) fn seeded(seed: u64) -> Priorities {
        Priorities {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn draw(&mut self) -> u32 {
        self.rng.gen_range(PRIORITY_RANGE)
    }
}

impl<K> BalancedTree<K> {
    // Attaches `key` as a leaf, then rotates it up while it outranks its parent. A single new
    // leaf is the only possible heap violation, so each step looks at one parent-child pair.
    pub(crate) fn treap_insert(&mut self, key: K, priority: Option<u32>) -> bool
    where
        K: Ord,
    {
        let node = match self.insert_leaf(key) {
            Placed::New(node) => node,
            Placed::Existing(_) => return false,
        };

        let priority = match priority {
            Some(priority) => priority,
            None => self
                .priorities
                .get_or_insert_with(Priorities::from_entropy)
                .draw(),
        };
        self.links_mut(node).metric = priority;

        while let Some(parent) = self.parent(node) {
            if self.metric(node) <= self.metric(parent) {
                break;
            }

            let dir = self.which_child(parent, node);
            self.rotate(parent, !dir);
        }

        true
    }

    // Sinks the doomed node by rotating its higher-priority child above it until it has at most
    // one child, then splices it out. On equal priorities the left child goes up.
    pub(crate) fn treap_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(Locate::Found(node)) = self.locate(key) else {
            return false;
        };

        while let (Some(left), Some(right)) = (self.left(node), self.right(node)) {
            if self.metric(left) >= self.metric(right) {
                self.rotate_right(node);
            } else {
                self.rotate_left(node);
            }
        }

        self.splice(node);
        true
    }
}
