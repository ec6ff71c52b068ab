use std::ops::Range;

use proptest::prelude::*;

use crate::model::{self, preorder};

use super::*;
use crate::Strategy;

const ALL: [Strategy; 3] = [Strategy::Avl, Strategy::Splay, Strategy::Treap];

fn tree_for(strategy: Strategy) -> BalancedTree<u32> {
    match strategy {
        Strategy::Treap => BalancedTree::treap_with_seed(0x5eed),
        other => BalancedTree::new(other),
    }
}

fn root_key(tree: &BalancedTree<u32>) -> Option<u32> {
    tree.root().map(|root| *root.key())
}

// Calls `f` with every permutation of `items` (Heap's algorithm).
fn for_each_permutation(items: &[u32], mut f: impl FnMut(&[u32])) {
    let mut items = items.to_vec();
    let mut counters = vec![0; items.len()];

    f(&items);

    let mut i = 0;
    while i < items.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            f(&items);
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

fn insert_find_all(keys: &[u32]) {
    for strategy in ALL {
        let mut tree = tree_for(strategy);

        for &key in keys {
            assert!(tree.insert(key));
            tree.assert_invariants();
        }

        for key in keys {
            assert!(tree.contains(key), "{strategy:?}: {key} not found");
            assert!(tree.search(key), "{strategy:?}: {key} not found");
            tree.assert_invariants();
        }

        assert_eq!(tree.len(), keys.len());
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    for_each_permutation(&[0, 1, 2], insert_find_all);
}

#[test]
fn five_elems_find() {
    for_each_permutation(&[0, 1, 2, 3, 4], insert_find_all);
}

fn insert_remove_all(keys: &[u32]) {
    for strategy in ALL {
        let mut tree = tree_for(strategy);

        for &key in keys {
            tree.insert(key);
            tree.assert_invariants();
        }

        for key in keys {
            assert!(tree.delete(key), "{strategy:?}: {key} not removed");
            assert!(!tree.contains(key));
            tree.assert_invariants();
        }

        assert!(tree.is_empty());

        for &key in keys {
            tree.insert(key);
            tree.assert_invariants();
        }

        for key in keys.iter().rev() {
            assert!(tree.delete(key), "{strategy:?}: {key} not removed");
            tree.assert_invariants();
        }

        assert!(tree.root().is_none());
    }
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    for_each_permutation(&[0, 1, 2], insert_remove_all);
}

#[test]
fn remove_four() {
    for_each_permutation(&[0, 1, 2, 3], insert_remove_all);
}

#[test]
fn avl_round_trip_every_deletion_order() {
    let keys = [5, 3, 8, 1, 4, 7, 9];

    for_each_permutation(&keys, |order| {
        let mut tree = BalancedTree::avl();
        for key in keys {
            tree.insert(key);
        }
        tree.assert_invariants();

        for key in order {
            assert!(tree.delete(key));
            tree.assert_invariants();
        }

        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    });
}

#[test]
fn avl_right_right() {
    let mut tree = BalancedTree::avl();
    for key in [10, 20, 30] {
        tree.insert(key);
    }

    let root = tree.root().unwrap();
    assert_eq!(*root.key(), 20);
    assert_eq!(root.left().map(|n| *n.key()), Some(10));
    assert_eq!(root.right().map(|n| *n.key()), Some(30));
    assert_eq!(root.metric(), 2);
}

#[test]
fn avl_left_left() {
    let mut tree = BalancedTree::avl();
    for key in [30, 20, 10] {
        tree.insert(key);
    }

    assert_eq!(preorder(&tree), vec![(20, 2), (10, 1), (30, 1)]);
}

#[test]
fn avl_double_rotations() {
    let mut left_right = BalancedTree::avl();
    for key in [30, 10, 20] {
        left_right.insert(key);
    }
    assert_eq!(preorder(&left_right), vec![(20, 2), (10, 1), (30, 1)]);

    let mut right_left = BalancedTree::avl();
    for key in [10, 30, 20] {
        right_left.insert(key);
    }
    assert_eq!(preorder(&right_left), vec![(20, 2), (10, 1), (30, 1)]);
}

#[test]
fn avl_delete_rebalances_with_balanced_child() {
    //     20
    //   10  30
    //      25 35
    let mut tree = BalancedTree::avl();
    for key in [20, 10, 30, 25, 35] {
        tree.insert(key);
    }

    // Removing 10 leaves 20 right-heavy with a perfectly balanced right child, which takes the
    // single rotation.
    assert!(tree.delete(&10));
    tree.assert_invariants();
    assert_eq!(preorder(&tree), vec![(30, 3), (20, 2), (25, 1), (35, 1)]);
}

#[test]
fn avl_delete_double_rotations() {
    //     30
    //   10  40
    //     20
    let mut left_right = BalancedTree::avl();
    for key in [30, 10, 40, 20] {
        left_right.insert(key);
    }

    // The heavy left child leans right, so 10 is rotated left before 30 is rotated right.
    assert!(left_right.delete(&40));
    left_right.assert_invariants();
    assert_eq!(preorder(&left_right), vec![(20, 2), (10, 1), (30, 1)]);

    //   10
    //  0  30
    //    20
    let mut right_left = BalancedTree::avl();
    for key in [10, 30, 0, 20] {
        right_left.insert(key);
    }

    assert!(right_left.delete(&0));
    right_left.assert_invariants();
    assert_eq!(preorder(&right_left), vec![(20, 2), (10, 1), (30, 1)]);
}

#[test]
fn avl_delete_two_children_uses_successor() {
    let mut tree = BalancedTree::avl();
    for key in [20, 10, 30, 25, 35] {
        tree.insert(key);
    }

    assert!(tree.delete(&20));
    tree.assert_invariants();
    assert_eq!(preorder(&tree), vec![(25, 3), (10, 1), (30, 2), (35, 1)]);
}

#[test]
fn avl_sequential_inserts_stay_logarithmic() {
    let mut tree = BalancedTree::avl();
    for key in 0..1023u32 {
        tree.insert(key);
    }
    tree.assert_invariants();

    // A perfect tree of 1023 nodes has height 10.
    assert_eq!(tree.root().unwrap().metric(), 10);
    assert_eq!(tree.root().unwrap().height(), 10);
}

#[test]
fn splay_insert_and_search_scenario() {
    let mut tree = BalancedTree::splay();
    for key in [1, 2, 3] {
        tree.insert(key);
    }
    assert_eq!(root_key(&tree), Some(3));

    assert!(tree.search(&1));
    assert_eq!(root_key(&tree), Some(1));
    tree.assert_invariants();

    // Zig-zig from the bottom of the left spine: 1 comes up with 2 and 3 hanging off to the
    // right in a chain.
    assert_eq!(preorder(&tree), vec![(1, 0), (2, 0), (3, 0)]);
}

#[test]
fn splay_zig_zag() {
    let mut tree = BalancedTree::splay();
    for key in [10, 30, 20] {
        tree.insert(key);
    }
    // 20 is attached as the right child of 10, itself the left child of 30.
    assert_eq!(root_key(&tree), Some(20));
    assert_eq!(preorder(&tree), vec![(20, 0), (10, 0), (30, 0)]);

    let mut tree = BalancedTree::splay();
    tree.insert(20);
    tree.insert(10);
    tree.insert(30);
    // 30 at root, 20 left, 10 left of 20.
    assert_eq!(preorder(&tree), vec![(30, 0), (20, 0), (10, 0)]);

    tree.insert(15);
    // 15 was attached as the right child of 10: zig-zag (rotate 10, then 20), then zig at 30.
    assert_eq!(root_key(&tree), Some(15));
    assert_eq!(preorder(&tree), vec![(15, 0), (10, 0), (30, 0), (20, 0)]);
    tree.assert_invariants();
}

#[test]
fn splay_search_miss_splays_last_visited() {
    let mut tree = BalancedTree::splay();
    for key in [10, 20, 30, 40] {
        tree.insert(key);
    }

    assert_eq!(tree.access_path(&25), vec![&40, &30, &20]);
    assert!(!tree.search(&25));
    assert_eq!(root_key(&tree), Some(20));
    tree.assert_invariants();
}

#[test]
fn splay_duplicate_insert_moves_to_root() {
    let mut tree = BalancedTree::splay();
    for key in [1, 2, 3, 4] {
        tree.insert(key);
    }

    assert!(!tree.insert(1));
    assert_eq!(root_key(&tree), Some(1));
    assert_eq!(tree.len(), 4);
    tree.assert_invariants();
}

#[test]
fn splay_delete_splays_former_parent() {
    let mut tree = BalancedTree::splay();
    for key in [1, 2, 3] {
        tree.insert(key);
    }
    // 3 -> 2 -> 1 down the left spine; 1 is a leaf whose parent is 2.
    assert!(tree.delete(&1));
    assert_eq!(root_key(&tree), Some(2));
    tree.assert_invariants();

    // Removing the root with no parent splays nothing.
    assert!(tree.delete(&2));
    assert_eq!(root_key(&tree), Some(3));
    tree.assert_invariants();
}

#[test]
fn splay_delete_two_children_uses_predecessor() {
    let mut tree = BalancedTree::splay();
    for key in [10, 30, 20] {
        tree.insert(key);
    }
    // 20 at the root with children 10 and 30.
    assert_eq!(preorder(&tree), vec![(20, 0), (10, 0), (30, 0)]);

    // The predecessor 10 hangs directly under the root, so after the swap the former root
    // (now holding 10) is splayed, where it already is.
    assert!(tree.delete(&20));
    assert_eq!(preorder(&tree), vec![(10, 0), (30, 0)]);
    tree.assert_invariants();
}

#[test]
fn treap_forced_priority_scenario() {
    let mut tree = BalancedTree::treap_with_seed(1);
    tree.insert_with_priority(5, 10);
    tree.insert_with_priority(3, 50);

    assert_eq!(root_key(&tree), Some(3));
    assert_eq!(preorder(&tree), vec![(3, 50), (5, 10)]);
    tree.assert_invariants();
}

#[test]
fn treap_delete_sinks_target() {
    let mut tree = BalancedTree::treap_with_seed(1);
    tree.insert_with_priority(50, 90);
    tree.insert_with_priority(30, 70);
    tree.insert_with_priority(70, 80);
    tree.insert_with_priority(60, 10);

    assert!(tree.delete(&50));
    tree.assert_invariants();
    // 70 outranks 30 and rises first, then 30 outranks 60. 50 is left holding only 60.
    assert_eq!(preorder(&tree), vec![(70, 80), (30, 70), (60, 10)]);
}

#[test]
fn treap_delete_tie_promotes_left() {
    let mut tree = BalancedTree::treap_with_seed(1);
    tree.insert_with_priority(2, 90);
    tree.insert_with_priority(1, 40);
    tree.insert_with_priority(3, 40);

    assert!(tree.delete(&2));
    assert_eq!(preorder(&tree), vec![(1, 40), (3, 40)]);
    tree.assert_invariants();
}

#[test]
fn treap_priorities_in_range() {
    let mut tree = BalancedTree::treap_with_seed(42);
    for key in 0..200u32 {
        tree.insert(key);
    }
    tree.assert_invariants();

    let mut stack: Vec<_> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        assert!(PRIORITY_RANGE.contains(&node.metric()));
        stack.extend(node.left());
        stack.extend(node.right());
    }
}

#[test]
fn treap_same_seed_same_shape() {
    let mut a = BalancedTree::treap_with_seed(9);
    let mut b = BalancedTree::treap_with_seed(9);
    for key in [8, 3, 11, 1, 6, 9, 14] {
        a.insert(key);
        b.insert(key);
    }

    assert_eq!(preorder(&a), preorder(&b));
}

#[test]
fn duplicate_insert_is_idempotent() {
    for strategy in [Strategy::Avl, Strategy::Treap] {
        let mut once = tree_for(strategy);
        let mut twice = tree_for(strategy);

        for key in [4, 2, 6, 1, 3, 5, 7] {
            once.insert(key);
            twice.insert(key);
        }

        once.insert(3);
        twice.insert(3);
        assert!(!twice.insert(3));

        assert_eq!(preorder(&once), preorder(&twice), "{strategy:?}");
        assert_eq!(once.len(), twice.len());
    }
}

#[test]
fn delete_miss_leaves_tree_unchanged() {
    for strategy in ALL {
        let mut tree = tree_for(strategy);
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key);
        }

        let before = preorder(&tree);
        assert!(!tree.delete(&42));
        assert!(!tree.delete(&0));
        assert_eq!(before, preorder(&tree), "{strategy:?}");
        assert_eq!(tree.len(), 7);
    }

    let mut empty = BalancedTree::<u32>::avl();
    assert!(!empty.delete(&1));
    assert!(!empty.search(&1));
}

#[test]
fn search_leaves_avl_and_treap_untouched() {
    for strategy in [Strategy::Avl, Strategy::Treap] {
        let mut tree = tree_for(strategy);
        for key in 0..32 {
            tree.insert(key);
        }

        let before = preorder(&tree);
        assert!(tree.search(&0));
        assert!(!tree.search(&100));
        assert_eq!(before, preorder(&tree), "{strategy:?}");
    }
}

#[test]
fn iteration_and_extremes() {
    for strategy in ALL {
        let mut tree = tree_for(strategy);
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key);
        }

        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(tree.iter().len(), 7);
        assert_eq!(tree.first(), Some(&1));
        assert_eq!(tree.last(), Some(&9));

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.first(), None);
        tree.assert_invariants();
    }
}

#[test]
fn borrowed_lookups() {
    let mut tree: BalancedTree<String> = BalancedTree::splay();
    for word in ["pear", "apple", "fig"] {
        tree.insert(word.to_string());
    }

    assert!(tree.search("apple"));
    assert_eq!(tree.root().map(|r| r.key().as_str()), Some("apple"));
    assert!(tree.delete("fig"));
    assert!(!tree.contains("fig"));
    tree.assert_invariants();
}

#[test]
fn node_ids_survive_rotations() {
    let mut tree = BalancedTree::avl();
    tree.insert(10);
    let id = tree.root().unwrap().id();

    tree.insert(20);
    tree.insert(30);

    // 10 was rotated down, but its handle still points at it.
    assert_eq!(*tree.node(id).key(), 10);
    assert_eq!(tree.node(id).parent().map(|p| *p.key()), Some(20));
}

#[test]
#[should_panic(expected = "dangling node id")]
fn removed_node_id_panics() {
    let mut tree = BalancedTree::splay();
    tree.insert(1);
    tree.insert(2);
    let id = tree.root().unwrap().id();

    assert!(tree.delete(&2));
    tree.node(id);
}

#[test]
fn reused_slot_refers_to_newer_key() {
    let mut tree = BalancedTree::avl();
    tree.insert(1);
    let id = tree.root().unwrap().id();

    assert!(tree.delete(&1));
    tree.insert(7);

    assert_eq!(*tree.node(id).key(), 7);
}

#[test]
fn only_treaps_carry_a_priority_source() {
    assert!(BalancedTree::<u32>::avl().priorities.is_none());
    assert!(BalancedTree::<u32>::splay().priorities.is_none());
    assert!(BalancedTree::<u32>::treap().priorities.is_some());
    assert!(BalancedTree::<u32>::treap_with_seed(3).priorities.is_some());
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..500;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(
        strategy in model::balance_strategy(),
        ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE),
    ) {
        model::run_btree_equivalence(strategy, ops);
    }

    #[test]
    fn avl_height_is_logarithmic(keys in proptest::collection::vec(0u32..10_000, 1..400)) {
        let mut tree = BalancedTree::avl();
        for key in keys {
            tree.insert(key);
        }

        // An AVL tree of n nodes is no taller than 1.44 * log2(n + 2).
        let n = tree.len() as f64;
        let bound = 1.4405 * (n + 2.0).log2();
        prop_assert!(f64::from(tree.root().unwrap().metric()) <= bound);
    }

    #[test]
    fn splay_search_hit_roots_key(keys in proptest::collection::vec(0u32..500, 1..200), pick in any::<usize>()) {
        let mut tree = BalancedTree::splay();
        for &key in &keys {
            tree.insert(key);
        }

        let key = keys[pick % keys.len()];
        prop_assert!(tree.search(&key));
        prop_assert_eq!(tree.root().map(|r| *r.key()), Some(key));
        tree.assert_invariants();
    }
}
