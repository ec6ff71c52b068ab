//! Differential testing against `BTreeSet`, shared by the unit tests and the fuzz targets.

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy as _};

use crate::{BalancedTree, NodeRef, Strategy};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks among the keys already present, so hits are common.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl proptest::strategy::Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Search(ItemValue),
    Contains(ItemValue),
    Delete(ItemValue),
    First,
    Last,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Search(item) => FinalOp::Search(get_value(sorted, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(sorted, item)),
            Op::Delete(item) => FinalOp::Delete(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Search(u32),
    Contains(u32),
    Delete(u32),
    First,
    Last,
}

pub fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Search),
        value_strategy().prop_map(Op::Contains),
        value_strategy().prop_map(Op::Delete),
        Just(Op::First),
        Just(Op::Last),
    ]
}

pub fn balance_strategy() -> impl proptest::strategy::Strategy<Value = Strategy> {
    proptest::prop_oneof![
        Just(Strategy::Avl),
        Just(Strategy::Splay),
        Just(Strategy::Treap),
    ]
}

/// Returns the keys and metrics in pre-order. Since keys are unique, this pins down the shape.
pub fn preorder<K: Clone>(tree: &BalancedTree<K>) -> Vec<(K, u32)> {
    let mut out = Vec::with_capacity(tree.len());
    let mut stack: Vec<NodeRef<'_, K>> = tree.root().into_iter().collect();

    while let Some(node) = stack.pop() {
        out.push((node.key().clone(), node.metric()));
        stack.extend(node.right());
        stack.extend(node.left());
    }

    out
}

pub fn run_btree_equivalence(strategy: Strategy, ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut tree: BalancedTree<u32> = match strategy {
        Strategy::Treap => BalancedTree::treap_with_seed(ops.len() as u64),
        other => BalancedTree::new(other),
    };

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    let root_key = |tree: &BalancedTree<u32>| tree.root().map(|r| *r.key());

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = btree.insert(value);
                let from_tree = tree.insert(value);

                assert_eq!(from_btree, from_tree, "FinalOp #{op_id}: {final_op:?}");

                if strategy == Strategy::Splay {
                    assert_eq!(root_key(&tree), Some(value), "FinalOp #{op_id}: {final_op:?}");
                }
            }

            FinalOp::Search(value) => {
                let before = preorder(&tree);

                let from_btree = btree.contains(&value);
                let from_tree = tree.search(&value);

                assert_eq!(from_btree, from_tree, "FinalOp #{op_id}: {final_op:?}");

                match strategy {
                    Strategy::Splay if from_tree => {
                        assert_eq!(root_key(&tree), Some(value), "FinalOp #{op_id}: {final_op:?}");
                    }
                    Strategy::Splay => (),
                    Strategy::Avl | Strategy::Treap => {
                        assert_eq!(before, preorder(&tree), "FinalOp #{op_id}: {final_op:?}");
                    }
                }
            }

            FinalOp::Contains(value) => {
                let before = preorder(&tree);

                assert_eq!(
                    btree.contains(&value),
                    tree.contains(&value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
                assert_eq!(before, preorder(&tree), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Delete(value) => {
                remove_sorted(&mut sorted_values, value);

                let before = preorder(&tree);

                let from_btree = btree.remove(&value);
                let from_tree = tree.delete(&value);

                assert_eq!(from_btree, from_tree, "FinalOp #{op_id}: {final_op:?}");

                if !from_tree {
                    assert_eq!(before, preorder(&tree), "FinalOp #{op_id}: {final_op:?}");
                }
            }

            FinalOp::First => {
                assert_eq!(btree.first(), tree.first(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                assert_eq!(btree.last(), tree.last(), "FinalOp #{op_id}: {final_op:?}");
            }
        }

        tree.assert_invariants();
        assert_eq!(btree.len(), tree.len());
        assert!(btree.iter().eq(tree.iter()));
    }
}
