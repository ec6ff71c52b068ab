#![no_main]
use libfuzzer_sys::fuzz_target;

use rotation_trees::{
    model::{run_btree_equivalence, Op},
    Strategy,
};

fuzz_target!(|input: (Strategy, Vec<Op>)| {
    let (strategy, ops) = input;
    run_btree_equivalence(strategy, ops)
});
