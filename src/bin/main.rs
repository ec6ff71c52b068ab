use rotation_trees::{BalancedTree, Strategy};

fn keys(tree: &BalancedTree<u32>) -> Vec<u32> {
    tree.iter().copied().collect()
}

fn root(tree: &BalancedTree<u32>) -> Option<u32> {
    tree.root().map(|r| *r.key())
}

fn main() {
    for strategy in [Strategy::Avl, Strategy::Splay, Strategy::Treap] {
        let mut tree = match strategy {
            Strategy::Treap => BalancedTree::treap_with_seed(2024),
            other => BalancedTree::new(other),
        };

        for key in [50, 30, 70, 20, 40, 60, 80, 10] {
            tree.insert(key);
            tree.assert_invariants();
        }
        println!("{strategy:?}: {:?} root={:?}", keys(&tree), root(&tree));

        tree.search(&20);
        tree.assert_invariants();
        println!("{strategy:?}: search 20 root={:?}", root(&tree));

        tree.delete(&50);
        tree.assert_invariants();
        println!("{strategy:?}: delete 50 {:?} root={:?}", keys(&tree), root(&tree));

        let mut dot = String::new();
        tree.dotgraph(&format!("{strategy:?}"), &mut dot)
            .expect("writing to a String cannot fail");
        println!("{dot}");
    }
}
