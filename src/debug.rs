use std::{collections::VecDeque, fmt};

use crate::{BalancedTree, Dir, NodeId};

impl<K> BalancedTree<K> {
    /// Writes the tree as a Graphviz digraph, one rank per level, each node labelled
    /// `key:metric`. Missing children are drawn as points so left and right stay apart.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = self.key(node);
                let metric = self.metric(node);
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{metric}\"]; ")?;

                // Leaves get no placeholder children.
                if self.left(node).is_none() && self.right(node).is_none() {
                    continue;
                }

                for dir in [Dir::Left, Dir::Right] {
                    match self.child(node, dir) {
                        Some(child) => {
                            let child_key = self.key(child);
                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

impl<K: fmt::Debug> fmt::Debug for BalancedTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalancedTree")
            .field("strategy", &self.strategy)
            .field("len", &self.len)
            .field("root", &self.root())
            .field("keys", &DebugKeys(self))
            .finish()
    }
}

struct DebugKeys<'a, K>(&'a BalancedTree<K>);

impl<K: fmt::Debug> fmt::Debug for DebugKeys<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::BalancedTree;

    #[test]
    fn empty_dotgraph() {
        let tree: BalancedTree<u32> = BalancedTree::avl();
        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();
        assert_eq!(out, "digraph \"graph-t\" {}");
    }

    #[test]
    fn dotgraph_labels_metrics() {
        let mut tree = BalancedTree::treap_with_seed(0);
        tree.insert_with_priority(5, 10);
        tree.insert_with_priority(3, 50);

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();

        assert!(out.contains("\"grapht-3\" [label=\"3:50\"]"));
        assert!(out.contains("\"grapht-5\" [label=\"5:10\"]"));
        assert!(out.contains("\"grapht-3\" -> \"grapht-5\";"));
        assert!(out.contains("[shape=point]"));
    }

    #[test]
    fn debug_lists_keys_in_order() {
        let mut tree = BalancedTree::splay();
        for key in [3, 1, 2] {
            tree.insert(key);
        }

        let out = format!("{tree:?}");
        assert!(out.contains("strategy: Splay"));
        assert!(out.contains("keys: [1, 2, 3]"));
    }
}
