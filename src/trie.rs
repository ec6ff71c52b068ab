//! A prefix tree of normalized words.

use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::WordError;

/// A word accepted by the [`Trie`]: trimmed, lowercased and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(String);

impl Word {
    /// Normalizes `raw` by trimming surrounding whitespace and lowercasing it.
    pub fn new(raw: &str) -> Result<Word, WordError> {
        let word = normalize(raw);

        if word.is_empty() {
            return Err(WordError::Empty);
        }

        Ok(Word(word))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::new(s)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    fn walk(&self, s: &str) -> Option<&TrieNode> {
        s.chars().try_fold(self, |node, c| node.children.get(&c))
    }

    // Clears `rest` below this node. Returns `true` if this node no longer carries anything and
    // its parent should drop it.
    fn remove(&mut self, mut rest: std::str::Chars<'_>, found: &mut bool) -> bool {
        match rest.next() {
            None => {
                *found = self.terminal;
                self.terminal = false;
            }
            Some(c) => {
                let Some(child) = self.children.get_mut(&c) else {
                    return false;
                };

                if child.remove(rest, found) {
                    self.children.remove(&c);
                }
            }
        }

        !self.terminal && self.children.is_empty()
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(TrieNode::count).sum::<usize>()
    }
}

/// A set of [`Word`]s supporting exact and prefix lookups.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

impl Trie {
    pub fn new() -> Trie {
        Trie::default()
    }

    /// Returns the number of words stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes, counting the root.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Adds `word`, returning `true` if it was not already present.
    pub fn insert(&mut self, word: &Word) -> bool {
        let mut node = &mut self.root;

        for c in word.as_str().chars() {
            node = node.children.entry(c).or_default();
        }

        if node.terminal {
            return false;
        }

        node.terminal = true;
        self.len += 1;
        true
    }

    /// Returns `true` if `word` was inserted. A stored word's proper prefix is not a hit.
    pub fn search(&self, word: &Word) -> bool {
        self.root
            .walk(word.as_str())
            .map_or(false, |node| node.terminal)
    }

    /// Returns `true` if some stored word starts with `prefix`, after normalizing it the way
    /// [`Word::new`] does. The empty prefix matches any trie, even an empty one.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.root.walk(&normalize(prefix)).is_some()
    }

    /// Removes `word`, returning `true` if it was present. Nodes left without a word below them
    /// are pruned.
    pub fn delete(&mut self, word: &Word) -> bool {
        let mut found = false;
        self.root.remove(word.as_str().chars(), &mut found);

        if found {
            self.len -= 1;
        }

        found
    }

    /// Returns every stored word in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![(&self.root, String::new())];

        while let Some((node, prefix)) = stack.pop() {
            if node.terminal {
                out.push(prefix.clone());
            }

            // Pushed in reverse so the smallest child is popped first.
            for (&c, child) in node.children.iter().rev() {
                let mut next = prefix.clone();
                next.push(c);
                stack.push((child, next));
            }
        }

        out
    }
}
