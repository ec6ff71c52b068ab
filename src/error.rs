//! Errors raised at the input boundary.
//!
//! Tree operations never fail: a missing key is reported as `false`, and a broken invariant is a
//! bug that panics. Only raw text headed for the [`Trie`](crate::Trie) needs validating.

/// Rejection of raw input by [`Word::new`](crate::Word::new).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word is empty after trimming whitespace")]
    Empty,
}
