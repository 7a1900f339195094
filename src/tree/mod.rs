//! AVL tree with positional range queries.
//!
//! [`RankedTree`] keeps its keys strictly ordered and every node's balance
//! factor within `{-1, 0, 1}`. Positional reads (`range_between`,
//! `get_by_rank`) address items by their 1-indexed in-order rank.
//!
//! # Complexity
//!
//! | Operation | Cost |
//! |---|---|
//! | `insert`, `delete`, `get` | O(log n) |
//! | `range_between(i, j)` | O(j), walks in-order up to rank `j` |
//! | `get_by_rank(k)` | O(k) |
//!
//! Nodes cache only their height, not their subtree size, so rank queries
//! walk the tree in order rather than descending by size.
//!
//! # References
//!
//! - Adelson-Velsky & Landis (1962), "An algorithm for the organization of
//!   information"

mod node;
mod ranked;

pub use ranked::{Iter, RankedTree};
