//! The ranked AVL tree.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::node::{height, rebalance_link, Link, Node};
use crate::error::{Error, Result};

/// Self-balancing search tree keyed by `K`, carrying one `I` per key.
///
/// Duplicate keys are rejected: two distinct items may never share a key.
///
/// # Examples
///
/// ```
/// use u_allocore::tree::RankedTree;
///
/// let mut tree = RankedTree::new();
/// for (rate, name) in [(4, "Coal"), (3, "Diamond"), (20, "Redstone")] {
///     tree.insert(rate, name).unwrap();
/// }
///
/// // 1-indexed, inclusive, ascending by key
/// assert_eq!(tree.range_between(1, 2), vec![&"Diamond", &"Coal"]);
/// assert_eq!(tree.get_by_rank(3), Some(&"Redstone"));
/// assert!(tree.insert(4, "Lapis").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RankedTree<K, I> {
    root: Link<K, I>,
    len: usize,
}

impl<K: Ord + Debug, I> RankedTree<K, I> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Builds a tree from `(key, item)` pairs, failing on the first
    /// duplicate key.
    pub fn try_from_iter<T: IntoIterator<Item = (K, I)>>(pairs: T) -> Result<Self> {
        let mut tree = Self::new();
        for (key, item) in pairs {
            tree.insert(key, item)?;
        }
        Ok(tree)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the root (0 for an empty tree).
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts `item` under `key`.
    ///
    /// Fails with [`Error::DuplicateKey`] if `key` is already present; the
    /// tree is left unchanged in that case.
    pub fn insert(&mut self, key: K, item: I) -> Result<()> {
        insert_at(&mut self.root, key, item)?;
        self.len += 1;
        Ok(())
    }

    /// Removes `key` and returns its item.
    ///
    /// Fails with [`Error::KeyNotFound`] if `key` is absent.
    pub fn delete(&mut self, key: &K) -> Result<I> {
        let item = delete_at(&mut self.root, key)?;
        self.len -= 1;
        Ok(item)
    }

    /// Returns the item stored under `key`.
    pub fn get(&self, key: &K) -> Option<&I> {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.item),
            };
        }
        None
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Items whose 1-indexed in-order rank lies in `[i, j]`, ascending by
    /// key.
    ///
    /// Ranks beyond `len` are ignored; an empty or inverted window returns an
    /// empty vector. The walk is a plain in-order traversal with a visit
    /// counter that stops once rank `j` has been collected.
    pub fn range_between(&self, i: usize, j: usize) -> Vec<&I> {
        let mut out = Vec::new();
        if i == 0 || i > j {
            return out;
        }
        let mut visited = 0;
        collect_ranks(&self.root, i, j, &mut visited, &mut out);
        out
    }

    /// The item with 1-indexed in-order rank `k`.
    pub fn get_by_rank(&self, k: usize) -> Option<&I> {
        if k == 0 {
            return None;
        }
        self.iter().nth(k - 1).map(|(_, item)| item)
    }

    /// Smallest key and its item.
    pub fn first(&self) -> Option<(&K, &I)> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = node.left.as_ref() {
            node = left;
        }
        Some((&node.key, &node.item))
    }

    /// Largest key and its item.
    pub fn last(&self) -> Option<(&K, &I)> {
        let mut node = self.root.as_ref()?;
        while let Some(right) = node.right.as_ref() {
            node = right;
        }
        Some((&node.key, &node.item))
    }

    /// In-order iterator over `(key, item)` pairs.
    pub fn iter(&self) -> Iter<'_, K, I> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

impl<K: Ord + Debug, I> Default for RankedTree<K, I> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator returned by [`RankedTree::iter`].
pub struct Iter<'a, K, I> {
    stack: Vec<&'a Node<K, I>>,
}

impl<'a, K, I> Iter<'a, K, I> {
    fn push_left(&mut self, mut node: Option<&'a Node<K, I>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, I> Iterator for Iter<'a, K, I> {
    type Item = (&'a K, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((&node.key, &node.item))
    }
}

fn insert_at<K: Ord, I>(link: &mut Link<K, I>, key: K, item: I) -> Result<()> {
    match link {
        None => {
            *link = Some(Node::leaf(key, item));
            return Ok(());
        }
        Some(node) => match key.cmp(&node.key) {
            Ordering::Less => insert_at(&mut node.left, key, item)?,
            Ordering::Greater => insert_at(&mut node.right, key, item)?,
            Ordering::Equal => return Err(Error::DuplicateKey),
        },
    }
    rebalance_link(link);
    Ok(())
}

fn delete_at<K: Ord + Debug, I>(link: &mut Link<K, I>, key: &K) -> Result<I> {
    let missing = || Error::KeyNotFound {
        key: format!("{key:?}"),
    };
    let Some(node) = link.as_mut() else {
        return Err(missing());
    };
    let item = match key.cmp(&node.key) {
        Ordering::Less => delete_at(&mut node.left, key)?,
        Ordering::Greater => delete_at(&mut node.right, key)?,
        Ordering::Equal if node.left.is_some() => {
            // Two children: pull up the in-order successor.
            if let Some((succ_key, succ_item)) = take_min(&mut node.right) {
                node.key = succ_key;
                std::mem::replace(&mut node.item, succ_item)
            } else {
                return unlink(link).ok_or_else(missing);
            }
        }
        Ordering::Equal => return unlink(link).ok_or_else(missing),
    };
    rebalance_link(link);
    Ok(item)
}

/// Replaces a node that has at most one child by that child.
fn unlink<K, I>(link: &mut Link<K, I>) -> Option<I> {
    let removed = *link.take()?;
    *link = removed.left.or(removed.right);
    Some(removed.item)
}

/// Detaches the minimum node of the subtree, rebalancing on the way back up.
fn take_min<K, I>(link: &mut Link<K, I>) -> Option<(K, I)> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        let min = take_min(&mut node.left);
        rebalance_link(link);
        return min;
    }
    let removed = *link.take()?;
    *link = removed.right;
    Some((removed.key, removed.item))
}

fn collect_ranks<'a, K, I>(
    link: &'a Link<K, I>,
    i: usize,
    j: usize,
    visited: &mut usize,
    out: &mut Vec<&'a I>,
) {
    let Some(node) = link else {
        return;
    };
    collect_ranks(&node.left, i, j, visited, out);
    if *visited >= j {
        return;
    }
    *visited += 1;
    if *visited >= i {
        out.push(&node.item);
    }
    collect_ranks(&node.right, i, j, visited, out);
}
