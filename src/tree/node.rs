//! Tree nodes and rotations.

pub(super) type Link<K, I> = Option<Box<Node<K, I>>>;

#[derive(Debug, Clone)]
pub(super) struct Node<K, I> {
    pub(super) key: K,
    pub(super) item: I,
    pub(super) left: Link<K, I>,
    pub(super) right: Link<K, I>,
    pub(super) height: usize,
}

impl<K, I> Node<K, I> {
    pub(super) fn leaf(key: K, item: I) -> Box<Self> {
        Box::new(Self {
            key,
            item,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// `height(right) - height(left)`.
    pub(super) fn balance(&self) -> isize {
        height(&self.right) as isize - height(&self.left) as isize
    }

    pub(super) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

pub(super) fn height<K, I>(link: &Link<K, I>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// Right child becomes the subtree root.
///
/// ```text
///     node                 child
///    /    \               /     \
///   a     child   =>   node      c
///        /     \      /    \
///       b       c    a      b
/// ```
fn rotate_left<K, I>(mut node: Box<Node<K, I>>) -> Box<Node<K, I>> {
    let Some(mut child) = node.right.take() else {
        return node;
    };
    node.right = child.left.take();
    node.update_height();
    child.left = Some(node);
    child.update_height();
    child
}

/// Left child becomes the subtree root. Mirror of [`rotate_left`].
fn rotate_right<K, I>(mut node: Box<Node<K, I>>) -> Box<Node<K, I>> {
    let Some(mut child) = node.left.take() else {
        return node;
    };
    node.left = child.right.take();
    node.update_height();
    child.right = Some(node);
    child.update_height();
    child
}

/// Restores the AVL property at `node`, whose children are already
/// balanced, and returns the new subtree root.
pub(super) fn rebalance<K, I>(mut node: Box<Node<K, I>>) -> Box<Node<K, I>> {
    node.update_height();
    let balance = node.balance();
    if balance >= 2 {
        if let Some(child) = node.right.take() {
            let child = if height(&child.left) > height(&child.right) {
                rotate_right(child)
            } else {
                child
            };
            node.right = Some(child);
        }
        return rotate_left(node);
    }
    if balance <= -2 {
        if let Some(child) = node.left.take() {
            let child = if height(&child.right) > height(&child.left) {
                rotate_left(child)
            } else {
                child
            };
            node.left = Some(child);
        }
        return rotate_right(node);
    }
    node
}

/// Rebalances the subtree stored in `link` in place.
pub(super) fn rebalance_link<K, I>(link: &mut Link<K, I>) {
    if let Some(node) = link.take() {
        *link = Some(rebalance(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_right() -> Box<Node<i32, ()>> {
        let mut root = Node::leaf(1, ());
        let mut mid = Node::leaf(2, ());
        mid.right = Some(Node::leaf(3, ()));
        mid.update_height();
        root.right = Some(mid);
        root.update_height();
        root
    }

    #[test]
    fn test_single_rotation() {
        let root = chain_right();
        assert_eq!(root.balance(), 2);
        let root = rebalance(root);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|n| n.key), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.key), Some(3));
        assert_eq!(root.balance(), 0);
    }

    #[test]
    fn test_double_rotation() {
        // 1 -> right 3 -> left 2
        let mut root = Node::leaf(1, ());
        let mut three = Node::leaf(3, ());
        three.left = Some(Node::leaf(2, ()));
        three.update_height();
        root.right = Some(three);
        let root = rebalance(root);
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().map(|n| n.key), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.key), Some(3));
    }

    #[test]
    fn test_balanced_node_untouched() {
        let mut root = Node::leaf(2, ());
        root.left = Some(Node::leaf(1, ()));
        let root = rebalance(root);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.balance(), -1);
    }
}
