//! Tree nodes and the rebalancing steps shared by insert and delete.
//!
//! A [`Node`] owns its children directly. Every structural change happens
//! through a parent, which holds both the separator keys and the children
//! on either side of them:
//!
//! ```text
//!            parent.keys:      [ .. s(i-1) | s(i) .. ]
//!            parent.children:  [ .. c(i-1) | c(i) | c(i+1) .. ]
//!
//! split_child(i)   c(i) full      -> c(i), median up, new c(i+1)
//! rotate_left(i)   c(i+1) -> s(i) -> c(i)       (one key moves left)
//! rotate_right(i)  c(i) -> s(i) -> c(i+1)       (one key moves right)
//! merge_children(i) c(i) + s(i) + c(i+1) -> c(i)
//! ```

use log::trace;

use crate::common::{Key, NodeId, NodeIdGenerator};

use super::stats::OperationStats;

/// A leaf or internal node.
///
/// Keys are strictly ascending. Internal nodes have exactly
/// `keys.len() + 1` children; leaves have none.
#[derive(Debug)]
pub(crate) struct Node {
    id: NodeId,
    leaf: bool,
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    /// Create an empty leaf.
    pub(crate) fn new_leaf(id: NodeId) -> Self {
        Self {
            id,
            leaf: true,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty internal node. The caller attaches children.
    pub(crate) fn new_internal(id: NodeId) -> Self {
        Self {
            id,
            leaf: false,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// A node is full at `2t - 1` keys.
    #[inline]
    pub(crate) fn is_full(&self, t: usize) -> bool {
        self.keys.len() >= 2 * t - 1
    }

    /// Scan keys left to right for the first key `>= key`.
    ///
    /// Returns that index and whether the key sits there. Only the ordering
    /// comparisons of the scan are counted.
    pub(crate) fn locate(&self, key: Key, stats: &mut OperationStats) -> (usize, bool) {
        let mut idx = 0;
        while idx < self.keys.len() && stats.compare(self.keys[idx], key).is_lt() {
            idx += 1;
        }
        let found = idx < self.keys.len() && self.keys[idx] == key;
        (idx, found)
    }

    /// Scan keys right to left for the slot `key` belongs in.
    ///
    /// Used by insertion, which shifts larger keys out of the way in a leaf.
    pub(crate) fn slot_from_right(&self, key: Key, stats: &mut OperationStats) -> usize {
        let mut idx = self.keys.len();
        while idx > 0 && stats.compare(self.keys[idx - 1], key).is_gt() {
            idx -= 1;
        }
        idx
    }

    /// Rightmost key of the rightmost leaf below this node.
    pub(crate) fn max_key(&self) -> Key {
        let mut node = self;
        while !node.leaf {
            node = &node.children[node.children.len() - 1];
        }
        node.keys[node.keys.len() - 1]
    }

    /// Leftmost key of the leftmost leaf below this node.
    pub(crate) fn min_key(&self) -> Key {
        let mut node = self;
        while !node.leaf {
            node = &node.children[0];
        }
        node.keys[0]
    }

    // ========================================================================
    // Rebalancing (called on the parent)
    // ========================================================================

    /// Split the full child at `i` around its median.
    ///
    /// The lower `t - 1` keys stay in place, the median moves up to
    /// `keys[i]`, and the upper `t - 1` keys (with the upper `t` children)
    /// move into a new right sibling at `children[i + 1]`.
    pub(crate) fn split_child(&mut self, i: usize, t: usize, ids: &NodeIdGenerator) {
        let child = &mut self.children[i];
        debug_assert_eq!(child.keys.len(), 2 * t - 1, "split of a non-full node");

        let mut sibling = if child.leaf {
            Node::new_leaf(ids.next_id())
        } else {
            Node::new_internal(ids.next_id())
        };
        sibling.keys = child.keys.split_off(t);
        if !child.leaf {
            sibling.children = child.children.split_off(t);
        }
        let median = child.keys.remove(t - 1);

        trace!(
            "split {} at median {}, new sibling {}",
            child.id,
            median,
            sibling.id
        );

        self.keys.insert(i, median);
        self.children.insert(i + 1, sibling);
    }

    /// Move one key from `children[i + 1]` into `children[i]`.
    ///
    /// The separator `keys[i]` drops to the end of the left child, the right
    /// child's first key replaces it, and for internal nodes the right
    /// child's first child moves along to stay between them.
    pub(crate) fn rotate_left(&mut self, i: usize) {
        let (head, tail) = self.children.split_at_mut(i + 1);
        let left = &mut head[i];
        let right = &mut tail[0];

        let separator = std::mem::replace(&mut self.keys[i], right.keys.remove(0));
        left.keys.push(separator);
        if !left.leaf {
            left.children.push(right.children.remove(0));
        }

        trace!("rotate {} -> {} through key {}", right.id, left.id, separator);
    }

    /// Move one key from `children[i]` into `children[i + 1]`.
    ///
    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(crate) fn rotate_right(&mut self, i: usize) {
        let (head, tail) = self.children.split_at_mut(i + 1);
        let left = &mut head[i];
        let right = &mut tail[0];

        let lifted = left.keys.remove(left.keys.len() - 1);
        let separator = std::mem::replace(&mut self.keys[i], lifted);
        right.keys.insert(0, separator);
        if !right.leaf {
            let moved = left.children.remove(left.children.len() - 1);
            right.children.insert(0, moved);
        }

        trace!("rotate {} -> {} through key {}", left.id, right.id, separator);
    }

    /// Fold `keys[i]` and `children[i + 1]` into `children[i]`.
    ///
    /// The right child is destroyed; the merged node keeps the left id.
    pub(crate) fn merge_children(&mut self, i: usize) {
        let separator = self.keys.remove(i);
        let right = self.children.remove(i + 1);
        let left = &mut self.children[i];

        trace!("merge {} into {} around key {}", right.id, left.id, separator);

        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ids: &NodeIdGenerator, keys: &[Key]) -> Node {
        let mut node = Node::new_leaf(ids.next_id());
        node.keys = keys.to_vec();
        node
    }

    fn parent(ids: &NodeIdGenerator, keys: &[Key], children: Vec<Node>) -> Node {
        let mut node = Node::new_internal(ids.next_id());
        node.keys = keys.to_vec();
        node.children = children;
        node
    }

    fn child_keys(node: &Node) -> Vec<Vec<Key>> {
        node.children.iter().map(|c| c.keys.clone()).collect()
    }

    #[test]
    fn test_locate() {
        let ids = NodeIdGenerator::new();
        let node = leaf(&ids, &[10, 20, 30]);

        let mut stats = OperationStats::new();
        assert_eq!(node.locate(20, &mut stats), (1, true));
        assert_eq!(stats.comparisons, 2);

        let mut stats = OperationStats::new();
        assert_eq!(node.locate(25, &mut stats), (2, false));
        assert_eq!(stats.comparisons, 3);

        let mut stats = OperationStats::new();
        assert_eq!(node.locate(99, &mut stats), (3, false));
        assert_eq!(stats.comparisons, 3);
    }

    #[test]
    fn test_slot_from_right() {
        let ids = NodeIdGenerator::new();
        let node = leaf(&ids, &[10, 20, 30]);

        let mut stats = OperationStats::new();
        assert_eq!(node.slot_from_right(35, &mut stats), 3);
        assert_eq!(stats.comparisons, 1);

        let mut stats = OperationStats::new();
        assert_eq!(node.slot_from_right(5, &mut stats), 0);
        assert_eq!(stats.comparisons, 3);
    }

    #[test]
    fn test_split_leaf_child() {
        let ids = NodeIdGenerator::new();
        let full = leaf(&ids, &[1, 2, 3, 4, 5]);
        let mut root = parent(&ids, &[], vec![full]);

        root.split_child(0, 3, &ids);

        assert_eq!(root.keys, vec![3]);
        assert_eq!(child_keys(&root), vec![vec![1, 2], vec![4, 5]]);
        assert!(root.children[1].is_leaf());
        assert_eq!(root.children[1].id(), NodeId::new(3));
    }

    #[test]
    fn test_split_internal_child_moves_children() {
        let ids = NodeIdGenerator::new();
        let leaves: Vec<Node> = (0..4).map(|i| leaf(&ids, &[i * 10 + 5])).collect();
        let full = parent(&ids, &[10, 20, 30], leaves);
        let mut root = parent(&ids, &[], vec![full]);

        root.split_child(0, 2, &ids);

        assert_eq!(root.keys, vec![20]);
        let left = &root.children[0];
        let right = &root.children[1];
        assert_eq!(left.keys, vec![10]);
        assert_eq!(right.keys, vec![30]);
        assert_eq!(child_keys(left), vec![vec![5], vec![15]]);
        assert_eq!(child_keys(right), vec![vec![25], vec![35]]);
    }

    #[test]
    fn test_rotate_left_leaves() {
        let ids = NodeIdGenerator::new();
        let mut root = parent(&ids, &[20], vec![leaf(&ids, &[10]), leaf(&ids, &[30, 40, 50])]);

        root.rotate_left(0);

        assert_eq!(root.keys, vec![30]);
        assert_eq!(child_keys(&root), vec![vec![10, 20], vec![40, 50]]);
    }

    #[test]
    fn test_rotate_right_leaves() {
        let ids = NodeIdGenerator::new();
        let mut root = parent(&ids, &[40], vec![leaf(&ids, &[10, 20, 30]), leaf(&ids, &[50])]);

        root.rotate_right(0);

        assert_eq!(root.keys, vec![30]);
        assert_eq!(child_keys(&root), vec![vec![10, 20], vec![40, 50]]);
    }

    #[test]
    fn test_rotate_internal_moves_edge_child() {
        let ids = NodeIdGenerator::new();
        let left = parent(&ids, &[10], vec![leaf(&ids, &[5]), leaf(&ids, &[15])]);
        let right = parent(
            &ids,
            &[30, 40],
            vec![leaf(&ids, &[25]), leaf(&ids, &[35]), leaf(&ids, &[45])],
        );
        let mut root = parent(&ids, &[20], vec![left, right]);

        root.rotate_left(0);

        assert_eq!(root.keys, vec![30]);
        assert_eq!(root.children[0].keys, vec![10, 20]);
        assert_eq!(child_keys(&root.children[0]), vec![vec![5], vec![15], vec![25]]);
        assert_eq!(root.children[1].keys, vec![40]);
        assert_eq!(child_keys(&root.children[1]), vec![vec![35], vec![45]]);

        root.rotate_right(0);

        assert_eq!(root.keys, vec![20]);
        assert_eq!(child_keys(&root.children[0]), vec![vec![5], vec![15]]);
        assert_eq!(child_keys(&root.children[1]), vec![vec![25], vec![35], vec![45]]);
    }

    #[test]
    fn test_merge_children() {
        let ids = NodeIdGenerator::new();
        let left = leaf(&ids, &[10, 20]);
        let left_id = left.id();
        let mut root = parent(
            &ids,
            &[30, 60],
            vec![left, leaf(&ids, &[40, 50]), leaf(&ids, &[70])],
        );

        root.merge_children(0);

        assert_eq!(root.keys, vec![60]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].keys, vec![10, 20, 30, 40, 50]);
        assert_eq!(root.children[0].id(), left_id);
    }

    #[test]
    fn test_min_max_key() {
        let ids = NodeIdGenerator::new();
        let root = parent(&ids, &[20], vec![leaf(&ids, &[3, 10]), leaf(&ids, &[25, 99])]);

        assert_eq!(root.min_key(), 3);
        assert_eq!(root.max_key(), 99);
        assert_eq!(root.children[0].max_key(), 10);
        assert_eq!(root.children[1].min_key(), 25);
    }
}
