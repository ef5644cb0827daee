//! B*-style tree index with proactive rebalancing.
//!
//! [`BStarTree`] keeps a set of unique integer keys in a height-balanced
//! multiway tree of minimum degree `t`. Every operation reports how many
//! key comparisons it made and which nodes it visited, so callers can show
//! the cost and the traversal.
//!
//! # Components
//! - [`BStarTree`] - Tree-level orchestration
//! - [`OperationStats`] - Comparison counter and visited path
//! - [`TreeSnapshot`] - Serializable copy of the tree for rendering
//! - `node` - Node model plus split, rotate and merge
//! - `insert` / `delete` - Top-down descents
//!
//! # Occupancy
//! ```text
//!              ┌──────────────┐
//!              │ root: 0..2t-1│          root may drop to 0 keys,
//!              └──────┬───────┘          which collapses it
//!        ┌────────────┼────────────┐
//!   ┌────┴────┐  ┌────┴────┐  ┌────┴────┐
//!   │t-1..2t-1│  │t-1..2t-1│  │t-1..2t-1│  every other node
//!   └─────────┘  └─────────┘  └─────────┘
//! ```

mod delete;
mod insert;
mod node;
mod snapshot;
mod stats;

use std::sync::Arc;

use log::{debug, warn};

use crate::common::config::{DEFAULT_MIN_DEGREE, MIN_DEGREE};
use crate::common::{Key, NodeIdGenerator};

use node::Node;

pub use snapshot::{InvariantViolation, NodeKind, NodeSnapshot, TreeSnapshot};
pub use stats::{DeleteOutcome, InsertOutcome, OperationStats, SearchOutcome};

/// An ordered index of unique keys.
///
/// # Thread Safety
/// Mutating operations take `&mut self` and leave the tree briefly
/// inconsistent while they rebalance. Share a tree between threads only
/// behind one exclusive lock, as [`IndexService`](crate::service::IndexService)
/// does.
///
/// # Example
/// ```
/// use bstarindex::BStarTree;
///
/// let mut tree = BStarTree::new(3);
/// for key in [50, 20, 70, 10, 30, 60, 80, 25] {
///     assert!(tree.insert(key).inserted);
/// }
///
/// assert!(tree.search(30).found);
/// assert!(!tree.search(99).found);
/// assert_eq!(tree.snapshot().key_count, 8);
/// ```
#[derive(Debug)]
pub struct BStarTree {
    root: Node,

    /// Minimum degree `t` (immutable after construction).
    t: usize,

    /// Source of node ids, possibly shared with other trees.
    ids: Arc<NodeIdGenerator>,
}

impl BStarTree {
    /// Create an empty tree with its own id generator.
    ///
    /// A `min_degree` below 2 is clamped to 2.
    pub fn new(min_degree: usize) -> Self {
        Self::with_id_generator(min_degree, Arc::new(NodeIdGenerator::new()))
    }

    /// Create an empty tree drawing node ids from `ids`.
    pub fn with_id_generator(min_degree: usize, ids: Arc<NodeIdGenerator>) -> Self {
        if min_degree < MIN_DEGREE {
            warn!(
                "min_degree {} is below {}, clamping to {}",
                min_degree, MIN_DEGREE, MIN_DEGREE
            );
        }
        let t = min_degree.max(MIN_DEGREE);
        let root = Node::new_leaf(ids.next_id());

        Self { root, t, ids }
    }

    // ========================================================================
    // Public API: Operations
    // ========================================================================

    /// Look up `key`.
    pub fn search(&self, key: Key) -> SearchOutcome {
        let mut stats = OperationStats::new();
        let found = self.search_with(key, &mut stats);
        SearchOutcome::new(found, stats)
    }

    /// Insert `key`.
    ///
    /// A duplicate leaves the tree untouched and returns `inserted = false`
    /// with the stats of the lookup that found it. Otherwise the reported
    /// stats cover that lookup followed by the insertion descent.
    pub fn insert(&mut self, key: Key) -> InsertOutcome {
        let mut stats = OperationStats::new();
        if self.search_with(key, &mut stats) {
            return InsertOutcome::new(false, stats);
        }

        if self.root.is_full(self.t) {
            self.grow_root();
        }
        insert::insert_non_full(&mut self.root, key, self.t, &self.ids, &mut stats);

        InsertOutcome::new(true, stats)
    }

    /// Delete `key`.
    ///
    /// An absent key leaves the tree untouched and returns
    /// `deleted = false` with the stats of the lookup. Otherwise the
    /// reported stats cover the deletion descent alone.
    pub fn delete(&mut self, key: Key) -> DeleteOutcome {
        let mut lookup = OperationStats::new();
        if !self.search_with(key, &mut lookup) {
            return DeleteOutcome::new(key, false, lookup);
        }

        let mut stats = OperationStats::new();
        let deleted = delete::delete_from(&mut self.root, key, self.t, &mut stats);

        if !self.root.is_leaf() && self.root.keys.is_empty() {
            self.shrink_root();
        }

        DeleteOutcome::new(key, deleted, stats)
    }

    /// Copy the tree into a serializable snapshot.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.root)
    }

    /// Drop every node and start over with one empty leaf.
    ///
    /// The id generator keeps counting, so ids stay unique across resets.
    pub fn reset(&mut self) {
        self.root = Node::new_leaf(self.ids.next_id());
        debug!("tree reset, new root {}", self.root.id());
    }

    /// Reset, then insert every key from `keys`. Duplicates are skipped.
    pub fn rebuild<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = Key>,
    {
        self.reset();
        let inserted = keys.into_iter().filter(|&key| self.insert(key).inserted).count();
        debug!("tree rebuilt with {} keys, height {}", inserted, self.height());
    }

    // ========================================================================
    // Public API: Inspection
    // ========================================================================

    /// The minimum degree `t` in effect.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.t
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> usize {
        fn count(node: &Node) -> usize {
            node.len() + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// True when the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.keys.is_empty()
    }

    /// Number of levels; an empty tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while !node.is_leaf() {
            node = &node.children[0];
            height += 1;
        }
        height
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Key> {
        fn walk(node: &Node, out: &mut Vec<Key>) {
            if node.is_leaf() {
                out.extend_from_slice(&node.keys);
                return;
            }
            for (i, child) in node.children.iter().enumerate() {
                walk(child, out);
                if let Some(&key) = node.keys.get(i) {
                    out.push(key);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Verify ordering, fanout, occupancy and balance.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        snapshot::check(&self.root, self.t)
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn search_with(&self, key: Key, stats: &mut OperationStats) -> bool {
        let mut node = &self.root;
        loop {
            stats.visit(node);
            let (idx, found) = node.locate(key, stats);
            if found {
                return true;
            }
            if node.is_leaf() {
                return false;
            }
            node = &node.children[idx];
        }
    }

    /// Wrap the full root in a new internal root and split it.
    fn grow_root(&mut self) {
        let old_root = std::mem::replace(&mut self.root, Node::new_internal(self.ids.next_id()));
        self.root.children.push(old_root);
        self.root.split_child(0, self.t, &self.ids);
        debug!("root split, new root {}, height {}", self.root.id(), self.height());
    }

    /// Replace a keyless internal root with its only child.
    fn shrink_root(&mut self) {
        if let Some(child) = self.root.children.pop() {
            let old = std::mem::replace(&mut self.root, child);
            debug!(
                "root {} collapsed into {}, height {}",
                old.id(),
                self.root.id(),
                self.height()
            );
        }
    }
}

impl Default for BStarTree {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DEGREE)
    }
}
