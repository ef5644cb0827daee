//! Per-operation instrumentation and operation outcomes.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::common::{Key, NodeId};

use super::node::Node;

/// Counters collected while one tree operation runs.
///
/// A fresh instance is created for every public call and consumed into the
/// outcome when the call returns. Nothing is shared between operations.
///
/// # Example
/// ```
/// use bstarindex::OperationStats;
/// use std::cmp::Ordering;
///
/// let mut stats = OperationStats::new();
/// assert_eq!(stats.compare(3, 7), Ordering::Less);
/// assert_eq!(stats.comparisons, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStats {
    /// Number of key comparisons performed.
    pub comparisons: u64,

    /// Ids of the nodes visited, in visitation order.
    pub path: Vec<NodeId>,
}

impl OperationStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare two keys, counting the comparison.
    #[inline]
    pub fn compare(&mut self, a: Key, b: Key) -> Ordering {
        self.comparisons += 1;
        a.cmp(&b)
    }

    /// Record a visit to `node`.
    #[inline]
    pub(crate) fn visit(&mut self, node: &Node) {
        self.path.push(node.id());
    }
}

impl fmt::Display for OperationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ comparisons: {}, visited: {} }}",
            self.comparisons,
            self.path.len()
        )
    }
}

/// Result of [`BStarTree::search`](super::BStarTree::search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub found: bool,
    pub comparisons: u64,
    pub path: Vec<NodeId>,
}

impl SearchOutcome {
    pub(crate) fn new(found: bool, stats: OperationStats) -> Self {
        Self {
            found,
            comparisons: stats.comparisons,
            path: stats.path,
        }
    }
}

/// Result of [`BStarTree::insert`](super::BStarTree::insert).
///
/// `inserted` is false when the key was already present; the tree is left
/// untouched in that case and the stats are those of the duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub inserted: bool,
    pub comparisons: u64,
    pub path: Vec<NodeId>,
}

impl InsertOutcome {
    pub(crate) fn new(inserted: bool, stats: OperationStats) -> Self {
        Self {
            inserted,
            comparisons: stats.comparisons,
            path: stats.path,
        }
    }
}

/// Result of [`BStarTree::delete`](super::BStarTree::delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub comparisons: u64,
    pub path: Vec<NodeId>,
    /// The key that was removed, or `None` for a no-op delete.
    pub removed_key: Option<Key>,
}

impl DeleteOutcome {
    pub(crate) fn new(key: Key, deleted: bool, stats: OperationStats) -> Self {
        Self {
            deleted,
            comparisons: stats.comparisons,
            path: stats.path,
            removed_key: deleted.then_some(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = OperationStats::new();
        assert_eq!(stats.comparisons, 0);
        assert!(stats.path.is_empty());
    }

    #[test]
    fn test_compare_counts_every_call() {
        let mut stats = OperationStats::new();

        assert_eq!(stats.compare(1, 2), Ordering::Less);
        assert_eq!(stats.compare(2, 2), Ordering::Equal);
        assert_eq!(stats.compare(3, 2), Ordering::Greater);

        assert_eq!(stats.comparisons, 3);
    }

    #[test]
    fn test_delete_outcome_removed_key() {
        let hit = DeleteOutcome::new(9, true, OperationStats::new());
        assert_eq!(hit.removed_key, Some(9));

        let miss = DeleteOutcome::new(9, false, OperationStats::new());
        assert_eq!(miss.removed_key, None);
    }

    #[test]
    fn test_delete_outcome_serializes_camel_case() {
        let outcome = DeleteOutcome::new(
            5,
            true,
            OperationStats {
                comparisons: 1,
                path: vec![NodeId::new(3)],
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["removedKey"], 5);
        assert_eq!(json["path"][0], 3);
    }

    #[test]
    fn test_stats_display() {
        let stats = OperationStats {
            comparisons: 4,
            path: vec![NodeId::new(1), NodeId::new(2)],
        };
        let display = format!("{}", stats);

        assert!(display.contains("comparisons: 4"));
        assert!(display.contains("visited: 2"));
    }
}
