//! Node identifier type and its generator.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Identifies a node in a tree.
///
/// Ids are handed out by a [`NodeIdGenerator`] when a node is created and
/// are never reused, so a path recorded during one operation can be matched
/// against the ids in a snapshot taken right after it.
///
/// # Example
/// ```
/// use bstarindex::NodeId;
///
/// let node_id = NodeId::new(42);
/// assert_eq!(node_id.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Monotonic source of [`NodeId`]s.
///
/// Each tree owns one by default. Trees that must hand out ids unique
/// across each other can share a single generator through an `Arc`; the
/// counter is atomic for that reason. Only uniqueness is promised, the
/// relative order of ids between trees means nothing.
///
/// # Memory Ordering
/// `Ordering::Relaxed` is enough: `fetch_add` is atomic on its own and no
/// other memory is published through the counter.
#[derive(Debug)]
pub struct NodeIdGenerator {
    next: AtomicU64,
}

impl NodeIdGenerator {
    /// Create a generator whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Hand out the next id.
    #[inline]
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[inline]
    pub fn peek(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
