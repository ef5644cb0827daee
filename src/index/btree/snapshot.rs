//! Serializable tree snapshots and the structural invariant checker.

use serde::Serialize;
use thiserror::Error;

use crate::common::{Key, NodeId};

use super::node::Node;

/// Whether a node is a leaf or an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf,
    Internal,
}

/// One node of a [`TreeSnapshot`], with its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub kind: NodeKind,
    pub keys: Vec<Key>,
    /// Empty for leaves.
    pub children: Vec<NodeSnapshot>,
}

/// A detached copy of the whole tree plus aggregate counts.
///
/// Serializes as
/// `{"tree": {...}, "height": h, "nodeCount": n, "keyCount": k}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub tree: NodeSnapshot,
    /// Number of levels; a lone root leaf has height 1.
    pub height: usize,
    pub node_count: usize,
    pub key_count: usize,
}

impl TreeSnapshot {
    pub(crate) fn capture(root: &Node) -> Self {
        let mut counts = Counts::default();
        let tree = serialize_node(root, 1, &mut counts);
        Self {
            tree,
            height: counts.height,
            node_count: counts.nodes,
            key_count: counts.keys,
        }
    }

    /// Ideal comparison cost for the current key count, `log2(max(1, n))`.
    pub fn complexity(&self) -> f64 {
        (self.key_count.max(1) as f64).log2()
    }
}

#[derive(Default)]
struct Counts {
    nodes: usize,
    keys: usize,
    height: usize,
}

fn serialize_node(node: &Node, depth: usize, counts: &mut Counts) -> NodeSnapshot {
    counts.nodes += 1;
    counts.keys += node.len();
    counts.height = counts.height.max(depth);

    let (kind, children) = if node.is_leaf() {
        (NodeKind::Leaf, Vec::new())
    } else {
        let children = node
            .children
            .iter()
            .map(|child| serialize_node(child, depth + 1, counts))
            .collect();
        (NodeKind::Internal, children)
    };

    NodeSnapshot {
        id: node.id(),
        kind,
        keys: node.keys.clone(),
        children,
    }
}

// ============================================================================
// Invariant checking
// ============================================================================

/// A structural defect found by
/// [`BStarTree::check_invariants`](super::BStarTree::check_invariants).
///
/// These never occur in a correct tree; they exist so tests can say
/// precisely what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{node}: keys are not strictly ascending")]
    UnorderedKeys { node: NodeId },

    #[error("{node}: {keys} keys but {children} children")]
    ChildCount {
        node: NodeId,
        keys: usize,
        children: usize,
    },

    #[error("{node}: key {key} lies outside its separator bounds")]
    OutOfBounds { node: NodeId, key: Key },

    #[error("{node}: holds {keys} keys, allowed {min}..={max}")]
    Occupancy {
        node: NodeId,
        keys: usize,
        min: usize,
        max: usize,
    },

    #[error("{node}: leaf at depth {depth}, expected {expected}")]
    UnevenLeaves {
        node: NodeId,
        depth: usize,
        expected: usize,
    },

    #[error("{node}: internal root without keys")]
    EmptyInternalRoot { node: NodeId },
}

/// Walk the whole tree and report the first violated invariant.
pub(crate) fn check(root: &Node, t: usize) -> Result<(), InvariantViolation> {
    if !root.is_leaf() && root.keys.is_empty() {
        return Err(InvariantViolation::EmptyInternalRoot { node: root.id() });
    }
    let mut leaf_depth = None;
    check_node(root, t, true, None, None, 1, &mut leaf_depth)
}

fn check_node(
    node: &Node,
    t: usize,
    is_root: bool,
    lower: Option<Key>,
    upper: Option<Key>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
) -> Result<(), InvariantViolation> {
    let id = node.id();
    let keys = &node.keys;

    if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(InvariantViolation::UnorderedKeys { node: id });
    }

    for &key in keys {
        let below = lower.is_some_and(|low| key <= low);
        let above = upper.is_some_and(|high| key >= high);
        if below || above {
            return Err(InvariantViolation::OutOfBounds { node: id, key });
        }
    }

    let min = if is_root { 0 } else { t - 1 };
    let max = 2 * t - 1;
    if keys.len() < min || keys.len() > max {
        return Err(InvariantViolation::Occupancy {
            node: id,
            keys: keys.len(),
            min,
            max,
        });
    }

    if node.is_leaf() {
        if !node.children.is_empty() {
            return Err(InvariantViolation::ChildCount {
                node: id,
                keys: keys.len(),
                children: node.children.len(),
            });
        }
        let expected = *leaf_depth.get_or_insert(depth);
        if depth != expected {
            return Err(InvariantViolation::UnevenLeaves {
                node: id,
                depth,
                expected,
            });
        }
        return Ok(());
    }

    if node.children.len() != keys.len() + 1 {
        return Err(InvariantViolation::ChildCount {
            node: id,
            keys: keys.len(),
            children: node.children.len(),
        });
    }

    for (i, child) in node.children.iter().enumerate() {
        let low = if i == 0 { lower } else { Some(keys[i - 1]) };
        let high = if i == keys.len() { upper } else { Some(keys[i]) };
        check_node(child, t, false, low, high, depth + 1, leaf_depth)?;
    }
    Ok(())
}
