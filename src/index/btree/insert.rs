//! Top-down insertion.
//!
//! The descent never re-ascends: before stepping into a full child the
//! parent makes room for it, either by spilling one key into a sibling or
//! by splitting it. The parent itself is never full at that point, so a
//! promoted median always fits.

use crate::common::{Key, NodeIdGenerator};

use super::node::Node;
use super::stats::OperationStats;

/// Insert `key` below `node`, which must not be full.
pub(super) fn insert_non_full(
    node: &mut Node,
    key: Key,
    t: usize,
    ids: &NodeIdGenerator,
    stats: &mut OperationStats,
) {
    stats.visit(node);
    let mut idx = node.slot_from_right(key, stats);

    if node.is_leaf() {
        node.keys.insert(idx, key);
        return;
    }

    if node.children[idx].is_full(t) {
        idx = make_room(node, idx, key, t, ids, stats);
    }
    insert_non_full(&mut node.children[idx], key, t, ids, stats);
}

/// Relieve the full child at `idx` and return the child `key` now belongs in.
///
/// Left sibling first, then right sibling, then split.
fn make_room(
    node: &mut Node,
    idx: usize,
    key: Key,
    t: usize,
    ids: &NodeIdGenerator,
    stats: &mut OperationStats,
) -> usize {
    if idx > 0 && has_spare_capacity(&node.children[idx - 1], t) {
        node.rotate_left(idx - 1);
        return if stats.compare(key, node.keys[idx - 1]).is_lt() {
            idx - 1
        } else {
            idx
        };
    }

    if idx + 1 < node.children.len() && has_spare_capacity(&node.children[idx + 1], t) {
        node.rotate_right(idx);
        return if stats.compare(key, node.keys[idx]).is_gt() {
            idx + 1
        } else {
            idx
        };
    }

    node.split_child(idx, t, ids);
    if stats.compare(node.keys[idx], key).is_lt() {
        idx + 1
    } else {
        idx
    }
}

/// A sibling can take a spilled key and still not be full.
#[inline]
fn has_spare_capacity(sibling: &Node, t: usize) -> bool {
    sibling.len() + 1 < 2 * t - 1
}
