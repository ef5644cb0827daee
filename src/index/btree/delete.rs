//! Top-down deletion.
//!
//! Every child the descent steps into holds at least `t` keys, so removing
//! one key from it can never underflow and nothing has to be fixed on the
//! way back up. The only repair after the fact is the root collapse done by
//! the caller.

use crate::common::Key;

use super::node::Node;
use super::stats::OperationStats;

/// Remove `key` from the subtree rooted at `node`. Returns whether it was there.
pub(super) fn delete_from(node: &mut Node, key: Key, t: usize, stats: &mut OperationStats) -> bool {
    stats.visit(node);
    let (mut idx, found) = node.locate(key, stats);

    if found {
        if node.is_leaf() {
            node.keys.remove(idx);
            return true;
        }
        return delete_internal_key(node, idx, key, t, stats);
    }

    if node.is_leaf() {
        return false;
    }

    if node.children[idx].len() < t {
        idx = refill_child(node, idx, t);
    }
    delete_from(&mut node.children[idx], key, t, stats)
}

/// `key` sits at `node.keys[idx]` of an internal node.
fn delete_internal_key(
    node: &mut Node,
    idx: usize,
    key: Key,
    t: usize,
    stats: &mut OperationStats,
) -> bool {
    if node.children[idx].len() >= t {
        let predecessor = node.children[idx].max_key();
        node.keys[idx] = predecessor;
        return delete_from(&mut node.children[idx], predecessor, t, stats);
    }

    if node.children[idx + 1].len() >= t {
        let successor = node.children[idx + 1].min_key();
        node.keys[idx] = successor;
        return delete_from(&mut node.children[idx + 1], successor, t, stats);
    }

    node.merge_children(idx);
    delete_from(&mut node.children[idx], key, t, stats)
}

/// Bring the `t - 1` key child at `idx` up to `t` keys.
///
/// Borrows from the left sibling, then the right one; if neither can spare
/// a key the child is merged with its right sibling, or with its left one
/// when it is the last child. Returns the index of the child to descend into.
fn refill_child(node: &mut Node, idx: usize, t: usize) -> usize {
    let last = node.children.len() - 1;

    if idx > 0 && node.children[idx - 1].len() >= t {
        node.rotate_right(idx - 1);
        idx
    } else if idx < last && node.children[idx + 1].len() >= t {
        node.rotate_left(idx);
        idx
    } else if idx < last {
        node.merge_children(idx);
        idx
    } else {
        node.merge_children(idx - 1);
        idx - 1
    }
}
