//! Property tests: the tree against a `BTreeSet` model.

use std::collections::BTreeSet;

use bstarindex::common::Key;
use bstarindex::BStarTree;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(Key),
    Delete(Key),
    Search(Key),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // A narrow key range makes duplicates and misses common.
    let key = -64i64..64;
    prop_oneof![
        4 => key.clone().prop_map(Op::Insert),
        3 => key.clone().prop_map(Op::Delete),
        1 => key.prop_map(Op::Search),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_model(t in 2usize..6, ops in prop::collection::vec(op_strategy(), 1..400)) {
        let mut tree = BStarTree::new(t);
        let mut model = BTreeSet::new();

        for op in ops {
            let before = tree.snapshot().key_count;
            match op {
                Op::Insert(key) => {
                    let outcome = tree.insert(key);
                    prop_assert_eq!(outcome.inserted, model.insert(key));
                    let expected = if outcome.inserted { before + 1 } else { before };
                    prop_assert_eq!(tree.snapshot().key_count, expected);
                }
                Op::Delete(key) => {
                    let outcome = tree.delete(key);
                    prop_assert_eq!(outcome.deleted, model.remove(&key));
                    prop_assert_eq!(outcome.removed_key, outcome.deleted.then_some(key));
                    let expected = if outcome.deleted { before - 1 } else { before };
                    prop_assert_eq!(tree.snapshot().key_count, expected);
                }
                Op::Search(key) => {
                    prop_assert_eq!(tree.search(key).found, model.contains(&key));
                }
            }

            if let Err(violation) = tree.check_invariants() {
                return Err(TestCaseError::fail(violation.to_string()));
            }
        }

        prop_assert_eq!(tree.keys(), model.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn prop_every_inserted_key_is_found(
        t in 2usize..6,
        keys in prop::collection::btree_set(any::<i32>(), 0..300),
        probes in prop::collection::vec(any::<i32>(), 0..50),
    ) {
        let mut tree = BStarTree::new(t);
        let mut ordered: Vec<Key> = keys.iter().map(|&k| Key::from(k)).collect();
        // Insert in a scrambled but deterministic order.
        ordered.sort_by_key(|k| k.wrapping_mul(0x9E37_79B9_7F4A_7C15u64 as i64));

        for &key in &ordered {
            prop_assert!(tree.insert(key).inserted);
        }
        tree.check_invariants().map_err(|v| TestCaseError::fail(v.to_string()))?;

        for &key in &ordered {
            prop_assert!(tree.search(key).found);
        }
        for probe in probes {
            prop_assert_eq!(tree.search(Key::from(probe)).found, keys.contains(&probe));
        }
    }

    #[test]
    fn prop_search_cost_is_bounded_by_height(
        t in 2usize..6,
        keys in prop::collection::btree_set(-1000i64..1000, 1..300),
        probe in -1000i64..1000,
    ) {
        let mut tree = BStarTree::new(t);
        for &key in &keys {
            tree.insert(key);
        }

        let outcome = tree.search(probe);
        let height = tree.height();

        prop_assert!(outcome.path.len() <= height);
        prop_assert!(outcome.comparisons as usize <= height * (2 * tree.min_degree() - 1));
    }

    #[test]
    fn prop_reset_always_yields_single_leaf(keys in prop::collection::vec(any::<i64>(), 0..200)) {
        let mut tree = BStarTree::new(3);
        for key in keys {
            tree.insert(key);
        }

        tree.reset();
        let snapshot = tree.snapshot();

        prop_assert_eq!(snapshot.node_count, 1);
        prop_assert_eq!(snapshot.key_count, 0);
        prop_assert_eq!(snapshot.height, 1);
    }
}
