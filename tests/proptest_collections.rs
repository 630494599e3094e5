// perma - Property-based tests for collection operations
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Property-based tests for collection operations and invariants.
//!
//! Tests the following properties:
//! - map get/set/delete agrees with a `std::collections::HashMap` oracle
//! - insertion order never affects map equality
//! - list deque operations agree with an `im::Vector` oracle
//! - set membership agrees with a `std::collections::HashSet` oracle
//! - seq pipelines agree with eager iterator chains
//! - updates never mutate the pre-update collection

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use perma::{List, Map, OrderedMap, Seq, Set, Value};
use proptest::prelude::*;

/// Generate small integers for collection elements
fn arb_small_int() -> impl Strategy<Value = i64> {
    -1000i64..1000i64
}

/// Generate key/value pairs over a deliberately small key space so
/// overwrites and deletes actually collide
fn arb_pairs(max_len: usize) -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((-20i64..20i64, arb_small_int()), 0..=max_len)
}

/// A mixed edit script for a map: set (true) or delete (false) a key
fn arb_map_ops(max_len: usize) -> impl Strategy<Value = Vec<(bool, i64, i64)>> {
    prop::collection::vec((any::<bool>(), -20i64..20i64, arb_small_int()), 0..=max_len)
}

/// A mixed edit script for a list: 0 = push_back, 1 = push_front,
/// 2 = pop_back, 3 = pop_front
fn arb_list_ops(max_len: usize) -> impl Strategy<Value = Vec<(u8, i64)>> {
    prop::collection::vec((0u8..4u8, arb_small_int()), 0..=max_len)
}

fn int(n: i64) -> Value {
    Value::int(n)
}

fn value_hash(v: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    v.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Map properties
// =============================================================================

proptest! {
    #[test]
    fn map_agrees_with_hashmap_oracle(ops in arb_map_ops(64)) {
        let mut subject = Map::new();
        let mut oracle: HashMap<i64, i64> = HashMap::new();

        for (is_set, key, value) in ops {
            if is_set {
                subject = subject.set(int(key), int(value));
                oracle.insert(key, value);
            } else {
                subject = subject.delete(&int(key));
                oracle.remove(&key);
            }
        }

        prop_assert_eq!(subject.len(), oracle.len());
        for (key, value) in &oracle {
            prop_assert_eq!(subject.get(&int(*key)), Some(&int(*value)));
        }
        for key in -20i64..20i64 {
            prop_assert_eq!(subject.contains_key(&int(key)), oracle.contains_key(&key));
        }
    }

    #[test]
    fn map_equality_ignores_insertion_order(pairs in arb_pairs(32)) {
        // dedup to the last write per key, then build in two orders
        let mut last: HashMap<i64, i64> = HashMap::new();
        for (k, v) in &pairs {
            last.insert(*k, *v);
        }
        let forward: Map = last.iter().map(|(k, v)| (int(*k), int(*v))).collect();
        let backward: Map = last
            .iter()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|(k, v)| (int(*k), int(*v)))
            .collect();

        prop_assert!(forward.equals(&backward));
        prop_assert_eq!(
            value_hash(&Value::Map(forward)),
            value_hash(&Value::Map(backward))
        );
    }

    #[test]
    fn map_set_never_mutates_the_original(pairs in arb_pairs(32), key in -20i64..20i64, value in arb_small_int()) {
        let before: Map = pairs.iter().map(|(k, v)| (int(*k), int(*v))).collect();
        let snapshot: Vec<(Value, Value)> = before
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let _after = before.set(int(key), int(value));
        let _gone = before.delete(&int(key));

        let unchanged: Vec<(Value, Value)> = before
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        prop_assert_eq!(snapshot, unchanged);
    }

    #[test]
    fn map_merge_agrees_with_extend(left in arb_pairs(24), right in arb_pairs(24)) {
        let a: Map = left.iter().map(|(k, v)| (int(*k), int(*v))).collect();
        let b: Map = right.iter().map(|(k, v)| (int(*k), int(*v))).collect();

        let mut oracle: HashMap<i64, i64> = HashMap::new();
        for (k, v) in left.iter().chain(right.iter()) {
            oracle.insert(*k, *v);
        }

        let merged = a.merge(&b);
        prop_assert_eq!(merged.len(), oracle.len());
        for (k, v) in &oracle {
            prop_assert_eq!(merged.get(&int(*k)), Some(&int(*v)));
        }
    }

    #[test]
    fn ordered_map_keeps_first_occurrence_order(pairs in arb_pairs(32)) {
        let subject: OrderedMap = pairs.iter().map(|(k, v)| (int(*k), int(*v))).collect();

        let mut expected_keys = Vec::new();
        for (k, _) in &pairs {
            if !expected_keys.contains(k) {
                expected_keys.push(*k);
            }
        }

        let actual_keys: Vec<Value> = subject.keys().cloned().collect();
        let expected: Vec<Value> = expected_keys.into_iter().map(int).collect();
        prop_assert_eq!(actual_keys, expected);
    }
}

// =============================================================================
// List properties
// =============================================================================

proptest! {
    #[test]
    fn list_agrees_with_im_vector_oracle(ops in arb_list_ops(64)) {
        let mut subject = List::new();
        let mut oracle: im::Vector<i64> = im::Vector::new();

        for (op, value) in ops {
            match op {
                0 => {
                    subject = subject.push_back(int(value));
                    oracle.push_back(value);
                }
                1 => {
                    subject = subject.push_front(int(value));
                    oracle.push_front(value);
                }
                2 => {
                    let (rest, popped) = subject.pop_back();
                    prop_assert_eq!(popped, oracle.pop_back().map(int));
                    subject = rest;
                }
                _ => {
                    let (rest, popped) = subject.pop_front();
                    prop_assert_eq!(popped, oracle.pop_front().map(int));
                    subject = rest;
                }
            }
        }

        prop_assert_eq!(subject.len(), oracle.len());
        let collected: Vec<Value> = subject.iter().cloned().collect();
        let expected: Vec<Value> = oracle.iter().map(|n| int(*n)).collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn list_get_agrees_with_vec_indexing(items in prop::collection::vec(arb_small_int(), 0..64)) {
        let subject: List = items.iter().map(|n| int(*n)).collect();

        prop_assert_eq!(subject.len(), items.len());
        for (index, expected) in items.iter().enumerate() {
            prop_assert_eq!(subject.get(index), Some(&int(*expected)));
        }
        prop_assert_eq!(subject.get(items.len()), None);
    }

    #[test]
    fn list_set_changes_exactly_one_slot(items in prop::collection::vec(arb_small_int(), 1..64), replacement in arb_small_int()) {
        let subject: List = items.iter().map(|n| int(*n)).collect();
        let index = items.len() / 2;
        let updated = subject.set(index, int(replacement)).unwrap();

        for probe in 0..items.len() {
            if probe == index {
                prop_assert_eq!(updated.get(probe), Some(&int(replacement)));
            } else {
                prop_assert_eq!(updated.get(probe), subject.get(probe));
            }
        }
    }
}

// =============================================================================
// Set properties
// =============================================================================

proptest! {
    #[test]
    fn set_agrees_with_hashset_oracle(items in prop::collection::vec(-50i64..50i64, 0..64)) {
        let mut subject = Set::new();
        let mut oracle: HashSet<i64> = HashSet::new();

        for n in &items {
            subject = subject.insert(int(*n));
            oracle.insert(*n);
        }

        prop_assert_eq!(subject.len(), oracle.len());
        for n in -50i64..50i64 {
            prop_assert_eq!(subject.contains(&int(n)), oracle.contains(&n));
        }
    }
}

// =============================================================================
// Seq properties
// =============================================================================

proptest! {
    #[test]
    fn seq_pipeline_agrees_with_eager_iterators(items in prop::collection::vec(arb_small_int(), 0..64)) {
        let lazy = Seq::from_values(items.iter().map(|n| int(*n)).collect())
            .filter(|v| matches!(v, Value::Int(n) if n % 3 == 0))
            .map(|v| match v {
                Value::Int(n) => int(n + 1),
                other => other.clone(),
            })
            .to_vec()
            .unwrap();

        let eager: Vec<Value> = items
            .iter()
            .filter(|n| *n % 3 == 0)
            .map(|n| int(n + 1))
            .collect();

        prop_assert_eq!(lazy, eager);
    }

    #[test]
    fn seq_get_agrees_with_full_materialisation(items in prop::collection::vec(arb_small_int(), 0..64), index in 0usize..80) {
        let seq = Seq::from_values(items.iter().map(|n| int(*n)).collect())
            .filter(|v| matches!(v, Value::Int(n) if n % 2 == 0));

        let all = seq.to_vec().unwrap();
        prop_assert_eq!(seq.get(index).unwrap(), all.get(index).cloned());
    }

    #[test]
    fn seq_count_matches_materialised_length(items in prop::collection::vec(arb_small_int(), 0..64)) {
        let seq = Seq::from_values(items.iter().map(|n| int(*n)).collect())
            .filter_not(|v| matches!(v, Value::Int(n) if *n < 0));
        prop_assert_eq!(seq.count().unwrap(), seq.to_vec().unwrap().len());
    }
}

// =============================================================================
// Round trips across containers
// =============================================================================

proptest! {
    #[test]
    fn map_to_ordered_map_preserves_pairs(pairs in arb_pairs(32)) {
        let map: Map = pairs.iter().map(|(k, v)| (int(*k), int(*v))).collect();
        let ordered = map.to_ordered_map();
        prop_assert!(ordered.pairs_equal(&map));
        prop_assert!(ordered.to_map().equals(&map));
    }

    #[test]
    fn list_stack_round_trip_preserves_order(items in prop::collection::vec(arb_small_int(), 0..32)) {
        let list: List = items.iter().map(|n| int(*n)).collect();
        let back = list.to_stack().to_list();
        prop_assert!(back.equals(&list));
    }

    #[test]
    fn pop_front_drains_in_iteration_order(items in prop::collection::vec(arb_small_int(), 0..32)) {
        let mut list: List = items.iter().map(|n| int(*n)).collect();
        let mut drained = VecDeque::new();
        loop {
            let (rest, popped) = list.pop_front();
            match popped {
                Some(v) => drained.push_back(v),
                None => break,
            }
            list = rest;
        }
        let expected: VecDeque<Value> = items.iter().map(|n| int(*n)).collect();
        prop_assert_eq!(drained, expected);
    }
}
