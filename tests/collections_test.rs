// perma - Collections integration tests
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Integration tests for the persistent containers: maps, ordered
//! maps, lists, sets, stacks and records.

use perma::{is, List, Map, OrderedMap, RecordSchema, Set, Stack, Value};

fn k(s: &str) -> Value {
    Value::string(s)
}

fn i(n: i64) -> Value {
    Value::int(n)
}

fn sample_map() -> Map {
    Map::new().set(k("a"), i(1)).set(k("b"), i(2)).set(k("c"), i(3))
}

fn int_list(items: &[i64]) -> List {
    items.iter().map(|n| i(*n)).collect()
}

// =============================================================================
// Map
// =============================================================================

#[test]
fn map_set_returns_new_map_and_leaves_original_untouched() {
    let before = sample_map();
    let after = before.set(k("d"), i(4));

    assert_eq!(before.len(), 3);
    assert_eq!(after.len(), 4);
    assert_eq!(before.get(&k("d")), None);
    assert_eq!(after.get(&k("d")), Some(&i(4)));
}

#[test]
fn map_set_existing_key_replaces_without_growing() {
    let m = sample_map().set(k("b"), i(20));
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(&k("b")), Some(&i(20)));
}

#[test]
fn map_set_identical_value_is_harmless() {
    let m = sample_map();
    let n = m.set(k("b"), i(2));
    assert!(m.equals(&n));
}

#[test]
fn map_delete_absent_key_is_noop() {
    let m = sample_map();
    let n = m.delete(&k("zebra"));
    assert!(m.equals(&n));
    assert_eq!(n.len(), 3);
}

#[test]
fn map_get_absent_returns_none_not_error() {
    assert_eq!(sample_map().get(&k("missing")), None);
    assert_eq!(Map::new().get(&i(0)), None);
}

#[test]
fn map_equality_is_structural_across_construction_order() {
    let x = Map::new().set(k("a"), i(1)).set(k("b"), i(2));
    let y = Map::new().set(k("b"), i(2)).set(k("a"), i(1));
    assert!(x.equals(&y));
    assert_eq!(x, y);
    assert!(is(&Value::Map(x), &Value::Map(y)));
}

#[test]
fn map_equality_detects_value_difference() {
    let x = Map::new().set(k("a"), i(1));
    let y = Map::new().set(k("a"), i(2));
    assert!(!x.equals(&y));
}

#[test]
fn map_merge_is_right_biased() {
    let left = sample_map();
    let right = Map::new().set(k("b"), i(20)).set(k("d"), i(4));
    let merged = left.merge(&right);

    assert_eq!(merged.len(), 4);
    assert_eq!(merged.get(&k("a")), Some(&i(1)));
    assert_eq!(merged.get(&k("b")), Some(&i(20)));
    assert_eq!(merged.get(&k("d")), Some(&i(4)));
    // inputs untouched
    assert_eq!(left.get(&k("b")), Some(&i(2)));
}

#[test]
fn map_filter_and_filter_not_partition_entries() {
    let m = sample_map();
    let odd = m.filter(|v| matches!(v, Value::Int(n) if n % 2 == 1));
    let even = m.filter_not(|v| matches!(v, Value::Int(n) if n % 2 == 1));

    assert_eq!(odd.len(), 2);
    assert!(odd.contains_key(&k("a")));
    assert!(odd.contains_key(&k("c")));
    assert_eq!(even.len(), 1);
    assert!(even.contains_key(&k("b")));
    assert_eq!(odd.len() + even.len(), m.len());
}

#[test]
fn map_flip_swaps_keys_and_values() {
    let flipped = sample_map().flip();
    assert_eq!(flipped.get(&i(2)), Some(&k("b")));
    assert_eq!(flipped.len(), 3);
}

#[test]
fn map_flip_with_duplicate_values_keeps_one_winner() {
    let m = Map::new().set(k("a"), i(1)).set(k("b"), i(1));
    let flipped = m.flip();
    assert_eq!(flipped.len(), 1);
    let winner = flipped.get(&i(1)).cloned();
    assert!(winner == Some(k("a")) || winner == Some(k("b")));
    // deterministic: same inputs give the same winner
    assert_eq!(m.flip().get(&i(1)).cloned(), winner);
}

#[test]
fn map_map_keys_and_map_entries_transform() {
    let m = sample_map();
    let upper = m.map_keys(|key| match key {
        Value::Str(s) => Value::string(s.to_uppercase()),
        other => other.clone(),
    });
    assert_eq!(upper.get(&k("A")), Some(&i(1)));
    assert_eq!(upper.get(&k("a")), None);

    let doubled = m.map_entries(|key, value| match value {
        Value::Int(n) => (key.clone(), i(n * 2)),
        other => (key.clone(), other.clone()),
    });
    assert_eq!(doubled.get(&k("c")), Some(&i(6)));
}

#[test]
fn map_survives_many_inserts_and_deletes() {
    let mut m = Map::new();
    for n in 0..1000 {
        m = m.set(i(n), i(n * 10));
    }
    assert_eq!(m.len(), 1000);
    for n in 0..1000 {
        assert_eq!(m.get(&i(n)), Some(&i(n * 10)));
    }
    for n in 0..500 {
        m = m.delete(&i(n));
    }
    assert_eq!(m.len(), 500);
    assert_eq!(m.get(&i(123)), None);
    assert_eq!(m.get(&i(700)), Some(&i(7000)));
}

#[test]
fn map_conversions_preserve_entries() {
    let m = sample_map();

    let list = m.to_list();
    assert_eq!(list.len(), 3);

    let set = m.to_set();
    assert_eq!(set.len(), 3);

    let stack = m.to_stack();
    assert_eq!(stack.len(), 3);

    let ordered = m.to_ordered_map();
    assert_eq!(ordered.len(), 3);
    assert!(ordered.pairs_equal(&m));

    let native = m.to_hash_map();
    assert_eq!(native.get(&k("b")), Some(&i(2)));
}

// =============================================================================
// OrderedMap
// =============================================================================

#[test]
fn ordered_map_iterates_in_insertion_order() {
    let m = OrderedMap::new()
        .set(k("z"), i(1))
        .set(k("a"), i(2))
        .set(k("m"), i(3));
    let keys: Vec<Value> = m.keys().cloned().collect();
    assert_eq!(keys, vec![k("z"), k("a"), k("m")]);
}

#[test]
fn ordered_map_update_keeps_original_position() {
    let m = OrderedMap::new()
        .set(k("x"), i(1))
        .set(k("y"), i(2))
        .set(k("x"), i(10));
    let entries: Vec<(Value, Value)> = m.iter().map(|(a, b)| (a.clone(), b.clone())).collect();
    assert_eq!(entries, vec![(k("x"), i(10)), (k("y"), i(2))]);
}

#[test]
fn ordered_map_delete_closes_the_gap() {
    let m = OrderedMap::new()
        .set(k("a"), i(1))
        .set(k("b"), i(2))
        .set(k("c"), i(3))
        .delete(&k("b"));
    let keys: Vec<Value> = m.keys().cloned().collect();
    assert_eq!(keys, vec![k("a"), k("c")]);
    assert_eq!(m.get(&k("b")), None);
}

#[test]
fn ordered_map_equality_is_order_sensitive() {
    let x = OrderedMap::new().set(k("a"), i(1)).set(k("b"), i(2));
    let y = OrderedMap::new().set(k("b"), i(2)).set(k("a"), i(1));
    assert!(!x.equals(&y));
}

#[test]
fn ordered_map_equals_unordered_map_with_same_pairs() {
    let ordered = OrderedMap::new().set(k("a"), i(1)).set(k("b"), i(2));
    let unordered = Map::new().set(k("b"), i(2)).set(k("a"), i(1));
    assert!(ordered.pairs_equal(&unordered));
    assert!(is(
        &Value::OrderedMap(ordered),
        &Value::Map(unordered)
    ));
}

// =============================================================================
// List
// =============================================================================

#[test]
fn list_push_back_shares_structure_with_original() {
    let a = int_list(&[1, 2, 3]);
    let b = a.push_back(i(4));

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 4);
    assert_eq!(a.get(3), None);
    assert_eq!(b.get(3), Some(&i(4)));
}

#[test]
fn list_push_front_and_pop_front() {
    let l = int_list(&[2, 3]).push_front(i(1));
    assert_eq!(l.first(), Some(&i(1)));
    assert_eq!(l.get(0), Some(&i(1)));
    assert_eq!(l.get(2), Some(&i(3)));

    let (rest, popped) = l.pop_front();
    assert_eq!(popped, Some(i(1)));
    assert_eq!(rest.to_vec(), vec![i(2), i(3)]);
}

#[test]
fn list_pop_back() {
    let l = int_list(&[1, 2, 3]);
    let (rest, popped) = l.pop_back();
    assert_eq!(popped, Some(i(3)));
    assert_eq!(rest.len(), 2);
    assert_eq!(rest.last(), Some(&i(2)));
    // original untouched
    assert_eq!(l.len(), 3);
}

#[test]
fn list_pop_on_empty_returns_none_and_unchanged() {
    let empty = List::new();
    let (still_empty, popped) = empty.pop_back();
    assert_eq!(popped, None);
    assert!(still_empty.is_empty());

    let (still_empty, popped) = empty.pop_front();
    assert_eq!(popped, None);
    assert!(still_empty.is_empty());
}

#[test]
fn list_mixed_front_and_back_operations_keep_order() {
    let mut l = List::new();
    for n in 0..100 {
        l = if n % 2 == 0 {
            l.push_back(i(n))
        } else {
            l.push_front(i(n))
        };
    }
    assert_eq!(l.len(), 100);
    // fronts come out newest-first, then backs oldest-first
    assert_eq!(l.first(), Some(&i(99)));
    assert_eq!(l.last(), Some(&i(98)));

    let mut l2 = l.clone();
    let mut drained = Vec::new();
    while let (rest, Some(v)) = l2.pop_front() {
        drained.push(v);
        l2 = rest;
    }
    assert_eq!(drained.len(), 100);
    assert_eq!(drained, l.to_vec());
}

#[test]
fn list_set_in_range_and_out_of_range() {
    let l = int_list(&[1, 2, 3]);
    let updated = l.set(1, i(20)).unwrap();
    assert_eq!(updated.to_vec(), vec![i(1), i(20), i(3)]);
    assert_eq!(l.get(1), Some(&i(2)));

    let err = l.set(3, i(99)).unwrap_err();
    assert_eq!(
        err,
        perma::Error::IndexOutOfRange {
            index: 3,
            length: 3
        }
    );
}

#[test]
fn list_grows_past_node_width_boundaries() {
    let mut l = List::new();
    for n in 0..2100 {
        l = l.push_back(i(n));
    }
    assert_eq!(l.len(), 2100);
    assert_eq!(l.get(0), Some(&i(0)));
    assert_eq!(l.get(31), Some(&i(31)));
    assert_eq!(l.get(32), Some(&i(32)));
    assert_eq!(l.get(1023), Some(&i(1023)));
    assert_eq!(l.get(1024), Some(&i(1024)));
    assert_eq!(l.get(2099), Some(&i(2099)));
    assert_eq!(l.get(2100), None);
}

#[test]
fn list_group_by_preserves_order_within_groups() {
    let l = int_list(&[1, 2, 3, 4, 5, 6]);
    let groups = l.group_by(|v| match v {
        Value::Int(n) => k(if n % 2 == 0 { "even" } else { "odd" }),
        other => other.clone(),
    });

    assert_eq!(groups.len(), 2);
    let odd = groups.get(&k("odd")).unwrap();
    assert_eq!(odd, &Value::List(int_list(&[1, 3, 5])));
    let even = groups.get(&k("even")).unwrap();
    assert_eq!(even, &Value::List(int_list(&[2, 4, 6])));
    // first-seen group comes first
    let group_keys: Vec<Value> = groups.keys().cloned().collect();
    assert_eq!(group_keys, vec![k("odd"), k("even")]);
}

#[test]
fn list_to_map_keys_by_index() {
    let m = int_list(&[10, 20]).to_map();
    assert_eq!(m.get(&i(0)), Some(&i(10)));
    assert_eq!(m.get(&i(1)), Some(&i(20)));
}

#[test]
fn list_equality_is_structural() {
    let a = int_list(&[1, 2, 3]);
    let b = List::new().push_front(i(1)).push_back(i(2)).push_back(i(3));
    assert!(a.equals(&b));
    assert!(is(&Value::List(a), &Value::List(b)));
}

// =============================================================================
// Set
// =============================================================================

#[test]
fn set_dedupes_and_supports_membership() {
    let s = Set::new().insert(i(1)).insert(i(2)).insert(i(1));
    assert_eq!(s.len(), 2);
    assert!(s.contains(&i(1)));
    assert!(!s.contains(&i(3)));
}

#[test]
fn set_remove_and_union() {
    let a = Set::new().insert(i(1)).insert(i(2));
    let b = Set::new().insert(i(2)).insert(i(3));

    assert_eq!(a.remove(&i(1)).len(), 1);
    assert_eq!(a.len(), 2);

    let u = a.union(&b);
    assert_eq!(u.len(), 3);
    assert!(u.contains(&i(1)) && u.contains(&i(2)) && u.contains(&i(3)));
}

#[test]
fn set_equality_ignores_insertion_order() {
    let a = Set::new().insert(i(1)).insert(i(2));
    let b = Set::new().insert(i(2)).insert(i(1));
    assert!(a.equals(&b));
    assert!(is(&Value::Set(a), &Value::Set(b)));
}

// =============================================================================
// Stack
// =============================================================================

#[test]
fn stack_push_pop_peek() {
    let s = Stack::new().push(i(1)).push(i(2)).push(i(3));
    assert_eq!(s.peek(), Some(&i(3)));
    assert_eq!(s.len(), 3);

    let (rest, top) = s.pop();
    assert_eq!(top, Some(i(3)));
    assert_eq!(rest.peek(), Some(&i(2)));
    assert_eq!(s.len(), 3);
}

#[test]
fn stack_pop_empty() {
    let (rest, top) = Stack::new().pop();
    assert_eq!(top, None);
    assert!(rest.is_empty());
}

#[test]
fn stack_from_list_puts_first_element_on_top() {
    let s = int_list(&[1, 2, 3]).to_stack();
    assert_eq!(s.peek(), Some(&i(1)));
    let collected: Vec<Value> = s.iter().cloned().collect();
    assert_eq!(collected, vec![i(1), i(2), i(3)]);
}

// =============================================================================
// Record
// =============================================================================

fn point_schema() -> RecordSchema {
    RecordSchema::with_name("Point", vec![("x", i(0)), ("y", i(0))])
}

#[test]
fn record_build_applies_defaults_then_overrides() {
    let p = point_schema().build(vec![("x", i(7))]).unwrap();
    assert_eq!(p.get("x").unwrap(), &i(7));
    assert_eq!(p.get("y").unwrap(), &i(0));
}

#[test]
fn record_build_rejects_undeclared_field() {
    let err = point_schema().build(vec![("z", i(1))]).unwrap_err();
    assert_eq!(
        err,
        perma::Error::UnknownField {
            field: "z".to_string(),
            record: "Point".to_string()
        }
    );
}

#[test]
fn record_get_unknown_field_is_an_error() {
    let p = point_schema().build_default();
    assert!(p.get("z").is_err());
}

#[test]
fn record_set_returns_new_record() {
    let p = point_schema().build_default();
    let q = p.set("y", i(5)).unwrap();
    assert_eq!(p.get("y").unwrap(), &i(0));
    assert_eq!(q.get("y").unwrap(), &i(5));
    assert!(p.set("w", i(1)).is_err());
}

#[test]
fn record_equality_requires_same_shape_and_values() {
    let schema = point_schema();
    let a = schema.build(vec![("x", i(1))]).unwrap();
    let b = schema.build(vec![("x", i(1))]).unwrap();
    let c = schema.build(vec![("x", i(2))]).unwrap();
    assert!(a.equals(&b));
    assert!(!a.equals(&c));

    let other_shape = RecordSchema::with_name("Point3", vec![("x", i(0))]);
    let d = other_shape.build(vec![("x", i(1))]).unwrap();
    assert!(!a.equals(&d));
}

#[test]
fn record_to_map_exposes_fields() {
    let p = point_schema().build(vec![("x", i(3)), ("y", i(4))]).unwrap();
    let m = p.to_map();
    assert_eq!(m.get(&k("x")), Some(&i(3)));
    assert_eq!(m.get(&k("y")), Some(&i(4)));
}

#[test]
fn anonymous_record_displays_as_record() {
    let schema = RecordSchema::new(vec![("a", i(1))]);
    assert_eq!(schema.display_name(), "Record");
    let r = schema.build_default();
    assert_eq!(format!("{}", r), "Record { a: 1 }");
}

// =============================================================================
// Cross-container value semantics
// =============================================================================

#[test]
fn is_uses_bitwise_float_semantics() {
    assert!(is(&Value::float(f64::NAN), &Value::float(f64::NAN)));
    assert!(!is(&Value::float(0.0), &Value::float(-0.0)));
    assert!(!is(&i(1), &Value::float(1.0)));
}

#[test]
fn nested_collections_compare_deeply() {
    let inner_a = Value::Map(Map::new().set(k("n"), i(1)));
    let inner_b = Value::Map(Map::new().set(k("n"), i(1)));
    let outer_a = Map::new().set(k("inner"), inner_a);
    let outer_b = Map::new().set(k("inner"), inner_b);
    assert!(outer_a.equals(&outer_b));
}

#[test]
fn collection_values_work_as_map_keys() {
    let key = Value::List(int_list(&[1, 2]));
    let same_key = Value::List(int_list(&[1, 2]));
    let m = Map::new().set(key, k("found"));
    assert_eq!(m.get(&same_key), Some(&k("found")));
}

#[test]
fn display_formats_are_stable() {
    let m = Map::new().set(k("a"), i(1));
    assert_eq!(format!("{}", m), "Map { \"a\": 1 }");
    assert_eq!(format!("{}", Map::new()), "Map {}");
    assert_eq!(format!("{}", int_list(&[1, 2])), "List [ 1, 2 ]");
}
