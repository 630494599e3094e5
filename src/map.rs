// perma - Persistent hash map
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Persistent key-unique associative container.
//!
//! [`Map`] is a handle to a HAMT root plus a size counter. Every
//! "mutating" operation returns a new map sharing all untouched
//! subtrees with the receiver; the receiver is never changed.
//!
//! Iteration order is the trie order: deterministic for a given key
//! set, independent of insertion history, but otherwise unspecified.
//! That order is what fixes the last-writer-wins tie-break in
//! [`Map::flip`] and [`Map::map_keys`].

use std::fmt;

use crate::list::List;
use crate::node::Hamt;
use crate::ordered_map::OrderedMap;
use crate::seq::Seq;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::{Value, pair_hash};

/// A persistent map from [`Value`] keys to [`Value`] values.
#[derive(Clone)]
pub struct Map {
    hamt: Hamt<Value>,
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}

impl Map {
    /// The empty map.
    pub fn new() -> Self {
        Map { hamt: Hamt::new() }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.hamt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hamt.is_empty()
    }

    /// Look up `key`. An absent key is `None`, never an error.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.hamt.get(key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.hamt.contains_key(key)
    }

    /// Return a new map with `key` bound to `value`.
    pub fn set(&self, key: Value, value: Value) -> Map {
        Map {
            hamt: self.hamt.insert(key, value),
        }
    }

    /// Return a new map without `key`. Removing an absent key yields
    /// an equal map.
    pub fn delete(&self, key: &Value) -> Map {
        Map {
            hamt: self.hamt.remove(key),
        }
    }

    /// Right-biased union: entries of `other` overwrite entries of
    /// `self` on key overlap.
    pub fn merge(&self, other: &Map) -> Map {
        let mut hamt = self.hamt.clone();
        for (k, v) in other.iter() {
            hamt = hamt.insert(k.clone(), v.clone());
        }
        Map { hamt }
    }

    /// Rebuild the map with every key passed through `f`. When two
    /// produced keys collide the later one (in this map's iteration
    /// order) wins.
    pub fn map_keys(&self, f: impl Fn(&Value) -> Value) -> Map {
        let mut out = Map::new();
        for (k, v) in self.iter() {
            out = out.set(f(k), v.clone());
        }
        out
    }

    /// Rebuild the map with every entry passed through `f`. Collisions
    /// resolve last-writer-wins in this map's iteration order.
    pub fn map_entries(&self, f: impl Fn(&Value, &Value) -> (Value, Value)) -> Map {
        let mut out = Map::new();
        for (k, v) in self.iter() {
            let (nk, nv) = f(k, v);
            out = out.set(nk, nv);
        }
        out
    }

    /// Keep only entries whose value satisfies `pred`.
    pub fn filter(&self, pred: impl Fn(&Value) -> bool) -> Map {
        let mut hamt = self.hamt.clone();
        for (k, v) in self.iter() {
            if !pred(v) {
                hamt = hamt.remove(k);
            }
        }
        Map { hamt }
    }

    /// Drop entries whose value satisfies `pred`.
    pub fn filter_not(&self, pred: impl Fn(&Value) -> bool) -> Map {
        self.filter(|v| !pred(v))
    }

    /// Swap keys and values. Duplicate values collapse to one entry;
    /// the last source key in this map's iteration order wins.
    pub fn flip(&self) -> Map {
        let mut out = Map::new();
        for (k, v) in self.iter() {
            out = out.set(v.clone(), k.clone());
        }
        out
    }

    /// Structural value equality: same size and same key/value pairs,
    /// regardless of internal tree shape or construction order.
    pub fn equals(&self, other: &Map) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }

    /// Iterate entries in trie order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.hamt.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(_, v)| v)
    }

    // ------------------------------------------------------------------
    // Seq views (lazy; nothing is materialised until a terminal op)
    // ------------------------------------------------------------------

    /// Lazy keyed view of the entries.
    pub fn to_seq(&self) -> Seq {
        Seq::from_map(self.clone())
    }

    /// Alias of [`Map::to_seq`]: entries as key/value pairs.
    pub fn to_keyed_seq(&self) -> Seq {
        self.to_seq()
    }

    /// Lazy view of the values keyed by position.
    pub fn to_indexed_seq(&self) -> Seq {
        Seq::from_map(self.clone()).to_indexed()
    }

    /// Lazy deduplicated view of the values.
    pub fn to_set_seq(&self) -> Seq {
        Seq::from_map(self.clone()).to_set_seq()
    }

    // ------------------------------------------------------------------
    // Concrete conversions
    // ------------------------------------------------------------------

    /// The values, in iteration order, as a list.
    pub fn to_list(&self) -> List {
        self.values().cloned().collect()
    }

    /// The distinct values as a set.
    pub fn to_set(&self) -> Set {
        self.values().cloned().collect()
    }

    /// The values, in iteration order, as a stack (head = first value).
    pub fn to_stack(&self) -> Stack {
        Stack::from_ordered(self.values().cloned())
    }

    /// Fix the current iteration order as insertion order going
    /// forward.
    pub fn to_ordered_map(&self) -> OrderedMap {
        let mut out = OrderedMap::new();
        for (k, v) in self.iter() {
            out = out.set(k.clone(), v.clone());
        }
        out
    }

    /// Shallow conversion to a native `HashMap` (one level; nested
    /// containers stay perma values).
    pub fn to_hash_map(&self) -> std::collections::HashMap<Value, Value> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Order-insensitive hash of the entries, shared with
    /// [`OrderedMap`] so equal maps hash equally across both shapes.
    pub(crate) fn unordered_hash(&self) -> u64 {
        self.iter()
            .fold(0u64, |acc, (k, v)| acc.wrapping_add(pair_hash(k, v)))
    }
}

impl From<Vec<(Value, Value)>> for Map {
    fn from(entries: Vec<(Value, Value)>) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut hamt = Hamt::new();
        for (k, v) in iter {
            hamt = hamt.insert(k, v);
        }
        Map { hamt }
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Map {}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Map {{}}");
        }
        write!(f, "Map {{ ")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
