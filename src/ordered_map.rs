// perma - Persistent insertion-ordered map
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Persistent map that remembers insertion order.
//!
//! [`OrderedMap`] pairs a persistent entry list with a HAMT index from
//! key to entry position. It backs [`crate::Map::to_ordered_map`] and
//! the result of `group_by`, where first-seen order must be preserved.
//!
//! Equality between two ordered maps is order-sensitive; comparing an
//! ordered map against a plain [`Map`] (via [`crate::is`]) compares
//! pairs only.

use std::fmt;

use crate::list::List;
use crate::map::Map;
use crate::node::{Hamt, Trie};
use crate::seq::Seq;
use crate::set::Set;
use crate::stack::Stack;
use crate::value::{Value, pair_hash};

/// A persistent map preserving insertion order.
#[derive(Clone)]
pub struct OrderedMap {
    /// Entries in insertion order.
    entries: Trie<(Value, Value)>,
    /// Key -> position in `entries`.
    index: Hamt<usize>,
}

impl Default for OrderedMap {
    fn default() -> Self {
        OrderedMap::new()
    }
}

impl OrderedMap {
    /// The empty ordered map.
    pub fn new() -> Self {
        OrderedMap {
            entries: Trie::new(),
            index: Hamt::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `key`. An absent key is `None`, never an error.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        let pos = *self.index.get(key)?;
        self.entries.get(pos).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(key)
    }

    /// Bind `key` to `value`. An existing key keeps its position; a
    /// new key appends.
    pub fn set(&self, key: Value, value: Value) -> OrderedMap {
        match self.index.get(&key) {
            Some(&pos) => OrderedMap {
                entries: self.entries.update(pos, (key, value)),
                index: self.index.clone(),
            },
            None => {
                let pos = self.entries.len();
                OrderedMap {
                    entries: self.entries.push((key.clone(), value)),
                    index: self.index.insert(key, pos),
                }
            }
        }
    }

    /// Remove `key`. Rewrites the entry list (O(n)); removing an
    /// absent key yields an equal map.
    pub fn delete(&self, key: &Value) -> OrderedMap {
        if !self.contains_key(key) {
            return self.clone();
        }
        self.iter()
            .filter(|&(k, _)| k != key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Right-biased union preserving this map's order for existing
    /// keys; new keys of `other` append in `other`'s order.
    pub fn merge(&self, other: &OrderedMap) -> OrderedMap {
        let mut out = self.clone();
        for (k, v) in other.iter() {
            out = out.set(k.clone(), v.clone());
        }
        out
    }

    /// Order-sensitive equality: same pairs in the same order.
    pub fn equals(&self, other: &OrderedMap) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }

    /// Order-insensitive comparison against a plain map.
    pub fn pairs_equal(&self, other: &Map) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Lazy keyed view of the entries, in insertion order.
    pub fn to_seq(&self) -> Seq {
        Seq::from_ordered_map(self.clone())
    }

    /// Forget the ordering.
    pub fn to_map(&self) -> Map {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// The values, in insertion order, as a list.
    pub fn to_list(&self) -> List {
        self.values().cloned().collect()
    }

    pub fn to_set(&self) -> Set {
        self.values().cloned().collect()
    }

    pub fn to_stack(&self) -> Stack {
        Stack::from_ordered(self.values().cloned())
    }

    pub(crate) fn unordered_hash(&self) -> u64 {
        self.iter()
            .fold(0u64, |acc, (k, v)| acc.wrapping_add(pair_hash(k, v)))
    }
}

impl FromIterator<(Value, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut out = OrderedMap::new();
        for (k, v) in iter {
            out = out.set(k, v);
        }
        out
    }
}

impl From<Vec<(Value, Value)>> for OrderedMap {
    fn from(entries: Vec<(Value, Value)>) -> Self {
        entries.into_iter().collect()
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for OrderedMap {}

impl fmt::Display for OrderedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "OrderedMap {{}}");
        }
        write!(f, "OrderedMap {{ ")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Debug for OrderedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
