// perma - Persistent hash set
// Copyright (c) 2026 perma contributors. MIT licensed.

//! Persistent set of unique values, backed by the same hash trie as
//! [`crate::Map`] (a unit-valued HAMT). Iteration order is the trie
//! order: deterministic for a given element set.

use std::fmt;

use crate::list::List;
use crate::node::Hamt;
use crate::seq::Seq;
use crate::value::{Value, value_hash};

/// A persistent set of unique [`Value`]s.
#[derive(Clone)]
pub struct Set {
    hamt: Hamt<()>,
}

impl Default for Set {
    fn default() -> Self {
        Set::new()
    }
}

impl Set {
    /// The empty set.
    pub fn new() -> Self {
        Set { hamt: Hamt::new() }
    }

    pub fn len(&self) -> usize {
        self.hamt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hamt.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.hamt.contains_key(value)
    }

    /// Return a new set including `value`.
    pub fn insert(&self, value: Value) -> Set {
        Set {
            hamt: self.hamt.insert(value, ()),
        }
    }

    /// Return a new set without `value`. Removing an absent value
    /// yields an equal set.
    pub fn remove(&self, value: &Value) -> Set {
        Set {
            hamt: self.hamt.remove(value),
        }
    }

    pub fn union(&self, other: &Set) -> Set {
        let mut out = self.clone();
        for value in other.iter() {
            out = out.insert(value.clone());
        }
        out
    }

    /// Same elements, regardless of construction order.
    pub fn equals(&self, other: &Set) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Iterate in trie order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.hamt.iter().map(|(k, _)| k)
    }

    /// Lazy set view of the elements.
    pub fn to_seq(&self) -> Seq {
        Seq::from_set(self.clone())
    }

    /// The elements, in iteration order, as a list.
    pub fn to_list(&self) -> List {
        self.iter().cloned().collect()
    }

    pub(crate) fn unordered_hash(&self) -> u64 {
        self.iter().fold(0u64, |acc, v| acc.wrapping_add(value_hash(v)))
    }
}

impl From<Vec<Value>> for Set {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl FromIterator<Value> for Set {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut hamt = Hamt::new();
        for value in iter {
            hamt = hamt.insert(value, ());
        }
        Set { hamt }
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Set {}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Set {{}}");
        }
        write!(f, "Set {{ ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
